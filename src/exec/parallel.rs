use std::{
	panic,
	sync::{Mutex, PoisonError},
	thread,
};

use tracing::trace;

use crate::{exec::cancel::CancelToken, frontend::evaluate::EvalError};

// Sibling tasks sharing a child token; the first real failure cancels the rest.
struct Group {
	token: CancelToken,
	failure: Mutex<Option<EvalError>>,
}

impl Group {
	fn new(parent: &CancelToken) -> Self { Self { token: parent.child(), failure: Mutex::new(None) } }

	fn settle<T>(&self, result: Result<T, EvalError>) -> Option<T> {
		match result {
			Ok(value) => Some(value),
			// Only ever a consequence of some other failure or of the caller.
			Err(EvalError::Canceled) => None,
			Err(error) => {
				let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
				if failure.is_none() {
					trace!(%error, "task failed, canceling siblings");
					*failure = Some(error);
				}
				self.token.cancel();
				None
			}
		}
	}

	fn finish<T>(self, value: Option<T>) -> Result<T, EvalError> {
		match (value, self.failure.into_inner().unwrap_or_else(PoisonError::into_inner)) {
			(_, Some(error)) => Err(error),
			(Some(value), None) => Ok(value),
			(None, None) => Err(EvalError::Canceled),
		}
	}
}

fn rejoin<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
	handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
}

/// Runs two tasks concurrently, each under a shared child of `token`.
pub fn join<A, B>(
	token: &CancelToken,
	left: impl FnOnce(&CancelToken) -> Result<A, EvalError> + Send,
	right: impl FnOnce(&CancelToken) -> Result<B, EvalError>,
) -> Result<(A, B), EvalError>
where
	A: Send,
{
	let group = Group::new(token);
	let (left, right) = thread::scope(|scope| {
		let group = &group;
		let handle = scope.spawn(move || group.settle(left(&group.token)));
		let right = group.settle(right(&group.token));
		(rejoin(handle), right)
	});
	group.finish(left.zip(right))
}

/// Computes `task(i)` for every `i` in `0..len`, spreading contiguous chunks of indices over at
/// most `workers` threads. Results keep index order.
pub fn map_indexed<T>(
	token: &CancelToken,
	len: usize,
	workers: usize,
	task: impl Fn(usize, &CancelToken) -> Result<T, EvalError> + Sync,
) -> Result<Vec<T>, EvalError>
where
	T: Send,
{
	let chunk = len.div_ceil(workers.max(1)).max(1);
	let chunks = len.div_ceil(chunk);
	trace!(len, chunks, "spreading indices");

	let group = Group::new(token);
	let run = |start: usize| {
		let mut results = Vec::with_capacity(chunk.min(len - start));
		for index in start..(start + chunk).min(len) {
			results.push(group.settle(group.token.check().and_then(|()| task(index, &group.token)))?);
		}
		Some(results)
	};

	let results = thread::scope(|scope| {
		let run = &run;
		let handles: Vec<_> = (1..chunks).map(|i| scope.spawn(move || run(i * chunk))).collect();
		let first = if len == 0 { Some(Vec::new()) } else { run(0) };
		let rest: Vec<_> = handles.into_iter().map(rejoin).collect();
		std::iter::once(first).chain(rest).collect::<Option<Vec<_>>>()
	});
	group.finish(results.map(|chunks| chunks.into_iter().flatten().collect()))
}
