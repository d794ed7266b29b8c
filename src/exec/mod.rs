use std::{num::NonZeroUsize, thread};

pub mod cancel;
pub mod parallel;
pub mod session;

/// Evaluation settings shared by every statement of a session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
	/// Significant digits used when a number does not have a terminating decimal expansion.
	pub precision: usize,
	/// Upper bound on the threads a single `map` spreads its elements over.
	pub workers: usize,
	/// Levels of a `reduce` split that fork threads; deeper levels run on the current thread.
	pub parallel_depth: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			precision: 30,
			workers: thread::available_parallelism().map_or(1, NonZeroUsize::get),
			parallel_depth: 6,
		}
	}
}
