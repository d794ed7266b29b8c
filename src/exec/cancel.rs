use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

use crate::frontend::evaluate::EvalError;

/// A cooperative cancellation flag.
///
/// Tokens form a tree: a token derived with [`CancelToken::child`] is canceled when it or any of
/// its ancestors is, while canceling a child leaves its parent running.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<Node>);

#[derive(Debug, Default)]
struct Node {
	canceled: AtomicBool,
	parent: Option<CancelToken>,
}

impl CancelToken {
	pub fn new() -> Self { Self::default() }

	pub fn child(&self) -> Self { Self(Arc::new(Node { canceled: AtomicBool::new(false), parent: Some(self.clone()) })) }

	pub fn cancel(&self) { self.0.canceled.store(true, Ordering::Relaxed); }

	pub fn is_canceled(&self) -> bool {
		let mut token = Some(self);
		while let Some(CancelToken(node)) = token {
			if node.canceled.load(Ordering::Relaxed) {
				return true;
			}
			token = node.parent.as_ref();
		}
		false
	}

	pub fn check(&self) -> Result<(), EvalError> {
		if self.is_canceled() {
			Err(EvalError::Canceled)
		} else {
			Ok(())
		}
	}
}

/// Cancels a running submission from any thread.
#[derive(Clone, Debug)]
pub struct CancelHandle(pub(crate) CancelToken);

impl CancelHandle {
	pub fn cancel(&self) { self.0.cancel(); }

	pub fn is_canceled(&self) -> bool { self.0.is_canceled() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cancellation_flows_downward() {
		let root = CancelToken::new();
		let child = root.child();
		let grandchild = child.child();
		let sibling = root.child();

		child.cancel();
		assert!(child.is_canceled());
		assert!(grandchild.is_canceled());
		assert!(!root.is_canceled());
		assert!(!sibling.is_canceled());
		assert_eq!(Ok(()), sibling.check());

		root.cancel();
		assert!(sibling.is_canceled());
		assert_eq!(Err(EvalError::Canceled), sibling.check());
	}

	#[test]
	fn handles_share_the_token() {
		let token = CancelToken::new();
		let handle = CancelHandle(token.clone());
		let remote = handle.clone();
		std::thread::spawn(move || remote.cancel()).join().unwrap();
		assert!(handle.is_canceled());
		assert!(token.child().is_canceled());
	}
}
