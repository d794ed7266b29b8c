use std::fs;

use quotient::exec::session::OutputEvent;

use crate::common::{programs, run};

#[test]
fn run_fail_tests() {
	let paths = programs("tests/fail/programs");
	assert!(!paths.is_empty());
	for path in paths {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(&path).expect(&path_str);
		let events = run(&source);
		assert!(matches!(events.last(), Some(OutputEvent::Error { .. })), "{path_str}: {events:?}");
	}
}
