use std::{thread, time::Duration};

use quotient::{
	exec::{session::Session, Config},
	ir::semantics::Value,
};

use crate::common::{error, run, standard};

#[test]
fn implicit_expression_output() {
	assert_eq!(vec![standard("2"), standard("4")], run("1\nout 2\n3\n4"));
	assert_eq!(vec![standard("2")], run("1\nout 2\n3\nvar x = 4"));
}

#[test]
fn repl_submissions_share_bindings() {
	let mut session = Session::default();
	assert!(session.submit("var x = 5").next().is_none());
	assert_eq!(vec![standard("10")], session.submit("x * 2").collect::<Vec<_>>());
	assert!(session.submit("var s = map({1, x}, i -> i * 5)").next().is_none());
	assert_eq!(vec![standard("75")], session.submit("reduce(s, 0, a b -> a + b)").collect::<Vec<_>>());
	assert_eq!(vec![error("Variable \"y\" not defined")], session.submit("x + y").collect::<Vec<_>>());
	assert_eq!(vec![standard("6")], session.submit("x + 1").collect::<Vec<_>>());
}

#[test]
fn precision_is_configurable() {
	let mut session = Session::new(Config { precision: 5, ..Config::default() });
	assert_eq!(vec![standard("0.66667")], session.submit("2 / 3").collect::<Vec<_>>());
	assert_eq!(vec![standard("0.125")], session.submit("1 / 8").collect::<Vec<_>>());
}

#[test]
fn results_do_not_depend_on_workers() {
	let source = "reduce(map({1, 300}, i -> 1 / i), 0, a b -> a + b)";
	let expected = run(source);
	for workers in [1, 2, 3, 8] {
		for parallel_depth in [0, 1, 4] {
			let mut session = Session::new(Config { workers, parallel_depth, ..Config::default() });
			assert_eq!(expected, session.submit(source).collect::<Vec<_>>(), "{workers} {parallel_depth}");
		}
	}
}

#[test]
fn cancel_long_running_map() {
	let mut session = Session::default();
	let mut submission = session.submit("print \"starting\"\nvar s = map({1, 2000000}, i -> (i / 7) ^ 64)");
	assert_eq!(Some(standard("starting")), submission.next());

	let handle = submission.cancel_handle();
	let canceler = thread::spawn(move || {
		thread::sleep(Duration::from_millis(10));
		handle.cancel();
	});
	assert_eq!(Some(error("Canceled")), submission.next());
	assert_eq!(None, submission.next());
	canceler.join().unwrap();
	drop(submission);

	assert!(session.lookup("s").is_none());
	assert_eq!(vec![standard("3")], session.submit("1 + 2").collect::<Vec<_>>());
}

#[test]
fn cancel_is_idempotent() {
	let mut session = Session::default();
	let mut submission = session.submit("var a = 1\nvar b = 2");
	let handle = submission.cancel_handle();
	handle.cancel();
	handle.cancel();
	assert!(handle.is_canceled());
	assert_eq!(Some(error("Canceled")), submission.next());
	assert_eq!(None, submission.next());
	drop(submission);
	assert_eq!(None, session.lookup("a"));
	assert_eq!(None::<&Value>, session.lookup("b"));
}
