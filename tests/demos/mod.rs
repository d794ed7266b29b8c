use std::fs;

use quotient::exec::session::OutputEvent;

use crate::common::{programs, run};

#[test]
fn run_demos() {
	let paths = programs("demos");
	assert!(!paths.is_empty());
	for path in paths {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(&path).expect(&path_str);
		let expected = fs::read_to_string(path.with_extension("out")).expect(&path_str);

		let mut output = String::new();
		for event in run(&source) {
			match event {
				OutputEvent::Standard { text } => {
					output.push_str(&text);
					output.push('\n');
				}
				OutputEvent::Error { text } => panic!("{path_str}: {text}"),
			}
		}
		assert_eq!(expected.replace("\r\n", "\n"), output, "{path_str}");
	}
}
