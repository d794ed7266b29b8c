use lasso::Resolver;
use unicode_width::UnicodeWidthStr;

use crate::frontend::{evaluate::EvalError, parse::ParseError};

const TAB_REPLACEMENT: &str = "   ";

/// Renders a parse error with the offending line and a caret under the failing column.
pub fn format_parse_error(source: &str, error: &ParseError) -> String {
	let line = source.split('\n').nth(error.line.saturating_sub(1)).unwrap_or_default();
	let line = line.strip_suffix('\r').unwrap_or(line);
	let before: String = line.chars().take(error.column.saturating_sub(1)).collect();

	let gutter = format!("{}|", error.line);
	let visual_line = line.replace('\t', TAB_REPLACEMENT);
	let visual_offset = gutter.width() + before.replace('\t', TAB_REPLACEMENT).width();

	format!("{error}\n\n{gutter}{visual_line}\n{}^", ">".repeat(visual_offset))
}

/// Renders an evaluation error as a single line, resolving any name it mentions.
pub fn display_eval_error(error: &EvalError, interner: &impl Resolver) -> String {
	match error {
		EvalError::UndefinedVariable(name) => format!("Variable \"{}\" not defined", interner.resolve(name)),
		_ => error.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;
	use crate::frontend::parse::parse;

	fn report(source: &str) -> String {
		let error = parse(source, &mut Rodeo::new()).unwrap_err();
		format_parse_error(source, &error)
	}

	#[test]
	fn caret_points_at_the_failure() {
		assert_eq!(
			"Parse error at 1:10 (end_of_input)\n\nExpected end of input, but still had input remaining\n\n1|print \
			 \"a\" print\"b\n>>>>>>>>>>>^",
			report("print \"a\" print\"b")
		);
	}

	#[test]
	fn caret_accounts_for_the_gutter_and_wide_characters() {
		let source = "out 1\nout 2\nout 3\nout 4\nout 5\nout 6\nout 7\nout 8\nout 9\nprint \"日本\" x";
		let report = report(source);
		assert!(report.starts_with("Parse error at 10:11 (end_of_input)"), "{report}");
		assert!(report.ends_with("\n\n10|print \"日本\" x\n>>>>>>>>>>>>>>>^"), "{report}");
	}

	#[test]
	fn names_are_resolved() {
		let mut interner = Rodeo::new();
		let name = interner.get_or_intern("total");
		assert_eq!("Variable \"total\" not defined", display_eval_error(&EvalError::UndefinedVariable(name), &interner));
		assert_eq!("Division by zero", display_eval_error(&EvalError::DivisionByZero, &interner));
	}
}
