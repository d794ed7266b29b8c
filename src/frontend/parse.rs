use std::cell::RefCell;

use lasso::Rodeo;
use peg::{error::ParseError as PegError, str::LineCol};
use thiserror::Error;

use crate::{
	common::{bind, Name, Operator},
	fraction::Fraction,
	ir::syntax::{Expression, Map, Program, Reduce, Statement},
	utility::bx,
};

/// Where and why parsing stopped.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("Parse error at {line}:{column} ({rule})\n\n{message}")]
pub struct ParseError {
	/// 1-based.
	pub line: usize,
	/// 1-based, in characters.
	pub column: usize,
	pub offset: usize,
	pub rule: String,
	pub message: String,
}

impl From<PegError<LineCol>> for ParseError {
	fn from(error: PegError<LineCol>) -> Self {
		let mut expected: Vec<&str> = error.expected.tokens().collect();
		expected.sort_unstable();
		expected.dedup();

		let (rule, message) = if expected.contains(&"EOF") {
			("end_of_input".to_owned(), "Expected end of input, but still had input remaining".to_owned())
		} else if let [only] = expected.as_slice() {
			((*only).to_owned(), format!("Expected {only}"))
		} else {
			("choice".to_owned(), format!("No inputs matched, expected one of: {}", expected.join(", ")))
		};

		Self { line: error.location.line, column: error.location.column, offset: error.location.offset, rule, message }
	}
}

/// Parses a program, interning its identifiers.
pub fn parse(source: &str, interner: &mut Rodeo) -> Result<Program, ParseError> {
	Ok(program_parser::program(source, &RefCell::new(interner))?)
}

/// Parses a single expression, interning its identifiers.
pub fn parse_expression(source: &str, interner: &mut Rodeo) -> Result<Expression, ParseError> {
	Ok(program_parser::lone_expression(source, &RefCell::new(interner))?)
}

peg::parser! {
	grammar program_parser(interner: &RefCell<&mut Rodeo>) for str {
		rule _ = quiet!{[' ' | '\t']*}

		rule ws() = quiet!{[' ' | '\t']+} / expected!("whitespace")

		rule separator() = quiet!{_ "\r"? "\n"} / expected!("newline")

		rule trailing() = quiet!{_ ![_]}

		pub rule program() -> Program
			= separator()* statements:(_ s:statement() {s}) ** (separator()+) separator()* trailing()?
				{Program { statements }}

		pub rule lone_expression() -> Expression
			= _ e:expression() _ {e}

		rule statement() -> Statement
			= "var" ws() name:identifier() _ "=" _ e:expression() {Statement::Var(name, e)}
			/ "out" ws() e:expression() {Statement::Out(e)}
			/ "print" _ "\"" text:$([^ '"' | '\n']*) "\"" {Statement::Print(text.to_owned())}
			/ e:expression() {Statement::Expression(e)}

		rule identifier() -> Name
			= quiet!{s:$(['a'..='z' | 'A'..='Z' | '_'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']*) {interner.borrow_mut().get_or_intern(s)}}
			/ expected!("identifier")

		rule number() -> Fraction
			= quiet!{n:$("-"? ['0'..='9']+ ("." ['0'..='9']+)?) {? n.parse().or(Err("number"))}}
			/ expected!("number")

		rule expression() -> Expression = precedence!{
			x:(@) _ "+" _ y:@ {Expression::operation(x, Operator::Add, y)}
			x:(@) _ "-" _ y:@ {Expression::operation(x, Operator::Subtract, y)}
			--
			x:(@) _ "*" _ y:@ {Expression::operation(x, Operator::Multiply, y)}
			x:(@) _ "/" _ y:@ {Expression::operation(x, Operator::Divide, y)}
			--
			x:(@) _ "^" _ y:@ {Expression::operation(x, Operator::Exponent, y)}
			--
			a:atom() {a}
		}

		rule atom() -> Expression
			= "(" _ e:expression() _ ")" {e}
			/ "{" _ start:expression() _ "," _ end:expression() _ "}" {Expression::Sequence(bx!(start), bx!(end))}
			/ "map(" _ input:expression() _ "," _ parameter:identifier() _ "->" _ body:expression() _ ")"
				{Expression::Map(Map { input: bx!(input), lambda: bind([parameter], body) })}
			/ "reduce(" _ input:expression() _ "," _ initial:expression() _ "," _
				a:identifier() ws() b:identifier() _ "->" _ body:expression() _ ")"
				{Expression::Reduce(Reduce { input: bx!(input), initial: bx!(initial), lambda: bind([a, b], body) })}
			/ n:number() {Expression::Number(n)}
			/ name:identifier() {Expression::Identifier(name)}
	}
}
