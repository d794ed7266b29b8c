use std::fmt::{self, Write};

use lasso::Resolver;

use crate::ir::syntax::{Expression, Program, Statement};

const PRECISION: usize = 30;

pub fn pretty_print(expression: &Expression, interner: &impl Resolver) -> String {
	let mut string = String::new();
	// Writing to a `String` cannot fail.
	let _ = print(expression, &mut string, interner);
	string
}

pub fn pretty_print_program(program: &Program, interner: &impl Resolver) -> String {
	let mut string = String::new();
	for (i, statement) in program.statements.iter().enumerate() {
		if i > 0 {
			string.push('\n');
		}
		let _ = print_statement(statement, &mut string, interner);
	}
	string
}

pub fn print_statement(statement: &Statement, f: &mut impl Write, interner: &impl Resolver) -> fmt::Result {
	match statement {
		Statement::Print(text) => write!(f, "print \"{text}\""),
		Statement::Out(expression) => {
			write!(f, "out ")?;
			print(expression, f, interner)
		}
		Statement::Var(name, expression) => {
			write!(f, "var {} = ", interner.resolve(name))?;
			print(expression, f, interner)
		}
		Statement::Expression(expression) => print(expression, f, interner),
	}
}

/// Writes an expression back as source, parenthesizing every operation.
pub fn print(expression: &Expression, f: &mut impl Write, interner: &impl Resolver) -> fmt::Result {
	match expression {
		Expression::Number(value) => write!(f, "{}", value.to_decimal_string(PRECISION)),
		Expression::Sequence(start, end) => {
			write!(f, "{{")?;
			print(start, f, interner)?;
			write!(f, ", ")?;
			print(end, f, interner)?;
			write!(f, "}}")
		}
		Expression::Identifier(name) => write!(f, "{}", interner.resolve(name)),
		Expression::Operation(left, operator, right) => {
			write!(f, "(")?;
			print(left, f, interner)?;
			write!(f, " {operator} ")?;
			print(right, f, interner)?;
			write!(f, ")")
		}
		Expression::Reduce(reduce) => {
			let [a, b] = reduce.lambda.parameters;
			write!(f, "reduce(")?;
			print(&reduce.input, f, interner)?;
			write!(f, ", ")?;
			print(&reduce.initial, f, interner)?;
			write!(f, ", {} {} -> ", interner.resolve(&a), interner.resolve(&b))?;
			print(&reduce.lambda.body, f, interner)?;
			write!(f, ")")
		}
		Expression::Map(map) => {
			write!(f, "map(")?;
			print(&map.input, f, interner)?;
			write!(f, ", {} -> ", interner.resolve(&map.lambda.parameter()))?;
			print(&map.lambda.body, f, interner)?;
			write!(f, ")")
		}
	}
}
