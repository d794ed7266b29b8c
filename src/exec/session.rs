use std::vec;

use lasso::Rodeo;
use tracing::{debug, info};

use crate::{
	common::Name,
	exec::{
		cancel::{CancelHandle, CancelToken},
		Config,
	},
	frontend::{
		evaluate::{EvalError, ExpressionEvaluator},
		parse::parse,
		visit::StatementVisitor,
	},
	ir::{
		semantics::{Environment, Value},
		syntax::{Expression, Statement},
	},
	report::{display_eval_error, format_parse_error},
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OutputEvent {
	Standard { text: String },
	Error { text: String },
}

/// A sequence of submissions sharing one global environment.
pub struct Session {
	interner: Rodeo,
	environment: Environment,
	config: Config,
}

impl Default for Session {
	fn default() -> Self { Self::new(Config::default()) }
}

impl Session {
	pub fn new(config: Config) -> Self { Self { interner: Rodeo::new(), environment: Environment::new(), config } }

	pub fn config(&self) -> &Config { &self.config }

	pub fn interner(&self) -> &Rodeo { &self.interner }

	/// The global binding of `name`, if any statement has declared it.
	pub fn lookup(&self, name: &str) -> Option<&Value> { self.environment.lookup(self.interner.get(name)?) }

	/// Parses `source` and returns its output events, evaluating one statement per event pulled.
	pub fn submit(&mut self, source: &str) -> Submission<'_> {
		let (statements, queued) = match parse(source, &mut self.interner) {
			Ok(program) => {
				info!(statements = program.statements.len(), "submitted program");
				(program.statements, None)
			}
			Err(error) => {
				debug!(%error, "rejected program");
				(Vec::new(), Some(OutputEvent::Error { text: format_parse_error(source, &error) }))
			}
		};
		Submission {
			session: self,
			statements: statements.into_iter(),
			provisional: None,
			queued,
			token: CancelToken::new(),
			done: false,
		}
	}
}

/// The output events of one submitted program.
///
/// An expression statement's value is only reported when that statement is the last of the
/// program. The first error ends the submission.
pub struct Submission<'s> {
	session: &'s mut Session,
	statements: vec::IntoIter<Statement>,
	provisional: Option<String>,
	queued: Option<OutputEvent>,
	token: CancelToken,
	done: bool,
}

impl Submission<'_> {
	pub fn cancel_handle(&self) -> CancelHandle { CancelHandle(self.token.clone()) }

	fn describe(&self, error: &EvalError) -> String {
		if self.token.is_canceled() {
			EvalError::Canceled.to_string()
		} else {
			display_eval_error(error, &self.session.interner)
		}
	}
}

impl Iterator for Submission<'_> {
	type Item = OutputEvent;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(event) = self.queued.take() {
			self.done = true;
			return Some(event);
		}
		if self.done {
			return None;
		}

		while let Some(statement) = self.statements.next() {
			let mut evaluator = StatementEvaluator {
				environment: &mut self.session.environment,
				config: &self.session.config,
				token: &self.token,
			};
			match self.token.check().and_then(|()| statement.accept(&mut evaluator)) {
				Ok(Effect::Silent) => self.provisional = None,
				Ok(Effect::Provisional(text)) => self.provisional = Some(text),
				Ok(Effect::Emit(text)) => {
					self.provisional = None;
					return Some(OutputEvent::Standard { text });
				}
				Err(error) => {
					self.done = true;
					if self.token.is_canceled() {
						info!("submission canceled");
					} else {
						debug!(%error, "statement failed");
					}
					return Some(OutputEvent::Error { text: self.describe(&error) });
				}
			}
		}

		self.done = true;
		self.provisional.take().map(|text| OutputEvent::Standard { text })
	}
}

// What a statement contributes to the output.
enum Effect {
	Silent,
	Provisional(String),
	Emit(String),
}

struct StatementEvaluator<'s> {
	environment: &'s mut Environment,
	config: &'s Config,
	token: &'s CancelToken,
}

impl StatementEvaluator<'_> {
	fn evaluate(&self, expression: &Expression) -> Result<Value, EvalError> {
		ExpressionEvaluator::new(&*self.environment, self.config, self.token).evaluate(expression)
	}
}

impl StatementVisitor for StatementEvaluator<'_> {
	type Output = Result<Effect, EvalError>;

	fn visit_print(&mut self, text: &str) -> Self::Output { Ok(Effect::Emit(text.to_owned())) }

	fn visit_out(&mut self, expression: &Expression) -> Self::Output {
		Ok(Effect::Emit(self.evaluate(expression)?.render(self.config.precision)))
	}

	fn visit_var(&mut self, name: Name, expression: &Expression) -> Self::Output {
		let value = self.evaluate(expression)?;
		self.environment.bind(name, value);
		Ok(Effect::Silent)
	}

	fn visit_expression(&mut self, expression: &Expression) -> Self::Output {
		Ok(Effect::Provisional(self.evaluate(expression)?.render(self.config.precision)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn standard(text: &str) -> OutputEvent { OutputEvent::Standard { text: text.to_owned() } }

	fn error(text: &str) -> OutputEvent { OutputEvent::Error { text: text.to_owned() } }

	#[test]
	fn last_expression_is_reported() {
		let mut session = Session::default();
		assert_eq!(vec![standard("3")], session.submit("1 + 2").collect::<Vec<_>>());
		assert_eq!(vec![standard("2")], session.submit("1\n2").collect::<Vec<_>>());
		assert!(session.submit("1\nvar x = 2").next().is_none());
		assert_eq!(vec![standard("a")], session.submit("1\nprint \"a\"").collect::<Vec<_>>());
	}

	#[test]
	fn environment_persists_across_submissions() {
		let mut session = Session::default();
		assert!(session.submit("var n = 10").next().is_none());
		assert_eq!(Some(&Value::Number(10.into())), session.lookup("n"));
		assert_eq!(vec![standard("{1 2 3 4 5 6 7 8 9 10}")], session.submit("out {1, n}").collect::<Vec<_>>());
	}

	#[test]
	fn first_error_stops_the_program() {
		let mut session = Session::default();
		let events: Vec<_> = session.submit("print \"before\"\nout 1 / 0\nprint \"after\"").collect();
		assert_eq!(vec![standard("before"), error("Division by zero")], events);
	}

	#[test]
	fn undefined_names_are_resolved() {
		let mut session = Session::default();
		let events: Vec<_> = session.submit("var a = 1\nout map({1, 2}, x -> x + a)").collect();
		assert_eq!(vec![error("Variable \"a\" not defined")], events);
	}

	#[test]
	fn failed_var_leaves_the_binding_untouched() {
		let mut session = Session::default();
		let events: Vec<_> = session.submit("var x = 1\nvar x = 1 / 0").collect();
		assert_eq!(vec![error("Division by zero")], events);
		assert_eq!(Some(&Value::Number(1.into())), session.lookup("x"));
	}

	#[test]
	fn parse_errors_are_a_single_event() {
		let mut session = Session::default();
		let events: Vec<_> = session.submit("print \"a\" print\"b").collect();
		assert_eq!(
			vec![error(
				"Parse error at 1:10 (end_of_input)\n\nExpected end of input, but still had input \
				 remaining\n\n1|print \"a\" print\"b\n>>>>>>>>>>>^"
			)],
			events
		);
	}

	#[test]
	fn canceled_before_start() {
		let mut session = Session::default();
		let mut submission = session.submit("print \"a\"\nprint \"b\"");
		assert_eq!(Some(standard("a")), submission.next());
		submission.cancel_handle().cancel();
		assert_eq!(Some(error("Canceled")), submission.next());
		assert_eq!(None, submission.next());
	}
}
