use std::{fmt, ops::Range, sync::Arc};

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
	common::{Name, Operator},
	exec::{
		cancel::CancelToken,
		parallel::{join, map_indexed},
		Config,
	},
	fraction::Fraction,
	frontend::{associativity::is_associative, visit::ExpressionVisitor},
	ir::{
		semantics::{Environment, Kind, Sequence, Value},
		syntax::{Expression, Map, Reduce},
	},
	utility::arc,
};

#[derive(Clone, PartialEq, Debug, Error)]
pub enum EvalError {
	/// Rendered with the name through [`crate::report::display_eval_error`].
	#[error("Variable not defined")]
	UndefinedVariable(Name),
	#[error("{context} expected {expected}, got {got}")]
	TypeMismatch { context: Context, expected: Kind, got: String },
	#[error("Sequence {side} value is not a number: {got}")]
	BoundNotNumber { side: Side, got: String },
	#[error("Sequence {side} value is not an integer: {got}")]
	BoundNotInteger { side: Side, got: String },
	#[error("Sequence start value is greater than end value: {{{start}, {end}}}")]
	BoundsReversed { start: String, end: String },
	#[error("Sequence is too long to evaluate element by element")]
	SequenceTooLong,
	#[error("Division by zero")]
	DivisionByZero,
	#[error("Raising to a decimal is not supported")]
	UnsupportedExponent,
	#[error("Exponent {0} is out of range")]
	ExponentOutOfRange(BigInt),
	#[error("The lambda expression of `reduce` must be an associative operation")]
	NonAssociativeLambda,
	#[error("Canceled")]
	Canceled,
}

/// Where a value of the wrong kind turned up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Context {
	LeftOperand,
	RightOperand,
	ReduceInput,
	ReduceInitial,
	MapInput,
	MapResult,
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::LeftOperand => "for left operand",
			Self::RightOperand => "for right operand",
			Self::ReduceInput => "Input value",
			Self::ReduceInitial => "Initial value",
			Self::MapInput => "Input for `map`",
			Self::MapResult => "Result of `map` lambda",
		})
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
	Start,
	End,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Start => "start",
			Self::End => "end",
		})
	}
}

/// Evaluates expressions against a fixed environment.
///
/// The cancellation token is checked before every node, so a canceled evaluation stops at the next
/// node it reaches.
pub struct ExpressionEvaluator<'e> {
	environment: &'e Environment,
	config: &'e Config,
	token: &'e CancelToken,
}

impl<'e> ExpressionEvaluator<'e> {
	pub fn new(environment: &'e Environment, config: &'e Config, token: &'e CancelToken) -> Self {
		Self { environment, config, token }
	}

	pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, EvalError> {
		self.token.check()?;
		expression.accept(self)
	}

	fn mismatch(&self, context: Context, expected: Kind, got: &Value) -> EvalError {
		EvalError::TypeMismatch { context, expected, got: got.render(self.config.precision) }
	}

	fn number(&mut self, expression: &Expression, context: Context) -> Result<Fraction, EvalError> {
		match self.evaluate(expression)? {
			Value::Number(value) => Ok(value),
			value => Err(self.mismatch(context, Kind::Number, &value)),
		}
	}

	fn sequence(&mut self, expression: &Expression, context: Context) -> Result<Arc<Sequence>, EvalError> {
		match self.evaluate(expression)? {
			Value::Sequence(sequence) => Ok(sequence),
			value => Err(self.mismatch(context, Kind::Sequence, &value)),
		}
	}

	fn indexable(sequence: &Sequence) -> Result<usize, EvalError> { sequence.len().ok_or(EvalError::SequenceTooLong) }

	fn bound(&mut self, expression: &Expression, side: Side) -> Result<BigInt, EvalError> {
		let precision = self.config.precision;
		match self.evaluate(expression)? {
			Value::Number(value) => value
				.to_integer()
				.cloned()
				.map_err(|_| EvalError::BoundNotInteger { side, got: value.to_decimal_string(precision) }),
			value => Err(EvalError::BoundNotNumber { side, got: value.render(precision) }),
		}
	}
}

impl ExpressionVisitor for ExpressionEvaluator<'_> {
	type Output = Result<Value, EvalError>;

	fn visit_number(&mut self, value: &Fraction) -> Self::Output { Ok(Value::Number(value.clone())) }

	fn visit_sequence(&mut self, start: &Expression, end: &Expression) -> Self::Output {
		let first = self.bound(start, Side::Start)?;
		let last = self.bound(end, Side::End)?;
		if first > last {
			return Err(EvalError::BoundsReversed { start: first.to_string(), end: last.to_string() });
		}
		Ok(Value::Sequence(arc!(Sequence::Range { first, last })))
	}

	fn visit_identifier(&mut self, name: Name) -> Self::Output {
		self.environment.lookup(name).cloned().ok_or(EvalError::UndefinedVariable(name))
	}

	fn visit_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> Self::Output {
		let x = self.number(left, Context::LeftOperand)?;
		let y = self.number(right, Context::RightOperand)?;
		let value = match operator {
			Operator::Add => x + y,
			Operator::Subtract => x - y,
			Operator::Multiply => x * y,
			Operator::Divide => x.checked_div(&y).map_err(|_| EvalError::DivisionByZero)?,
			Operator::Exponent => {
				let exponent = y.to_integer().map_err(|_| EvalError::UnsupportedExponent)?;
				let exponent =
					exponent.to_i32().ok_or_else(|| EvalError::ExponentOutOfRange(exponent.clone()))?;
				x.pow(exponent).map_err(|_| EvalError::DivisionByZero)?
			}
		};
		Ok(Value::Number(value))
	}

	fn visit_reduce(&mut self, reduce: &Reduce) -> Self::Output {
		let sequence = self.sequence(&reduce.input, Context::ReduceInput)?;
		let initial = self.number(&reduce.initial, Context::ReduceInitial)?;
		let [a, b] = reduce.lambda.parameters;
		let lambda = &*reduce.lambda.body;

		if !is_associative(lambda, a, b) {
			return Err(EvalError::NonAssociativeLambda);
		}

		if let Sequence::Range { first, last } = &*sequence {
			if is_sum(lambda, a, b) {
				debug!(%first, %last, "summing range in closed form");
				let sum = last * (last + 1u8) / 2u8 - (first - 1u8) * first / 2u8;
				return Ok(Value::Number(Fraction::from_integer(sum) + initial));
			}
		}

		let element = |index: usize| match index {
			0 => Value::Number(initial.clone()),
			index => Value::Number(sequence.get(index - 1)),
		};
		let len = Self::indexable(&sequence)?.checked_add(1).ok_or(EvalError::SequenceTooLong)?;
		debug!(len, parallel_depth = self.config.parallel_depth, "reducing");
		Reducer { lambda, parameters: [a, b], config: self.config, element: &element }.reduce(0..len, 0, self.token)
	}

	fn visit_map(&mut self, map: &Map) -> Self::Output {
		let sequence = self.sequence(&map.input, Context::MapInput)?;
		let parameter = map.lambda.parameter();
		let lambda = &*map.lambda.body;

		if lambda.is_identifier(parameter) {
			return Ok(Value::Sequence(sequence));
		}

		let config = self.config;
		let len = Self::indexable(&sequence)?;
		debug!(len, workers = config.workers, "mapping");
		let items = map_indexed(self.token, len, config.workers, |index, token| {
			let environment = Environment::from([(parameter, Value::Number(sequence.get(index)))]);
			let mut evaluator = ExpressionEvaluator::new(&environment, config, token);
			match evaluator.evaluate(lambda)? {
				Value::Number(value) => Ok(value),
				value => Err(evaluator.mismatch(Context::MapResult, Kind::Number, &value)),
			}
		})?;
		Ok(Value::Sequence(arc!(Sequence::List(items))))
	}
}

// `a + b` or `b + a`, exactly.
fn is_sum(lambda: &Expression, a: Name, b: Name) -> bool {
	match lambda {
		Expression::Operation(x, Operator::Add, y) =>
			a != b && ((x.is_identifier(a) && y.is_identifier(b)) || (x.is_identifier(b) && y.is_identifier(a))),
		_ => false,
	}
}

// Divide and conquer over the indices of `[initial] ++ sequence`.
struct Reducer<'r, F> {
	lambda: &'r Expression,
	parameters: [Name; 2],
	config: &'r Config,
	element: &'r F,
}

impl<F> Reducer<'_, F>
where
	F: Fn(usize) -> Value + Sync,
{
	fn reduce(&self, range: Range<usize>, depth: usize, token: &CancelToken) -> Result<Value, EvalError> {
		token.check()?;
		let Range { start, end } = range;
		match end - start {
			1 => Ok((self.element)(start)),
			2 => self.apply((self.element)(start), (self.element)(start + 1), token),
			len => {
				let middle = start + len / 2;
				let (left, right) = if depth < self.config.parallel_depth {
					trace!(start, middle, end, "forking");
					join(
						token,
						|token| self.reduce(start..middle, depth + 1, token),
						|token| self.reduce(middle..end, depth + 1, token),
					)?
				} else {
					(self.reduce(start..middle, depth + 1, token)?, self.reduce(middle..end, depth + 1, token)?)
				};
				self.apply(left, right, token)
			}
		}
	}

	fn apply(&self, x: Value, y: Value, token: &CancelToken) -> Result<Value, EvalError> {
		let [a, b] = self.parameters;
		let environment = Environment::from([(a, x), (b, y)]);
		ExpressionEvaluator::new(&environment, self.config, token).evaluate(self.lambda)
	}
}
