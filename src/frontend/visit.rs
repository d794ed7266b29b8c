use crate::{
	common::{bind, Name, Operator},
	fraction::Fraction,
	ir::syntax::{Expression, Map, Reduce},
	utility::bx,
};

pub trait StatementVisitor {
	type Output;
	fn visit_print(&mut self, text: &str) -> Self::Output;
	fn visit_out(&mut self, expression: &Expression) -> Self::Output;
	fn visit_var(&mut self, name: Name, expression: &Expression) -> Self::Output;
	fn visit_expression(&mut self, expression: &Expression) -> Self::Output;
}

pub trait ExpressionVisitor {
	type Output;
	fn visit_number(&mut self, value: &Fraction) -> Self::Output;
	fn visit_sequence(&mut self, start: &Expression, end: &Expression) -> Self::Output;
	fn visit_identifier(&mut self, name: Name) -> Self::Output;
	fn visit_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> Self::Output;
	fn visit_reduce(&mut self, reduce: &Reduce) -> Self::Output;
	fn visit_map(&mut self, map: &Map) -> Self::Output;
}

/// Rewrites an expression into a new tree.
///
/// Every hook rebuilds its node from its transformed children by default, so an implementor only
/// overrides the nodes it rewrites. The input tree is never mutated.
pub trait Transformer: Sized {
	fn transform(&mut self, expression: &Expression) -> Expression { expression.accept(&mut Transforming(self)) }

	fn transform_number(&mut self, value: &Fraction) -> Expression { Expression::Number(value.clone()) }

	fn transform_sequence(&mut self, start: &Expression, end: &Expression) -> Expression {
		Expression::Sequence(bx!(self.transform(start)), bx!(self.transform(end)))
	}

	fn transform_identifier(&mut self, name: Name) -> Expression { Expression::Identifier(name) }

	fn transform_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> Expression {
		Expression::operation(self.transform(left), operator, self.transform(right))
	}

	fn transform_reduce(&mut self, reduce: &Reduce) -> Expression {
		Expression::Reduce(Reduce {
			input: bx!(self.transform(&reduce.input)),
			initial: bx!(self.transform(&reduce.initial)),
			lambda: bind(reduce.lambda.parameters, self.transform(&reduce.lambda.body)),
		})
	}

	fn transform_map(&mut self, map: &Map) -> Expression {
		Expression::Map(Map {
			input: bx!(self.transform(&map.input)),
			lambda: bind(map.lambda.parameters, self.transform(&map.lambda.body)),
		})
	}
}

struct Transforming<'t, T>(&'t mut T);

impl<T: Transformer> ExpressionVisitor for Transforming<'_, T> {
	type Output = Expression;
	fn visit_number(&mut self, value: &Fraction) -> Expression { self.0.transform_number(value) }
	fn visit_sequence(&mut self, start: &Expression, end: &Expression) -> Expression {
		self.0.transform_sequence(start, end)
	}
	fn visit_identifier(&mut self, name: Name) -> Expression { self.0.transform_identifier(name) }
	fn visit_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> Expression {
		self.0.transform_operation(left, operator, right)
	}
	fn visit_reduce(&mut self, reduce: &Reduce) -> Expression { self.0.transform_reduce(reduce) }
	fn visit_map(&mut self, map: &Map) -> Expression { self.0.transform_map(map) }
}

/// How a boolean query combines the answers of a node's children.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
	/// Every child must hold.
	All,
	/// Some child must hold.
	Any,
}

impl Strategy {
	/// The answer for a node with no children.
	pub fn identity(self) -> bool {
		match self {
			Self::All => true,
			Self::Any => false,
		}
	}
}

/// Folds an expression to a single boolean.
///
/// Leaves answer with the strategy's identity and inner nodes aggregate their children left to
/// right, stopping as soon as the answer is decided.
pub trait BooleanQuery: Sized {
	fn strategy(&self) -> Strategy;

	fn query(&mut self, expression: &Expression) -> bool { expression.accept(&mut Querying(self)) }

	fn aggregate(&mut self, children: &[&Expression]) -> bool {
		match self.strategy() {
			Strategy::All => children.iter().all(|child| self.query(child)),
			Strategy::Any => children.iter().any(|child| self.query(child)),
		}
	}

	fn query_number(&mut self, _: &Fraction) -> bool { self.strategy().identity() }

	fn query_sequence(&mut self, start: &Expression, end: &Expression) -> bool { self.aggregate(&[start, end]) }

	fn query_identifier(&mut self, _: Name) -> bool { self.strategy().identity() }

	fn query_operation(&mut self, left: &Expression, _: Operator, right: &Expression) -> bool {
		self.aggregate(&[left, right])
	}

	fn query_reduce(&mut self, reduce: &Reduce) -> bool {
		self.aggregate(&[&*reduce.input, &*reduce.initial, &*reduce.lambda.body])
	}

	fn query_map(&mut self, map: &Map) -> bool { self.aggregate(&[&*map.input, &*map.lambda.body]) }
}

struct Querying<'q, Q>(&'q mut Q);

impl<Q: BooleanQuery> ExpressionVisitor for Querying<'_, Q> {
	type Output = bool;
	fn visit_number(&mut self, value: &Fraction) -> bool { self.0.query_number(value) }
	fn visit_sequence(&mut self, start: &Expression, end: &Expression) -> bool { self.0.query_sequence(start, end) }
	fn visit_identifier(&mut self, name: Name) -> bool { self.0.query_identifier(name) }
	fn visit_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> bool {
		self.0.query_operation(left, operator, right)
	}
	fn visit_reduce(&mut self, reduce: &Reduce) -> bool { self.0.query_reduce(reduce) }
	fn visit_map(&mut self, map: &Map) -> bool { self.0.query_map(map) }
}
