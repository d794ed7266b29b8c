use crate::{
	common::{Binder, Name, Operator},
	fraction::Fraction,
	frontend::visit::{ExpressionVisitor, StatementVisitor},
};

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
	pub statements: Vec<Statement>,
}

impl Program {
	/// Drives a statement visitor over every statement in order.
	pub fn accept<V: StatementVisitor>(&self, visitor: &mut V) -> Vec<V::Output> {
		self.statements.iter().map(|statement| statement.accept(visitor)).collect()
	}
}

#[derive(Clone, PartialEq, Debug)]
pub enum Statement {
	Print(String),
	Out(Expression),
	Var(Name, Expression),
	Expression(Expression),
}

impl Statement {
	pub fn accept<V: StatementVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
		match self {
			Self::Print(text) => visitor.visit_print(text),
			Self::Out(expression) => visitor.visit_out(expression),
			Self::Var(name, expression) => visitor.visit_var(*name, expression),
			Self::Expression(expression) => visitor.visit_expression(expression),
		}
	}
}

#[derive(Clone, PartialEq, Debug)]
pub enum Expression {
	// Literals.
	Number(Fraction),
	Sequence(Box<Self>, Box<Self>),

	// Variables.
	Identifier(Name),

	// Arithmetic.
	Operation(Box<Self>, Operator, Box<Self>),

	// Higher-order forms.
	Reduce(Reduce),
	Map(Map),
}

/// `reduce(input, initial, a b -> lambda)`
#[derive(Clone, PartialEq, Debug)]
pub struct Reduce {
	pub input: Box<Expression>,
	pub initial: Box<Expression>,
	pub lambda: Binder<Name, Box<Expression>, 2>,
}

/// `map(input, a -> lambda)`
#[derive(Clone, PartialEq, Debug)]
pub struct Map {
	pub input: Box<Expression>,
	pub lambda: Binder<Name, Box<Expression>>,
}

impl Expression {
	pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
		match self {
			Self::Number(value) => visitor.visit_number(value),
			Self::Sequence(start, end) => visitor.visit_sequence(start, end),
			Self::Identifier(name) => visitor.visit_identifier(*name),
			Self::Operation(left, operator, right) => visitor.visit_operation(left, *operator, right),
			Self::Reduce(reduce) => visitor.visit_reduce(reduce),
			Self::Map(map) => visitor.visit_map(map),
		}
	}

	pub fn number(value: impl Into<Fraction>) -> Self { Self::Number(value.into()) }

	pub fn operation(left: impl Into<Box<Self>>, operator: Operator, right: impl Into<Box<Self>>) -> Self {
		Self::Operation(left.into(), operator, right.into())
	}

	pub fn as_number(&self) -> Option<&Fraction> {
		match self {
			Self::Number(value) => Some(value),
			_ => None,
		}
	}

	pub fn is_identifier(&self, name: Name) -> bool { matches!(self, Self::Identifier(n) if *n == name) }
}
