use std::fmt;

use lasso::Spur;

pub type Name = Spur;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Exponent,
}

impl Operator {
	pub fn symbol(self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Exponent => "^",
		}
	}

	/// Binding strength; higher binds tighter.
	pub fn precedence(self) -> u8 {
		match self {
			Self::Add | Self::Subtract => 10,
			Self::Multiply | Self::Divide => 20,
			Self::Exponent => 30,
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}

/// Parameters bound over a body, as in a lambda.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Binder<P, T, const N: usize = 1> {
	pub parameters: [P; N],
	pub body: T,
}

impl<P, T, const N: usize> Binder<P, T, N> {
	pub fn new(parameters: [P; N], body: T) -> Self { Self { parameters, body } }
}

pub fn bind<P, T, const N: usize>(parameters: [P; N], body: impl Into<T>) -> Binder<P, T, N> {
	Binder::new(parameters, body.into())
}

impl<P: Copy, T> Binder<P, T, 1> {
	pub fn parameter(&self) -> P {
		let [parameter] = self.parameters;
		parameter
	}
}
