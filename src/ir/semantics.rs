use std::{collections::HashMap, iter, sync::Arc};

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

use crate::{common::Name, fraction::Fraction};

#[derive(Clone, Debug)]
pub enum Value {
	Number(Fraction),
	Sequence(Arc<Sequence>),
}

impl Value {
	pub fn kind(&self) -> Kind {
		match self {
			Self::Number(_) => Kind::Number,
			Self::Sequence(_) => Kind::Sequence,
		}
	}

	pub fn render(&self, precision: usize) -> String {
		match self {
			Self::Number(value) => value.to_decimal_string(precision),
			Self::Sequence(sequence) => sequence.render(precision),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Number(a), Self::Number(b)) => a == b,
			(Self::Sequence(a), Self::Sequence(b)) => Arc::ptr_eq(a, b) || a == b,
			_ => false,
		}
	}
}

impl From<Fraction> for Value {
	fn from(value: Fraction) -> Self { Self::Number(value) }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
	Number,
	Sequence,
}

impl std::fmt::Display for Kind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Number => "Number",
			Self::Sequence => "Sequence",
		})
	}
}

/// An ordered run of numbers.
#[derive(Debug)]
pub enum Sequence {
	/// Every integer in `first..=last`, produced on demand.
	Range { first: BigInt, last: BigInt },
	List(Vec<Fraction>),
}

impl Sequence {
	/// Number of elements, or `None` for a range too long to index.
	pub fn len(&self) -> Option<usize> {
		match self {
			Self::Range { first, last } => (last - first + 1u8).to_usize(),
			Self::List(items) => Some(items.len()),
		}
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Range { .. } => false,
			Self::List(items) => items.is_empty(),
		}
	}

	/// The element at `index`, which must be less than the length.
	pub fn get(&self, index: usize) -> Fraction {
		match self {
			Self::Range { first, .. } => Fraction::from_integer(first + index),
			Self::List(items) => items[index].clone(),
		}
	}

	pub fn iter(&self) -> Box<dyn Iterator<Item = Fraction> + '_> {
		match self {
			Self::Range { first, last } => Box::new(
				iter::successors(Some(first.clone()), move |x| (x < last).then(|| x + 1u8)).map(Fraction::from_integer),
			),
			Self::List(items) => Box::new(items.iter().cloned()),
		}
	}

	pub fn render(&self, precision: usize) -> String {
		let items: Vec<_> = self.iter().map(|item| item.to_decimal_string(precision)).collect();
		format!("{{{}}}", items.join(" "))
	}
}

impl PartialEq for Sequence {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Range { first: a, last: b }, Self::Range { first: c, last: d }) => a == c && b == d,
			(Self::Range { first, last }, Self::List(items)) | (Self::List(items), Self::Range { first, last }) => {
				let mut expected = first.clone();
				for item in items {
					if item.numerator() != &expected || !item.denominator().is_one() || &expected > last {
						return false;
					}
					expected += 1u8;
				}
				expected == last + 1u8
			}
			(Self::List(a), Self::List(b)) => a == b,
		}
	}
}

/// Bindings from names to values.
#[derive(Clone, Debug, Default)]
pub struct Environment(HashMap<Name, Value>);

impl Environment {
	pub fn new() -> Self { Self::default() }

	pub fn lookup(&self, name: Name) -> Option<&Value> { self.0.get(&name) }

	pub fn bind(&mut self, name: Name, value: Value) { self.0.insert(name, value); }

	pub fn len(&self) -> usize { self.0.len() }

	pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<const N: usize> From<[(Name, Value); N]> for Environment {
	fn from(bindings: [(Name, Value); N]) -> Self { Self(HashMap::from(bindings)) }
}
