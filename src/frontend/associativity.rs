use crate::{
	common::{Name, Operator},
	fraction::Fraction,
	frontend::visit::{BooleanQuery, Strategy, Transformer},
	ir::syntax::{Expression, Reduce},
};

/// Whether `lambda`, as a function of `a` and `b`, is an associative operation.
///
/// Never holds for a lambda that is not associative, but may fail to hold for some that are.
pub fn is_associative(lambda: &Expression, a: Name, b: Name) -> bool {
	// With a single name the lambda only sees its second argument.
	if a == b {
		return false;
	}
	let simplified = Simplifier.transform(lambda);
	let mut structure = Structure { a, b, found_a: false, found_b: false, operator: None };
	structure.query(&simplified) && structure.holds()
}

/// Rewrites an expression into an equivalent one in which every bound name occurs as few times as
/// possible.
pub struct Simplifier;

impl Simplifier {
	fn simplify(&mut self, left: Expression, operator: Operator, right: Expression) -> Expression {
		let zero = Fraction::zero();
		let one = Fraction::one();
		let is = |expression: &Expression, value: &Fraction| expression.as_number() == Some(value);

		match operator {
			Operator::Add => {
				if let (Some(x), Some(y)) = (left.as_number(), right.as_number()) {
					return Expression::Number(x + y);
				}
				if left == right {
					return Expression::operation(left, Operator::Multiply, Expression::number(2));
				}
				if let Some((subject, count)) = scaled_pair(&left, &right).or_else(|| scaled_pair(&right, &left)) {
					let count = count + &one;
					return self.simplify(subject.clone(), Operator::Multiply, Expression::Number(count));
				}
			}
			Operator::Subtract => {
				if is(&right, &zero) {
					return left;
				}
				if left == right {
					return Expression::Number(zero);
				}
				if let Some((subject, count)) = scaled_pair(&right, &left) {
					let count = count - &one;
					return self.simplify(subject.clone(), Operator::Multiply, Expression::Number(count));
				}
			}
			Operator::Multiply => {
				if let (Some(x), Some(y)) = (left.as_number(), right.as_number()) {
					return Expression::Number(x * y);
				}
				if is(&left, &zero) || is(&right, &zero) {
					return Expression::Number(zero);
				}
				if is(&right, &one) {
					return left;
				}
				if is(&left, &one) {
					return right;
				}
			}
			Operator::Divide =>
				if is(&right, &one) {
					return left;
				},
			Operator::Exponent => {
				if is(&right, &zero) {
					return Expression::Number(one);
				}
				if is(&right, &one) {
					return left;
				}
			}
		}

		Expression::operation(left, operator, right)
	}
}

// Matches `subject` against `product` of the form `subject * c` or `c * subject` for a literal `c`.
fn scaled_pair<'e>(subject: &'e Expression, product: &'e Expression) -> Option<(&'e Expression, &'e Fraction)> {
	let Expression::Operation(x, Operator::Multiply, y) = product else { return None };
	if **x == *subject {
		y.as_number().map(|count| (subject, count))
	} else if **y == *subject {
		x.as_number().map(|count| (subject, count))
	} else {
		None
	}
}

impl Transformer for Simplifier {
	fn transform_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> Expression {
		let (left, right) = (self.transform(left), self.transform(right));
		self.simplify(left, operator, right)
	}
}

// Every operation is the same `+` or `*`, and each bound name occurs exactly once, unless neither
// occurs at all.
struct Structure {
	a: Name,
	b: Name,
	found_a: bool,
	found_b: bool,
	operator: Option<Operator>,
}

impl Structure {
	fn holds(&self) -> bool {
		let combining = matches!(self.operator, Some(Operator::Add | Operator::Multiply));
		(self.found_a && self.found_b && combining) || !(self.found_a || self.found_b)
	}
}

impl BooleanQuery for Structure {
	fn strategy(&self) -> Strategy { Strategy::All }

	fn query_identifier(&mut self, name: Name) -> bool {
		if name == self.a {
			if self.found_a {
				return false;
			}
			self.found_a = true;
		}
		if name == self.b {
			if self.found_b {
				return false;
			}
			self.found_b = true;
		}
		true
	}

	fn query_operation(&mut self, left: &Expression, operator: Operator, right: &Expression) -> bool {
		match self.operator {
			Some(found) if found != operator => return false,
			_ => self.operator = Some(operator),
		}
		self.aggregate(&[left, right])
	}

	fn query_reduce(&mut self, _: &Reduce) -> bool { false }
}
