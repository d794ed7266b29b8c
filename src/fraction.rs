use std::{
	cmp::Ordering,
	fmt,
	ops::{Add, Mul, Neg, Sub},
	str::FromStr,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum FractionError {
	#[error("Division by zero")]
	DivisionByZero,
	#[error("Not an integer")]
	NotAnInteger,
	#[error("Invalid decimal literal")]
	InvalidLiteral,
}

/// An exact rational number.
///
/// Always kept in lowest terms with a positive denominator, so the derived equality and hash
/// agree with numeric equality.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Fraction {
	numerator: BigInt,
	denominator: BigInt,
}

impl Fraction {
	pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self, FractionError> {
		let denominator = denominator.into();
		if denominator.is_zero() {
			return Err(FractionError::DivisionByZero);
		}
		Ok(Self::normalize(numerator.into(), denominator))
	}

	pub fn from_integer(value: impl Into<BigInt>) -> Self { Self { numerator: value.into(), denominator: BigInt::one() } }

	pub fn zero() -> Self { Self::from_integer(0) }

	pub fn one() -> Self { Self::from_integer(1) }

	// The denominator must be non-zero.
	fn normalize(numerator: BigInt, denominator: BigInt) -> Self {
		let gcd = numerator.gcd(&denominator);
		let (numerator, denominator) = (numerator / &gcd, denominator / &gcd);
		if denominator.is_negative() {
			Self { numerator: -numerator, denominator: -denominator }
		} else {
			Self { numerator, denominator }
		}
	}

	pub fn numerator(&self) -> &BigInt { &self.numerator }

	pub fn denominator(&self) -> &BigInt { &self.denominator }

	pub fn is_int(&self) -> bool { self.denominator.is_one() }

	pub fn is_zero(&self) -> bool { self.numerator.is_zero() }

	pub fn to_integer(&self) -> Result<&BigInt, FractionError> {
		if self.is_int() {
			Ok(&self.numerator)
		} else {
			Err(FractionError::NotAnInteger)
		}
	}

	pub fn checked_div(&self, other: &Self) -> Result<Self, FractionError> {
		if other.is_zero() {
			return Err(FractionError::DivisionByZero);
		}
		Ok(Self::normalize(&self.numerator * &other.denominator, &self.denominator * &other.numerator))
	}

	/// Raises to an integer power; negative exponents invert first.
	pub fn pow(&self, exponent: i32) -> Result<Self, FractionError> {
		let magnitude = exponent.unsigned_abs();
		match exponent.cmp(&0) {
			Ordering::Equal => Ok(Self::one()),
			// Powers of coprime integers stay coprime.
			Ordering::Greater =>
				Ok(Self { numerator: self.numerator.pow(magnitude), denominator: self.denominator.pow(magnitude) }),
			Ordering::Less => {
				if self.is_zero() {
					return Err(FractionError::DivisionByZero);
				}
				Ok(Self::normalize(self.denominator.pow(magnitude), self.numerator.pow(magnitude)))
			}
		}
	}

	/// Renders as a plain decimal.
	///
	/// Terminating expansions are written out exactly. Recurring ones are rounded half-up to
	/// `max(digits(numerator), digits(denominator), max_digits)` significant digits, with trailing
	/// zeros stripped.
	pub fn to_decimal_string(&self, max_digits: usize) -> String {
		if self.is_int() {
			return self.numerator.to_string();
		}

		let sign = if self.numerator.is_negative() { "-" } else { "" };
		let magnitude = self.numerator.abs();

		if let Some(scale) = self.terminating_scale() {
			let digits = magnitude * (BigInt::from(10u8).pow(scale) / &self.denominator);
			return format!("{sign}{}", place_decimal_point(&digits, scale as usize));
		}

		let precision = digit_count(&magnitude).max(digit_count(&self.denominator)).max(max_digits);

		// Find e with 10^e <= magnitude / denominator < 10^(e + 1).
		let mut exponent = digit_count(&magnitude) as i64 - digit_count(&self.denominator) as i64;
		let below = if exponent >= 0 {
			magnitude < &self.denominator * BigInt::from(10u8).pow(exponent as u32)
		} else {
			&magnitude * BigInt::from(10u8).pow((-exponent) as u32) < self.denominator
		};
		if below {
			exponent -= 1;
		}

		// precision >= digits(numerator) > exponent, so the scale is never negative.
		let scale = (precision as i64 - 1 - exponent) as u32;
		let (mut quotient, remainder) = (magnitude * BigInt::from(10u8).pow(scale)).div_rem(&self.denominator);
		if remainder * 2u8 >= self.denominator {
			quotient += 1u8;
		}

		format!("{sign}{}", place_decimal_point(&quotient, scale as usize))
	}

	// Number of decimal places needed to write the value exactly, if the expansion terminates.
	fn terminating_scale(&self) -> Option<u32> {
		let twos = self.denominator.trailing_zeros().unwrap_or(0);
		let mut rest: BigInt = &self.denominator >> twos;
		let mut fives = 0u64;
		let five = BigInt::from(5u8);
		loop {
			let (quotient, remainder) = rest.div_rem(&five);
			if !remainder.is_zero() {
				break;
			}
			rest = quotient;
			fives += 1;
		}
		if rest.is_one() {
			u32::try_from(twos.max(fives)).ok()
		} else {
			None
		}
	}
}

fn digit_count(value: &BigInt) -> usize { value.magnitude().to_str_radix(10).len() }

// Writes a non-negative integer scaled down by 10^scale, without trailing zeros.
fn place_decimal_point(digits: &BigInt, scale: usize) -> String {
	let digits = digits.to_string();
	if scale == 0 {
		return digits;
	}
	let padded = format!("{digits:0>width$}", width = scale + 1);
	let (whole, fractional) = padded.split_at(padded.len() - scale);
	let fractional = fractional.trim_end_matches('0');
	if fractional.is_empty() {
		whole.to_owned()
	} else {
		format!("{whole}.{fractional}")
	}
}

impl From<i32> for Fraction {
	fn from(value: i32) -> Self { Self::from_integer(value) }
}

impl From<i64> for Fraction {
	fn from(value: i64) -> Self { Self::from_integer(value) }
}

impl From<BigInt> for Fraction {
	fn from(value: BigInt) -> Self { Self::from_integer(value) }
}

/// Parses `-?digits(.digits)?` exactly.
impl FromStr for Fraction {
	type Err = FractionError;

	fn from_str(source: &str) -> Result<Self, Self::Err> {
		let (negative, unsigned) = match source.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, source),
		};
		let (whole, fractional) = unsigned.split_once('.').unwrap_or((unsigned, ""));
		if whole.is_empty()
			|| (unsigned.contains('.') && fractional.is_empty())
			|| !whole.bytes().chain(fractional.bytes()).all(|b| b.is_ascii_digit())
		{
			return Err(FractionError::InvalidLiteral);
		}

		let digits = format!("{whole}{fractional}");
		let numerator = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(FractionError::InvalidLiteral)?;
		let denominator = BigInt::from(10u8).pow(fractional.len() as u32);
		Self::new(if negative { -numerator } else { numerator }, denominator)
	}
}

impl Add<&Fraction> for &Fraction {
	type Output = Fraction;
	fn add(self, rhs: &Fraction) -> Fraction {
		Fraction::normalize(
			&self.numerator * &rhs.denominator + &rhs.numerator * &self.denominator,
			&self.denominator * &rhs.denominator,
		)
	}
}

impl Sub<&Fraction> for &Fraction {
	type Output = Fraction;
	fn sub(self, rhs: &Fraction) -> Fraction {
		Fraction::normalize(
			&self.numerator * &rhs.denominator - &rhs.numerator * &self.denominator,
			&self.denominator * &rhs.denominator,
		)
	}
}

impl Mul<&Fraction> for &Fraction {
	type Output = Fraction;
	fn mul(self, rhs: &Fraction) -> Fraction {
		Fraction::normalize(&self.numerator * &rhs.numerator, &self.denominator * &rhs.denominator)
	}
}

impl Add for Fraction {
	type Output = Self;
	fn add(self, rhs: Self) -> Self { &self + &rhs }
}

impl Sub for Fraction {
	type Output = Self;
	fn sub(self, rhs: Self) -> Self { &self - &rhs }
}

impl Mul for Fraction {
	type Output = Self;
	fn mul(self, rhs: Self) -> Self { &self * &rhs }
}

impl Neg for Fraction {
	type Output = Self;
	fn neg(self) -> Self { Self { numerator: -self.numerator, denominator: self.denominator } }
}

impl Ord for Fraction {
	fn cmp(&self, other: &Self) -> Ordering {
		(&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
	}
}

impl PartialOrd for Fraction {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl fmt::Display for Fraction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}/{}", self.numerator, self.denominator) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fraction(numerator: i64, denominator: i64) -> Fraction { Fraction::new(numerator, denominator).unwrap() }

	#[test]
	fn addition() {
		assert_eq!(fraction(5, 6), fraction(1, 2) + fraction(1, 3));
		assert_eq!(fraction(1, 1), fraction(3, 4) + fraction(1, 4));
		assert_eq!(fraction(0, 1), fraction(-1, 2) + fraction(1, 2));
		assert_eq!(fraction(-1, 1), fraction(-1, 2) + fraction(-1, 2));
	}

	#[test]
	fn subtraction() {
		assert_eq!(fraction(1, 6), fraction(1, 2) - fraction(1, 3));
		assert_eq!(fraction(1, 2), fraction(3, 4) - fraction(1, 4));
		assert_eq!(fraction(-1, 1), fraction(-1, 2) - fraction(1, 2));
	}

	#[test]
	fn multiplication() {
		assert_eq!(fraction(1, 3), fraction(1, 2) * fraction(2, 3));
		assert_eq!(fraction(-3, 16), fraction(3, 4) * fraction(-1, 4));
	}

	#[test]
	fn division() {
		assert_eq!(Ok(fraction(3, 2)), fraction(1, 2).checked_div(&fraction(1, 3)));
		assert_eq!(Ok(fraction(3, 1)), fraction(3, 4).checked_div(&fraction(1, 4)));
		assert_eq!(Ok(fraction(-2, 3)), fraction(1, 2).checked_div(&fraction(-3, 4)));
		assert_eq!(Err(FractionError::DivisionByZero), fraction(1, 2).checked_div(&fraction(0, 1)));
	}

	#[test]
	fn zero_denominator() {
		assert_eq!(Err(FractionError::DivisionByZero), Fraction::new(1, 0));
	}

	#[test]
	fn power() {
		assert_eq!(Ok(fraction(4, 9)), fraction(2, 3).pow(2));
		assert_eq!(Ok(fraction(1, 1)), fraction(2, 3).pow(0));
		assert_eq!(Ok(fraction(4, 9)), fraction(3, 2).pow(-2));
		assert_eq!(Ok(fraction(1, 8)), fraction(1, 2).pow(3));
		assert_eq!(Ok(fraction(8, 1)), fraction(1, 2).pow(-3));
		assert_eq!(Ok(fraction(-1, 8)), fraction(-2, 1).pow(-3));
		assert_eq!(Err(FractionError::DivisionByZero), fraction(0, 1).pow(-1));
	}

	#[test]
	fn simplification() {
		let f = fraction(4, 8);
		assert_eq!((&BigInt::from(1), &BigInt::from(2)), (f.numerator(), f.denominator()));
		let f = fraction(-6, 9);
		assert_eq!((&BigInt::from(-2), &BigInt::from(3)), (f.numerator(), f.denominator()));
		let f = fraction(5, -10);
		assert_eq!((&BigInt::from(-1), &BigInt::from(2)), (f.numerator(), f.denominator()));
		let f = fraction(-5, -15);
		assert_eq!((&BigInt::from(1), &BigInt::from(3)), (f.numerator(), f.denominator()));
		let f = fraction(0, -7);
		assert_eq!((&BigInt::from(0), &BigInt::from(1)), (f.numerator(), f.denominator()));
	}

	#[test]
	fn normalization_is_idempotent() {
		for numerator in -12..=12 {
			for denominator in (-12..=12).filter(|d| *d != 0) {
				let f = fraction(numerator, denominator);
				let rebuilt = Fraction::new(f.numerator().clone(), f.denominator().clone()).unwrap();
				assert_eq!(f, rebuilt);
				assert!(f.denominator().is_positive());
				if !f.is_zero() {
					assert!(f.numerator().gcd(f.denominator()).is_one());
				}
			}
		}
	}

	#[test]
	fn equality() {
		assert_eq!(fraction(1, 2), fraction(2, 4));
		assert_ne!(fraction(1, 2), fraction(1, 3));
	}

	#[test]
	fn comparison() {
		assert!(fraction(1, 2) > fraction(1, 3));
		assert!(fraction(1, 3) <= fraction(1, 2));
		assert!(fraction(1, 2) >= fraction(2, 4));
		assert!(fraction(1, 2) < fraction(5, 6));
		assert!(fraction(-1, 2) < fraction(1, 2));
	}

	#[test]
	fn integers() {
		assert!(fraction(10, 2).is_int());
		assert!(fraction(4, -1).is_int());
		assert!(!fraction(7, 3).is_int());
		assert_eq!(Ok(&BigInt::from(1)), fraction(2, 2).to_integer());
		assert_eq!(Err(FractionError::NotAnInteger), fraction(1, 2).to_integer());
	}

	#[test]
	fn display() {
		assert_eq!("1/2", fraction(1, 2).to_string());
		assert_eq!("-3/4", fraction(-3, 4).to_string());
		assert_eq!("5/1", fraction(5, 1).to_string());
	}

	#[test]
	fn decimal_literals() {
		assert_eq!(Ok(fraction(3, 2)), "1.5".parse());
		assert_eq!(Ok(fraction(617, 500)), "1.234".parse());
		assert_eq!(Ok(fraction(-12, 5)), "-2.4".parse());
		assert_eq!(Ok(fraction(3, 1)), "3.00".parse());
		assert_eq!(Ok(fraction(7, 1)), "7".parse());
		assert_eq!(Err(FractionError::InvalidLiteral), "1.".parse::<Fraction>());
		assert_eq!(Err(FractionError::InvalidLiteral), ".5".parse::<Fraction>());
		assert_eq!(Err(FractionError::InvalidLiteral), "1a".parse::<Fraction>());
	}

	#[test]
	fn terminating_decimals_are_exact() {
		assert_eq!("0.25", fraction(1, 4).to_decimal_string(30));
		assert_eq!("0.125", fraction(1, 8).to_decimal_string(2));
		assert_eq!("-1.5", fraction(-3, 2).to_decimal_string(30));
		assert_eq!("10", fraction(10, 1).to_decimal_string(30));
		assert_eq!("0.0001", fraction(1, 10000).to_decimal_string(30));
	}

	#[test]
	fn recurring_decimals_are_rounded() {
		assert_eq!("0.333333333333333333333333333333", fraction(1, 3).to_decimal_string(30));
		assert_eq!("0.666666666666666666666666666667", fraction(2, 3).to_decimal_string(30));
		assert_eq!("-0.666666666666666666666666666667", fraction(-2, 3).to_decimal_string(30));
		assert_eq!("33.3333333333333333333333333333", fraction(100, 3).to_decimal_string(30));
		assert_eq!("3.14285714285714285714285714286", fraction(22, 7).to_decimal_string(30));
		assert_eq!("0.14286", fraction(1, 7).to_decimal_string(5));
	}
}
