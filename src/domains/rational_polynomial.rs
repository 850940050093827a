//! Rational polynomial field.

use std::fmt::{Display, Error, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::AlgebraError;
use crate::poly::{
    polynomial::{MultivariatePolynomial, PolynomialRing},
    Exponent, LexOrder, Variable,
};

use super::{
    integer::{Integer, IntegerRing, Z},
    EuclideanDomain, Field, Ring,
};

/// The field of fractions of polynomials with integer coefficients in a fixed
/// list of named parameters, for example `Q(a, c, b)`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RationalPolynomialField<E: Exponent = u16> {
    ring: PolynomialRing<IntegerRing, E, LexOrder>,
}

/// A fraction of two coprime polynomials over the integers. The denominator has a
/// positive leading coefficient and is `1` if the fraction is zero, so that
/// equal fractions have equal representations.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RationalPolynomial<E: Exponent = u16> {
    pub numerator: MultivariatePolynomial<IntegerRing, E, LexOrder>,
    pub denominator: MultivariatePolynomial<IntegerRing, E, LexOrder>,
}

impl<E: Exponent> RationalPolynomialField<E> {
    /// Create the field of rational functions in the given parameters.
    pub fn new(parameters: &[&str]) -> RationalPolynomialField<E> {
        RationalPolynomialField {
            ring: PolynomialRing::new(Z, parameters),
        }
    }

    /// The ring of numerators and denominators.
    pub fn parameter_ring(&self) -> &PolynomialRing<IntegerRing, E, LexOrder> {
        &self.ring
    }

    pub fn parameters(&self) -> &[Variable] {
        self.ring.variables()
    }

    /// Get the parameter called `name` as an element of the field.
    pub fn parameter(&self, name: &str) -> Result<RationalPolynomial<E>, AlgebraError> {
        Ok(RationalPolynomial {
            numerator: self.ring.variable_by_name(name)?,
            denominator: self.ring.one(),
        })
    }

    /// Create the element `num/den`, cancelling common factors.
    pub fn to_element(
        &self,
        num: MultivariatePolynomial<IntegerRing, E, LexOrder>,
        den: MultivariatePolynomial<IntegerRing, E, LexOrder>,
    ) -> Result<RationalPolynomial<E>, AlgebraError> {
        if !num.ring.is_same(&self.ring) || !den.ring.is_same(&self.ring) {
            return Err(AlgebraError::RingMismatch);
        }
        RationalPolynomial::from_num_den(num, den, true)
    }
}

impl<E: Exponent> RationalPolynomial<E> {
    /// Create `num/den`. If `do_gcd` is set, the common factors are divided out,
    /// otherwise `num` and `den` must already be coprime.
    pub fn from_num_den(
        mut num: MultivariatePolynomial<IntegerRing, E, LexOrder>,
        mut den: MultivariatePolynomial<IntegerRing, E, LexOrder>,
        do_gcd: bool,
    ) -> Result<Self, AlgebraError> {
        if den.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }

        if num.is_zero() {
            return Ok(RationalPolynomial {
                denominator: num.one(),
                numerator: num,
            });
        }

        if do_gcd {
            let gcd = MultivariatePolynomial::gcd(&num, &den);

            if !gcd.is_one() {
                num = &num / &gcd;
                den = &den / &gcd;
            }
        }

        // normalize denominator to have positive leading coefficient
        if *den.max_coeff() < 0 {
            num = -num;
            den = -den;
        }

        Ok(RationalPolynomial {
            numerator: num,
            denominator: den,
        })
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.numerator.is_one() && self.denominator.is_one()
    }

    /// Check if the fraction does not depend on any parameter.
    pub fn is_constant(&self) -> bool {
        self.numerator.is_constant() && self.denominator.is_constant()
    }

    pub fn inv(&self) -> Result<Self, AlgebraError> {
        if self.numerator.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }

        Self::from_num_den(self.denominator.clone(), self.numerator.clone(), false)
    }

    pub fn pow(&self, e: u64) -> Self {
        if e > u32::MAX as u64 {
            panic!("Power of exponentiation is larger than 2^32: {}", e);
        }

        // powers of coprime polynomials are coprime
        RationalPolynomial {
            numerator: self.numerator.pow(e as usize),
            denominator: self.denominator.pow(e as usize),
        }
    }

    pub fn gcd(&self, other: &Self) -> Self {
        let gcd_num = MultivariatePolynomial::gcd(&self.numerator, &other.numerator);
        let gcd_den = MultivariatePolynomial::gcd(&self.denominator, &other.denominator);

        RationalPolynomial {
            numerator: gcd_num,
            denominator: (&other.denominator / &gcd_den) * &self.denominator,
        }
    }
}

impl<E: Exponent> Display for RationalPolynomialField<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Q(")?;
        for (i, v) in self.ring.variables().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}

impl<E: Exponent> Display for RationalPolynomial<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.denominator.is_one() {
            return write!(f, "{}", self.numerator);
        }

        if *self.numerator.max_coeff() < 0 {
            write!(f, "-({})/({})", -self.numerator.clone(), self.denominator)
        } else {
            write!(f, "({})/({})", self.numerator, self.denominator)
        }
    }
}

impl<E: Exponent> Ring for RationalPolynomialField<E> {
    type Element = RationalPolynomial<E>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a + b;
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a - b;
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a * b;
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    fn zero(&self) -> Self::Element {
        RationalPolynomial {
            numerator: self.ring.zero(),
            denominator: self.ring.one(),
        }
    }

    fn one(&self) -> Self::Element {
        RationalPolynomial {
            numerator: self.ring.one(),
            denominator: self.ring.one(),
        }
    }

    fn nth(&self, n: Integer) -> Self::Element {
        RationalPolynomial {
            numerator: self.ring.constant(n),
            denominator: self.ring.one(),
        }
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn named_generators(&self) -> Vec<(Variable, Self::Element)> {
        self.ring
            .named_generators()
            .into_iter()
            .map(|(v, p)| {
                (
                    v,
                    RationalPolynomial {
                        numerator: p,
                        denominator: self.ring.one(),
                    },
                )
            })
            .collect()
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        RationalPolynomial {
            numerator: self.ring.sample(rng, range),
            denominator: self.ring.one(),
        }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if in_product && element.denominator.is_one() && element.numerator.nterms() > 1 {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

impl<E: Exponent> EuclideanDomain for RationalPolynomialField<E> {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        match self.div(a, b) {
            Ok(q) => (q, self.zero()),
            Err(e) => panic!("{}", e),
        }
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }
}

impl<E: Exponent> Field for RationalPolynomialField<E> {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, AlgebraError> {
        Ok(a * &b.inv()?)
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) -> Result<(), AlgebraError> {
        *a = self.div(a, b)?;
        Ok(())
    }

    fn inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        a.inv()
    }
}

impl<'a, 'b, E: Exponent> Add<&'a RationalPolynomial<E>> for &'b RationalPolynomial<E> {
    type Output = RationalPolynomial<E>;

    fn add(self, other: &'a RationalPolynomial<E>) -> Self::Output {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let denom_gcd = MultivariatePolynomial::gcd(&self.denominator, &other.denominator);

        let (a_denom_red, b_denom_red) = if denom_gcd.is_one() {
            (self.denominator.clone(), other.denominator.clone())
        } else {
            (
                &self.denominator / &denom_gcd,
                &other.denominator / &denom_gcd,
            )
        };

        let num1 = &self.numerator * &b_denom_red;
        let num2 = &other.numerator * &a_denom_red;
        let mut num = num1 + num2;

        if num.is_zero() {
            return RationalPolynomial {
                denominator: num.one(),
                numerator: num,
            };
        }

        let mut den = &a_denom_red * &other.denominator;

        // only factors of the shared denominator can cancel
        let g = MultivariatePolynomial::gcd(&num, &denom_gcd);

        if !g.is_one() {
            num = &num / &g;
            den = &den / &g;
        }

        RationalPolynomial {
            numerator: num,
            denominator: den,
        }
    }
}

impl<'a, 'b, E: Exponent> Sub<&'a RationalPolynomial<E>> for &'b RationalPolynomial<E> {
    type Output = RationalPolynomial<E>;

    fn sub(self, other: &'a RationalPolynomial<E>) -> Self::Output {
        self + &other.clone().neg()
    }
}

impl<E: Exponent> Neg for RationalPolynomial<E> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        RationalPolynomial {
            numerator: self.numerator.neg(),
            denominator: self.denominator,
        }
    }
}

impl<'a, 'b, E: Exponent> Mul<&'a RationalPolynomial<E>> for &'b RationalPolynomial<E> {
    type Output = RationalPolynomial<E>;

    fn mul(self, other: &'a RationalPolynomial<E>) -> Self::Output {
        if self.is_zero() {
            return self.clone();
        }
        if other.is_zero() {
            return other.clone();
        }

        let gcd1 = MultivariatePolynomial::gcd(&self.numerator, &other.denominator);
        let gcd2 = MultivariatePolynomial::gcd(&self.denominator, &other.numerator);

        if gcd1.is_one() {
            if gcd2.is_one() {
                RationalPolynomial {
                    numerator: &self.numerator * &other.numerator,
                    denominator: &self.denominator * &other.denominator,
                }
            } else {
                RationalPolynomial {
                    numerator: &self.numerator * &(&other.numerator / &gcd2),
                    denominator: (&self.denominator / &gcd2) * &other.denominator,
                }
            }
        } else if gcd2.is_one() {
            RationalPolynomial {
                numerator: (&self.numerator / &gcd1) * &other.numerator,
                denominator: &self.denominator * &(&other.denominator / &gcd1),
            }
        } else {
            RationalPolynomial {
                numerator: (&self.numerator / &gcd1) * &(&other.numerator / &gcd2),
                denominator: (&self.denominator / &gcd2) * &(&other.denominator / &gcd1),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::domains::integer::Integer;
    use crate::domains::{Field, Ring};
    use crate::error::AlgebraError;

    use super::RationalPolynomialField;

    #[test]
    fn cancel_common_factors() {
        let field = RationalPolynomialField::<u16>::new(&["a", "b"]);
        let ring = field.parameter_ring();
        let a = ring.variable(0).unwrap();
        let b = ring.variable(1).unwrap();

        // (a^2 - b^2) / (b - a) = -a - b
        let f = field
            .to_element(&(&a * &a) - &(&b * &b), &b - &a)
            .unwrap();
        assert!(f.denominator.is_one());
        assert_eq!(f.numerator, -(&a + &b));
    }

    #[test]
    fn denominator_sign_is_positive() {
        let field = RationalPolynomialField::<u16>::new(&["a"]);
        let ring = field.parameter_ring();
        let a = ring.variable(0).unwrap();

        let f = field.to_element(ring.one(), -a.clone()).unwrap();
        assert_eq!(f.numerator, -ring.one());
        assert_eq!(f.denominator, a);
        assert_eq!(format!("{}", f), "-(1)/(a)");
    }

    #[test]
    fn add_fractions() {
        let field = RationalPolynomialField::<u16>::new(&["a", "b"]);
        let a = field.parameter("a").unwrap();
        let b = field.parameter("b").unwrap();

        // a/b + b/a - (a^2 + b^2)/(a*b) = 0
        let s = field.add(&field.div(&a, &b).unwrap(), &field.div(&b, &a).unwrap());
        let t = field
            .div(
                &field.add(&field.mul(&a, &a), &field.mul(&b, &b)),
                &field.mul(&a, &b),
            )
            .unwrap();
        assert_eq!(s, t);
        assert!(field.sub(&s, &t).is_zero());
        assert_eq!(field.sub(&s, &t), field.zero());
    }

    #[test]
    fn multiply_and_invert() {
        let field = RationalPolynomialField::<u16>::new(&["c"]);
        let c = field.parameter("c").unwrap();
        let two = field.nth(Integer::from(2));

        let x = field.div(&field.add(&c, &two), &c).unwrap();
        let y = field.inv(&x).unwrap();
        assert!(field.mul(&x, &y).is_one());
        assert_eq!(field.inv(&field.zero()), Err(AlgebraError::DivisionByZero));
        assert_eq!(format!("{}", field), "Q(c)");
    }

    #[test]
    fn unknown_parameter() {
        let field = RationalPolynomialField::<u16>::new(&["a", "c", "b"]);
        assert_eq!(
            field.parameter("d"),
            Err(AlgebraError::UnknownVariable("d".to_string()))
        );
        assert_eq!(field.named_generators().len(), 3);
    }
}
