use std::fmt::{Display, Error, Formatter};

use rand::Rng;
use rug::ops::Pow;

use crate::error::AlgebraError;

use super::{integer::Integer, EuclideanDomain, Field, Ring};

/// An arbitrary-precision rational number in canonical form:
/// the numerator and denominator are coprime and the denominator is positive.
pub type Rational = rug::Rational;

/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RationalField;

impl Default for RationalField {
    fn default() -> Self {
        Self::new()
    }
}

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }

    /// Create the rational number `num/den` in canonical form.
    pub fn to_element(&self, num: Integer, den: Integer) -> Result<Rational, AlgebraError> {
        if den == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(Rational::from((num, den)))
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Q")
    }
}

impl Ring for RationalField {
    type Element = Rational;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a.clone()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Rational::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Rational::from(1)
    }

    #[inline]
    fn nth(&self, n: Integer) -> Self::Element {
        Rational::from(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e > u32::MAX as u64 {
            panic!("Power of exponentiation is larger than 2^32: {}", e);
        }
        b.clone().pow(e as u32)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let num = rng.gen_range(range.0..range.1);
        let den = rng.gen_range(1..range.1.max(2));
        Rational::from((num, den))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        element.fmt(f)
    }
}

impl EuclideanDomain for RationalField {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        match self.div(a, b) {
            Ok(q) => (q, self.zero()),
            Err(e) => panic!("{}", e),
        }
    }

    /// The gcd of two fractions is the gcd of the numerators over the lcm of the denominators.
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let gcd_num = a.numer().clone().gcd(b.numer());
        let lcm_den = a.denom().clone().lcm(b.denom());
        Rational::from((gcd_num, lcm_den))
    }
}

impl Field for RationalField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if Self::is_zero(b) {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(a.clone() / b)
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) -> Result<(), AlgebraError> {
        if Self::is_zero(b) {
            return Err(AlgebraError::DivisionByZero);
        }
        *a /= b;
        Ok(())
    }

    fn inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if Self::is_zero(a) {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(a.clone().recip())
    }
}

#[cfg(test)]
mod test {
    use crate::domains::{integer::Integer, EuclideanDomain, Field, Ring};
    use crate::error::AlgebraError;

    use super::{Rational, Q};

    #[test]
    fn canonical_form() {
        let r = Q.to_element(Integer::from(6), Integer::from(-4)).unwrap();
        assert_eq!(*r.numer(), -3);
        assert_eq!(*r.denom(), 2);
        assert_eq!(format!("{}", Q.printer(&r)), "-3/2");
    }

    #[test]
    fn division_by_zero() {
        let a = Rational::from((1, 3));
        assert_eq!(Q.div(&a, &Q.zero()), Err(AlgebraError::DivisionByZero));
        assert_eq!(Q.inv(&Q.zero()), Err(AlgebraError::DivisionByZero));
        assert_eq!(
            Q.to_element(Integer::from(1), Integer::from(0)),
            Err(AlgebraError::DivisionByZero)
        );
    }

    #[test]
    fn field_arithmetic() {
        let a = Rational::from((1, 2));
        let b = Rational::from((1, 3));
        assert_eq!(Q.add(&a, &b), Rational::from((5, 6)));
        assert_eq!(Q.div(&a, &b).unwrap(), Rational::from((3, 2)));
        assert_eq!(Q.gcd(&Rational::from((2, 3)), &Rational::from((4, 9))), Rational::from((2, 9)));
    }
}
