use std::fmt::{Display, Error, Formatter};

use rand::Rng;
use rug::ops::Pow;

use super::{EuclideanDomain, Ring};

/// An arbitrary-precision integer.
pub type Integer = rug::Integer;

/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The ring of arbitrary-precision integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }

    /// Compute the least common multiple of two integers. The result is non-negative.
    pub fn lcm(&self, a: &Integer, b: &Integer) -> Integer {
        a.clone().lcm(b)
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Z")
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

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
        Integer::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::from(1)
    }

    #[inline]
    fn nth(&self, n: Integer) -> Self::Element {
        n
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
        let r = rng.gen_range(range.0..range.1);
        Integer::from(r)
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

impl EuclideanDomain for IntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone().div_rem_euc(b.clone()).1
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        if *b == 0 {
            panic!("Cannot divide by zero");
        }
        a.clone().div_rem_euc(b.clone())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone().gcd(b)
    }
}

#[cfg(test)]
mod test {
    use crate::domains::{EuclideanDomain, Ring};

    use super::{Integer, Z};

    #[test]
    fn euclidean_division() {
        let (q, r) = Z.quot_rem(&Integer::from(-7), &Integer::from(3));
        assert_eq!(q, -3);
        assert_eq!(r, 2);

        assert_eq!(Z.rem(&Integer::from(12), &Integer::from(-5)), 2);
    }

    #[test]
    fn gcd_is_non_negative() {
        assert_eq!(Z.gcd(&Integer::from(-12), &Integer::from(18)), 6);
        assert_eq!(Z.gcd(&Integer::from(0), &Integer::from(-4)), 4);
        assert_eq!(Z.lcm(&Integer::from(4), &Integer::from(6)), 12);
    }

    #[test]
    fn power() {
        assert_eq!(Z.pow(&Integer::from(-2), 5), -32);
        assert!(Z.is_one(&Z.pow(&Integer::from(7), 0)));
    }
}
