//! Prime fields for word-sized primes, used for modular polynomial algorithms.

use std::fmt::{Display, Error, Formatter};

use rand::Rng;

use crate::error::AlgebraError;

use super::integer::Integer;
use super::{EuclideanDomain, Field, Ring};

/// The finite field `Z_p` of integers modulo a prime `p < 2^32`.
/// Elements are stored as their representative in `[0, p)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FiniteField {
    p: u32,
}

impl FiniteField {
    /// Create the field of integers modulo `p`. The primality of `p` is not checked.
    pub fn new(p: u32) -> FiniteField {
        if p < 2 {
            panic!("The modulus of a finite field must be a prime, got {}", p);
        }
        FiniteField { p }
    }

    #[inline]
    pub fn get_prime(&self) -> u32 {
        self.p
    }

    /// Map an integer to the field.
    #[inline]
    pub fn to_element(&self, a: &Integer) -> u32 {
        a.mod_u(self.p)
    }

    /// Convert an element to an integer in the symmetric range `(-p/2, p/2]`.
    pub fn to_symmetric_integer(&self, a: &u32) -> Integer {
        if *a > self.p / 2 {
            Integer::from(*a) - self.p
        } else {
            Integer::from(*a)
        }
    }

    /// Compute the inverse of a non-zero element with the extended Euclidean algorithm.
    pub fn inverse(&self, a: u32) -> u32 {
        debug_assert!(a != 0);

        let (mut t, mut new_t) = (0i64, 1i64);
        let (mut r, mut new_r) = (self.p as i64, a as i64);
        while new_r != 0 {
            let q = r / new_r;
            (t, new_t) = (new_t, t - q * new_t);
            (r, new_r) = (new_r, r - q * new_r);
        }

        if t < 0 {
            t += self.p as i64;
        }
        t as u32
    }
}

impl Display for FiniteField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z_{}", self.p)
    }
}

impl Ring for FiniteField {
    type Element = u32;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u64 + *b as u64) % self.p as u64) as u32
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u64 + self.p as u64 - *b as u64) % self.p as u64) as u32
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u64 * *b as u64) % self.p as u64) as u32
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if *a == 0 {
            0
        } else {
            self.p - *a
        }
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        0
    }

    #[inline]
    fn one(&self) -> Self::Element {
        1
    }

    fn nth(&self, n: Integer) -> Self::Element {
        self.to_element(&n)
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = *b;
        let mut res = 1;
        while e > 0 {
            if e % 2 == 1 {
                res = self.mul(&res, &base);
            }
            base = self.mul(&base, &base);
            e /= 2;
        }
        res
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
        r.rem_euclid(self.p as i64) as u32
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for FiniteField {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        0
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        match self.div(a, b) {
            Ok(q) => (q, 0),
            Err(e) => panic!("{}", e),
        }
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if *a == 0 && *b == 0 {
            0
        } else {
            1
        }
    }
}

impl Field for FiniteField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, AlgebraError> {
        Ok(self.mul(a, &self.inv(b)?))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) -> Result<(), AlgebraError> {
        *a = self.div(a, b)?;
        Ok(())
    }

    fn inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if *a == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(self.inverse(*a))
    }
}

#[cfg(test)]
mod test {
    use crate::domains::integer::Integer;
    use crate::domains::{Field, Ring};
    use crate::error::AlgebraError;

    use super::FiniteField;

    #[test]
    fn arithmetic_modulo_prime() {
        let f = FiniteField::new(17);
        assert_eq!(f.add(&12, &9), 4);
        assert_eq!(f.sub(&3, &9), 11);
        assert_eq!(f.mul(&5, &7), 1);
        assert_eq!(f.neg(&5), 12);
        assert_eq!(f.pow(&3, 16), 1);
        assert_eq!(f.nth(Integer::from(-1)), 16);
    }

    #[test]
    fn inverse_and_division() {
        let f = FiniteField::new(4293491017);
        for a in [1u32, 2, 12345, 4293491016] {
            assert_eq!(f.mul(&a, &f.inv(&a).unwrap()), 1);
        }
        assert_eq!(f.inv(&0), Err(AlgebraError::DivisionByZero));
        assert_eq!(f.div(&6, &3), Ok(2));
    }

    #[test]
    fn symmetric_representation() {
        let f = FiniteField::new(7);
        assert_eq!(f.to_symmetric_integer(&3), 3);
        assert_eq!(f.to_symmetric_integer(&4), -3);
        assert_eq!(f.to_element(&Integer::from(-3)), 4);
        assert_eq!(format!("{}", f), "Z_7");
    }
}
