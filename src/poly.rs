//! Multivariate polynomials, monomial orders and Gröbner bases.
//!
//! A [PolynomialRing](polynomial::PolynomialRing) fixes the coefficient domain,
//! the ordered list of variables and the [MonomialOrder]. All
//! [MultivariatePolynomial](polynomial::MultivariatePolynomial)s are minted by a ring
//! and remember it, so that polynomials of different rings are never mixed.

pub mod gcd;
pub mod groebner;
pub mod monomial;
pub mod polynomial;

use std::cmp::Ordering::{self, Equal};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::Sum;
use std::ops::{Add, Sub};

use smartstring::{LazyCompact, SmartString};

/// The number of exponents that are stored inline in a [Term](monomial::Term).
pub const INLINED_EXPONENTS: usize = 6;

/// An unsigned integer type that stores a single exponent of a monomial.
pub trait Exponent:
    Hash
    + Debug
    + Display
    + Ord
    + Sub<Output = Self>
    + Add<Output = Self>
    + Sum<Self>
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function panics if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    /// The largest exponent that can be stored.
    fn max_value() -> u32;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_exponent {
    ($($t:ty),*) => {
        $(
        impl Exponent for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn to_u32(&self) -> u32 {
                *self as u32
            }

            #[inline]
            fn from_u32(n: u32) -> Self {
                if n <= <$t>::MAX as u32 {
                    n as $t
                } else {
                    panic!("Exponent {} too large for {}", n, stringify!($t));
                }
            }

            #[inline]
            fn max_value() -> u32 {
                <$t>::MAX as u32
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn checked_add(&self, other: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *other)
            }
        }
        )*
    };
}

impl_exponent!(u8, u16, u32);

/// A named variable of a polynomial ring or a parameter of a coefficient domain.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Variable {
    name: SmartString<LazyCompact>,
}

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable { name: name.into() }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::new(name)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The run-time name of a [MonomialOrder].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OrderKind {
    Lex,
    GrevLex,
}

impl Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Lex => f.write_str("lex"),
            OrderKind::GrevLex => f.write_str("grevlex"),
        }
    }
}

/// A well-order of monomials that is compatible with multiplication.
pub trait MonomialOrder:
    Clone + Copy + Debug + PartialEq + Eq + Hash + Send + Sync + 'static
{
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering;
    fn kind() -> OrderKind;
}

/// Graded reverse lexicographic ordering of monomials.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GrevLexOrder;

impl MonomialOrder for GrevLexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        let deg: u32 = a.iter().map(|e| e.to_u32()).sum();
        let deg2: u32 = b.iter().map(|e| e.to_u32()).sum();

        match deg.cmp(&deg2) {
            Equal => {}
            x => {
                return x;
            }
        }

        for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
            match a1.cmp(a2) {
                Equal => {}
                x => {
                    return x.reverse();
                }
            }
        }

        Equal
    }

    fn kind() -> OrderKind {
        OrderKind::GrevLex
    }
}

/// Lexicographic ordering of monomials: the first variable that differs decides.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct LexOrder;

impl MonomialOrder for LexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        a.cmp(b)
    }

    fn kind() -> OrderKind {
        OrderKind::Lex
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{Exponent, GrevLexOrder, LexOrder, MonomialOrder};

    #[test]
    fn lex_first_difference_decides() {
        assert_eq!(LexOrder::cmp::<u16>(&[1, 0, 5], &[0, 9, 9]), Ordering::Greater);
        assert_eq!(LexOrder::cmp::<u16>(&[1, 2, 0], &[1, 2, 1]), Ordering::Less);
        assert_eq!(LexOrder::cmp::<u16>(&[3, 2, 1], &[3, 2, 1]), Ordering::Equal);
    }

    #[test]
    fn grevlex_degree_then_reverse() {
        // x^2 > x*y^5 fails on degree first
        assert_eq!(GrevLexOrder::cmp::<u8>(&[2, 0], &[1, 5]), Ordering::Less);
        // same degree: the smaller power of the last variable wins
        assert_eq!(GrevLexOrder::cmp::<u8>(&[1, 1, 0], &[0, 0, 2]), Ordering::Greater);
        assert_eq!(GrevLexOrder::cmp::<u8>(&[2, 0, 0], &[0, 2, 0]), Ordering::Greater);
    }

    #[test]
    #[should_panic]
    fn exponent_too_large() {
        u8::from_u32(256);
    }
}
