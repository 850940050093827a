//! Coefficient domains of polynomial rings.
//!
//! The core trait is [Ring]. Each ring has an associated element type, that should not be
//! confused with the ring type itself:
//! - The ring of integers [Z](integer::Z) has elements of type [Integer].
//! - The field of rational numbers [Q](rational::Q) has elements of type [Rational](rational::Rational).
//! - A [RationalPolynomialField](rational_polynomial::RationalPolynomialField) has elements of type
//!   [RationalPolynomial](rational_polynomial::RationalPolynomial).
//!
//! Ring elements do not carry their ring, so the ring object performs the arithmetic.
//! [EuclideanDomain] adds remainders and gcds, [Field] adds division and inversion.
pub mod finite_field;
pub mod integer;
pub mod rational;
pub mod rational_polynomial;

use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

use integer::Integer;

use crate::error::AlgebraError;
use crate::poly::Variable;

/// A set with addition and multiplication. Elements are immutable values: every
/// operation returns a new element.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The element of a ring. For example, the elements of [Z](integer::Z) are [Integer].
    type Element: Clone + PartialEq + Eq + Hash + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: Integer) -> Self::Element;
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;

    /// The named elements that generate this ring over the integers,
    /// for example the parameters of a rational function field.
    fn named_generators(&self) -> Vec<(Variable, Self::Element)> {
        Vec::new()
    }

    /// Sample a random element, with integer coefficients drawn from `range`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;

    /// Write `element` to `f`. If `in_product` is set, the element is a factor
    /// of a product and sums have to be put in parentheses.
    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error>;

    /// Create a new printer for the given ring element that
    /// can be used in a [format!] macro.
    fn printer<'a>(&'a self, element: &'a Self::Element) -> RingPrinter<'a, Self> {
        RingPrinter::new(self, element)
    }
}

/// A Euclidean domain is a ring that supports division with remainder, quotients, and gcds.
pub trait EuclideanDomain: Ring {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    /// Divide `a` by `b` with remainder. Panics if `b` is zero.
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element);
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
pub trait Field: EuclideanDomain {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, AlgebraError>;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) -> Result<(), AlgebraError>;
    fn inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError>;
}

/// Prints an element of a ring, suitable as an argument to [format!].
/// Internally, it will call [Ring::fmt_display].
pub struct RingPrinter<'a, R: Ring> {
    pub ring: &'a R,
    pub element: &'a R::Element,
    pub in_product: bool,
}

impl<'a, R: Ring> RingPrinter<'a, R> {
    pub fn new(ring: &'a R, element: &'a R::Element) -> RingPrinter<'a, R> {
        RingPrinter {
            ring,
            element,
            in_product: false,
        }
    }

    /// Print the element as a factor of a product.
    pub fn in_product(mut self, in_product: bool) -> RingPrinter<'a, R> {
        self.in_product = in_product;
        self
    }
}

impl<'a, R: Ring> Display for RingPrinter<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.fmt_display(self.element, self.in_product, f)
    }
}
