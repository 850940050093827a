use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::domains::Ring;

use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder, INLINED_EXPONENTS};

/// A power product `x_1^e_1 * ... * x_n^e_n` over the variables of a ring.
/// Equality only considers the exponents.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Term<E: Exponent> {
    exponents: SmallVec<[E; INLINED_EXPONENTS]>,
}

impl<E: Exponent> Term<E> {
    #[inline]
    pub fn new(exponents: &[E]) -> Term<E> {
        Term {
            exponents: SmallVec::from_slice(exponents),
        }
    }

    /// The term `1` in `nvars` variables.
    #[inline]
    pub fn one(nvars: usize) -> Term<E> {
        Term {
            exponents: SmallVec::from_elem(E::zero(), nvars),
        }
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.exponents.len()
    }

    #[inline]
    pub fn exponents(&self) -> &[E] {
        &self.exponents
    }

    /// The total degree, i.e., the sum of the exponents.
    pub fn degree(&self) -> u32 {
        self.exponents.iter().map(|e| e.to_u32()).sum()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.exponents.iter().all(|e| e.is_zero())
    }

    /// Compare two terms in the monomial order `O`.
    #[inline]
    pub fn cmp_with<O: MonomialOrder>(&self, other: &Self) -> Ordering {
        O::cmp(&self.exponents, &other.exponents)
    }

    pub fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.nvars(), other.nvars());
        Term {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| a.checked_add(b).expect("overflow in adding exponents"))
                .collect(),
        }
    }

    /// Check if `self` divides `other`.
    #[inline]
    pub fn divides(&self, other: &Self) -> bool {
        exponents_divide(&self.exponents, &other.exponents)
    }

    /// Compute `self / other`, if `other` divides `self`.
    pub fn try_div(&self, other: &Self) -> Option<Self> {
        if !other.divides(self) {
            return None;
        }

        Some(Term {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a - *b)
                .collect(),
        })
    }

    pub fn lcm(&self, other: &Self) -> Self {
        Term {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.max(b))
                .collect(),
        }
    }

    pub fn gcd(&self, other: &Self) -> Self {
        Term {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.min(b))
                .collect(),
        }
    }

    /// Check if the terms share no variable, so that their lcm is their product.
    #[inline]
    pub fn is_coprime(&self, other: &Self) -> bool {
        self.exponents
            .iter()
            .zip(&other.exponents)
            .all(|(a, b)| a.is_zero() || b.is_zero())
    }
}

/// Check if the monomial with exponents `d` divides the one with exponents `m`.
#[inline]
pub(crate) fn exponents_divide<E: Exponent>(d: &[E], m: &[E]) -> bool {
    d.iter().zip(m).all(|(a, b)| a <= b)
}

/// View object for a term in a multivariate polynomial.
#[derive(Copy, Clone, Debug)]
pub struct MonomialView<'a, F: 'a + Ring, E: 'a + Exponent> {
    pub coefficient: &'a F::Element,
    pub exponents: &'a [E],
}

impl<'a, F: Ring, E: Exponent> MonomialView<'a, F, E> {
    pub fn term(&self) -> Term<E> {
        Term::new(self.exponents)
    }
}

/// Iterator over terms in a multivariate polynomial, from the smallest to the leading term.
pub struct MonomialViewIterator<'a, F: Ring, E: Exponent, O: MonomialOrder> {
    poly: &'a MultivariatePolynomial<F, E, O>,
    index: usize,
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Iterator for MonomialViewIterator<'a, F, E, O> {
    type Item = MonomialView<'a, F, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.poly.nterms() {
            None
        } else {
            let view = MonomialView {
                coefficient: &self.poly.coefficients[self.index],
                exponents: self.poly.exponents(self.index),
            };
            self.index += 1;
            Some(view)
        }
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> IntoIterator
    for &'a MultivariatePolynomial<F, E, O>
{
    type Item = MonomialView<'a, F, E>;
    type IntoIter = MonomialViewIterator<'a, F, E, O>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            poly: self,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use crate::poly::{GrevLexOrder, LexOrder};

    use super::Term;

    #[test]
    fn divisibility() {
        let a = Term::<u16>::new(&[1, 0, 2]);
        let b = Term::new(&[2, 1, 2]);
        assert!(a.divides(&b));
        assert!(!b.divides(&a));
        assert_eq!(b.try_div(&a), Some(Term::new(&[1, 1, 0])));
        assert_eq!(a.try_div(&b), None);
    }

    #[test]
    fn lcm_and_gcd() {
        let a = Term::<u8>::new(&[3, 0, 1]);
        let b = Term::new(&[1, 2, 1]);
        assert_eq!(a.lcm(&b), Term::new(&[3, 2, 1]));
        assert_eq!(a.gcd(&b), Term::new(&[1, 0, 1]));
        assert!(!a.is_coprime(&b));
        assert!(Term::<u8>::new(&[2, 0]).is_coprime(&Term::new(&[0, 5])));
        assert_eq!(a.mul(&b).degree(), 8);
    }

    #[test]
    fn ordered_comparison() {
        let a = Term::<u16>::new(&[1, 0, 0]);
        let b = Term::new(&[0, 2, 0]);
        assert_eq!(a.cmp_with::<LexOrder>(&b), Ordering::Greater);
        assert_eq!(a.cmp_with::<GrevLexOrder>(&b), Ordering::Less);
        assert!(Term::<u16>::one(3).is_one());
    }
}
