//! Ideals of multivariate polynomial rings.

use tracing::debug;

use crate::{
    domains::Field,
    error::AlgebraError,
    poly::{
        groebner::{GroebnerBasis, GroebnerObserver, GroebnerOptions, NoObserver},
        polynomial::{MultivariatePolynomial, PolynomialRing},
        Exponent, LexOrder, MonomialOrder,
    },
};

/// An ideal given by a finite list of generators that all belong to the same ring.
///
/// An ideal is never modified: computing a Gröbner basis returns a new ideal.
#[derive(Clone, Debug)]
pub struct Ideal<F: Field, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    ring: PolynomialRing<F, E, O>,
    generators: Vec<MultivariatePolynomial<F, E, O>>,
}

impl<F: Field, E: Exponent, O: MonomialOrder> Ideal<F, E, O> {
    /// Create the ideal generated by `generators` in `ring`. Every generator
    /// must have been created by `ring`.
    pub fn new(
        ring: &PolynomialRing<F, E, O>,
        generators: Vec<MultivariatePolynomial<F, E, O>>,
    ) -> Result<Ideal<F, E, O>, AlgebraError> {
        if generators.iter().any(|g| !g.ring.is_same(ring)) {
            return Err(AlgebraError::RingMismatch);
        }

        Ok(Ideal {
            ring: ring.clone(),
            generators,
        })
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F, E, O> {
        &self.ring
    }

    #[inline]
    pub fn generators(&self) -> &[MultivariatePolynomial<F, E, O>] {
        &self.generators
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn into_generators(self) -> Vec<MultivariatePolynomial<F, E, O>> {
        self.generators
    }

    /// Compute a Gröbner basis of the ideal with the default options.
    /// The basis consists of monic polynomials, but is not necessarily reduced.
    pub fn groebner_basis(&self) -> Result<Ideal<F, E, O>, AlgebraError> {
        self.groebner_basis_with(GroebnerOptions::default(), &mut NoObserver)
    }

    /// Compute the reduced Gröbner basis, which is unique for a given ideal and monomial order.
    pub fn reduced_groebner_basis(&self) -> Result<Ideal<F, E, O>, AlgebraError> {
        self.groebner_basis_with(
            GroebnerOptions::default().with_reduce_basis(true),
            &mut NoObserver,
        )
    }

    /// Compute a Gröbner basis with the given options, reporting progress to `observer`.
    pub fn groebner_basis_with(
        &self,
        options: GroebnerOptions,
        observer: &mut dyn GroebnerObserver,
    ) -> Result<Ideal<F, E, O>, AlgebraError> {
        let gb = GroebnerBasis::new_with_observer(&self.generators, options, observer)?;

        Ok(Ideal {
            ring: self.ring.clone(),
            generators: gb.into_polynomials(),
        })
    }

    /// Check if the generators form a Gröbner basis.
    pub fn is_groebner_basis(&self) -> Result<bool, AlgebraError> {
        GroebnerBasis::is_groebner_basis(&self.generators)
    }

    /// Reduce `p` to its normal form modulo the ideal, using the reduced Gröbner basis.
    pub fn normal_form(
        &self,
        p: &MultivariatePolynomial<F, E, O>,
    ) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        if !p.ring.is_same(&self.ring) {
            return Err(AlgebraError::RingMismatch);
        }

        let gb = self.reduced_groebner_basis()?;
        GroebnerBasis::reduce(p, &gb.generators)
    }

    /// Check if `p` is a member of the ideal.
    pub fn contains(&self, p: &MultivariatePolynomial<F, E, O>) -> Result<bool, AlgebraError> {
        let nf = self.normal_form(p)?;
        debug!(normal_form = %nf, "Membership test");
        Ok(nf.is_zero())
    }

    /// The ideal generated by the generators of both ideals.
    pub fn sum(&self, other: &Self) -> Result<Ideal<F, E, O>, AlgebraError> {
        if !self.ring.is_same(&other.ring) {
            return Err(AlgebraError::RingMismatch);
        }

        let mut generators = self.generators.clone();
        generators.extend(other.generators.iter().cloned());

        Ok(Ideal {
            ring: self.ring.clone(),
            generators,
        })
    }

    /// Check if the ideal contains `1`.
    pub fn is_whole_ring(&self) -> Result<bool, AlgebraError> {
        let gb = self.groebner_basis()?;
        Ok(gb.generators.iter().any(|g| !g.is_zero() && g.is_constant()))
    }
}

#[cfg(test)]
mod test {
    use crate::domains::rational::Q;
    use crate::error::AlgebraError;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::LexOrder;

    use super::Ideal;

    #[test]
    fn generators_must_share_the_ring() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let other = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);

        let x = ring.variable(0).unwrap();
        let y = other.variable(1).unwrap();

        assert_eq!(
            Ideal::new(&ring, vec![x.clone(), y.clone()]).err(),
            Some(AlgebraError::RingMismatch)
        );

        let i = Ideal::new(&ring, vec![x]).unwrap();
        let j = Ideal::new(&other, vec![y]).unwrap();
        assert_eq!(i.sum(&j).err(), Some(AlgebraError::RingMismatch));
        assert_eq!(
            i.contains(&other.one()).err(),
            Some(AlgebraError::RingMismatch)
        );
    }

    #[test]
    fn groebner_basis_leaves_input_untouched() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let f = ring.parse("x*y - 1").unwrap();
        let g = ring.parse("y^2 - 1").unwrap();

        let ideal = Ideal::new(&ring, vec![f.clone(), g.clone()]).unwrap();
        assert!(!ideal.is_groebner_basis().unwrap());

        let gb = ideal.reduced_groebner_basis().unwrap();
        assert_eq!(ideal.generators(), &[f, g.clone()]);
        assert_eq!(gb.generators(), &[ring.parse("x - y").unwrap(), g]);
        assert!(gb.is_groebner_basis().unwrap());
        assert!(gb.ring().is_same(&ring));
    }

    #[test]
    fn membership_and_normal_form() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let ideal = Ideal::new(
            &ring,
            vec![ring.parse("x^2 + y^2 - 1").unwrap(), ring.parse("x - y").unwrap()],
        )
        .unwrap();

        assert!(ideal.contains(&ring.parse("2y^2 - 1").unwrap()).unwrap());
        assert!(ideal.contains(&ring.parse("x^2 - y^2").unwrap()).unwrap());
        assert!(!ideal.contains(&ring.parse("x").unwrap()).unwrap());
        assert_eq!(
            ideal.normal_form(&ring.parse("x^2").unwrap()).unwrap(),
            ring.parse("1/2").unwrap()
        );
        assert!(!ideal.is_whole_ring().unwrap());
    }

    #[test]
    fn sum_and_whole_ring() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let i = Ideal::new(&ring, vec![ring.parse("x^2 - 2").unwrap()]).unwrap();
        let j = Ideal::new(&ring, vec![ring.parse("x - 1").unwrap()]).unwrap();

        let s = i.sum(&j).unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.is_whole_ring().unwrap());
        assert_eq!(s.groebner_basis().unwrap().generators(), &[ring.one()]);

        let empty = Ideal::new(&ring, vec![]).unwrap();
        assert!(empty.is_empty());
        assert!(empty.contains(&ring.zero()).unwrap());
        assert!(!empty.contains(&ring.one()).unwrap());
    }
}
