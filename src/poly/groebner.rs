//! Gröbner bases with Buchberger's algorithm.
//!
//! The engine keeps a list of critical pairs of basis elements. Pairs are
//! selected with a [PairStrategy], their S-polynomial is fully reduced with
//! respect to the current basis and every non-zero remainder is made monic and
//! added to the basis. Buchberger's coprime criterion and the chain criterion
//! discard pairs whose S-polynomial is known to reduce to zero.
//!
//! ```
//! use polyideal::{
//!     domains::rational::Q,
//!     poly::{groebner::{GroebnerBasis, GroebnerOptions}, polynomial::PolynomialRing, LexOrder},
//! };
//!
//! let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
//! let f = ring.parse("x*y - 1").unwrap();
//! let g = ring.parse("y^2 - 1").unwrap();
//!
//! let gb = GroebnerBasis::new(&[f, g], GroebnerOptions::default().with_reduce_basis(true)).unwrap();
//! assert_eq!(gb.system.len(), 2);
//! assert!(GroebnerBasis::is_groebner_basis(&gb.system).unwrap());
//! ```

use ahash::HashSet;
use smallvec::SmallVec;
use tracing::{debug, info, instrument};

use crate::{domains::Field, error::AlgebraError};

use super::{
    monomial::{exponents_divide, Term},
    polynomial::MultivariatePolynomial,
    Exponent, MonomialOrder, INLINED_EXPONENTS,
};

/// The order in which critical pairs are processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PairStrategy {
    /// Select the pair with the smallest lcm in the monomial order of the ring.
    #[default]
    Normal,
    /// Select the pair with the smallest total degree of the lcm.
    MinimalDegree,
    /// Select pairs in the order in which they were created.
    Fifo,
}

/// Settings of a Gröbner basis computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroebnerOptions {
    pub strategy: PairStrategy,
    /// Skip pairs with the coprime and chain criteria.
    pub use_criteria: bool,
    /// Return the unique reduced basis: minimal, inter-reduced and monic.
    pub reduce_basis: bool,
    /// Log the statistics of every iteration at the `info` level instead of `debug`.
    pub print_stats: bool,
}

impl Default for GroebnerOptions {
    fn default() -> Self {
        GroebnerOptions {
            strategy: PairStrategy::Normal,
            use_criteria: true,
            reduce_basis: false,
            print_stats: false,
        }
    }
}

impl GroebnerOptions {
    pub fn with_strategy(mut self, strategy: PairStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_criteria(mut self, use_criteria: bool) -> Self {
        self.use_criteria = use_criteria;
        self
    }

    pub fn with_reduce_basis(mut self, reduce_basis: bool) -> Self {
        self.reduce_basis = reduce_basis;
        self
    }

    pub fn with_print_stats(mut self, print_stats: bool) -> Self {
        self.print_stats = print_stats;
        self
    }
}

/// Hooks that are called during a Gröbner basis computation.
///
/// All methods have an empty default implementation. The computation polls
/// [GroebnerObserver::should_cancel] before every critical pair and stops with
/// [AlgebraError::Cancelled] when it returns `true`.
pub trait GroebnerObserver {
    /// Called once with the number of non-zero generators.
    fn on_start(&mut self, _generators: usize) {}
    /// Called when the pair of basis elements `first` and `second` is selected.
    fn on_pair(&mut self, _first: usize, _second: usize, _remaining: usize) {}
    /// Called when a new element with leading term of total degree `degree` is added at `index`.
    fn on_new_element(&mut self, _index: usize, _degree: u32) {}
    /// Called once with the length of the final basis.
    fn on_finish(&mut self, _basis_len: usize) {}

    fn should_cancel(&mut self) -> bool {
        false
    }
}

/// An observer that does nothing.
pub struct NoObserver;

impl GroebnerObserver for NoObserver {}

/// Counters of a Gröbner basis computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroebnerStats {
    pub pairs_created: usize,
    pub pairs_reduced: usize,
    pub coprime_skipped: usize,
    pub chain_skipped: usize,
    pub zero_reductions: usize,
    pub elements_added: usize,
}

/// A pair of basis elements, identified by their position in the basis.
#[derive(Clone, Debug)]
pub struct CriticalPair<E: Exponent> {
    first: usize,
    second: usize,
    lcm: Term<E>,
    degree: u32,
    coprime: bool,
    serial: usize,
}

impl<E: Exponent> CriticalPair<E> {
    fn new(
        first: usize,
        second: usize,
        lt_first: &Term<E>,
        lt_second: &Term<E>,
        serial: usize,
    ) -> Self {
        let lcm = lt_first.lcm(lt_second);
        CriticalPair {
            first: first.min(second),
            second: first.max(second),
            degree: lcm.degree(),
            coprime: lt_first.is_coprime(lt_second),
            lcm,
            serial,
        }
    }

    #[inline]
    fn key(&self) -> (usize, usize) {
        (self.first, self.second)
    }
}

/// The working state of Buchberger's algorithm.
struct PairList<E: Exponent> {
    leading_terms: Vec<Term<E>>,
    pairs: Vec<CriticalPair<E>>,
    pending: HashSet<(usize, usize)>,
    serial: usize,
}

impl<E: Exponent> PairList<E> {
    fn new() -> Self {
        PairList {
            leading_terms: vec![],
            pairs: vec![],
            pending: HashSet::default(),
            serial: 0,
        }
    }

    /// Register a new basis element with leading term `lt` and create its pairs.
    fn push(&mut self, lt: Term<E>) -> usize {
        let index = self.leading_terms.len();
        for (k, lt_k) in self.leading_terms.iter().enumerate() {
            let pair = CriticalPair::new(k, index, lt_k, &lt, self.serial);
            self.serial += 1;
            self.pending.insert(pair.key());
            self.pairs.push(pair);
        }
        self.leading_terms.push(lt);
        index
    }

    fn select<O: MonomialOrder>(&self, strategy: PairStrategy) -> Option<usize> {
        let pairs = self.pairs.iter().enumerate();

        let best = match strategy {
            PairStrategy::Fifo => pairs.min_by_key(|(_, p)| p.serial),
            PairStrategy::Normal => pairs.min_by(|(_, a), (_, b)| {
                a.lcm
                    .cmp_with::<O>(&b.lcm)
                    .then(a.serial.cmp(&b.serial))
            }),
            PairStrategy::MinimalDegree => pairs.min_by_key(|(_, p)| (p.degree, p.serial)),
        };

        best.map(|(i, _)| i)
    }

    fn remove(&mut self, index: usize) -> CriticalPair<E> {
        let pair = self.pairs.remove(index);
        self.pending.remove(&pair.key());
        pair
    }

    /// The chain criterion: the pair can be skipped if there is a third element
    /// whose leading term divides the lcm and whose pairs with both elements
    /// have already been treated.
    fn satisfies_chain_criterion(&self, pair: &CriticalPair<E>) -> bool {
        self.leading_terms.iter().enumerate().any(|(k, lt_k)| {
            k != pair.first
                && k != pair.second
                && lt_k.divides(&pair.lcm)
                && !self.pending.contains(&(pair.first.min(k), pair.first.max(k)))
                && !self.pending.contains(&(pair.second.min(k), pair.second.max(k)))
        })
    }
}

/// A Gröbner basis of the ideal generated by a list of polynomials.
pub struct GroebnerBasis<F: Field, E: Exponent, O: MonomialOrder> {
    pub system: Vec<MultivariatePolynomial<F, E, O>>,
    pub options: GroebnerOptions,
    pub stats: GroebnerStats,
}

impl<F: Field, E: Exponent, O: MonomialOrder> GroebnerBasis<F, E, O> {
    /// Construct a Gröbner basis for the ideal generated by `ideal`.
    /// Zero polynomials are ignored.
    pub fn new(
        ideal: &[MultivariatePolynomial<F, E, O>],
        options: GroebnerOptions,
    ) -> Result<GroebnerBasis<F, E, O>, AlgebraError> {
        Self::new_with_observer(ideal, options, &mut NoObserver)
    }

    /// Construct a Gröbner basis, reporting progress to `observer`.
    #[instrument(level = "debug", skip_all, fields(generators = ideal.len()))]
    pub fn new_with_observer(
        ideal: &[MultivariatePolynomial<F, E, O>],
        options: GroebnerOptions,
        observer: &mut dyn GroebnerObserver,
    ) -> Result<GroebnerBasis<F, E, O>, AlgebraError> {
        if let Some((first, rest)) = ideal.split_first() {
            if rest.iter().any(|p| !p.is_same_ring(first)) {
                return Err(AlgebraError::RingMismatch);
            }
        }

        let system: Vec<_> = ideal.iter().filter(|p| !p.is_zero()).cloned().collect();

        observer.on_start(system.len());
        info!(
            generators = system.len(),
            strategy = ?options.strategy,
            "Starting Gröbner basis computation"
        );

        let mut b = GroebnerBasis {
            system,
            options,
            stats: GroebnerStats::default(),
        };

        b.buchberger(observer)?;

        if options.reduce_basis {
            b = b.reduce_basis()?;
        }

        info!(
            basis = b.system.len(),
            pairs_reduced = b.stats.pairs_reduced,
            zero_reductions = b.stats.zero_reductions,
            "Finished Gröbner basis computation"
        );
        observer.on_finish(b.system.len());

        Ok(b)
    }

    /// Buchberger's algorithm. Replaces the system by a Gröbner basis of monic
    /// polynomials, or by `[1]` if the ideal is the whole ring.
    fn buchberger(&mut self, observer: &mut dyn GroebnerObserver) -> Result<(), AlgebraError> {
        let generators = std::mem::take(&mut self.system);

        let mut basis = vec![];
        let mut pairs = PairList::new();

        for f in generators {
            let f = f.make_monic()?;
            if f.is_constant() {
                self.system = vec![f.one()];
                return Ok(());
            }

            self.add_element(&mut basis, &mut pairs, f, observer);
        }

        let mut iter_count = 1;
        while let Some(index) = pairs.select::<O>(self.options.strategy) {
            if observer.should_cancel() {
                info!(iteration = iter_count, "Gröbner basis computation cancelled");
                return Err(AlgebraError::Cancelled);
            }

            let pair = pairs.remove(index);
            observer.on_pair(pair.first, pair.second, pairs.pairs.len());

            if self.options.print_stats {
                info!(
                    iteration = iter_count,
                    degree = pair.degree,
                    basis = basis.len(),
                    pairs = pairs.pairs.len() + 1,
                    "Selected critical pair"
                );
            } else {
                debug!(
                    iteration = iter_count,
                    degree = pair.degree,
                    basis = basis.len(),
                    pairs = pairs.pairs.len() + 1,
                    "Selected critical pair"
                );
            }
            iter_count += 1;

            if self.options.use_criteria {
                if pair.coprime {
                    self.stats.coprime_skipped += 1;
                    continue;
                }

                if pairs.satisfies_chain_criterion(&pair) {
                    self.stats.chain_skipped += 1;
                    continue;
                }
            }

            let s = Self::s_polynomial(&basis[pair.first], &basis[pair.second]);
            let r = Self::reduce(&s, &basis)?.make_monic()?;
            self.stats.pairs_reduced += 1;

            if r.is_zero() {
                self.stats.zero_reductions += 1;
                continue;
            }

            if r.is_constant() {
                debug!("Reduced S-polynomial is constant: the ideal is the whole ring");
                self.system = vec![r.one()];
                return Ok(());
            }

            self.add_element(&mut basis, &mut pairs, r, observer);
        }

        self.system = basis;
        Ok(())
    }

    fn add_element(
        &mut self,
        basis: &mut Vec<MultivariatePolynomial<F, E, O>>,
        pairs: &mut PairList<E>,
        f: MultivariatePolynomial<F, E, O>,
        observer: &mut dyn GroebnerObserver,
    ) {
        let lt = Term::new(f.max_exp());
        let degree = lt.degree();

        let before = pairs.pairs.len();
        let index = pairs.push(lt);
        self.stats.pairs_created += pairs.pairs.len() - before;
        self.stats.elements_added += 1;

        debug!(index, degree, nterms = f.nterms(), "New basis element");
        observer.on_new_element(index, degree);

        basis.push(f);
    }

    /// Compute the S-polynomial `lc(g) * m_f * f - lc(f) * m_g * g`, where `m_f` and `m_g`
    /// are the monomials that lift the leading terms of `f` and `g` to their lcm.
    /// Panics if `f` or `g` is zero.
    pub fn s_polynomial(
        f: &MultivariatePolynomial<F, E, O>,
        g: &MultivariatePolynomial<F, E, O>,
    ) -> MultivariatePolynomial<F, E, O> {
        let lcm: SmallVec<[E; INLINED_EXPONENTS]> = f
            .max_exp()
            .iter()
            .zip(g.max_exp())
            .map(|(e1, e2)| *e1.max(e2))
            .collect();

        let extra_factor_f: SmallVec<[E; INLINED_EXPONENTS]> = lcm
            .iter()
            .zip(f.max_exp())
            .map(|(e1, e2)| *e1 - *e2)
            .collect();

        let extra_factor_g: SmallVec<[E; INLINED_EXPONENTS]> = lcm
            .iter()
            .zip(g.max_exp())
            .map(|(e1, e2)| *e1 - *e2)
            .collect();

        f.clone()
            .mul_monomial(g.max_coeff(), &extra_factor_f)
            .sub_mul_monomial(g, f.max_coeff(), &extra_factor_g)
    }

    /// Completely reduce the polynomial `p` w.r.t the polynomials `gs`.
    /// For example reducing `f=y^2+x` by `g=[x]` yields `y^2`.
    pub fn reduce(
        p: &MultivariatePolynomial<F, E, O>,
        gs: &[MultivariatePolynomial<F, E, O>],
    ) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let field = p.field();
        let mut r = p.clone();

        let mut rest_coeff = vec![];
        let mut rest_exponents = vec![];

        let mut monom = vec![E::zero(); p.nvars()];

        'term: while !r.is_zero() {
            // find a divisor that has the least amount of terms
            while let Some(g) = gs
                .iter()
                .filter(|g| !g.is_zero() && exponents_divide(g.max_exp(), r.max_exp()))
                .min_by_key(|g| g.nterms())
            {
                for ((e, e1), e2) in monom.iter_mut().zip(r.max_exp()).zip(g.max_exp()) {
                    *e = *e1 - *e2;
                }

                let ratio = field.div(r.max_coeff(), g.max_coeff())?;
                r = r.sub_mul_monomial(g, &ratio, &monom);

                if r.is_zero() {
                    break 'term;
                }
            }

            // strip leading monomial that is not reducible
            if let Some((c, e)) = r.pop_leading() {
                rest_coeff.push(c);
                rest_exponents.extend_from_slice(&e);
            }
        }

        // append in sorted order
        let nvars = p.nvars();
        let mut q = p.zero_with_capacity(rest_coeff.len());
        while let Some(c) = rest_coeff.pop() {
            let l = rest_coeff.len();
            q.coefficients.push(c);
            q.exponents
                .extend_from_slice(&rest_exponents[l * nvars..(l + 1) * nvars]);
        }

        Ok(q)
    }

    /// Turn the basis into the reduced Gröbner basis: remove elements whose leading term
    /// is divisible by that of another element, reduce every element by the others and
    /// make it monic. The result is sorted by descending leading term.
    pub fn reduce_basis(mut self) -> Result<Self, AlgebraError> {
        // filter lead-reducible polynomials
        let mut res = vec![true; self.system.len()];
        'l1: for (i, p1) in self.system.iter().enumerate() {
            for (j, p2) in self.system.iter().enumerate() {
                if i != j && res[j] && exponents_divide(p2.max_exp(), p1.max_exp()) {
                    res[i] = false;
                    continue 'l1;
                }
            }
        }

        let mut lead_reduced = vec![];
        for (i, p) in self.system.drain(..).enumerate() {
            if res[i] {
                lead_reduced.push(p);
            }
        }

        let mut basis = vec![];
        for i in 0..lead_reduced.len() {
            lead_reduced.swap(0, i);
            let h = Self::reduce(&lead_reduced[0], &lead_reduced[1..])?;
            if !h.is_zero() {
                basis.push(h.make_monic()?);
            }
        }

        basis.sort_by(|p1, p2| O::cmp(p2.max_exp(), p1.max_exp()));

        debug!(basis = basis.len(), "Reduced basis");

        Ok(GroebnerBasis {
            system: basis,
            options: self.options,
            stats: self.stats,
        })
    }

    /// Consume the basis and return its polynomials.
    pub fn into_polynomials(self) -> Vec<MultivariatePolynomial<F, E, O>> {
        self.system
    }

    /// Check if `system` is a Gröbner basis of the ideal it generates, by
    /// verifying that every S-polynomial reduces to zero. Zero polynomials are ignored.
    #[instrument(level = "debug", skip_all, fields(len = system.len()))]
    pub fn is_groebner_basis(
        system: &[MultivariatePolynomial<F, E, O>],
    ) -> Result<bool, AlgebraError> {
        if let Some((first, rest)) = system.split_first() {
            if rest.iter().any(|p| !p.is_same_ring(first)) {
                return Err(AlgebraError::RingMismatch);
            }
        }

        let system: Vec<_> = system.iter().filter(|p| !p.is_zero()).cloned().collect();

        for (i, p1) in system.iter().enumerate() {
            for p2 in &system[i + 1..] {
                let s = Self::s_polynomial(p1, p2);
                if !Self::reduce(&s, &system)?.is_zero() {
                    debug!(first = %p1, second = %p2, "S-polynomial does not reduce to zero");
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use crate::domains::rational::{RationalField, Q};
    use crate::error::AlgebraError;
    use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
    use crate::poly::{GrevLexOrder, LexOrder};

    use super::{GroebnerBasis, GroebnerObserver, GroebnerOptions, PairStrategy};

    type LexPoly = MultivariatePolynomial<RationalField, u16, LexOrder>;

    fn xy() -> (PolynomialRing<RationalField, u16, LexOrder>, LexPoly, LexPoly) {
        let ring = PolynomialRing::new(Q, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();
        (ring, x, y)
    }

    #[test]
    fn s_polynomial_cancels_leading_terms() {
        let (ring, x, y) = xy();
        let f = &(&x * &x) + &y;
        let g = &(&x * &y) + &ring.one();

        let s = GroebnerBasis::s_polynomial(&f, &g);
        assert_eq!(s, &(&y * &y) - &x);
    }

    #[test]
    fn reduce_by_variable() {
        let (_, x, y) = xy();
        let f = &(&y * &y) + &x;
        let r = GroebnerBasis::reduce(&f, &[x.clone()]).unwrap();
        assert_eq!(r, &y * &y);

        let r = GroebnerBasis::reduce(&(&x * &y), &[x.clone(), y.clone()]).unwrap();
        assert!(r.is_zero());
    }

    #[test]
    fn circle_and_line() {
        let (ring, x, y) = xy();
        let f = &(&(&x * &x) + &(&y * &y)) - &ring.one();
        let g = &x - &y;

        assert!(!GroebnerBasis::is_groebner_basis(&[f.clone(), g.clone()]).unwrap());

        let gb = GroebnerBasis::new(
            &[f, g.clone()],
            GroebnerOptions::default().with_reduce_basis(true),
        )
        .unwrap();

        let half = ring.constant(Rational::from((1, 2)));
        assert_eq!(gb.system, vec![g, &(&y * &y) - &half]);
        assert!(GroebnerBasis::is_groebner_basis(&gb.system).unwrap());
    }

    #[test]
    fn strategies_agree() {
        let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y", "z"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();
        let z = ring.variable(2).unwrap();

        let ideal = vec![
            &(&x * &y) - &z,
            &(&y * &z) - &x,
            &(&z * &x) - &y,
        ];

        let mut reference = None;
        for strategy in [PairStrategy::Normal, PairStrategy::MinimalDegree, PairStrategy::Fifo] {
            for use_criteria in [true, false] {
                let options = GroebnerOptions::default()
                    .with_strategy(strategy)
                    .with_criteria(use_criteria)
                    .with_reduce_basis(true);
                let gb = GroebnerBasis::new(&ideal, options).unwrap();
                assert!(GroebnerBasis::is_groebner_basis(&gb.system).unwrap());

                match &reference {
                    None => reference = Some(gb.system),
                    Some(r) => assert_eq!(r, &gb.system),
                }
            }
        }
    }

    #[test]
    fn criteria_skip_pairs() {
        let (_, x, y) = xy();
        let gb = GroebnerBasis::new(&[&x * &x, &y * &y], GroebnerOptions::default()).unwrap();
        assert_eq!(gb.stats.coprime_skipped, 1);
        assert_eq!(gb.stats.pairs_reduced, 0);
        assert_eq!(gb.system.len(), 2);
    }

    #[test]
    fn unit_ideal_collapses() {
        let (ring, x, _) = xy();
        let gb = GroebnerBasis::new(&[x.clone(), &x + &ring.one()], GroebnerOptions::default())
            .unwrap();
        assert_eq!(gb.system, vec![ring.one()]);
    }

    #[test]
    fn zero_generators_are_ignored() {
        let (ring, x, y) = xy();
        let g = &x - &y;

        let with_zero = GroebnerBasis::new(&[ring.zero(), g.clone()], GroebnerOptions::default())
            .unwrap();
        let without = GroebnerBasis::new(&[g], GroebnerOptions::default()).unwrap();
        assert_eq!(with_zero.system, without.system);

        let empty = GroebnerBasis::<RationalField, u16, LexOrder>::new(&[], Default::default())
            .unwrap();
        assert!(empty.system.is_empty());
    }

    #[test]
    fn mixed_rings() {
        let (_, x, _) = xy();
        let (_, x2, _) = xy();
        assert_eq!(
            GroebnerBasis::new(&[x.clone(), x2.clone()], GroebnerOptions::default()).err(),
            Some(AlgebraError::RingMismatch)
        );
        assert_eq!(
            GroebnerBasis::is_groebner_basis(&[x, x2]),
            Err(AlgebraError::RingMismatch)
        );
    }

    struct CancelAfter {
        pairs_left: usize,
        new_elements: usize,
    }

    impl GroebnerObserver for CancelAfter {
        fn on_new_element(&mut self, _index: usize, _degree: u32) {
            self.new_elements += 1;
        }

        fn should_cancel(&mut self) -> bool {
            if self.pairs_left == 0 {
                return true;
            }
            self.pairs_left -= 1;
            false
        }
    }

    #[test]
    fn observer_cancels() {
        let (ring, x, y) = xy();
        let f = &(&x * &x) + &y;
        let g = &(&x * &y) + &ring.one();

        let mut observer = CancelAfter {
            pairs_left: 0,
            new_elements: 0,
        };
        let r = GroebnerBasis::new_with_observer(&[f, g], GroebnerOptions::default(), &mut observer);
        assert_eq!(r.err(), Some(AlgebraError::Cancelled));
        assert_eq!(observer.new_elements, 2);
    }
}
