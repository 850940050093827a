//! Greatest common divisors of multivariate polynomials over the integers.
//!
//! After shared monomial factors are split off, the cheap cases are handled
//! first: constants, variables that occur in only one of the inputs and inputs
//! that divide each other. Then the gcd is attempted with a heuristic that
//! evaluates the polynomials at a large integer and reconstructs the gcd from
//! the integer gcd. If that fails, a dense modular algorithm computes images of
//! the gcd modulo word-sized primes, interpolating one variable at a time, and
//! combines the images with the Chinese remainder theorem.
//!
//! The result is normalized to have a positive leading coefficient, so that it
//! can be used to bring fractions of polynomials into a canonical form.

use std::borrow::Cow;
use std::cmp::Ordering;

use ahash::{HashMap, HashMapExt};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, instrument};

use crate::domains::finite_field::FiniteField;
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::{EuclideanDomain, Ring};

use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::{Exponent, MonomialOrder, INLINED_EXPONENTS};

pub const LARGE_U32_PRIMES: [u32; 100] = [
    4293490987, 4293491603, 4293492277, 4293492857, 4293491017, 4293491621, 4293492283, 4293492881,
    4293491023, 4293491639, 4293492293, 4293492893, 4293491051, 4293491659, 4293492331, 4293492941,
    4293491149, 4293491701, 4293492349, 4293492977, 4293491171, 4293491711, 4293492383, 4293493037,
    4293491221, 4293491747, 4293492403, 4293493049, 4293491261, 4293491779, 4293492421, 4293493069,
    4293491269, 4293491791, 4293492431, 4293493081, 4293491273, 4293491819, 4293492487, 4293493091,
    4293491281, 4293491849, 4293492499, 4293493117, 4293491299, 4293491863, 4293492523, 4293493121,
    4293491303, 4293491887, 4293492583, 4293493159, 4293491311, 4293491897, 4293492587, 4293493163,
    4293491327, 4293491911, 4293492649, 4293493207, 4293491329, 4293491953, 4293492661, 4293493229,
    4293491399, 4293491957, 4293492673, 4293493241, 4293491431, 4293492017, 4293492701, 4293493261,
    4293491467, 4293492023, 4293492739, 4293493319, 4293491509, 4293492097, 4293492751, 4293493363,
    4293491539, 4293492101, 4293492769, 4293493367, 4293491551, 4293492107, 4293492779, 4293493409,
    4293491561, 4293492113, 4293492781, 4293493423, 4293491567, 4293492139, 4293492811, 4293493433,
    4293491591, 4293492169, 4293492821, 4293493487,
];

/// The primes used by the modular gcd: the table above, followed by the primes above `2^31`.
fn modular_primes() -> impl Iterator<Item = u32> {
    let mut p = Integer::from(1u32 << 31);
    LARGE_U32_PRIMES
        .into_iter()
        .chain(std::iter::from_fn(move || {
            p.next_prime_mut();
            p.to_u32()
        }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicGCDError {
    MaxSizeExceeded,
    BadReconstruction,
}

type ModularPolynomial<E, O> = MultivariatePolynomial<FiniteField, E, O>;
type Exponents<E> = SmallVec<[E; INLINED_EXPONENTS]>;

impl<E: Exponent, O: MonomialOrder> MultivariatePolynomial<IntegerRing, E, O> {
    /// Compute the gcd for simple cases.
    #[inline(always)]
    fn simple_gcd(a: &Self, b: &Self) -> Option<Self> {
        if a == b {
            return Some(a.clone());
        }

        if a.is_zero() {
            return Some(b.clone());
        }
        if b.is_zero() {
            return Some(a.clone());
        }

        if a.is_one() {
            return Some(a.clone());
        }

        if b.is_one() {
            return Some(b.clone());
        }

        if a.is_constant() {
            let mut gcd = a.coefficients[0].clone();
            for c in &b.coefficients {
                gcd = a.field().gcd(&gcd, c);
                if a.field().is_one(&gcd) {
                    break;
                }
            }
            return Some(a.constant(gcd));
        }

        if b.is_constant() {
            let mut gcd = b.coefficients[0].clone();
            for c in &a.coefficients {
                gcd = a.field().gcd(&gcd, c);
                if a.field().is_one(&gcd) {
                    break;
                }
            }
            return Some(a.constant(gcd));
        }

        None
    }

    /// Make the leading coefficient positive.
    fn normalize_sign(self) -> Self {
        if matches!(self.leading_coefficient(), Some(c) if *c < 0) {
            -self
        } else {
            self
        }
    }

    /// Compute the gcd of two multivariate polynomials. The result
    /// has a positive leading coefficient.
    #[instrument(level = "debug", skip_all)]
    pub fn gcd(a: &Self, b: &Self) -> Self {
        debug_assert_eq!(a.nvars(), b.nvars());
        debug!("gcd of {} and {}", a, b);

        if let Some(g) = Self::simple_gcd(a, b) {
            debug!("Simple {}", g);
            return g.normalize_sign();
        }

        // a and b are only copied when needed
        let mut a = Cow::Borrowed(a);
        let mut b = Cow::Borrowed(b);

        // determine the maximum shared power of every variable
        let mut shared_degree: Exponents<E> = a.exponents(0).into();
        for p in [&a, &b] {
            for e in p.exponents_iter() {
                for (md, v) in shared_degree.iter_mut().zip(e) {
                    *md = (*md).min(*v);
                }
            }
        }

        // divide out the common factors
        if shared_degree.iter().any(|d| !d.is_zero()) {
            for p in [&mut a, &mut b] {
                let pp = p.to_mut();
                for e in pp.exponents_iter_mut() {
                    for (v, d) in e.iter_mut().zip(&shared_degree) {
                        *v = *v - *d;
                    }
                }
            }
        }

        let g = Self::gcd_without_monomial(&a, &b);
        g.mul_exp(&shared_degree).normalize_sign()
    }

    /// Compute the gcd of two polynomials that do not share a monomial factor.
    fn gcd_without_monomial(a: &Self, b: &Self) -> Self {
        if let Some(g) = Self::simple_gcd(a, b) {
            return g;
        }

        // store which variables appear in which polynomial
        let mut occurs: SmallVec<[u8; INLINED_EXPONENTS]> = smallvec![0; a.nvars()];
        for (p, flag) in [(a, 1), (b, 2)] {
            for e in p.exponents_iter() {
                for (o, ee) in occurs.iter_mut().zip(e) {
                    if !ee.is_zero() {
                        *o |= flag;
                    }
                }
            }
        }

        // a variable that occurs in only one polynomial does not occur in the gcd,
        // so the gcd divides all coefficients with respect to that variable
        if occurs.iter().any(|o| *o == 1 || *o == 2) {
            let only_a: SmallVec<[usize; INLINED_EXPONENTS]> =
                (0..a.nvars()).filter(|v| occurs[*v] == 1).collect();
            let only_b: SmallVec<[usize; INLINED_EXPONENTS]> =
                (0..a.nvars()).filter(|v| occurs[*v] == 2).collect();

            let mut f = a.to_coefficient_list(&only_a);
            f.extend(b.to_coefficient_list(&only_b));
            debug!("Gcd of {} coefficients without unshared variables", f.len());
            return Self::gcd_multiple(f).unwrap_or_else(|| a.zero());
        }

        if a.nterms() >= b.nterms() && a.divides(b).is_some() {
            return b.clone();
        }
        if a.nterms() <= b.nterms() && b.divides(a).is_some() {
            return a.clone();
        }

        if Self::heuristic_gcd_is_suitable(a, b) {
            match a.heuristic_gcd(b) {
                Ok((g, _, _)) => {
                    debug!("Heuristic gcd succeeded: {}", g);
                    return g;
                }
                Err(e) => debug!("Heuristic gcd failed: {:?}", e),
            }
        }

        // after removing its content, a polynomial that is linear in a variable is irreducible
        for (p1, p2) in [(a, b), (b, a)] {
            if let Some(var) = (0..p1.nvars()).find(|v| p1.degree(*v) == E::one()) {
                let content1 = p1.univariate_content(var);
                let p1_prim = p1 / &content1;
                let content = Self::gcd(&content1, &p2.univariate_content(var));
                debug!("Linear in x{}, content gcd {}", var, content);
                return if p2.divides(&p1_prim).is_some() {
                    &p1_prim * &content
                } else {
                    content
                };
            }
        }

        Self::gcd_modular(a, b)
    }

    /// Estimate if the evaluation point of the heuristic gcd stays small enough.
    fn heuristic_gcd_is_suitable(a: &Self, b: &Self) -> bool {
        let mut max_deg = [0usize; 2];
        let mut contains: [SmallVec<[bool; INLINED_EXPONENTS]>; 2] =
            [smallvec![false; a.nvars()], smallvec![false; a.nvars()]];

        for (i, p) in [a, b].into_iter().enumerate() {
            for e in p.exponents_iter() {
                let mut deg = 1;
                for (var, v) in e.iter().enumerate() {
                    let v = v.to_u32() as usize;
                    if v > 0 {
                        contains[i][var] = true;
                        deg *= v + 1;
                    }
                }
                max_deg[i] = max_deg[i].max(deg);
            }
        }

        let num_shared_vars = contains[0]
            .iter()
            .zip(&contains[1])
            .filter(|(a, b)| **a && **b)
            .count();

        max_deg[0] < 20
            || max_deg[1] < 20
            || num_shared_vars < 3 && max_deg[0].min(max_deg[1]) < 150
    }

    /// Perform a heuristic gcd algorithm that evaluates both polynomials at a
    /// large integer, computes the gcd of the images and reconstructs the
    /// polynomial gcd from its `xi`-adic expansion. Both inputs must be non-zero.
    ///
    /// On success, the gcd and the cofactors of `self` and `b` are returned.
    #[instrument(level = "debug", skip_all)]
    pub fn heuristic_gcd(&self, b: &Self) -> Result<(Self, Self, Self), HeuristicGCDError> {
        fn interpolate<E: Exponent, O: MonomialOrder>(
            mut gamma: MultivariatePolynomial<IntegerRing, E, O>,
            var: usize,
            xi: &Integer,
        ) -> MultivariatePolynomial<IntegerRing, E, O> {
            let mut g = gamma.zero();
            let mut i = 0;
            let xi_half = xi.clone() / 2u32;
            while !gamma.is_zero() {
                // create xi-adic representation using the symmetric modulus
                let mut g_i = gamma.zero_with_capacity(gamma.nterms());
                for m in &gamma {
                    let mut c = Z.rem(m.coefficient, xi);

                    if c > xi_half {
                        c -= xi;
                    }

                    if !IntegerRing::is_zero(&c) {
                        g_i.coefficients.push(c);
                        g_i.exponents.extend_from_slice(m.exponents);
                    }
                }

                // multiply with var^i
                let mut g_i_2 = g_i.clone();
                for x in g_i_2.exponents_iter_mut() {
                    x[var] = E::from_u32(i);
                }

                g = g + g_i_2;

                gamma = (gamma - g_i).div_coeff(xi);
                i += 1;
            }
            g
        }

        fn next_xi(xi: &Integer) -> Integer {
            Z.quot_rem(&(xi.clone() * 73794u32), &Integer::from(27011u32)).0
        }

        debug_assert!(!self.is_zero() && !b.is_zero());
        debug!("a={}; b={}", self, b);

        // do integer gcd
        let content_gcd = Z.gcd(&self.content(), &b.content());
        debug!("content={}", content_gcd);

        let mut a = Cow::Borrowed(self);
        let mut b = Cow::Borrowed(b);

        if !Z.is_one(&content_gcd) {
            a = Cow::Owned(a.into_owned().div_coeff(&content_gcd));
            b = Cow::Owned(b.into_owned().div_coeff(&content_gcd));
        }

        let Some(var) =
            (0..a.nvars()).find(|x| !a.degree(*x).is_zero() && !b.degree(*x).is_zero())
        else {
            return Ok((a.constant(content_gcd), a.into_owned(), b.into_owned()));
        };

        let zero = Integer::new();
        let max_a = a
            .coefficients
            .iter()
            .max_by(|x1, x2| x1.cmp_abs(x2))
            .unwrap_or(&zero);
        let max_b = b
            .coefficients
            .iter()
            .max_by(|x1, x2| x1.cmp_abs(x2))
            .unwrap_or(&zero);

        let min = if max_a.cmp_abs(max_b) == Ordering::Greater {
            max_b.clone().abs()
        } else {
            max_a.clone().abs()
        };

        let mut xi = min * 2u32 + 29u32;

        for retry in 0..6 {
            debug!("round {}, xi={}", retry, xi);
            let deg = a.degree(var).max(b.degree(var)).to_u32();
            if (xi.clone() * deg).significant_bits() > 256 {
                debug!("Evaluation point too large: {}", xi);
                return Err(HeuristicGCDError::MaxSizeExceeded);
            }

            let aa = a.replace(var, &xi);
            let bb = b.replace(var, &xi);

            let (gamma, co_fac_p, co_fac_q) = match aa.heuristic_gcd(&bb) {
                Ok(x) => x,
                Err(HeuristicGCDError::MaxSizeExceeded) => {
                    return Err(HeuristicGCDError::MaxSizeExceeded);
                }
                Err(HeuristicGCDError::BadReconstruction) => {
                    xi = next_xi(&xi);
                    continue;
                }
            };

            debug!("gamma={}", gamma);

            let g = interpolate(gamma, var, &xi);
            if !g.is_zero() {
                let g_cont = g.content();
                let gc = g.div_coeff(&g_cont);

                if let Some(q) = a.divides(&gc) {
                    if let Some(q1) = b.divides(&gc) {
                        return Ok((gc.mul_coeff(content_gcd), q, q1));
                    }
                }
            }

            if !co_fac_p.is_zero() {
                let a_co_fac = interpolate(co_fac_p, var, &xi);

                if !a_co_fac.is_zero() {
                    if let Some(q) = a.divides(&a_co_fac) {
                        if let Some(q1) = b.divides(&q) {
                            return Ok((q.mul_coeff(content_gcd), a_co_fac, q1));
                        }
                    }
                }
            }

            if !co_fac_q.is_zero() {
                let b_co_fac = interpolate(co_fac_q, var, &xi);

                if !b_co_fac.is_zero() {
                    if let Some(q) = b.divides(&b_co_fac) {
                        if let Some(q1) = a.divides(&q) {
                            return Ok((q.mul_coeff(content_gcd), q1, b_co_fac));
                        }
                    }
                }
            }

            xi = next_xi(&xi);
        }

        Err(HeuristicGCDError::BadReconstruction)
    }

    /// Compute the gcd with a dense modular algorithm. The gcd is computed modulo
    /// a sequence of primes and the images are combined with the Chinese remainder
    /// theorem, until the primitive part of the result divides both inputs.
    #[instrument(level = "debug", skip_all)]
    fn gcd_modular(a: &Self, b: &Self) -> Self {
        let content = Z.gcd(&a.content(), &b.content());
        let a = a.clone().div_coeff(&a.content());
        let b = b.clone().div_coeff(&b.content());

        let vars: SmallVec<[usize; INLINED_EXPONENTS]> = (0..a.nvars())
            .filter(|v| !a.degree(*v).is_zero() || !b.degree(*v).is_zero())
            .collect();

        // the leading coefficient of the gcd divides gamma
        let gamma = Z.gcd(a.max_coeff(), b.max_coeff());
        let names: Vec<&str> = a.ring.variables().iter().map(|v| v.name()).collect();

        let mut image: Option<(Self, Integer)> = None;
        for p in modular_primes() {
            let field = FiniteField::new(p);
            if field.to_element(a.max_coeff()) == 0 || field.to_element(b.max_coeff()) == 0 {
                continue;
            }

            let ring = PolynomialRing::<FiniteField, E, O>::new(field, &names);
            let ap = a.to_finite_field(&ring);
            let bp = b.to_finite_field(&ring);

            let Some(gp) = gcd_dense(&ap, &bp, &vars) else {
                debug!("No evaluation points left modulo {}", p);
                continue;
            };

            if gp.is_constant() {
                debug!("Coprime modulo {}", p);
                return a.constant(content);
            }

            let gp = gp.mul_coeff(field.to_element(&gamma));

            let order = image.as_ref().map(|(h, _)| O::cmp(gp.max_exp(), h.max_exp()));
            match order {
                Some(Ordering::Greater) => {
                    debug!("Unlucky prime {}", p);
                }
                Some(Ordering::Equal) => {
                    let Some((h, m)) = image.take() else {
                        continue;
                    };

                    let (h_new, m_new) = Self::chinese_remainder(&h, &m, &gp);
                    if h_new == h {
                        let g = h_new.clone().div_coeff(&h_new.content()).normalize_sign();
                        if a.divides(&g).is_some() && b.divides(&g).is_some() {
                            debug!("Modular gcd stabilised after prime {}", p);
                            return g.mul_coeff(content);
                        }
                    }

                    image = Some((h_new, m_new));
                }
                _ => {
                    image = Some((gp.to_symmetric_integer(&a.ring), Integer::from(p)));
                }
            }
        }

        panic!("Ran out of primes for the modular gcd");
    }

    /// Combine `h` modulo `m` with the image `g` modulo a new prime into a
    /// polynomial with coefficients in the symmetric range of the product modulus.
    fn chinese_remainder(h: &Self, m: &Integer, g: &ModularPolynomial<E, O>) -> (Self, Integer) {
        let field = g.field();
        let p = field.get_prime();
        let m_inv = field.inverse(field.to_element(m));
        let new_m = m.clone() * p;
        let half = new_m.clone() / 2u32;

        let mut res = h.zero_with_capacity(h.nterms().max(g.nterms()));
        let zero = Integer::new();
        let (mut i, mut j) = (0, 0);
        while i < h.nterms() || j < g.nterms() {
            let order = if i == h.nterms() {
                Ordering::Greater
            } else if j == g.nterms() {
                Ordering::Less
            } else {
                O::cmp(h.exponents(i), g.exponents(j))
            };

            let (hc, gc, exp) = match order {
                Ordering::Less => {
                    i += 1;
                    (&h.coefficients[i - 1], 0, h.exponents(i - 1))
                }
                Ordering::Greater => {
                    j += 1;
                    (&zero, g.coefficients[j - 1], g.exponents(j - 1))
                }
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    (&h.coefficients[i - 1], g.coefficients[j - 1], h.exponents(i - 1))
                }
            };

            let t = field.mul(&field.sub(&gc, &field.to_element(hc)), &m_inv);
            let mut c = hc.clone() + m.clone() * t;
            if c > half {
                c -= &new_m;
            }

            if !IntegerRing::is_zero(&c) {
                res.coefficients.push(c);
                res.exponents.extend_from_slice(exp);
            }
        }

        (res, new_m)
    }

    /// Map the coefficients into the prime field of `ring`, which must have the same variables.
    pub fn to_finite_field(
        &self,
        ring: &PolynomialRing<FiniteField, E, O>,
    ) -> MultivariatePolynomial<FiniteField, E, O> {
        let field = ring.field();
        let mut res = ring.zero();
        for t in self {
            let c = field.to_element(t.coefficient);
            if c != 0 {
                res.coefficients.push(c);
                res.exponents.extend_from_slice(t.exponents);
            }
        }
        res
    }

    /// Compute the gcd of a list of polynomials.
    pub fn gcd_multiple(mut f: Vec<Self>) -> Option<Self> {
        if f.len() <= 1 {
            return f.pop().map(|p| p.normalize_sign());
        }

        f.sort_unstable_by_key(|p| std::cmp::Reverse(p.nterms()));

        let mut gcd = f.pop()?;
        for p in f {
            if gcd.is_one() {
                return Some(gcd);
            }

            gcd = Self::gcd(&gcd, &p);
        }
        Some(gcd.normalize_sign())
    }

    /// Get the content of a multivariate polynomial viewed as a
    /// univariate polynomial in `x`.
    pub fn univariate_content(&self, x: usize) -> Self {
        let coeffs = self
            .to_univariate_polynomial_list(x)
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        Self::gcd_multiple(coeffs).unwrap_or_else(|| self.zero())
    }
}

impl<E: Exponent, O: MonomialOrder> MultivariatePolynomial<FiniteField, E, O> {
    /// Lift the coefficients to integers in the symmetric range `(-p/2, p/2]`.
    pub fn to_symmetric_integer(
        &self,
        ring: &PolynomialRing<IntegerRing, E, O>,
    ) -> MultivariatePolynomial<IntegerRing, E, O> {
        let field = self.field();
        let mut res = ring.zero();
        for t in self {
            res.coefficients.push(field.to_symmetric_integer(t.coefficient));
            res.exponents.extend_from_slice(t.exponents);
        }
        res
    }
}

/// Compute the monic gcd of two non-zero polynomials over a prime field. The variables
/// that occur in `a` or `b` are listed in `vars`. The last of them is interpolated from
/// the gcds at evaluation points. `None` is returned if the field has too few points.
fn gcd_dense<E: Exponent, O: MonomialOrder>(
    a: &ModularPolynomial<E, O>,
    b: &ModularPolynomial<E, O>,
    vars: &[usize],
) -> Option<ModularPolynomial<E, O>> {
    let field = *a.field();

    let Some((&x, rest)) = vars.split_last() else {
        return Some(a.one());
    };

    if rest.is_empty() {
        let g = univariate_gcd(&field, &to_dense(a, x), &to_dense(b, x));
        return Some(from_dense(&a.ring, &g, x));
    }

    let pa = split_variable(a, x);
    let pb = split_variable(b, x);

    // split off the contents in x
    let ca = pa
        .iter()
        .fold(vec![], |g, (_, c)| univariate_gcd(&field, &g, c));
    let cb = pb
        .iter()
        .fold(vec![], |g, (_, c)| univariate_gcd(&field, &g, c));
    let content = univariate_gcd(&field, &ca, &cb);

    let pa: Vec<_> = pa
        .into_iter()
        .map(|(e, c)| (e, univariate_quot_rem(&field, &c, &ca).0))
        .collect();
    let pb: Vec<_> = pb
        .into_iter()
        .map(|(e, c)| (e, univariate_quot_rem(&field, &c, &cb).0))
        .collect();

    // the leading coefficients in the other variables
    let lca = &pa[pa.len() - 1].1;
    let lcb = &pb[pb.len() - 1].1;
    let gamma = univariate_gcd(&field, lca, lcb);

    let degree = |parts: &[(Exponents<E>, Vec<u32>)]| {
        parts.iter().map(|(_, c)| c.len() - 1).max().unwrap_or(0)
    };
    let bound = gamma.len() - 1 + degree(&pa[..]).min(degree(&pb[..]));

    let a_prim = join_variable(&a.ring, &pa, x);
    let b_prim = join_variable(&a.ring, &pb, x);

    // the interpolated gcd, the product of (x - alpha) and the leading monomial of the images
    let mut interpolation: Option<(ModularPolynomial<E, O>, Vec<u32>, Exponents<E>)> = None;
    let mut points = 0;

    for alpha in 1..field.get_prime() {
        let gamma_alpha = univariate_eval(&field, &gamma, alpha);
        if univariate_eval(&field, lca, alpha) == 0 || univariate_eval(&field, lcb, alpha) == 0 {
            continue;
        }

        let a_alpha = a_prim.replace(x, &alpha);
        let b_alpha = b_prim.replace(x, &alpha);
        let Some(g_alpha) = gcd_dense(&a_alpha, &b_alpha, rest) else {
            continue;
        };

        if g_alpha.is_constant() {
            // the primitive parts are coprime
            return Some(from_dense(&a.ring, &content, x));
        }

        let g_alpha = g_alpha.mul_coeff(gamma_alpha);

        let order = interpolation
            .as_ref()
            .map(|(_, _, lm)| O::cmp(g_alpha.max_exp(), &lm[..]));
        match order {
            Some(Ordering::Greater) => continue,
            Some(Ordering::Equal) => {
                let Some((h, m, lm)) = interpolation.take() else {
                    continue;
                };

                // Newton interpolation: h + (g - h(alpha)) * m(x) / m(alpha)
                let diff = g_alpha - h.replace(x, &alpha);
                let h = if diff.is_zero() {
                    h
                } else {
                    let s = field.inverse(univariate_eval(&field, &m, alpha));
                    h + mul_dense(diff.mul_coeff(s), &m, x)
                };
                let m = univariate_mul(&field, &m, &[field.neg(&alpha), 1]);

                interpolation = Some((h, m, lm));
                points += 1;
            }
            _ => {
                let lm = SmallVec::from_slice(g_alpha.max_exp());
                interpolation = Some((g_alpha, vec![field.neg(&alpha), 1], lm));
                points = 1;
            }
        }

        if points > bound {
            let Some((h, _, _)) = interpolation.take() else {
                continue;
            };
            points = 0;

            let ph = split_variable(&h, x);
            let ch = ph
                .iter()
                .fold(vec![], |g, (_, c)| univariate_gcd(&field, &g, c));
            let ph: Vec<_> = ph
                .into_iter()
                .map(|(e, c)| (e, univariate_quot_rem(&field, &c, &ch).0))
                .collect();
            let candidate = join_variable(&a.ring, &ph, x);

            if a_prim.divides(&candidate).is_some() && b_prim.divides(&candidate).is_some() {
                let g = &candidate * &from_dense(&a.ring, &content, x);
                return g.make_monic().ok();
            }

            debug!("Interpolated gcd does not divide the inputs");
        }
    }

    None
}

/// Write `p` as a polynomial in all variables except `x`, with dense coefficients in `x`.
/// The parts are sorted by their monomial in the other variables.
fn split_variable<E: Exponent, O: MonomialOrder>(
    p: &ModularPolynomial<E, O>,
    x: usize,
) -> Vec<(Exponents<E>, Vec<u32>)> {
    let mut parts: HashMap<Exponents<E>, Vec<u32>> = HashMap::new();
    let mut e: Exponents<E> = smallvec![E::zero(); p.nvars()];
    for t in p {
        e.copy_from_slice(t.exponents);
        let d = e[x].to_u32() as usize;
        e[x] = E::zero();

        let c = parts.entry(e.clone()).or_default();
        if c.len() <= d {
            c.resize(d + 1, 0);
        }
        c[d] = *t.coefficient;
    }

    let mut parts: Vec<_> = parts.into_iter().collect();
    parts.sort_unstable_by(|(e1, _), (e2, _)| O::cmp(&e1[..], &e2[..]));
    parts
}

fn join_variable<E: Exponent, O: MonomialOrder>(
    ring: &PolynomialRing<FiniteField, E, O>,
    parts: &[(Exponents<E>, Vec<u32>)],
    x: usize,
) -> ModularPolynomial<E, O> {
    let mut terms = HashMap::with_capacity(parts.len());
    for (e, c) in parts {
        for (d, cc) in c.iter().enumerate() {
            if *cc != 0 {
                let mut e = e.clone();
                e[x] = E::from_u32(d as u32);
                terms.insert(e, *cc);
            }
        }
    }
    ring.from_exponent_map(terms)
}

/// Multiply `p`, which does not contain `x`, with the dense univariate polynomial `m` in `x`.
fn mul_dense<E: Exponent, O: MonomialOrder>(
    p: ModularPolynomial<E, O>,
    m: &[u32],
    x: usize,
) -> ModularPolynomial<E, O> {
    let field = *p.field();
    let mut terms = HashMap::with_capacity(p.nterms() * m.len());
    for t in &p {
        for (d, c) in m.iter().enumerate() {
            if *c != 0 {
                let mut e: Exponents<E> = SmallVec::from_slice(t.exponents);
                e[x] = E::from_u32(d as u32);
                terms.insert(e, field.mul(t.coefficient, c));
            }
        }
    }
    p.ring.from_exponent_map(terms)
}

/// The dense coefficients of a polynomial that only contains `x`.
fn to_dense<E: Exponent, O: MonomialOrder>(p: &ModularPolynomial<E, O>, x: usize) -> Vec<u32> {
    let mut res = vec![0; p.degree(x).to_u32() as usize + 1];
    for t in p {
        res[t.exponents[x].to_u32() as usize] = *t.coefficient;
    }
    trim(&mut res);
    res
}

fn from_dense<E: Exponent, O: MonomialOrder>(
    ring: &PolynomialRing<FiniteField, E, O>,
    c: &[u32],
    x: usize,
) -> ModularPolynomial<E, O> {
    join_variable(ring, &[(smallvec![E::zero(); ring.nvars()], c.to_vec())], x)
}

fn trim(a: &mut Vec<u32>) {
    while a.last() == Some(&0) {
        a.pop();
    }
}

fn univariate_eval(field: &FiniteField, a: &[u32], x: u32) -> u32 {
    a.iter()
        .rev()
        .fold(0, |acc, c| field.add(&field.mul(&acc, &x), c))
}

fn univariate_mul(field: &FiniteField, a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }

    let mut res = vec![0; a.len() + b.len() - 1];
    for (i, aa) in a.iter().enumerate() {
        for (j, bb) in b.iter().enumerate() {
            res[i + j] = field.add(&res[i + j], &field.mul(aa, bb));
        }
    }
    trim(&mut res);
    res
}

/// Divide `a` by the non-zero `b`.
fn univariate_quot_rem(field: &FiniteField, a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    if a.len() < b.len() {
        return (vec![], a.to_vec());
    }

    let inv = field.inverse(b[b.len() - 1]);
    let mut r = a.to_vec();
    let mut q = vec![0; a.len() - b.len() + 1];
    for i in (0..q.len()).rev() {
        let c = field.mul(&r[i + b.len() - 1], &inv);
        q[i] = c;
        if c != 0 {
            for (j, bb) in b.iter().enumerate() {
                r[i + j] = field.sub(&r[i + j], &field.mul(&c, bb));
            }
        }
    }

    r.truncate(b.len() - 1);
    trim(&mut r);
    trim(&mut q);
    (q, r)
}

/// The monic gcd of two dense univariate polynomials.
fn univariate_gcd(field: &FiniteField, a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    while !b.is_empty() {
        let r = univariate_quot_rem(field, &a, &b).1;
        a = b;
        b = r;
    }

    if let Some(lc) = a.last() {
        let inv = field.inverse(*lc);
        for c in &mut a {
            *c = field.mul(c, &inv);
        }
    }
    a
}
