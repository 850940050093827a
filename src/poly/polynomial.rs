use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use rand::Rng;
use smallvec::{smallvec, SmallVec};

use crate::domains::integer::Integer;
use crate::domains::{EuclideanDomain, Field, Ring};
use crate::error::AlgebraError;

use super::monomial::{exponents_divide, Term};
use super::{Exponent, LexOrder, MonomialOrder, OrderKind, Variable, INLINED_EXPONENTS};

#[derive(Debug)]
struct RingData<F: Ring> {
    field: F,
    variables: Vec<Variable>,
}

/// A polynomial ring `F[x_1, ..., x_n]` with a fixed monomial order `O`.
///
/// Every call to [PolynomialRing::new] creates a distinct ring. Two rings are equal
/// only if one is a clone of the other, even if they have the same field and variables.
/// Polynomials of different rings can never be combined.
#[derive(Debug)]
pub struct PolynomialRing<F: Ring, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    data: Arc<RingData<F>>,
    _phantom: PhantomData<(E, O)>,
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Clone for PolynomialRing<F, E, O> {
    fn clone(&self) -> Self {
        PolynomialRing {
            data: self.data.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PartialEq for PolynomialRing<F, E, O> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Eq for PolynomialRing<F, E, O> {}

impl<F: Ring, E: Exponent, O: MonomialOrder> Hash for PolynomialRing<F, E, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PolynomialRing<F, E, O> {
    /// Create a new polynomial ring over `field` in the given variables.
    /// The first variable is the most significant one in the monomial order.
    pub fn new(field: F, variables: &[&str]) -> PolynomialRing<F, E, O> {
        PolynomialRing {
            data: Arc::new(RingData {
                field,
                variables: variables.iter().map(|v| Variable::new(v)).collect(),
            }),
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn field(&self) -> &F {
        &self.data.field
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.data.variables
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.data.variables.len()
    }

    /// The monomial order of the ring.
    #[inline]
    pub fn order(&self) -> OrderKind {
        O::kind()
    }

    /// Check if `other` is the same ring instance.
    #[inline]
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Get the position of the variable `name`.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.data.variables.iter().position(|v| v.name() == name)
    }

    #[inline]
    pub fn zero(&self) -> MultivariatePolynomial<F, E, O> {
        MultivariatePolynomial {
            coefficients: vec![],
            exponents: vec![],
            ring: self.clone(),
        }
    }

    #[inline]
    pub fn one(&self) -> MultivariatePolynomial<F, E, O> {
        self.constant(self.field().one())
    }

    /// Create a constant polynomial.
    pub fn constant(&self, coeff: F::Element) -> MultivariatePolynomial<F, E, O> {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        MultivariatePolynomial {
            coefficients: vec![coeff],
            exponents: vec![E::zero(); self.nvars()],
            ring: self.clone(),
        }
    }

    /// Create the polynomial `x_index`.
    pub fn variable(&self, index: usize) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        if index >= self.nvars() {
            return Err(AlgebraError::UnknownVariable(format!("#{}", index)));
        }

        let mut exp = vec![E::zero(); self.nvars()];
        exp[index] = E::one();
        Ok(MultivariatePolynomial {
            coefficients: vec![self.field().one()],
            exponents: exp,
            ring: self.clone(),
        })
    }

    /// Create the polynomial for the variable called `name`.
    pub fn variable_by_name(
        &self,
        name: &str,
    ) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        match self.variable_index(name) {
            Some(i) => self.variable(i),
            None => Err(AlgebraError::UnknownVariable(name.to_string())),
        }
    }

    /// The named generators of the ring: the constant `1`, followed by the
    /// parameters of the coefficient field and then the ring variables.
    pub fn generators(&self) -> Vec<MultivariatePolynomial<F, E, O>> {
        let mut gens = vec![self.one()];

        for (_, p) in self.field().named_generators() {
            gens.push(self.constant(p));
        }

        for i in 0..self.nvars() {
            let mut exp = vec![E::zero(); self.nvars()];
            exp[i] = E::one();
            gens.push(MultivariatePolynomial {
                coefficients: vec![self.field().one()],
                exponents: exp,
                ring: self.clone(),
            });
        }

        gens
    }

    /// Create a term of this ring, checking the number of exponents.
    pub fn term(&self, exponents: &[E]) -> Result<Term<E>, AlgebraError> {
        if exponents.len() != self.nvars() {
            return Err(AlgebraError::Arity {
                expected: self.nvars(),
                found: exponents.len(),
            });
        }
        Ok(Term::new(exponents))
    }

    /// Create the polynomial `coeff * x^exponents`.
    pub fn monomial(
        &self,
        coeff: F::Element,
        exponents: &[E],
    ) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let t = self.term(exponents)?;

        if F::is_zero(&coeff) {
            return Ok(self.zero());
        }

        Ok(MultivariatePolynomial {
            coefficients: vec![coeff],
            exponents: t.exponents().to_vec(),
            ring: self.clone(),
        })
    }

    /// Create a polynomial from a list of terms. Terms with the same exponents are
    /// merged and zero coefficients are dropped.
    pub fn from_terms<I: IntoIterator<Item = (F::Element, Term<E>)>>(
        &self,
        terms: I,
    ) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let mut res = self.zero();
        for (c, t) in terms {
            if t.nvars() != self.nvars() {
                return Err(AlgebraError::Arity {
                    expected: self.nvars(),
                    found: t.nvars(),
                });
            }
            res.append_monomial(c, t.exponents());
        }
        Ok(res)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PolynomialRing<F, E, O> {
    /// Create a polynomial from a map of distinct exponents to coefficients.
    pub(crate) fn from_exponent_map(
        &self,
        terms: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, F::Element>,
    ) -> MultivariatePolynomial<F, E, O> {
        let mut terms: Vec<_> = terms.into_iter().filter(|(_, c)| !F::is_zero(c)).collect();
        terms.sort_unstable_by(|(e1, _), (e2, _)| O::cmp(&e1[..], &e2[..]));

        let mut res = MultivariatePolynomial {
            coefficients: Vec::with_capacity(terms.len()),
            exponents: Vec::with_capacity(terms.len() * self.nvars()),
            ring: self.clone(),
        };
        for (e, c) in terms {
            res.coefficients.push(c);
            res.exponents.extend_from_slice(&e);
        }
        res
    }
}

/// Exponents that are compared in the monomial order `O`, for use in a heap.
struct OrderedExponents<E: Exponent, O: MonomialOrder>(
    SmallVec<[E; INLINED_EXPONENTS]>,
    PhantomData<O>,
);

impl<E: Exponent, O: MonomialOrder> OrderedExponents<E, O> {
    #[inline]
    fn new(exponents: SmallVec<[E; INLINED_EXPONENTS]>) -> Self {
        OrderedExponents(exponents, PhantomData)
    }
}

impl<E: Exponent, O: MonomialOrder> PartialEq for OrderedExponents<E, O> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<E: Exponent, O: MonomialOrder> Eq for OrderedExponents<E, O> {}

impl<E: Exponent, O: MonomialOrder> PartialOrd for OrderedExponents<E, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Exponent, O: MonomialOrder> Ord for OrderedExponents<E, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::cmp(&self.0[..], &other.0[..])
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Ring for PolynomialRing<F, E, O> {
    type Element = MultivariatePolynomial<F, E, O>;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = mem::replace(a, b.zero()) + b.clone();
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = mem::replace(a, b.zero()) - b.clone();
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = mem::replace(a, b.zero()) * b;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        PolynomialRing::zero(self)
    }

    #[inline]
    fn one(&self) -> Self::Element {
        PolynomialRing::one(self)
    }

    #[inline]
    fn nth(&self, n: Integer) -> Self::Element {
        self.constant(self.field().nth(n))
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e as usize)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn named_generators(&self) -> Vec<(Variable, Self::Element)> {
        let mut gens: Vec<_> = self
            .field()
            .named_generators()
            .into_iter()
            .map(|(v, p)| (v, self.constant(p)))
            .collect();

        for (i, v) in self.variables().iter().enumerate() {
            let mut exp = vec![E::zero(); self.nvars()];
            exp[i] = E::one();
            gens.push((
                v.clone(),
                MultivariatePolynomial {
                    coefficients: vec![self.field().one()],
                    exponents: exp,
                    ring: self.clone(),
                },
            ));
        }

        gens
    }

    /// Sample a polynomial with at most four terms and exponents of at most two.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let nterms = rng.gen_range(1..5);
        let mut res = PolynomialRing::zero(self);
        let mut exp = vec![E::zero(); self.nvars()];
        for _ in 0..nterms {
            for e in &mut exp {
                *e = E::from_u32(rng.gen_range(0..3));
            }
            let c = self.field().sample(rng, range);
            res.append_monomial(c, &exp);
        }
        res
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        if in_product && element.nterms() > 1 {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

/// Multivariate polynomial with a sparse degree and variable dense representation.
#[derive(Clone)]
pub struct MultivariatePolynomial<F: Ring, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    // Data format: the i-th monomial is stored as coefficients[i] and
    // exponents[i * nvars .. (i + 1) * nvars]. Terms are sorted ascending in the
    // order `O`, so the leading term is the last one.
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<E>,
    pub ring: PolynomialRing<F, E, O>,
}

impl<F: Ring, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Constructs a zero polynomial, inheriting the ring from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        self.ring.zero()
    }

    /// Constructs a zero polynomial with the given capacity, inheriting the ring from `self`.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars()),
            ring: self.ring.clone(),
        }
    }

    /// Constructs a constant polynomial, inheriting the ring from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        self.ring.constant(coeff)
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.ring.one()
    }

    #[inline]
    pub fn field(&self) -> &F {
        self.ring.field()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.field().is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| x.is_zero())
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.ring.nvars()
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        if self.nterms() >= 2 {
            return false;
        }
        self.exponents.iter().all(|e| e.is_zero())
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> F::Element {
        if self.is_zero() || !self.exponents(0).iter().all(|e| e.is_zero()) {
            return self.field().zero();
        }

        self.coefficients[0].clone()
    }

    /// Get a copy of the exponents of the `index`th monomial.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    #[inline]
    pub fn last_exponents(&self) -> &[E] {
        assert!(self.nterms() > 0);
        &self.exponents[(self.nterms() - 1) * self.nvars()..self.nterms() * self.nvars()]
    }

    /// Returns an iterator over the exponents of every monomial.
    #[inline]
    pub fn exponents_iter(&self) -> std::slice::Chunks<'_, E> {
        self.exponents.chunks(self.nvars().max(1))
    }

    /// Returns a mutable iterator over the exponents of every monomial.
    #[inline]
    pub fn exponents_iter_mut(&mut self) -> std::slice::ChunksMut<'_, E> {
        let nvars = self.nvars();
        self.exponents.chunks_mut(nvars.max(1))
    }

    /// Check if `self` and `other` belong to the same ring.
    #[inline]
    pub fn is_same_ring(&self, other: &Self) -> bool {
        self.ring.is_same(&other.ring)
    }

    #[inline]
    fn assert_same_ring(&self, other: &Self) {
        if !self.is_same_ring(other) {
            panic!("{}", AlgebraError::RingMismatch);
        }
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match O::cmp(self.exponents(t), self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Less => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {}",
                    self
                ),
                Ordering::Greater => {}
            }
        }
    }

    /// Appends a monomial to the polynomial. It merges with a monomial
    /// that has the same exponents.
    pub fn append_monomial(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!(
                "nvars mismatched: got {}, expected {}",
                exponents.len(),
                self.nvars()
            );
        }

        // should we append to the back?
        if self.nterms() == 0 || O::cmp(self.last_exponents(), exponents).is_lt() {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        if O::cmp(self.exponents(0), exponents).is_gt() {
            self.coefficients.insert(0, coefficient);
            self.exponents.splice(0..0, exponents.iter().cloned());
            return;
        }

        // binary search for the insertion point
        let mut l = 0;
        let mut r = self.nterms();

        while l < r {
            let m = (l + r) / 2;
            match O::cmp(exponents, self.exponents(m)) {
                Ordering::Equal => {
                    let field = self.ring.field();
                    field.add_assign(&mut self.coefficients[m], &coefficient);
                    if F::is_zero(&self.coefficients[m]) {
                        self.coefficients.remove(m);
                        let i = m * self.nvars();
                        self.exponents.drain(i..i + self.nvars());
                    }
                    return;
                }
                Ordering::Greater => l = m + 1,
                Ordering::Less => r = m,
            }
        }

        self.coefficients.insert(l, coefficient);
        let i = l * self.nvars();
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Remove the leading monomial and return it.
    pub fn pop_leading(&mut self) -> Option<(F::Element, SmallVec<[E; INLINED_EXPONENTS]>)> {
        let c = self.coefficients.pop()?;
        let start = self.coefficients.len() * self.nvars();
        let e = self.exponents.drain(start..).collect();
        Some((c, e))
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: F::Element) -> Self {
        let field = self.ring.field();
        for c in &mut self.coefficients {
            field.mul_assign(c, &other);
        }

        for i in (0..self.nterms()).rev() {
            if F::is_zero(&self.coefficients[i]) {
                self.coefficients.remove(i);
                let nvars = self.nvars();
                self.exponents.drain(i * nvars..(i + 1) * nvars);
            }
        }

        self
    }

    /// Add `exponents` to every exponent. The length of `exponents` must be the
    /// number of variables.
    pub(crate) fn mul_exp(mut self, exponents: &[E]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        if self.nvars() == 0 {
            return self;
        }

        for e in self.exponents_iter_mut() {
            for (e1, e2) in e.iter_mut().zip(exponents) {
                *e1 = e1.checked_add(e2).expect("overflow in adding exponents");
            }
        }

        self
    }

    /// Multiply by the monomial `coefficient * x^exponents`.
    #[inline]
    pub(crate) fn mul_monomial(self, coefficient: &F::Element, exponents: &[E]) -> Self {
        self.mul_coeff(coefficient.clone()).mul_exp(exponents)
    }

    /// Multiply by `coefficient * term`, failing if the term has a different
    /// number of variables than the ring.
    pub fn mul_term(&self, coefficient: &F::Element, term: &Term<E>) -> Result<Self, AlgebraError> {
        if term.nvars() != self.nvars() {
            return Err(AlgebraError::Arity {
                expected: self.nvars(),
                found: term.nvars(),
            });
        }

        Ok(self.clone().mul_monomial(coefficient, term.exponents()))
    }

    /// Compute `self - coefficient * x^exponents * other` in a single merge.
    pub(crate) fn sub_mul_monomial(
        self,
        other: &Self,
        coefficient: &F::Element,
        exponents: &[E],
    ) -> Self {
        self.assert_same_ring(other);
        debug_assert_eq!(self.nvars(), exponents.len());

        let nvars = self.nvars();
        let MultivariatePolynomial {
            coefficients: lhs_coefficients,
            exponents: lhs_exponents,
            ring,
        } = self;
        let field = ring.field();

        let mut coefficients = Vec::with_capacity(lhs_coefficients.len() + other.nterms());
        let mut new_exponents = Vec::with_capacity(lhs_exponents.len() + other.exponents.len());
        let mut shifted: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); nvars];

        let mut lhs = lhs_coefficients.into_iter().enumerate().peekable();
        for t in other {
            for ((s, e1), e2) in shifted.iter_mut().zip(t.exponents).zip(exponents) {
                *s = e1.checked_add(e2).expect("overflow in adding exponents");
            }

            // copy the smaller terms of `self`
            while let Some((i, _)) = lhs.peek() {
                if O::cmp(&lhs_exponents[i * nvars..(i + 1) * nvars], &shifted[..]).is_ge() {
                    break;
                }
                if let Some((i, c)) = lhs.next() {
                    coefficients.push(c);
                    new_exponents.extend_from_slice(&lhs_exponents[i * nvars..(i + 1) * nvars]);
                }
            }

            let prod = field.mul(coefficient, t.coefficient);
            let same = matches!(lhs.peek(), Some((i, _)) if lhs_exponents[i * nvars..(i + 1) * nvars] == shifted[..]);

            let c = match lhs.next_if(|_| same) {
                Some((_, mut c)) => {
                    field.sub_assign(&mut c, &prod);
                    c
                }
                None => field.neg(&prod),
            };

            if !F::is_zero(&c) {
                coefficients.push(c);
                new_exponents.extend_from_slice(&shifted);
            }
        }

        for (i, c) in lhs {
            coefficients.push(c);
            new_exponents.extend_from_slice(&lhs_exponents[i * nvars..(i + 1) * nvars]);
        }

        MultivariatePolynomial {
            coefficients,
            exponents: new_exponents,
            ring,
        }
    }

    /// Get the leading coefficient. Panics if the polynomial is zero.
    #[inline]
    pub fn max_coeff(&self) -> &F::Element {
        match self.coefficients.last() {
            Some(c) => c,
            None => panic!("Cannot get max coefficient of empty polynomial"),
        }
    }

    /// Get the exponents of the leading monomial. Panics if the polynomial is zero.
    #[inline]
    pub fn max_exp(&self) -> &[E] {
        if self.coefficients.is_empty() {
            panic!("Cannot get max exponent of empty polynomial");
        }

        &self.exponents[(self.nterms() - 1) * self.nvars()..self.nterms() * self.nvars()]
    }

    /// The largest term in the monomial order, or `None` for the zero polynomial.
    pub fn leading_term(&self) -> Option<Term<E>> {
        if self.is_zero() {
            None
        } else {
            Some(Term::new(self.last_exponents()))
        }
    }

    /// The coefficient of the leading term, or `None` for the zero polynomial.
    #[inline]
    pub fn leading_coefficient(&self) -> Option<&F::Element> {
        self.coefficients.last()
    }

    /// Get the degree of the variable `x`.
    /// This operation is O(n).
    pub fn degree(&self, x: usize) -> E {
        if self.nvars() == 0 {
            return E::zero();
        }

        let mut max = E::zero();
        for e in self.exponents.iter().skip(x).step_by(self.nvars()) {
            if max < *e {
                max = *e;
            }
        }
        max
    }

    /// The largest total degree of any monomial. The zero polynomial has degree 0.
    pub fn total_degree(&self) -> u32 {
        self.exponents_iter()
            .map(|e| e.iter().map(|x| x.to_u32()).sum())
            .max()
            .unwrap_or(0)
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        if self.is_constant() {
            return self.constant(self.field().pow(&self.get_constant(), pow as u64));
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Add `other`, failing if it belongs to a different ring.
    pub fn try_add(&self, other: &Self) -> Result<Self, AlgebraError> {
        if !self.is_same_ring(other) {
            return Err(AlgebraError::RingMismatch);
        }
        Ok(self + other)
    }

    /// Subtract `other`, failing if it belongs to a different ring.
    pub fn try_sub(&self, other: &Self) -> Result<Self, AlgebraError> {
        if !self.is_same_ring(other) {
            return Err(AlgebraError::RingMismatch);
        }
        Ok(self - other)
    }

    /// Multiply by `other`, failing if it belongs to a different ring.
    pub fn try_mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        if !self.is_same_ring(other) {
            return Err(AlgebraError::RingMismatch);
        }
        Ok(self * other)
    }

    /// Replace the variable `n` by the constant `v`.
    pub fn replace(&self, n: usize, v: &F::Element) -> Self {
        let field = self.field();
        let mut powers = vec![field.one()];
        let mut terms: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, F::Element> =
            HashMap::with_capacity(self.nterms());
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];

        for t in self {
            e.copy_from_slice(t.exponents);
            let k = e[n].to_u32() as usize;
            e[n] = E::zero();

            while powers.len() <= k {
                let next = field.mul(&powers[powers.len() - 1], v);
                powers.push(next);
            }

            let c = field.mul(t.coefficient, &powers[k]);
            if let Some(old) = terms.get_mut(&e) {
                field.add_assign(old, &c);
            } else {
                terms.insert(e.clone(), c);
            }
        }

        self.ring.from_exponent_map(terms)
    }

    /// Create a univariate polynomial coefficient list out of a multivariate polynomial.
    /// The coefficients no longer contain `x` and the output is sorted in the degree.
    pub fn to_univariate_polynomial_list(&self, x: usize) -> Vec<(Self, E)> {
        if self.coefficients.is_empty() {
            return vec![];
        }

        let mut parts: HashMap<E, Self> = HashMap::new();
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        for t in self {
            e.copy_from_slice(t.exponents);
            let d = e[x];
            e[x] = E::zero();
            parts
                .entry(d)
                .or_insert_with(|| self.zero())
                .append_monomial(t.coefficient.clone(), &e);
        }

        let mut result: Vec<_> = parts
            .into_iter()
            .filter(|(_, p)| !p.is_zero())
            .map(|(d, p)| (p, d))
            .collect();
        result.sort_by(|a, b| a.1.cmp(&b.1));
        result
    }

    /// Split the polynomial into its coefficients with respect to the variables `vars`.
    /// The coefficients no longer contain these variables.
    pub fn to_coefficient_list(&self, vars: &[usize]) -> Vec<Self> {
        let mut parts: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, Self> = HashMap::new();
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        let mut key: SmallVec<[E; INLINED_EXPONENTS]> = SmallVec::with_capacity(vars.len());
        for t in self {
            e.copy_from_slice(t.exponents);
            key.clear();
            for v in vars {
                key.push(e[*v]);
                e[*v] = E::zero();
            }

            parts
                .entry(key.clone())
                .or_insert_with(|| self.zero())
                .append_monomial(t.coefficient.clone(), &e);
        }

        parts.into_values().filter(|p| !p.is_zero()).collect()
    }
}

impl<F: EuclideanDomain, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Get the content from the coefficients.
    pub fn content(&self) -> F::Element {
        let mut iter = self.coefficients.iter();
        let Some(first) = iter.next() else {
            return self.field().zero();
        };

        let mut c = first.clone();
        for cc in iter {
            if self.field().is_one(&c) {
                break;
            }
            c = self.field().gcd(&c, cc);
        }
        c
    }

    /// Divide every coefficient by `other`. The division must be exact.
    pub fn div_coeff(mut self, other: &F::Element) -> Self {
        let field = self.ring.field();
        for c in &mut self.coefficients {
            let (quot, rem) = field.quot_rem(c, other);
            debug_assert!(F::is_zero(&rem));
            *c = quot;
        }
        self
    }

    /// Divide by `div`, returning the quotient and the remainder. If `abort_on_remainder`
    /// is set, the division stops as soon as a remainder term is found.
    ///
    /// The terms that still have to be reduced are kept in a map, and their exponents
    /// in a heap so that every monomial is visited once, from the largest to the smallest.
    pub fn quot_rem(&self, div: &Self, abort_on_remainder: bool) -> (Self, Self) {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return (self.clone(), self.clone());
        }

        if div.is_one() {
            return (self.clone(), self.zero());
        }

        let field = self.field();
        let lm = div.max_exp();
        let lc = div.max_coeff();

        let mut pending: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, F::Element> =
            HashMap::with_capacity(self.nterms());
        let mut heap = BinaryHeap::with_capacity(self.nterms());
        for t in self {
            let e = SmallVec::from_slice(t.exponents);
            pending.insert(e.clone(), t.coefficient.clone());
            heap.push(OrderedExponents::<E, O>::new(e));
        }

        let mut quot_terms = vec![];
        let mut rem_terms = vec![];
        let mut m_cache: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];

        while let Some(OrderedExponents(m, _)) = heap.pop() {
            let Some(c) = pending.remove(&m) else {
                continue;
            };

            if F::is_zero(&c) {
                continue;
            }

            if exponents_divide(lm, &m) {
                let (q, r) = field.quot_rem(&c, lc);
                if F::is_zero(&r) {
                    let qe: SmallVec<[E; INLINED_EXPONENTS]> =
                        m.iter().zip(lm).map(|(a, b)| *a - *b).collect();

                    // all other terms of the divisor give smaller monomials
                    for t in div.into_iter().take(div.nterms() - 1) {
                        for ((mc, e1), e2) in m_cache.iter_mut().zip(&qe).zip(t.exponents) {
                            *mc = *e1 + *e2;
                        }

                        let prod = field.mul(&q, t.coefficient);
                        if let Some(v) = pending.get_mut(&m_cache) {
                            field.sub_assign(v, &prod);
                        } else {
                            pending.insert(m_cache.clone(), field.neg(&prod));
                            heap.push(OrderedExponents::new(m_cache.clone()));
                        }
                    }

                    quot_terms.push((q, qe));
                    continue;
                }
            }

            if abort_on_remainder {
                let mut r = self.zero();
                r.coefficients.push(c);
                r.exponents.extend_from_slice(&m);
                return (self.zero(), r);
            }

            rem_terms.push((c, m));
        }

        // the terms were found from large to small
        let mut quot = self.zero_with_capacity(quot_terms.len());
        for (c, e) in quot_terms.into_iter().rev() {
            quot.coefficients.push(c);
            quot.exponents.extend_from_slice(&e);
        }

        let mut rem = self.zero_with_capacity(rem_terms.len());
        for (c, e) in rem_terms.into_iter().rev() {
            rem.coefficients.push(c);
            rem.exponents.extend_from_slice(&e);
        }

        (quot, rem)
    }

    /// Divide by `div` if the division is exact.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return Some(self.clone());
        }

        let field = self.field();

        // check if the leading coefficients divide
        if !F::is_zero(&field.rem(self.max_coeff(), div.max_coeff())) {
            return None;
        }

        if (0..self.nvars()).any(|v| self.degree(v) < div.degree(v)) {
            return None;
        }

        // test division of the constant term (evaluation at x_i = 0)
        let c = div.get_constant();
        if !F::is_zero(&c) && !F::is_zero(&field.rem(&self.get_constant(), &c)) {
            return None;
        }

        // test division at x_i = 1
        let mut num = field.zero();
        for c in &self.coefficients {
            field.add_assign(&mut num, c);
        }
        let mut den = field.zero();
        for c in &div.coefficients {
            field.add_assign(&mut den, c);
        }
        if !F::is_zero(&den) && !F::is_zero(&field.rem(&num, &den)) {
            return None;
        }

        let (q, r) = self.quot_rem(div, true);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Make the polynomial monic, i.e., make the leading coefficient `1` by
    /// multiplying all monomials with `1/lcoeff`.
    pub fn make_monic(self) -> Result<Self, AlgebraError> {
        let Some(c) = self.leading_coefficient() else {
            return Ok(self);
        };

        if self.field().is_one(c) {
            return Ok(self);
        }

        let ci = self.field().inv(c)?;
        Ok(self.mul_coeff(ci))
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> std::fmt::Debug for MultivariatePolynomial<F, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for monomial in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{{ {:?}, {:?} }}",
                monomial.coefficient, monomial.exponents
            )?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PartialEq for MultivariatePolynomial<F, E, O> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.nvars() == other.nvars()
            && self.nterms() == other.nterms()
            && self.exponents.eq(&other.exponents)
            && self.coefficients.eq(&other.coefficients)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Eq for MultivariatePolynomial<F, E, O> {}

impl<F: Ring, E: Exponent, O: MonomialOrder> Hash for MultivariatePolynomial<F, E, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
        self.exponents.hash(state);
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Add for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    fn add(mut self, mut other: Self) -> Self::Output {
        self.assert_same_ring(&other);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        // Merge the two polynomials, which are assumed to be already sorted.
        let nvars = self.nvars();
        let mut new_coefficients = vec![self.field().zero(); self.nterms() + other.nterms()];
        let mut new_exponents: Vec<E> = vec![E::zero(); nvars * (self.nterms() + other.nterms())];
        let mut new_nterms = 0;
        let mut i = 0;
        let mut j = 0;

        macro_rules! insert_monomial {
            ($source:expr, $index:expr) => {
                mem::swap(
                    &mut new_coefficients[new_nterms],
                    &mut $source.coefficients[$index],
                );

                new_exponents[new_nterms * nvars..(new_nterms + 1) * nvars]
                    .clone_from_slice($source.exponents($index));
                new_nterms += 1;
            };
        }

        while i < self.nterms() && j < other.nterms() {
            let c = O::cmp(self.exponents(i), other.exponents(j));
            match c {
                Ordering::Less => {
                    insert_monomial!(self, i);
                    i += 1;
                }
                Ordering::Greater => {
                    insert_monomial!(other, j);
                    j += 1;
                }
                Ordering::Equal => {
                    let field = self.ring.field();
                    field.add_assign(&mut self.coefficients[i], &other.coefficients[j]);
                    if !F::is_zero(&self.coefficients[i]) {
                        insert_monomial!(self, i);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            insert_monomial!(self, i);
            i += 1;
        }

        while j < other.nterms() {
            insert_monomial!(other, j);
            j += 1;
        }

        new_coefficients.truncate(new_nterms);
        new_exponents.truncate(nvars * new_nterms);

        Self {
            coefficients: new_coefficients,
            exponents: new_exponents,
            ring: self.ring,
        }
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Add<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn add(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Sub for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Sub<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn sub(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone().neg()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Neg for MultivariatePolynomial<F, E, O> {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        let field = self.ring.field();
        for c in &mut self.coefficients {
            *c = field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    /// Multiply by collecting all products of terms in a map with the monomial
    /// exponent as a key, so that the result only has to be sorted once.
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.assert_same_ring(rhs);

        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        if self.nterms() == 1 {
            return rhs
                .clone()
                .mul_monomial(&self.coefficients[0], &self.exponents);
        }

        if rhs.nterms() == 1 {
            return self
                .clone()
                .mul_monomial(&rhs.coefficients[0], &rhs.exponents);
        }

        let field = self.field();
        let mut terms: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, F::Element> =
            HashMap::with_capacity(self.nterms() + rhs.nterms());
        let mut m_cache: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];

        for t1 in self {
            for t2 in rhs {
                for ((m, e1), e2) in m_cache.iter_mut().zip(t1.exponents).zip(t2.exponents) {
                    *m = e1.checked_add(e2).expect("overflow in adding exponents");
                }

                let c = field.mul(t1.coefficient, t2.coefficient);
                if let Some(v) = terms.get_mut(&m_cache) {
                    field.add_assign(v, &c);
                } else {
                    terms.insert(m_cache.clone(), c);
                }
            }
        }

        self.ring.from_exponent_map(terms)
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        (&self) * rhs
    }
}

impl<'a, 'b, F: EuclideanDomain, E: Exponent, O: MonomialOrder>
    Div<&'a MultivariatePolynomial<F, E, O>> for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn div(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.divides(other)
            .unwrap_or_else(|| panic!("No clean division of {} by {}", self, other))
    }
}

impl<'a, F: EuclideanDomain, E: Exponent, O: MonomialOrder> Div<&'a MultivariatePolynomial<F, E, O>>
    for MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn div(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        (&self).div(other)
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::domains::integer::{Integer, Z};
    use crate::domains::rational::{Rational, Q};
    use crate::domains::Ring;
    use crate::error::AlgebraError;
    use crate::poly::monomial::Term;
    use crate::poly::{GrevLexOrder, LexOrder, OrderKind};

    use super::PolynomialRing;

    #[test]
    fn merge_and_cancel() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();

        let a = &x + &y;
        let b = &x - &y;
        let s = &a + &b;
        s.check_consistency();
        assert_eq!(s, x.clone().mul_coeff(Rational::from(2)));

        let d = &a - &a;
        assert!(d.is_zero());
    }

    #[test]
    fn product_and_power() {
        let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Z, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();

        let a = &x + &y;
        let sq = a.pow(2);
        sq.check_consistency();
        let two_xy = (&x * &y).mul_coeff(Integer::from(2));
        assert_eq!(sq, &(&(&x * &x) + &two_xy) + &(&y * &y));
        assert_eq!(a.pow(3).nterms(), 4);
        assert_eq!(a.pow(3).total_degree(), 3);
        assert!(a.pow(0).is_one());
    }

    #[test]
    fn leading_term_in_order() {
        let lex = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let p = lex
            .from_terms(vec![
                (Rational::from(1), Term::new(&[0, 3])),
                (Rational::from(2), Term::new(&[1, 0])),
            ])
            .unwrap();
        assert_eq!(p.leading_term(), Some(Term::new(&[1, 0])));
        assert_eq!(p.leading_coefficient(), Some(&Rational::from(2)));
        assert_eq!(lex.order(), OrderKind::Lex);

        let grevlex = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y"]);
        let q = grevlex
            .from_terms(vec![
                (Rational::from(1), Term::new(&[0, 3])),
                (Rational::from(2), Term::new(&[1, 0])),
            ])
            .unwrap();
        assert_eq!(q.leading_term(), Some(Term::new(&[0, 3])));
        assert_eq!(grevlex.zero().leading_term(), None);
    }

    #[test]
    fn from_terms_merges_and_drops_zero() {
        let ring = PolynomialRing::<_, u8, LexOrder>::new(Q, &["x", "y"]);
        let p = ring
            .from_terms(vec![
                (Rational::from(3), Term::new(&[1, 1])),
                (Rational::from(0), Term::new(&[2, 0])),
                (Rational::from(-3), Term::new(&[1, 1])),
                (Rational::from(5), Term::new(&[0, 0])),
            ])
            .unwrap();
        assert_eq!(p, ring.constant(Rational::from(5)));
    }

    #[test]
    fn arity_is_checked() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y", "z"]);
        assert_eq!(
            ring.monomial(Rational::from(1), &[1, 2]),
            Err(AlgebraError::Arity {
                expected: 3,
                found: 2
            })
        );
        assert!(ring.variable(3).is_err());
        assert!(ring.variable_by_name("w").is_err());
    }

    #[test]
    fn multiply_by_term_checks_arity() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let one = Rational::from(1);

        assert_eq!(
            x.mul_term(&one, &Term::new(&[1])),
            Err(AlgebraError::Arity {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            x.mul_term(&one, &Term::new(&[0, 1, 7])),
            Err(AlgebraError::Arity {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            x.mul_term(&Rational::from(3), &Term::new(&[0, 1])).unwrap(),
            ring.parse("3x y").unwrap()
        );
    }

    #[test]
    fn coefficient_lists() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y", "z"]);
        let p = ring.parse("x^2*y + 3x*y*z + z + 2").unwrap();

        let c = p.to_coefficient_list(&[0, 2]);
        assert_eq!(c.len(), 4);
        assert!(c.iter().all(|q| q.degree(0) == 0 && q.degree(2) == 0));
        assert!(c.contains(&ring.parse("3y").unwrap()));
        assert!(c.contains(&ring.parse("2").unwrap()));

        assert_eq!(
            p.replace(1, &Rational::from(2)),
            ring.parse("2x^2 + 6x*z + z + 2").unwrap()
        );
    }

    #[test]
    fn rings_are_distinct() {
        let r1 = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x"]);
        let r2 = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x"]);
        assert_ne!(r1, r2);
        assert_eq!(r1, r1.clone());

        let x1 = r1.variable(0).unwrap();
        let x2 = r2.variable(0).unwrap();
        assert_eq!(x1.try_add(&x2), Err(AlgebraError::RingMismatch));
        assert_eq!(x1.try_mul(&x1).unwrap().degree(0), 2);
    }

    #[test]
    fn exact_division() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Z, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();

        let a = &x + &y;
        let b = &x - &y;
        let p = &a * &b;
        assert_eq!(p.divides(&a), Some(b.clone()));
        assert_eq!(p.divides(&(&x + &ring.one())), None);

        let (q, r) = (&(&x * &x) + &y).quot_rem(&x, false);
        assert_eq!(q, x);
        assert_eq!(r, y);
    }

    #[test]
    fn univariate_coefficients() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Z, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();

        // x^2*y + x^2 + y
        let p = &(&(&x * &x) * &(&y + &ring.one())) + &y;
        let parts = p.to_univariate_polynomial_list(0);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], (y.clone(), 0));
        assert_eq!(parts[1], (&y + &ring.one(), 2));
    }

    #[test]
    fn sampling_is_reproducible() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let a = ring.sample(&mut StdRng::seed_from_u64(7), (-5, 5));
        let b = ring.sample(&mut StdRng::seed_from_u64(7), (-5, 5));
        a.check_consistency();
        assert_eq!(a, b);
    }
}
