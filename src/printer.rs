//! Text rendering of polynomials, rings and ideals.
//!
//! Polynomials are printed with their terms in descending monomial order and
//! without spaces, for example `x+2*y1*z1-3`. A coefficient of `1` or `-1` is
//! omitted in front of a monomial and the zero polynomial prints as `0`.

use std::fmt::{self, Display, Write};

use crate::{
    domains::{Field, Ring},
    ideal::Ideal,
    poly::{
        polynomial::{MultivariatePolynomial, PolynomialRing},
        Exponent, MonomialOrder,
    },
};

/// Prints a [MultivariatePolynomial] using the variable names of its ring.
pub struct PolynomialPrinter<'a, F: Ring, E: Exponent, O: MonomialOrder> {
    pub poly: &'a MultivariatePolynomial<F, E, O>,
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> PolynomialPrinter<'a, F, E, O> {
    pub fn new(poly: &'a MultivariatePolynomial<F, E, O>) -> PolynomialPrinter<'a, F, E, O> {
        PolynomialPrinter { poly }
    }

    fn write_monomial(&self, f: &mut fmt::Formatter, exponents: &[E]) -> fmt::Result {
        let mut first = true;
        for (v, e) in self.poly.ring.variables().iter().zip(exponents) {
            if e.is_zero() {
                continue;
            }

            if !first {
                f.write_char('*')?;
            }
            first = false;

            write!(f, "{}", v)?;
            if e.to_u32() > 1 {
                write!(f, "^{}", e)?;
            }
        }
        Ok(())
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Display for PolynomialPrinter<'a, F, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let field = self.poly.field();
        let mut first = true;
        for i in (0..self.poly.nterms()).rev() {
            let exponents = self.poly.exponents(i);
            let is_constant = exponents.iter().all(|e| e.is_zero());

            let coeff = format!(
                "{}",
                field
                    .printer(&self.poly.coefficients[i])
                    .in_product(!is_constant)
            );

            let (negative, body) = match coeff.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, coeff.as_str()),
            };

            if negative {
                f.write_char('-')?;
            } else if !first {
                f.write_char('+')?;
            }
            first = false;

            if is_constant {
                f.write_str(body)?;
                continue;
            }

            if body != "1" {
                f.write_str(body)?;
                f.write_char('*')?;
            }

            self.write_monomial(f, exponents)?;
        }

        Ok(())
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Display for MultivariatePolynomial<F, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        PolynomialPrinter::new(self).fmt(f)
    }
}

/// Prints a ring as `field[x1, x2] (order)`, for example `Q(a, c, b)[y2, y1, x] (lex)`.
impl<F: Ring, E: Exponent, O: MonomialOrder> Display for PolynomialRing<F, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[", self.field())?;
        for (i, v) in self.variables().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "] ({})", self.order())
    }
}

/// Prints the generators of an ideal as a bracketed list.
impl<F: Field, E: Exponent, O: MonomialOrder> Display for Ideal<F, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char('[')?;
        for (i, p) in self.generators().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_char(']')
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use crate::domains::rational::Q;
    use crate::domains::rational_polynomial::RationalPolynomialField;
    use crate::poly::monomial::Term;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::{GrevLexOrder, LexOrder};

    #[test]
    fn descending_terms() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let p = ring
            .from_terms(vec![
                (Rational::from((1, 2)), Term::new(&[0, 0])),
                (Rational::from(-2), Term::new(&[1, 0])),
                (Rational::from(3), Term::new(&[2, 1])),
            ])
            .unwrap();
        assert_eq!(format!("{}", p), "3*x^2*y-2*x+1/2");
        assert_eq!(format!("{}", -p), "-3*x^2*y+2*x-1/2");
        assert_eq!(format!("{}", ring.zero()), "0");
    }

    #[test]
    fn unit_coefficients_are_omitted() {
        let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();
        let p = &(&y * &y) - &(&x + &ring.one());
        assert_eq!(format!("{}", p), "y^2-x-1");
        assert_eq!(format!("{}", ring), "Q[x, y] (grevlex)");
    }

    #[test]
    fn rational_function_coefficients() {
        let field = RationalPolynomialField::<u16>::new(&["a", "b"]);
        let ring = PolynomialRing::<_, u16, LexOrder>::new(field.clone(), &["x"]);
        let a = field.parameter("a").unwrap();
        let b = field.parameter("b").unwrap();

        let p = ring
            .from_terms(vec![
                (&a + &b, Term::new(&[1])),
                (&(-a.clone()) * &b.inv().unwrap(), Term::new(&[0])),
            ])
            .unwrap();
        assert_eq!(format!("{}", p), "(a+b)*x-(a)/(b)");
        assert_eq!(format!("{}", ring), "Q(a, b)[x] (lex)");
    }
}
