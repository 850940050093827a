//! Parsing of polynomials from text.
//!
//! The grammar accepts integers, variables of the ring, named parameters of the
//! coefficient field, the binary operators `+ - * / ^`, unary minus and
//! parentheses. A product may be written without `*`, as in `2x y^2`. The
//! exponent of `^` must be a non-negative integer and a divisor must be constant in
//! the ring variables, so that `x/2` and `x/(a+b)` are valid but `1/x` is not.

use std::fmt;

use rug::Integer;
use smartstring::{LazyCompact, SmartString};

use crate::{
    domains::Field,
    error::AlgebraError,
    poly::{
        polynomial::{MultivariatePolynomial, PolynomialRing},
        Exponent, MonomialOrder,
    },
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(Integer),
    Identifier(SmartString<LazyCompact>),
    Op(Operator),
    OpenParenthesis,
    CloseParenthesis,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(v) => f.write_str(v),
            Token::Op(o) => write!(f, "{}", o),
            Token::OpenParenthesis => f.write_str("("),
            Token::CloseParenthesis => f.write_str(")"),
        }
    }
}

/// The byte offset of a token in the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.0)
    }
}

/// Split the input into tokens.
pub fn tokenize(input: &str) -> Result<Vec<(Token, Position)>, AlgebraError> {
    let bytes = input.as_bytes();
    let mut tokens = vec![];

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Op(Operator::Add),
            b'-' => Token::Op(Operator::Sub),
            b'*' => Token::Op(Operator::Mul),
            b'/' => Token::Op(Operator::Div),
            b'^' => Token::Op(Operator::Pow),
            b'(' => Token::OpenParenthesis,
            b')' => Token::CloseParenthesis,
            b'0'..=b'9' => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }

                let n = Integer::from_str_radix(&input[start..i], 10).map_err(|e| {
                    AlgebraError::Parse(format!("Bad number at {}: {}", Position(start), e))
                })?;
                tokens.push((Token::Number(n), Position(start)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }

                tokens.push((Token::Identifier(input[start..i].into()), Position(start)));
                continue;
            }
            _ => {
                let c = input[start..].chars().next().unwrap_or('?');
                return Err(AlgebraError::Parse(format!(
                    "Unexpected character '{}' at {}",
                    c,
                    Position(start)
                )));
            }
        };

        tokens.push((token, Position(start)));
        i += 1;
    }

    Ok(tokens)
}

/// A recursive descent parser over a token list.
struct Parser<'a, F: Field, E: Exponent, O: MonomialOrder> {
    ring: &'a PolynomialRing<F, E, O>,
    tokens: Vec<(Token, Position)>,
    index: usize,
    end: Position,
}

impl<'a, F: Field, E: Exponent, O: MonomialOrder> Parser<'a, F, E, O> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(t, _)| t)
    }

    fn position(&self) -> Position {
        self.tokens
            .get(self.index)
            .map(|(_, p)| *p)
            .unwrap_or(self.end)
    }

    fn error(&self, msg: &str) -> AlgebraError {
        match self.peek() {
            Some(t) => AlgebraError::Parse(format!("{} at {}, found '{}'", msg, self.position(), t)),
            None => AlgebraError::Parse(format!("{} at end of input", msg)),
        }
    }

    fn parse_sum(&mut self) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let mut res = self.parse_product()?;

        while let Some(Token::Op(op @ (Operator::Add | Operator::Sub))) = self.peek() {
            let op = *op;
            self.index += 1;
            let rhs = self.parse_product()?;
            res = if op == Operator::Add {
                res + rhs
            } else {
                res - rhs
            };
        }

        Ok(res)
    }

    fn parse_product(&mut self) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let mut res = self.parse_unary()?;

        loop {
            match self.peek() {
                Some(Token::Op(Operator::Mul)) => {
                    self.index += 1;
                    let rhs = self.parse_unary()?;
                    self.check_degree(&res, &rhs)?;
                    res = &res * &rhs;
                }
                Some(Token::Op(Operator::Div)) => {
                    self.index += 1;
                    let pos = self.position();
                    let rhs = self.parse_unary()?;
                    if !rhs.is_constant() {
                        return Err(AlgebraError::Parse(format!(
                            "Division by a polynomial that is not constant at {}",
                            pos
                        )));
                    }

                    let inv = self.ring.field().inv(&rhs.get_constant())?;
                    res = res.mul_coeff(inv);
                }
                Some(Token::Number(_) | Token::Identifier(_) | Token::OpenParenthesis) => {
                    // implicit multiplication
                    let rhs = self.parse_power()?;
                    self.check_degree(&res, &rhs)?;
                    res = &res * &rhs;
                }
                _ => return Ok(res),
            }
        }
    }

    /// Check that the degrees of a product fit in the exponent type.
    fn check_degree(
        &self,
        a: &MultivariatePolynomial<F, E, O>,
        b: &MultivariatePolynomial<F, E, O>,
    ) -> Result<(), AlgebraError> {
        let max = E::max_value() as u64;
        if (0..a.nvars()).any(|v| a.degree(v).to_u32() as u64 + b.degree(v).to_u32() as u64 > max)
        {
            return Err(AlgebraError::Parse(
                "Exponent is too large in product".to_string(),
            ));
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        match self.peek() {
            Some(Token::Op(Operator::Sub)) => {
                self.index += 1;
                Ok(-self.parse_unary()?)
            }
            Some(Token::Op(Operator::Add)) => {
                self.index += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let base = self.parse_atom()?;

        if let Some(Token::Op(Operator::Pow)) = self.peek() {
            self.index += 1;

            let Some(Token::Number(n)) = self.peek() else {
                return Err(self.error("Expected a non-negative integer exponent"));
            };

            let Some(e) = n.to_u32() else {
                return Err(self.error("Exponent is too large"));
            };

            let max = E::max_value() as u64;
            if (0..base.nvars()).any(|v| base.degree(v).to_u32() as u64 * e as u64 > max) {
                return Err(self.error("Exponent is too large"));
            }

            self.index += 1;
            return Ok(base.pow(e as usize));
        }

        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                let c = self.ring.field().nth(n.clone());
                self.index += 1;
                Ok(self.ring.constant(c))
            }
            Some(Token::Identifier(name)) => {
                let p = self.identifier(name)?;
                self.index += 1;
                Ok(p)
            }
            Some(Token::OpenParenthesis) => {
                self.index += 1;
                let res = self.parse_sum()?;

                if self.peek() != Some(&Token::CloseParenthesis) {
                    return Err(self.error("Missing closing parenthesis"));
                }

                self.index += 1;
                Ok(res)
            }
            _ => Err(self.error("Expected a number, a variable or '('")),
        }
    }

    /// Resolve a name to a ring variable or to a parameter of the coefficient field.
    fn identifier(&self, name: &str) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        if let Some(i) = self.ring.variable_index(name) {
            return self.ring.variable(i);
        }

        match self
            .ring
            .field()
            .named_generators()
            .into_iter()
            .find(|(v, _)| v.name() == name)
        {
            Some((_, p)) => Ok(self.ring.constant(p)),
            None => Err(AlgebraError::UnknownVariable(name.to_string())),
        }
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> PolynomialRing<F, E, O> {
    /// Parse a polynomial of this ring, for example `x + 2*y1*z1 + 3*a*y1^2`.
    pub fn parse(&self, input: &str) -> Result<MultivariatePolynomial<F, E, O>, AlgebraError> {
        let mut parser = Parser {
            ring: self,
            tokens: tokenize(input)?,
            index: 0,
            end: Position(input.len()),
        };

        if parser.tokens.is_empty() {
            return Err(AlgebraError::Parse("Expression is empty".to_string()));
        }

        let res = parser.parse_sum()?;

        if parser.peek().is_some() {
            return Err(parser.error("Unexpected token"));
        }

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use crate::domains::rational::Q;
    use crate::domains::rational_polynomial::RationalPolynomialField;
    use crate::error::AlgebraError;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::LexOrder;

    use super::{tokenize, Operator, Token};

    #[test]
    fn tokens() {
        let t: Vec<_> = tokenize("3*x1^2 - (y)")
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(t.len(), 9);
        assert_eq!(t[1], Token::Op(Operator::Mul));
        assert_eq!(t[2], Token::Identifier("x1".into()));
        assert_eq!(t[8], Token::CloseParenthesis);
    }

    #[test]
    fn expanded_polynomial() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let p = ring.parse("3*x^2*y - 2*x + 1/2").unwrap();
        assert_eq!(p.nterms(), 3);
        assert_eq!(format!("{}", p), "3*x^2*y-2*x+1/2");
    }

    #[test]
    fn implicit_products_and_powers() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        let x = ring.variable(0).unwrap();
        let y = ring.variable(1).unwrap();

        assert_eq!(ring.parse("2x y").unwrap(), ring.parse("2*x*y").unwrap());
        assert_eq!(ring.parse("(x+y)^2").unwrap(), (&x + &y).pow(2));
        assert_eq!(ring.parse("-x^2").unwrap(), -(&x * &x));
        assert_eq!(ring.parse("x^0").unwrap(), ring.one());
        assert_eq!(ring.parse("(x - y)/(1+1)").unwrap(), ring.parse("x/2 - y/2").unwrap());
    }

    #[test]
    fn parse_errors() {
        let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
        assert!(matches!(ring.parse("x +"), Err(AlgebraError::Parse(_))));
        assert!(matches!(ring.parse("(x"), Err(AlgebraError::Parse(_))));
        assert!(matches!(ring.parse("x^-1"), Err(AlgebraError::Parse(_))));
        assert!(matches!(ring.parse("1/x"), Err(AlgebraError::Parse(_))));
        assert!(matches!(ring.parse("x % y"), Err(AlgebraError::Parse(_))));
        assert!(matches!(ring.parse(""), Err(AlgebraError::Parse(_))));
        assert_eq!(ring.parse("x/0"), Err(AlgebraError::DivisionByZero));
        assert!(
            matches!(ring.parse("x^70000"), Err(AlgebraError::Parse(m)) if m.starts_with("Exponent is too large"))
        );
        assert!(
            matches!(ring.parse("(x^300)^300"), Err(AlgebraError::Parse(m)) if m.starts_with("Exponent is too large"))
        );
        assert!(matches!(
            ring.parse("x^40000 * x^40000"),
            Err(AlgebraError::Parse(_))
        ));
        assert_eq!(ring.parse("x^65535").unwrap().degree(0), 65535);
        assert_eq!(ring.parse("2^70000 * y").unwrap().degree(1), 1);
        assert_eq!(
            ring.parse("x + z"),
            Err(AlgebraError::UnknownVariable("z".to_string()))
        );
    }

    #[test]
    fn parameters_are_coefficients() {
        let field = RationalPolynomialField::<u16>::new(&["a", "b"]);
        let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &["x"]);

        let p = ring.parse("(a+b)*x + a/b").unwrap();
        assert_eq!(p.nterms(), 2);
        assert_eq!(p.degree(0), 1);
        assert_eq!(format!("{}", p), "(a+b)*x+(a)/(b)");

        assert_eq!(ring.parse("x/(a-a)"), Err(AlgebraError::DivisionByZero));
    }
}
