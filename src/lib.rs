//! Polyideal computes Gröbner bases of ideals in multivariate polynomial rings.
//!
//! Coefficients live in a [Field](domains::Field): the rationals [Q](domains::rational::Q)
//! or a [RationalPolynomialField](domains::rational_polynomial::RationalPolynomialField)
//! of fractions in named parameters. A [PolynomialRing](poly::polynomial::PolynomialRing)
//! fixes the variables and the [MonomialOrder](poly::MonomialOrder), and an
//! [Ideal](ideal::Ideal) of that ring can be turned into a Gröbner basis with
//! Buchberger's algorithm.
//!
//! ```
//! use polyideal::{
//!     domains::rational::Q,
//!     ideal::Ideal,
//!     poly::{polynomial::PolynomialRing, LexOrder},
//! };
//!
//! let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);
//! let f = ring.parse("x^2 + y^2 - 1").unwrap();
//! let g = ring.parse("x - y").unwrap();
//!
//! let ideal = Ideal::new(&ring, vec![f, g]).unwrap();
//! let gb = ideal.groebner_basis().unwrap();
//! assert!(gb.is_groebner_basis().unwrap());
//! ```

pub mod domains;
pub mod error;
pub mod ideal;
pub mod parser;
pub mod poly;
pub mod printer;
