use std::time::Instant;

use polyideal::{
    domains::rational_polynomial::RationalPolynomialField,
    ideal::Ideal,
    poly::{
        groebner::{GroebnerObserver, GroebnerOptions},
        polynomial::PolynomialRing,
        LexOrder,
    },
};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

/// Reports the running time and the number of pairs of a computation.
struct Timer {
    start: Instant,
    pairs: usize,
}

impl GroebnerObserver for Timer {
    fn on_start(&mut self, generators: usize) {
        println!("Computing a Gröbner basis of {} generators", generators);
        self.start = Instant::now();
    }

    fn on_pair(&mut self, _first: usize, _second: usize, _remaining: usize) {
        self.pairs += 1;
    }

    fn on_finish(&mut self, basis_len: usize) {
        println!(
            "Basis of {} elements after {} pairs in {:?}",
            basis_len,
            self.pairs,
            self.start.elapsed()
        );
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("POLYIDEAL_LOG"))
        .init();

    // Hawes & Gibson, Hawes2
    let field = RationalPolynomialField::<u16>::new(&["a", "c", "b"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &["y2", "y1", "z1", "z2", "x"]);
    println!("Ring: {}", ring);

    let generators: Vec<_> = [
        "x + 2*y1*z1 + 3*a*y1^2 + 5*y1^4 + 2*c*y1",
        "x + 2*y2*z2 + 3*a*y2^2 + 5*y2^4 + 2*c*y2",
        "2*z2 + 6*a*y2 + 20*y2^3 + 2*c",
        "3*z1^2 + y1^2 + b",
        "3*z2^2 + y2^2 + b",
    ]
    .iter()
    .map(|p| ring.parse(p).unwrap())
    .collect();

    let ideal = Ideal::new(&ring, generators).expect("generators of the same ring");
    println!("Ideal: {}", ideal);

    let mut timer = Timer {
        start: Instant::now(),
        pairs: 0,
    };

    let gb = match ideal.groebner_basis_with(
        GroebnerOptions::default().with_print_stats(true),
        &mut timer,
    ) {
        Ok(gb) => gb,
        Err(e) => {
            eprintln!("Gröbner basis computation failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Gröbner basis:");
    for g in gb.generators() {
        println!("\t{}", g);
    }

    match gb.is_groebner_basis() {
        Ok(is_gb) => println!("isGB: {}", is_gb),
        Err(e) => eprintln!("Verification failed: {}", e),
    }
}
