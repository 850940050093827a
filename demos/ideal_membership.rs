use polyideal::{
    domains::rational::Q,
    ideal::Ideal,
    poly::{polynomial::PolynomialRing, GrevLexOrder},
};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("POLYIDEAL_LOG"))
        .init();

    // the twisted cubic
    let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y", "z"]);
    let ideal = Ideal::new(
        &ring,
        vec![
            ring.parse("y - x^2").unwrap(),
            ring.parse("z - x^3").unwrap(),
        ],
    )
    .unwrap();

    println!("Ring: {}", ring);
    println!("Ideal: {}", ideal);

    let gb = ideal.reduced_groebner_basis().unwrap();
    println!("Reduced Gröbner basis: {}", gb);

    for p in ["y^2 - x*z", "x*y - z", "y^3 - z^2", "x + y + z"] {
        let poly = ring.parse(p).unwrap();
        println!(
            "{} in ideal: {} (normal form {})",
            poly,
            ideal.contains(&poly).unwrap(),
            ideal.normal_form(&poly).unwrap()
        );
    }
}
