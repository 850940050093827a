use polyideal::{
    domains::{rational::Q, rational_polynomial::RationalPolynomialField, Ring},
    error::AlgebraError,
    ideal::Ideal,
    poly::{
        groebner::{GroebnerBasis, GroebnerOptions, PairStrategy},
        polynomial::PolynomialRing,
        GrevLexOrder, LexOrder,
    },
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn known_reduced_bases() {
    let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x", "y"]);

    let circle = Ideal::new(
        &ring,
        vec![ring.parse("x^2 + y^2 - 1").unwrap(), ring.parse("x - y").unwrap()],
    )
    .unwrap();
    let gb = circle.reduced_groebner_basis().unwrap();
    assert_eq!(format!("{}", gb), "[x-y, y^2-1/2]");

    let hyperbola = Ideal::new(
        &ring,
        vec![ring.parse("x*y - 1").unwrap(), ring.parse("y^2 - 1").unwrap()],
    )
    .unwrap();
    let gb = hyperbola.reduced_groebner_basis().unwrap();
    assert_eq!(format!("{}", gb), "[x-y, y^2-1]");
}

#[test]
fn parameters_in_leading_coefficients() {
    let field = RationalPolynomialField::<u16>::new(&["a"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &["x", "y"]);

    let ideal = Ideal::new(
        &ring,
        vec![ring.parse("a*x - 1").unwrap(), ring.parse("x*y - 1").unwrap()],
    )
    .unwrap();

    let gb = ideal.reduced_groebner_basis().unwrap();
    assert_eq!(
        gb.generators(),
        &[ring.parse("x - 1/a").unwrap(), ring.parse("y - a").unwrap()]
    );
    assert!(gb.is_groebner_basis().unwrap());
}

#[test]
fn ring_generators() {
    let field = RationalPolynomialField::<u16>::new(&["a", "c", "b"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &["y2", "y1", "z1", "z2", "x"]);
    assert_eq!(format!("{}", ring), "Q(a, c, b)[y2, y1, z1, z2, x] (lex)");

    let gens = ring.generators();
    let names: Vec<_> = gens.iter().map(|g| format!("{}", g)).collect();
    assert_eq!(names, ["1", "a", "c", "b", "y2", "y1", "z1", "z2", "x"]);

    let p = &(&gens[8] + &(&gens[1] * &gens[5].pow(2))) - &gens[0];
    assert_eq!(p, ring.parse("x + a*y1^2 - 1").unwrap());
}

#[test]
fn mismatched_rings_are_rejected() {
    let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x"]);
    let copy = PolynomialRing::<_, u16, LexOrder>::new(Q, &["x"]);

    let x = ring.parse("x").unwrap();
    let x_copy = copy.parse("x").unwrap();

    assert_eq!(
        Ideal::new(&ring, vec![x.clone(), x_copy.clone()]).err(),
        Some(AlgebraError::RingMismatch)
    );
    assert_eq!(x.try_add(&x_copy).err(), Some(AlgebraError::RingMismatch));
    assert!(x.try_mul(&x).is_ok());
}

#[test]
fn zero_generators_do_not_change_the_basis() {
    let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y", "z"]);
    let f = ring.parse("x*y - z").unwrap();
    let g = ring.parse("y*z - x").unwrap();

    let with_zero = Ideal::new(&ring, vec![ring.zero(), f.clone(), ring.zero(), g.clone()])
        .unwrap()
        .groebner_basis()
        .unwrap();
    let without = Ideal::new(&ring, vec![f, g]).unwrap().groebner_basis().unwrap();
    assert_eq!(with_zero.generators(), without.generators());
}

#[test]
fn reduced_basis_is_idempotent() {
    let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y", "z"]);
    let ideal = Ideal::new(
        &ring,
        vec![
            ring.parse("x^2 + y*z - 2").unwrap(),
            ring.parse("y^2 + x*z - 3").unwrap(),
            ring.parse("x*y - z").unwrap(),
        ],
    )
    .unwrap();

    let gb = ideal.reduced_groebner_basis().unwrap();
    assert!(gb.is_groebner_basis().unwrap());
    assert_eq!(gb.reduced_groebner_basis().unwrap().generators(), gb.generators());

    let unreduced = ideal.groebner_basis().unwrap();
    assert!(unreduced.is_groebner_basis().unwrap());
    assert_eq!(
        unreduced.reduced_groebner_basis().unwrap().generators(),
        gb.generators()
    );

    for strategy in [PairStrategy::MinimalDegree, PairStrategy::Fifo] {
        let other = ideal
            .groebner_basis_with(
                GroebnerOptions::default()
                    .with_strategy(strategy)
                    .with_reduce_basis(true),
                &mut polyideal::poly::groebner::NoObserver,
            )
            .unwrap();
        assert_eq!(other.generators(), gb.generators());
    }
}

#[test]
fn random_combinations_are_members() {
    let ring = PolynomialRing::<_, u16, GrevLexOrder>::new(Q, &["x", "y", "z"]);
    let generators = vec![ring.parse("x*y - z").unwrap(), ring.parse("y*z - x").unwrap()];
    let ideal = Ideal::new(&ring, generators.clone()).unwrap();
    let gb = ideal.groebner_basis().unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let mut p = ring.zero();
        for g in &generators {
            let h = ring.sample(&mut rng, (-5, 5));
            p = &p + &(&h * g);
        }

        assert!(ideal.contains(&p).unwrap());
        assert!(GroebnerBasis::reduce(&p, gb.generators()).unwrap().is_zero());

        // every polynomial of the ideal vanishes at the origin
        let shifted = &p + &ring.one();
        assert!(!ideal.contains(&shifted).unwrap());
    }
}
