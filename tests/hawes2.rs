use polyideal::{
    domains::{rational::Q, rational_polynomial::RationalPolynomialField},
    ideal::Ideal,
    poly::{
        groebner::{GroebnerObserver, GroebnerOptions},
        polynomial::PolynomialRing,
        LexOrder,
    },
};

const HAWES2: [&str; 5] = [
    "x + 2*y1*z1 + 3*a*y1^2 + 5*y1^4 + 2*c*y1",
    "x + 2*y2*z2 + 3*a*y2^2 + 5*y2^4 + 2*c*y2",
    "2*z2 + 6*a*y2 + 20*y2^3 + 2*c",
    "3*z1^2 + y1^2 + b",
    "3*z2^2 + y2^2 + b",
];

const VARIABLES: [&str; 5] = ["y2", "y1", "z1", "z2", "x"];

#[derive(Default)]
struct Counter {
    started: usize,
    finished: usize,
    new_elements: usize,
}

impl GroebnerObserver for Counter {
    fn on_start(&mut self, _generators: usize) {
        self.started += 1;
    }

    fn on_new_element(&mut self, _index: usize, _degree: u32) {
        self.new_elements += 1;
    }

    fn on_finish(&mut self, _basis_len: usize) {
        self.finished += 1;
    }
}

#[test]
fn triangular_part() {
    let field = RationalPolynomialField::<u16>::new(&["a", "c", "b"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &VARIABLES);

    let ideal = Ideal::new(
        &ring,
        HAWES2[2..].iter().map(|p| ring.parse(p).unwrap()).collect(),
    )
    .unwrap();

    let mut counter = Counter::default();
    let gb = ideal
        .groebner_basis_with(GroebnerOptions::default(), &mut counter)
        .unwrap();

    assert_eq!((counter.started, counter.finished), (1, 1));
    assert!(counter.new_elements >= 3);
    assert!(gb.is_groebner_basis().unwrap());
    assert!(!gb.is_whole_ring().unwrap());

    for g in ideal.generators() {
        assert!(gb.contains(g).unwrap());
    }

    // the equation in y1 and z1 does not interact with the others
    let p4 = ring.parse("y1^2 + 3*z1^2 + b").unwrap();
    let reduced = ideal.reduced_groebner_basis().unwrap();
    assert!(reduced.generators().contains(&p4));
}

#[test]
fn hawes2_one_parameter() {
    let field = RationalPolynomialField::<u16>::new(&["a"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &VARIABLES);
    let generators: Vec<_> = HAWES2
        .iter()
        .map(|p| {
            let p = p.replace('c', "(2)").replace('b', "(3)");
            ring.parse(&p).unwrap()
        })
        .collect();

    let ideal = Ideal::new(&ring, generators).unwrap();
    assert!(!ideal.is_groebner_basis().unwrap());

    let mut counter = Counter::default();
    let gb = ideal
        .groebner_basis_with(GroebnerOptions::default(), &mut counter)
        .unwrap();

    assert_eq!((counter.started, counter.finished), (1, 1));
    assert!(counter.new_elements > 0);
    assert!(gb.is_groebner_basis().unwrap());
    assert!(gb.generators().iter().all(|g| !g.is_constant()));
}

#[test]
fn hawes2_specialised() {
    let ring = PolynomialRing::<_, u16, LexOrder>::new(Q, &VARIABLES);
    let generators = HAWES2
        .iter()
        .map(|p| {
            let p = p.replace('a', "(1)").replace('c', "(2)").replace('b', "(3)");
            ring.parse(&p).unwrap()
        })
        .collect();

    let ideal = Ideal::new(&ring, generators).unwrap();
    let gb = ideal.reduced_groebner_basis().unwrap();
    assert!(gb.is_groebner_basis().unwrap());
    assert!(!gb.is_whole_ring().unwrap());
}

#[test]
#[ignore]
fn hawes2() {
    let field = RationalPolynomialField::<u16>::new(&["a", "c", "b"]);
    let ring = PolynomialRing::<_, u16, LexOrder>::new(field, &VARIABLES);

    let ideal = Ideal::new(&ring, HAWES2.iter().map(|p| ring.parse(p).unwrap()).collect())
        .unwrap();
    assert!(!ideal.is_groebner_basis().unwrap());

    let gb = ideal.groebner_basis().unwrap();
    assert!(!gb.is_empty());
    assert!(gb.is_groebner_basis().unwrap());
}
