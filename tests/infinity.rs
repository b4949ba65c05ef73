#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};

// all checks in a single test since the infinity value is global
#[test]
fn test_custom_infinity() {
    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap();
    let H = Matrix::identity(2);
    let lb = [-2e6, -1.];
    let ub = [2e6, 1.];

    let mut qp = BoundedQP::new(2, settings.clone()).unwrap();
    qp.init(Some(&H), &[-5., 0.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(qp.bounds().get_type(0), SubjectToType::Bounded);

    set_infinity(1e6);
    assert_eq!(get_infinity(), 1e6);

    // the value is picked up on reset
    qp.reset();
    qp.init(Some(&H), &[-5., 0.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(qp.bounds().get_type(0), SubjectToType::Unbounded);
    assert_eq!(qp.bounds().get_type(1), SubjectToType::Bounded);
    assert!(qp.primal_solution().unwrap().dist(&[5., 0.]) <= 1e-8);

    default_infinity();
    assert_eq!(get_infinity(), 1e20);
}
