#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};

fn quiet_settings() -> QPSettings<f64> {
    QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap()
}

#[test]
fn test_eq_constrained_feasible() {
    let H = Matrix::identity(2);
    let g = [0., 0.];
    let A = Matrix::from(&[[1., 1.]]);
    let b = [1.];

    let mut qp = ConstrainedQP::new(2, 1, quiet_settings()).unwrap();
    let result = qp
        .init(Some(&H), &g, &A, None, None, Some(&b), Some(&b), SolveBudget::default())
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[0.5, 0.5]) <= 1e-8);

    let y = qp.dual_solution().unwrap();
    assert!(f64::abs(y[2] - 0.5) <= 1e-8);

    let obj = qp.objective_value().unwrap();
    assert!(f64::abs(obj - 0.25) <= 1e-8);

    assert_eq!(qp.constraints().get_type(0), SubjectToType::Equality);
    assert_eq!(qp.n_active(), 1);
    assert_eq!(qp.n_nullspace(), 1);
}

#[test]
fn test_eq_constrained_two_rows() {
    let H = Matrix::identity(3);
    let g = [0., 0., 0.];
    let A = Matrix::from(&[
        [1., 1., 0.], //
        [0., 1., 1.], //
    ]);
    let b = [1., 1.];

    let mut qp = ConstrainedQP::new(3, 2, quiet_settings()).unwrap();
    let result = qp
        .init(Some(&H), &g, &A, None, None, Some(&b), Some(&b), SolveBudget::default())
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[1. / 3., 2. / 3., 1. / 3.]) <= 1e-8);

    let y = qp.dual_solution().unwrap();
    assert!(y[3..].dist(&[1. / 3., 1. / 3.]) <= 1e-8);

    let obj = qp.objective_value().unwrap();
    assert!(f64::abs(obj - 1. / 3.) <= 1e-8);
    assert_eq!(qp.n_nullspace(), 1);
}

#[test]
fn test_eq_constrained_identity_hint() {
    // no Hessian matrix needed once its type is declared
    let g = [0., 0.];
    let A = Matrix::from(&[[1., 1.]]);
    let b = [1.];

    let mut qp = ConstrainedQP::new(2, 1, quiet_settings()).unwrap();
    qp.set_hessian_type(HessianType::Identity);
    let result = qp
        .init(None, &g, &A, None, None, Some(&b), Some(&b), SolveBudget::default())
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);
    assert_eq!(qp.hessian_type(), HessianType::Identity);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[0.5, 0.5]) <= 1e-8);
}

#[test]
fn test_eq_constrained_missing_hessian() {
    let g = [0., 0.];
    let A = Matrix::from(&[[1., 1.]]);
    let b = [1.];

    let mut qp = ConstrainedQP::new(2, 1, quiet_settings()).unwrap();
    let result = qp.init(None, &g, &A, None, None, Some(&b), Some(&b), SolveBudget::default());
    assert!(matches!(result, Err(QPError::InvalidArgument(_))));
    assert_eq!(qp.status(), QPStatus::NotInitialised);
}
