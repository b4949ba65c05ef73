#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};

fn solved_qp() -> ConstrainedQP<f64> {
    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap();
    let H = Matrix::identity(2);
    let A = Matrix::identity(2);
    let mut qp = ConstrainedQP::new(2, 2, settings).unwrap();
    let result = qp
        .init(
            Some(&H),
            &[-0.5, -0.5],
            &A,
            None,
            None,
            None,
            Some(&[1., 1.]),
            SolveBudget::default(),
        )
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert_eq!(qp.n_active(), 0);
    qp
}

#[test]
fn test_disable_inactive_then_enable() {
    let mut qp = solved_qp();

    qp.disable_constraint(0).unwrap();
    assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Disabled);
    assert_eq!(qp.constraints().n_disabled(), 1);

    // the disabled row is ignored even though x0 passes its bound
    let result = qp
        .hotstart(&[-2., -2.], None, None, None, Some(&[1., 1.]), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[2., 1.]) <= 1e-9);
    assert_eq!(qp.constraint_status(1).unwrap(), SubjectToStatus::Upper);

    qp.enable_constraint(0).unwrap();
    assert!(qp.is_constraint_enabled(0).unwrap());
    assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Inactive);

    let result = qp
        .hotstart(&[-2., -2.], None, None, None, Some(&[1., 1.]), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[1., 1.]) <= 1e-9);
    assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);
    assert!(qp.kkt_violation().unwrap().max() <= 1e-9);
}

#[test]
fn test_disable_twice_warns() {
    let mut qp = solved_qp();
    qp.disable_constraint(1).unwrap();
    qp.disable_constraint(1).unwrap();
    assert_eq!(qp.constraint_status(1).unwrap(), SubjectToStatus::Disabled);

    qp.enable_constraint(0).unwrap();
    assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Inactive);
}

#[test]
fn test_index_checks() {
    let mut qp = solved_qp();
    assert_eq!(
        qp.disable_constraint(2).err(),
        Some(QPError::IndexOutOfBounds { index: 2, size: 2 })
    );
    assert!(qp.enable_constraint(7).is_err());
    assert!(qp.is_constraint_enabled(2).is_err());
    assert!(qp.constraint_status(2).is_err());
    assert!(qp.bound_status(2).is_err());
}
