#![allow(non_snake_case)]

use hotqp::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn basic_qp_data() -> (Matrix<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let g = vec![-1., 1.];
    let lb = vec![0., 0.];
    let ub = vec![0.7, 0.7];
    (H, g, lb, ub)
}

fn quiet_settings() -> QPSettings<f64> {
    QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap()
}

#[test]
fn test_bounded_qp_feasible() {
    let (H, g, lb, ub) = basic_qp_data();
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    let result = qp
        .init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);
    assert_eq!(qp.status(), QPStatus::Solved);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[0.25, 0.]) <= 1e-8);

    let y = qp.dual_solution().unwrap();
    assert!(y.dist(&[0., 1.25]) <= 1e-8);

    let obj = qp.objective_value().unwrap();
    assert!(f64::abs(obj + 0.125) <= 1e-8);

    assert_eq!(qp.bound_status(0).unwrap(), SubjectToStatus::Inactive);
    assert_eq!(qp.bound_status(1).unwrap(), SubjectToStatus::Lower);
    assert_eq!(qp.n_free(), 1);
    assert_eq!(qp.n_fixed(), 1);
}

#[test]
fn test_bounded_qp_upper_bounds() {
    let (H, _, lb, ub) = basic_qp_data();
    let g = [-4., -4.];
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    let result = qp
        .init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[0.7, 0.7]) <= 1e-8);

    // multipliers of upper bounds are nonpositive
    let y = qp.dual_solution().unwrap();
    assert!(y.dist(&[-0.5, -1.9]) <= 1e-8);

    let mut ws = [0i8; 2];
    qp.working_set(&mut ws).unwrap();
    assert_eq!(ws, [-1, -1]);
}

#[test]
fn test_bounded_qp_without_bounds() {
    let (H, _, _, _) = basic_qp_data();
    let g = [1., 1.];
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    let result = qp.init(Some(&H), &g, None, None, SolveBudget::default()).unwrap();
    assert_eq!(result.status, SolverStatus::Solved);

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[-1. / 7., -3. / 7.]) <= 1e-8);
    assert_eq!(qp.n_fixed(), 0);
}

#[test]
fn test_bounded_qp_kkt_violation() {
    let (H, g, lb, ub) = basic_qp_data();
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();
    qp.init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();

    let kkt = qp.kkt_violation().unwrap();
    assert!(kkt.stationarity <= 1e-10);
    assert!(kkt.feasibility <= 1e-10);
    assert!(kkt.dual_sign <= 1e-10);
    assert!(kkt.complementarity <= 1e-10);
    assert!(kkt.max() <= 1e-10);
}

#[test]
fn test_constrained_qp_feasible() {
    let (H, _, lb, ub) = basic_qp_data();
    let g = [1., 1.];
    let A = Matrix::from(&[[1., 1.]]);
    let b = [1.];

    let mut qp = ConstrainedQP::new(2, 1, quiet_settings()).unwrap();
    assert_eq!(qp.n_variables(), 2);
    assert_eq!(qp.n_constraints(), 1);

    let result = qp
        .init(
            Some(&H),
            &g,
            &A,
            Some(&lb),
            Some(&ub),
            Some(&b),
            Some(&b),
            SolveBudget::default(),
        )
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);
    assert!(result.status.is_solved());

    let x = qp.primal_solution().unwrap();
    assert!(x.dist(&[0.3, 0.7]) <= 1e-8);

    let y = qp.dual_solution().unwrap();
    assert!(y.dist(&[0., -0.2, 2.9]) <= 1e-8);

    let obj = qp.objective_value().unwrap();
    assert!(f64::abs(obj - 1.88) <= 1e-8);

    assert!(qp.constraint_status(0).unwrap().is_active());
    assert_eq!(qp.bound_status(1).unwrap(), SubjectToStatus::Upper);

    let Ax = qp.constraint_values().unwrap();
    assert!(f64::abs(Ax[0] - 1.) <= 1e-10);

    assert!(qp.kkt_violation().unwrap().max() <= 1e-10);
}

#[test]
fn test_solution_requires_solve() {
    let mut qp = BoundedQP::<f64>::new(2, quiet_settings()).unwrap();
    qp.print_to_sink();

    assert_eq!(qp.status(), QPStatus::NotInitialised);
    assert_eq!(qp.primal_solution().err(), Some(QPError::NotSolved));
    assert_eq!(qp.dual_solution().err(), Some(QPError::NotSolved));
    assert_eq!(
        qp.hotstart(&[0., 0.], None, None, SolveBudget::default())
            .err(),
        Some(QPError::NotInitialised)
    );
}

#[test]
fn test_reset_and_reinit() {
    let (H, g, lb, ub) = basic_qp_data();
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    qp.init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    let x1 = qp.primal_solution().unwrap().to_vec();

    qp.reset();
    assert_eq!(qp.status(), QPStatus::NotInitialised);
    qp.reset();
    assert_eq!(qp.status(), QPStatus::NotInitialised);

    qp.init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    let x2 = qp.primal_solution().unwrap();
    assert!(x1.dist(x2) <= 1e-12);
}
