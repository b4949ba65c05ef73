#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};

fn quiet_settings() -> QPSettings<f64> {
    QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap()
}

struct SequenceData {
    H: Matrix<f64>,
    A: Matrix<f64>,
    lb: [f64; 2],
    ub: [f64; 2],
    lbA: [f64; 2],
    ubA: [f64; 2],
}

fn sequence_data() -> SequenceData {
    SequenceData {
        H: Matrix::from(&[
            [4., 1.], //
            [1., 2.], //
        ]),
        A: Matrix::from(&[
            [1., 1.],  //
            [1., -1.], //
        ]),
        lb: [-0.7, -0.7],
        ub: [0.7, 0.7],
        lbA: [-1., -0.5],
        ubA: [1., 0.5],
    }
}

fn gradient(k: usize) -> [f64; 2] {
    let t = k as f64;
    [3. * f64::cos(t), 3. * f64::sin(t)]
}

fn cold_solve(data: &SequenceData, g: &[f64]) -> Vec<f64> {
    let mut qp = ConstrainedQP::new(2, 2, quiet_settings()).unwrap();
    let result = qp
        .init(
            Some(&data.H),
            g,
            &data.A,
            Some(&data.lb),
            Some(&data.ub),
            Some(&data.lbA),
            Some(&data.ubA),
            SolveBudget::default(),
        )
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    qp.primal_solution().unwrap().to_vec()
}

#[test]
fn test_hotstart_matches_cold_solves() {
    let data = sequence_data();
    let mut qp = ConstrainedQP::new(2, 2, quiet_settings()).unwrap();

    let g0 = gradient(0);
    qp.init(
        Some(&data.H),
        &g0,
        &data.A,
        Some(&data.lb),
        Some(&data.ub),
        Some(&data.lbA),
        Some(&data.ubA),
        SolveBudget::default(),
    )
    .unwrap();

    for k in 1..12 {
        let g = gradient(k);
        let result = qp
            .hotstart(
                &g,
                Some(&data.lb),
                Some(&data.ub),
                Some(&data.lbA),
                Some(&data.ubA),
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);

        let x = qp.primal_solution().unwrap();
        let xref = cold_solve(&data, &g);
        assert!(x.dist(&xref) <= 1e-7);
        assert!(qp.kkt_violation().unwrap().max() <= 1e-8);
    }
    assert!(qp.info().total_iterations >= qp.info().iterations);
}

#[test]
fn test_constrained_iteration_limit_resumes() {
    let data = sequence_data();
    let mut qp = ConstrainedQP::new(2, 2, quiet_settings()).unwrap();
    qp.init(
        Some(&data.H),
        &[3., 0.],
        &data.A,
        Some(&data.lb),
        Some(&data.ub),
        Some(&data.lbA),
        Some(&data.ubA),
        SolveBudget::default(),
    )
    .unwrap();

    // the optimal working set flips from the lower to the upper side
    let g = [-3., 0.];
    let mut calls = 0;
    loop {
        calls += 1;
        assert!(calls <= 50);
        let result = qp
            .hotstart(
                &g,
                Some(&data.lb),
                Some(&data.ub),
                Some(&data.lbA),
                Some(&data.ubA),
                SolveBudget::iterations(1),
            )
            .unwrap();
        assert!(result.iterations <= 1);
        if result.status == SolverStatus::Solved {
            break;
        }
        assert_eq!(result.status, SolverStatus::MaxIterations);
        assert_eq!(result.iterations, 1);
        assert!(qp.kkt_violation().is_ok());
    }
    assert!(calls >= 2);

    let x = qp.primal_solution().unwrap();
    let xref = cold_solve(&data, &g);
    assert!(x.dist(&xref) <= 1e-7);
    assert!(qp.kkt_violation().unwrap().max() <= 1e-8);
}

#[test]
fn test_hotstart_large_jump_matches_cold_solve() {
    let data = sequence_data();
    let mut qp = ConstrainedQP::new(2, 2, quiet_settings()).unwrap();
    qp.init(
        Some(&data.H),
        &[3., 0.],
        &data.A,
        Some(&data.lb),
        Some(&data.ub),
        Some(&data.lbA),
        Some(&data.ubA),
        SolveBudget::default(),
    )
    .unwrap();

    for g in [[-3., 0.], [0., 5.], [20., -20.], [0., 0.]] {
        let result = qp
            .hotstart(
                &g,
                Some(&data.lb),
                Some(&data.ub),
                Some(&data.lbA),
                Some(&data.ubA),
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);
        assert!(qp.primal_solution().unwrap().dist(&cold_solve(&data, &g)) <= 1e-7);
    }
}

#[test]
fn test_hotstart_same_data_is_free() {
    let data = sequence_data();
    let g = gradient(3);
    let mut qp = ConstrainedQP::new(2, 2, quiet_settings()).unwrap();
    qp.init(
        Some(&data.H),
        &g,
        &data.A,
        Some(&data.lb),
        Some(&data.ub),
        Some(&data.lbA),
        Some(&data.ubA),
        SolveBudget::default(),
    )
    .unwrap();
    let x0 = qp.primal_solution().unwrap().to_vec();

    let result = qp
        .hotstart(
            &g,
            Some(&data.lb),
            Some(&data.ub),
            Some(&data.lbA),
            Some(&data.ubA),
            SolveBudget::default(),
        )
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert_eq!(result.iterations, 0);
    assert!(qp.primal_solution().unwrap().dist(&x0) <= 1e-12);
}

#[test]
fn test_bounded_hotstart_sequence() {
    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let lb = [0., 0.];
    let ub = [0.7, 0.7];
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    qp.init(Some(&H), &[-1., 1.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert!(qp.primal_solution().unwrap().dist(&[0.25, 0.]) <= 1e-8);

    qp.hotstart(&[-4., -4.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert!(qp.primal_solution().unwrap().dist(&[0.7, 0.7]) <= 1e-8);

    qp.hotstart(&[1., 1.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert!(qp.primal_solution().unwrap().dist(&[0., 0.]) <= 1e-8);

    // moving bounds as well as the gradient
    qp.hotstart(&[-1., 1.], Some(&[0.5, -1.]), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(qp.info().status, SolverStatus::Solved);
    assert!(qp.primal_solution().unwrap().dist(&[0.5, -0.75]) <= 1e-8);
}

#[test]
fn test_iteration_limit_resumes() {
    let H = Matrix::identity(5);
    let g = [-10.; 5];
    let lb = [0.; 5];
    let ub = [1.; 5];
    let mut qp = BoundedQP::new(5, quiet_settings()).unwrap();

    let result = qp
        .init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::iterations(2))
        .unwrap();
    assert_eq!(result.status, SolverStatus::MaxIterations);
    assert!(result.status.is_resumable());
    assert_eq!(result.iterations, 2);
    assert_eq!(qp.status(), QPStatus::HomotopyQPSolved);

    // an intermediate solution is available
    assert!(qp.primal_solution().is_ok());

    let result = qp
        .hotstart(&g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert!(qp.primal_solution().unwrap().dist(&[1.; 5]) <= 1e-8);
}

#[test]
fn test_time_limit() {
    let H = Matrix::identity(5);
    let g = [-10.; 5];
    let lb = [0.; 5];
    let ub = [1.; 5];
    let mut qp = BoundedQP::new(5, quiet_settings()).unwrap();

    let budget = SolveBudget::default().with_time_limit(0.);
    let result = qp
        .init(Some(&H), &g, Some(&lb), Some(&ub), budget)
        .unwrap();
    assert_eq!(result.status, SolverStatus::MaxTime);
    assert_eq!(result.iterations, 1);

    let result = qp
        .hotstart(&g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
}

#[test]
fn test_hotstart_with_working_set() {
    let H = Matrix::identity(2);
    let lb = [0., 0.];
    let ub = [1., 1.];
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();
    qp.init(Some(&H), &[-0.5, -0.5], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();

    // a wrong working set guess is corrected by the homotopy
    let guess = [SubjectToStatus::Upper, SubjectToStatus::Lower];
    let result = qp
        .hotstart_with_working_set(&[-2., 0.5], Some(&lb), Some(&ub), &guess, SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert!(qp.primal_solution().unwrap().dist(&[1., 0.]) <= 1e-8);
    assert_eq!(qp.bound_status(0).unwrap(), SubjectToStatus::Upper);
    assert_eq!(qp.bound_status(1).unwrap(), SubjectToStatus::Lower);
}

#[test]
fn test_box_sequence_changes() {
    let H = Matrix::identity(2);
    let lb = [-1., -1.];
    let ub = [1., 1.];
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    qp.init(Some(&H), &[2., 0.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert!(qp.primal_solution().unwrap().dist(&[-1., 0.]) <= 1e-8);

    let result = qp
        .hotstart(&[0., 2.], Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert!(result.iterations <= 2);
    assert!(qp.primal_solution().unwrap().dist(&[0., -1.]) <= 1e-8);
}
