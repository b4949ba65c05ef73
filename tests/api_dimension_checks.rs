#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};

fn quiet_settings() -> QPSettings<f64> {
    QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap()
}

fn mismatch(name: &'static str, expected: usize, actual: usize) -> Option<QPError> {
    Some(QPError::DimensionMismatch {
        name,
        expected,
        actual,
    })
}

#[test]
fn test_bounded_dimension_checks() {
    let H = Matrix::identity(2);
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    // bad gradient
    let result = qp.init(Some(&H), &[0.], None, None, SolveBudget::default());
    assert_eq!(result.err(), mismatch("g", 2, 1));

    // bad bound vectors
    let result = qp.init(Some(&H), &[0., 0.], Some(&[0.; 3]), None, SolveBudget::default());
    assert_eq!(result.err(), mismatch("lb", 2, 3));
    let result = qp.init(Some(&H), &[0., 0.], None, Some(&[0.]), SolveBudget::default());
    assert_eq!(result.err(), mismatch("ub", 2, 1));

    // bad Hessian
    let H3 = Matrix::identity(3);
    let result = qp.init(Some(&H3), &[0., 0.], None, None, SolveBudget::default());
    assert!(matches!(result, Err(QPError::DimensionMismatch { .. })));

    // a failed init leaves the engine uninitialised
    assert_eq!(qp.status(), QPStatus::NotInitialised);
}

#[test]
fn test_constrained_dimension_checks() {
    let H = Matrix::identity(2);
    let A = Matrix::from(&[[1., 1.]]);
    let mut qp = ConstrainedQP::new(2, 1, quiet_settings()).unwrap();

    let result = qp.init(
        Some(&H),
        &[0., 0.],
        &A,
        None,
        None,
        Some(&[0., 0.]),
        None,
        SolveBudget::default(),
    );
    assert_eq!(result.err(), mismatch("lbA", 1, 2));

    let A_bad = Matrix::from(&[[1., 1., 1.]]);
    let result = qp.init(Some(&H), &[0., 0.], &A_bad, None, None, None, None, SolveBudget::default());
    assert!(matches!(result, Err(QPError::DimensionMismatch { .. })));

    qp.init(Some(&H), &[0., 0.], &A, None, None, None, Some(&[1.]), SolveBudget::default())
        .unwrap();
    let result = qp.hotstart(&[0., 0.], None, None, None, Some(&[1., 1.]), SolveBudget::default());
    assert_eq!(result.err(), mismatch("ubA", 1, 2));

    let mut ws = [0i8; 2];
    assert!(qp.working_set(&mut ws).is_err());
    let mut ws = [0i8; 3];
    qp.working_set(&mut ws).unwrap();
}

#[test]
fn test_bad_working_set_guess() {
    let H = Matrix::identity(2);
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();

    let guess = InitialGuess {
        bounds: Some(&[SubjectToStatus::Lower]),
        ..InitialGuess::default()
    };
    let result = qp.init_with_guess(
        Some(&H),
        &[0., 0.],
        Some(&[0., 0.]),
        Some(&[1., 1.]),
        &guess,
        SolveBudget::default(),
    );
    assert_eq!(result.err(), mismatch("bounds guess", 2, 1));

    // disabling is not a status a caller can request
    let guess = InitialGuess {
        bounds: Some(&[SubjectToStatus::Lower, SubjectToStatus::Disabled]),
        ..InitialGuess::default()
    };
    let result = qp.init_with_guess(
        Some(&H),
        &[0., 0.],
        Some(&[0., 0.]),
        Some(&[1., 1.]),
        &guess,
        SolveBudget::default(),
    );
    assert!(matches!(result, Err(QPError::InvalidArgument(_))));
}

#[test]
fn test_non_finite_data() {
    let H = Matrix::from(&[
        [1., f64::NAN], //
        [f64::NAN, 1.], //
    ]);
    let mut qp = BoundedQP::new(2, quiet_settings()).unwrap();
    let result = qp.init(Some(&H), &[0., 0.], None, None, SolveBudget::default());
    assert!(matches!(result, Err(QPError::InvalidArgument(_))));

    let H = Matrix::from(&[
        [1., 0.5], //
        [0., 1.],  //
    ]);
    let result = qp.init(Some(&H), &[0., 0.], None, None, SolveBudget::default());
    assert!(matches!(result, Err(QPError::InvalidArgument(_))));
}
