#![cfg(feature = "serde")]
#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};
use std::io::{Seek, SeekFrom};

#[test]
fn test_json_round_trip_solve() {
    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let A = Matrix::from(&[[1., 1.]]);
    let g = [1., 1.];
    let lb = [0., 0.];
    let ub = [0.7, f64::INFINITY];
    let b = [1.];

    let problem = QPProblem {
        H: Some(&H),
        g: &g,
        A: &A,
        lb: Some(&lb),
        ub: Some(&ub),
        lbA: Some(&b),
        ubA: Some(&b),
    };
    let data = QPData::from_problem(&problem);

    let mut file = tempfile::tempfile().unwrap();
    data.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let data2 = QPData::<f64>::read_from_file(&mut file).unwrap();

    // infinite bounds survive the trip
    assert_eq!(data2.ub.as_ref().unwrap()[1], f64::INFINITY);
    assert_eq!(data2.g, data.g);

    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap();
    let mut qp = ConstrainedQP::new(2, 1, settings).unwrap();
    let result = qp
        .init_with_guess(
            &data2.problem().unwrap(),
            &InitialGuess::default(),
            SolveBudget::default(),
        )
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert!(qp.primal_solution().unwrap().dist(&[0.25, 0.75]) <= 1e-8);
}
