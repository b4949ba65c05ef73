#![allow(non_snake_case)]

use hotqp::{algebra::*, solver::*};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn callback_qp() -> (ConstrainedQP<f64>, Matrix<f64>, Matrix<f64>) {
    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap();
    let qp = ConstrainedQP::new(2, 2, settings).unwrap();
    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let A = Matrix::from(&[
        [1., 1.],  //
        [1., -1.], //
    ]);
    (qp, H, A)
}

// evaluates the rows of A*x above without touching the stored matrix
struct RowProduct {
    calls: Arc<AtomicUsize>,
}

impl ConstraintProduct<f64> for RowProduct {
    fn product(&mut self, row: usize, x: &[f64]) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match row {
            0 => x[0] + x[1],
            _ => x[0] - x[1],
        }
    }
}

#[test]
fn test_constraint_product_struct() {
    let (mut qp, H, A) = callback_qp();
    let calls = Arc::new(AtomicUsize::new(0));
    qp.set_constraint_product(RowProduct {
        calls: calls.clone(),
    });

    let result = qp
        .init(
            Some(&H),
            &[1., 1.],
            &A,
            Some(&[0., 0.]),
            Some(&[0.7, 0.7]),
            Some(&[1., -0.5]),
            Some(&[1., 0.5]),
            SolveBudget::default(),
        )
        .unwrap();

    assert_eq!(result.status, SolverStatus::Solved);
    assert!(qp.primal_solution().unwrap().dist(&[0.3, 0.7]) <= 1e-8);
    assert!(calls.load(Ordering::Relaxed) > 0);
}

#[test]
fn test_constraint_product_closure() {
    let (mut qp, H, A) = callback_qp();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let rows = [[1., 1.], [1., -1.]];
    qp.set_constraint_product(move |row: usize, x: &[f64]| {
        counter.fetch_add(1, Ordering::Relaxed);
        rows[row][0] * x[0] + rows[row][1] * x[1]
    });

    qp.init(
        Some(&H),
        &[1., 1.],
        &A,
        Some(&[0., 0.]),
        Some(&[0.7, 0.7]),
        Some(&[1., -0.5]),
        Some(&[1., 0.5]),
        SolveBudget::default(),
    )
    .unwrap();
    assert!(qp.primal_solution().unwrap().dist(&[0.3, 0.7]) <= 1e-8);

    // back to the stored matrix
    qp.clear_constraint_product();
    let before = calls.load(Ordering::Relaxed);
    let result = qp
        .hotstart(
            &[-1., 1.],
            Some(&[0., 0.]),
            Some(&[0.7, 0.7]),
            Some(&[1., -0.5]),
            Some(&[1., 0.5]),
            SolveBudget::default(),
        )
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    assert_eq!(calls.load(Ordering::Relaxed), before);
    assert!(qp.kkt_violation().unwrap().max() <= 1e-8);
}
