#![allow(non_snake_case)]
use hotqp::algebra::*;
use hotqp::solver::*;

fn main() {
    // Box constrained QP example

    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);

    let g = vec![-1., 1.];
    let lb = vec![0., 0.];
    let ub = vec![0.7, 0.7];

    let settings = QPSettings::default();

    let mut qp = BoundedQP::new(2, settings).unwrap();

    qp.init(Some(&H), &g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();

    println!("Solution = {:?}", qp.primal_solution().unwrap());
    println!("Multipliers = {:?}", qp.dual_solution().unwrap());

    // next QP of the sequence, starting from the solution above
    let g = vec![-4., -4.];
    qp.hotstart(&g, Some(&lb), Some(&ub), SolveBudget::default())
        .unwrap();

    println!("Solution = {:?}", qp.primal_solution().unwrap());
    println!("Iterations = {}", qp.info().iterations);
}
