#![allow(non_snake_case)]
use hotqp::algebra::*;
use hotqp::solver::*;

fn main() {
    // QP Example

    // qp.set_hessian_type(HessianType::Identity) allows H = None

    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);

    let g = vec![1., 1.];

    let A = Matrix::from(&[
        [1., 1.],  //
        [1., -1.], //
    ]);

    let lb = vec![0., 0.];
    let ub = vec![0.7, 0.7];
    let lbA = vec![1., -0.5];
    let ubA = vec![1., 0.5];

    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::Medium)
        .build()
        .unwrap();

    let mut qp = ConstrainedQP::new(2, 2, settings).unwrap();

    let result = qp
        .init(
            Some(&H),
            &g,
            &A,
            Some(&lb),
            Some(&ub),
            Some(&lbA),
            Some(&ubA),
            SolveBudget::default(),
        )
        .unwrap();

    println!("Status = {}", result.status);
    println!("Solution = {:?}", qp.primal_solution().unwrap());
    println!("Objective = {}", qp.objective_value().unwrap());

    let mut ws = vec![0i8; 4];
    qp.working_set(&mut ws).unwrap();
    println!("Working set = {:?}", ws);

    qp.print_properties().unwrap();
}
