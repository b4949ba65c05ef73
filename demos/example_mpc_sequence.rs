#![allow(non_snake_case)]
use hotqp::algebra::*;
use hotqp::solver::*;

// Receding horizon control of a double integrator.  The QP data only
// changes through the initial state, so every step after the first
// is a hotstart from the previous solution.

const N: usize = 10;
const DT: f64 = 0.1;

// position after k steps as a linear function of the inputs
fn condensed_dynamics(x0: [f64; 2]) -> (Matrix<f64>, Vec<f64>) {
    let mut P = Matrix::zeros((N, N));
    let mut p0 = vec![0.; N];
    for k in 0..N {
        for j in 0..=k {
            let steps = (k - j) as f64;
            P[(k, j)] = DT * DT * (steps + 0.5);
        }
        let t = (k + 1) as f64 * DT;
        p0[k] = x0[0] + t * x0[1];
    }
    (P, p0)
}

fn main() {
    println!("MPC Sequence Example");
    println!("====================");

    let mut x = [1.0, 0.0];
    let (P, _) = condensed_dynamics(x);

    // min sum p_k^2 + r*u_k^2  s.t.  |u| <= 1, p >= -0.2
    let r = 0.1;
    let mut H = Matrix::identity(N);
    H.scale(r);
    let mut PtP = Matrix::zeros((N, N));
    for i in 0..N {
        for j in 0..N {
            PtP[(i, j)] = (0..N).map(|k| P[(k, i)] * P[(k, j)]).sum::<f64>();
        }
    }
    for i in 0..N {
        for j in 0..N {
            H[(i, j)] += PtP[(i, j)];
        }
    }

    let lb = vec![-1.; N];
    let ub = vec![1.; N];

    let settings = QPSettings::mpc();
    let mut qp = ConstrainedQP::new(N, N, settings).unwrap();

    let mut g = vec![0.; N];
    let mut lbA = vec![0.; N];

    for step in 0..30 {
        let (_, p0) = condensed_dynamics(x);
        P.gemv_t(&mut g, &p0, 1., 0.);
        for k in 0..N {
            lbA[k] = -0.2 - p0[k];
        }

        let result = if step == 0 {
            qp.init(
                Some(&H),
                &g,
                &P,
                Some(&lb),
                Some(&ub),
                Some(&lbA),
                None,
                SolveBudget::default(),
            )
        } else {
            qp.hotstart(&g, Some(&lb), Some(&ub), Some(&lbA), None, SolveBudget::default())
        }
        .unwrap();

        let u = qp.primal_solution().unwrap()[0];
        println!(
            "step {:2}: x = [{:+.4}, {:+.4}], u = {:+.4}, changes = {}, status = {}",
            step, x[0], x[1], u, result.iterations, result.status
        );

        x = [x[0] + DT * x[1] + 0.5 * DT * DT * u, x[1] + DT * u];
    }
}
