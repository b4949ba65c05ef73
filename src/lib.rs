//!  __hotqp__ is an online active-set solver for sequences of dense
//!  convex quadratic programs,
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T H x + g^T x\\\\\[2ex\]
//!  \text{subject to} & lb \le x \le ub \\\\\[1ex\]
//!         & lbA \le Ax \le ubA,
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, a symmetric positive
//! semidefinite Hessian $H$ and a constraint matrix
//! $A \in \mathbb{R}^{m \times n}$.
//!
//! Problems of a sequence are solved by a parametric homotopy: starting
//! from the solution of the previous QP, the data is moved along a
//! straight line to the new QP while the working set is updated one
//! index at a time.  This makes the solver well suited for model
//! predictive control, where neighbouring problems differ only slightly.
//!
//! ## Features
//!
//! * __Warm starts__: each `hotstart` reuses the working set and the
//!   matrix factorisations of the previous solution.
//!
//! * __Bounded work__: iteration and wall clock budgets are checked
//!   once per working set change, and an interrupted solve still gives
//!   the optimal solution of an intermediate QP.
//!
//! * __Semidefinite Hessians__: zero and semidefinite Hessians are
//!   regularised automatically, with optional proximal correction steps.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod solver;
pub(crate) mod timers;
