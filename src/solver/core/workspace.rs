use crate::algebra::*;

/// Scratch arena owned by an engine.
///
/// Sized once from `(n, m)` when the engine is constructed.  The
/// homotopy loop only borrows from it, so no allocation happens in
/// `hotstart` once the engine exists.
#[derive(Debug, Clone)]
pub(crate) struct Workspace<T> {
    // target data of the running homotopy
    pub g_target: Vec<T>,
    pub lb_target: Vec<T>,
    pub ub_target: Vec<T>,
    pub lbA_target: Vec<T>,
    pub ubA_target: Vec<T>,

    // data shift and step direction
    pub delta_g: Vec<T>,
    pub delta_lb: Vec<T>,
    pub delta_ub: Vec<T>,
    pub delta_lbA: Vec<T>,
    pub delta_ubA: Vec<T>,
    pub delta_x: Vec<T>,
    pub delta_y: Vec<T>,
    pub delta_Ax: Vec<T>,

    // general purpose vectors of length n
    pub rhs: Vec<T>,
    pub sol: Vec<T>,
    pub hvec: Vec<T>,
    pub w: Vec<T>,

    // length min(n,m)
    pub tcol: Vec<T>,

    // multipliers of the linear dependence test, length n+m
    pub xi: Vec<T>,

    // projected Hessian and its product with Z
    pub S: Matrix<T>,
    pub HZ: Matrix<T>,
}

impl<T> Workspace<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        let size_t = usize::min(n, m);
        Self {
            g_target: vec![T::zero(); n],
            lb_target: vec![T::zero(); n],
            ub_target: vec![T::zero(); n],
            lbA_target: vec![T::zero(); m],
            ubA_target: vec![T::zero(); m],

            delta_g: vec![T::zero(); n],
            delta_lb: vec![T::zero(); n],
            delta_ub: vec![T::zero(); n],
            delta_lbA: vec![T::zero(); m],
            delta_ubA: vec![T::zero(); m],
            delta_x: vec![T::zero(); n],
            delta_y: vec![T::zero(); n + m],
            delta_Ax: vec![T::zero(); m],

            rhs: vec![T::zero(); n],
            sol: vec![T::zero(); n],
            hvec: vec![T::zero(); n],
            w: vec![T::zero(); n],

            tcol: vec![T::zero(); size_t],

            xi: vec![T::zero(); n + m],

            S: Matrix::zeros((n, n)),
            HZ: Matrix::zeros((n, n)),
        }
    }
}
