// ---------------------------------
// user supplied constraint product
// ---------------------------------

/// Evaluates a single row of the constraint product `A*x`.
///
/// Used in place of the stored constraint matrix when computing the
/// product of a constraint row with the iterate, e.g. for matrices with
/// a structure the caller can exploit.  Any `FnMut(usize, &[T]) -> T`
/// closure implements this trait.
pub trait ConstraintProduct<T>: Send {
    /// returns `A[row,:] * x`
    fn product(&mut self, row: usize, x: &[T]) -> T;
}

impl<T, F> ConstraintProduct<T> for F
where
    F: FnMut(usize, &[T]) -> T + Send,
{
    fn product(&mut self, row: usize, x: &[T]) -> T {
        self(row, x)
    }
}

pub(crate) type BoxedConstraintProduct<T> = Box<dyn ConstraintProduct<T>>;

#[test]
fn test_closure_product() {
    let rows = [[1.0, 2.0], [0.0, -1.0]];
    let mut prod = move |row: usize, x: &[f64]| rows[row][0] * x[0] + rows[row][1] * x[1];
    let x = [3.0, 1.0];
    assert_eq!(ConstraintProduct::product(&mut prod, 0, &x), 5.0);
    assert_eq!(ConstraintProduct::product(&mut prod, 1, &x), -1.0);
}
