use crate::algebra::*;

#[test]
fn test_matrix_from_rows() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[1., 3., 5.],
          [2., 0., 6.]]);

    assert_eq!(A.size(), (2, 3));
    assert_eq!(A.data, vec![1., 2., 3., 0., 5., 6.]);
    assert_eq!(A[(1, 2)], 6.);
    assert_eq!(A.col_slice(1), &[3., 0.]);

    let B = Matrix::new_from_row_major((2, 3), &[1., 3., 5., 2., 0., 6.]);
    assert_eq!(A, B);
}

#[test]
fn test_matrix_identity() {
    let I = Matrix::<f64>::identity(3);
    assert!(I.is_diagonal());
    assert!(I.is_triu());
    assert!(I.is_symmetric(0.));
    assert_eq!(I.max_abs_diag(), 1.);
}

#[test]
fn test_matrix_rows() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[1., 3., 5.],
          [2., 0., 6.]]);

    let mut row = [0.; 3];
    A.row_to(1, &mut row);
    assert_eq!(row, [2., 0., 6.]);
    assert_eq!(A.row_dot(0, &[1., 1., 1.]), 9.);
}

#[test]
fn test_matrix_not_symmetric() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[1., 3.],
          [2., 1.]]);
    assert!(!A.is_symmetric(0.5));
    assert!(A.is_symmetric(1.0));
}

#[test]
fn test_matrix_col_slice_mut() {
    let mut A = Matrix::<f64>::zeros((2, 2));
    A.col_slice_mut(1).copy_from_slice(&[1., 2.]);
    assert_eq!(A[(0, 1)], 1.);
    assert_eq!(A[(1, 1)], 2.);
    assert_eq!(A.col_slice(0), &[0., 0.]);
}
