//! Internal utility functions and helpers.

pub(crate) mod atomic;
pub(crate) mod infbounds;

// copies an optional bound vector, using ±infinity where absent

pub(crate) fn copy_or_fill<T: Copy>(dst: &mut [T], src: Option<&[T]>, fill: T) {
    match src {
        Some(v) => dst.copy_from_slice(v),
        None => dst.iter_mut().for_each(|d| *d = fill),
    }
}

#[test]
fn test_copy_or_fill() {
    let mut x = [0.; 3];
    copy_or_fill(&mut x, None, 7.);
    assert_eq!(x, [7., 7., 7.]);
    copy_or_fill(&mut x, Some(&[1., 2., 3.]), 7.);
    assert_eq!(x, [1., 2., 3.]);
}
