//! Equal-piece split along one axis.

use ndarray::{ArrayView, Axis, Dimension};

use crate::error::WarpError;

/// Split `view` into `n` contiguous pieces of equal extent along `axis`.
///
/// Piece `k` is exactly the `k`-th run along the axis; every other axis is
/// untouched. The pieces borrow from `view`, nothing is copied.
pub fn split_axis<'a, A, D: Dimension>(
    view: ArrayView<'a, A, D>,
    n: usize,
    axis: Axis,
) -> Result<Vec<ArrayView<'a, A, D>>, WarpError> {
    if axis.index() >= view.ndim() {
        return Err(WarpError::Shape(format!(
            "Axis {} out of range for {}-d array",
            axis.index(),
            view.ndim()
        )));
    }
    let len = view.len_of(axis);
    if n == 0 || len == 0 || len % n != 0 {
        return Err(WarpError::Shape(format!(
            "Axis {} of length {len} cannot be split into {n} equal pieces",
            axis.index()
        )));
    }

    let size = len / n;
    let mut pieces = Vec::with_capacity(n);
    let mut rest = view;
    for _ in 1..n {
        let (head, tail) = rest.split_at(axis, size);
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    Ok(pieces)
}
