//! Packing between caller matrices and fixed-stride scratch tiles.
//!
//! `pack` copies a `rows × cols` block of an `n × n` matrix into the top-left
//! corner of an `ld`-strided tile; `unpack` copies it back. Only the extent
//! is written. Everything else in the tile keeps its previous value, which
//! the kernels then read as padding (see `PaddingPolicy`).
//!
//! Rows are copied eight at a time with a remainder pass for the last
//! `rows % 8`. The result is the same as copying row by row.

use crate::matrix::{MatrixView, MatrixViewMut};
use seq_macro::seq;

const UNROLL: usize = 8;

#[inline(always)]
fn pack_row(
    src: &MatrixView<'_>,
    row: usize,
    col: usize,
    cols: usize,
    dst: &mut [f64],
    dst_row: usize,
    ld: usize,
) {
    let start = dst_row * ld;
    let segment = src.row_segment(row, col, cols);
    dst[start..start + cols].copy_from_slice(segment);
}

#[inline(always)]
fn unpack_row(
    src: &[f64],
    src_row: usize,
    ld: usize,
    dst: &mut MatrixViewMut<'_>,
    row: usize,
    col: usize,
    cols: usize,
) {
    let start = src_row * ld;
    let segment = &src[start..start + cols];
    dst.row_segment_mut(row, col, cols).copy_from_slice(segment);
}

/// Copies `src[row..row + rows, col..col + cols]` into `dst[0..rows, 0..cols]`.
///
/// # Panics
///
/// Panics if the block runs past the source matrix or `cols > ld` or the
/// tile is shorter than `rows * ld`.
pub fn pack(
    src: MatrixView<'_>,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    dst: &mut [f64],
    ld: usize,
) {
    debug_assert!(cols <= ld);
    let block_limit = rows / UNROLL * UNROLL;

    let mut r = 0;
    while r < block_limit {
        seq!(N in 0..8 {
            pack_row(&src, row + r + N, col, cols, dst, r + N, ld);
        });
        r += UNROLL;
    }
    for r in block_limit..rows {
        pack_row(&src, row + r, col, cols, dst, r, ld);
    }
}

/// Copies `src[0..rows, 0..cols]` back into `dst[row..row + rows, col..col + cols]`.
///
/// # Panics
///
/// Same conditions as [`pack`], mirrored.
pub fn unpack(
    src: &[f64],
    ld: usize,
    dst: &mut MatrixViewMut<'_>,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) {
    debug_assert!(cols <= ld);
    let block_limit = rows / UNROLL * UNROLL;

    let mut r = 0;
    while r < block_limit {
        seq!(N in 0..8 {
            unpack_row(src, r + N, ld, dst, row + r + N, col, cols);
        });
        r += UNROLL;
    }
    for r in block_limit..rows {
        unpack_row(src, r, ld, dst, row + r, col, cols);
    }
}

/// Zeroes every cell of an `ld`-strided tile outside `[0..rows, 0..cols]`.
pub fn clear_padding(dst: &mut [f64], ld: usize, rows: usize, cols: usize) {
    for r in 0..rows {
        dst[r * ld + cols..(r + 1) * ld].fill(0.0);
    }
    dst[rows * ld..].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential(n: usize) -> Vec<f64> {
        (0..n * n).map(|i| i as f64).collect()
    }

    #[test]
    fn pack_copies_only_the_extent() {
        let n = 20;
        let data = sequential(n);
        let ld = 16;
        // 11 rows: one unrolled group of 8 plus a remainder of 3
        let (row, col, rows, cols) = (4, 5, 11, 9);
        let mut tile = vec![-1.0; ld * ld];

        let view = MatrixView::new(&data, n);
        pack(view, row, col, rows, cols, &mut tile, ld);

        for r in 0..ld {
            for c in 0..ld {
                let got = tile[r * ld + c];
                if r < rows && c < cols {
                    assert_eq!(got, data[(row + r) * n + col + c], "({r}, {c})");
                } else {
                    assert_eq!(got, -1.0, "padding at ({r}, {c}) was overwritten");
                }
            }
        }
    }

    #[test]
    fn unpack_is_the_mirror_of_pack() {
        let n = 13;
        let src = sequential(n);
        let ld = 12;
        for rows in [0, 1, 7, 8, 9, 12] {
            let (row, col, cols) = (n - rows, 1, 12);
            let mut tile = vec![0.0; ld * ld];
            let view = MatrixView::new(&src, n);
            pack(view, row, col, rows, cols, &mut tile, ld);

            let mut dst = vec![0.0; n * n];
            let mut view = MatrixViewMut::new(&mut dst, n);
            unpack(&tile, ld, &mut view, row, col, rows, cols);

            for r in 0..n {
                for c in 0..n {
                    let inside = r >= row && r < row + rows && c >= col && c < col + cols;
                    let expected = if inside { src[r * n + c] } else { 0.0 };
                    assert_eq!(dst[r * n + c], expected, "rows={rows} at ({r}, {c})");
                }
            }
        }
    }

    #[test]
    fn clear_padding_keeps_the_extent() {
        let ld = 6;
        let mut tile = vec![7.0; ld * ld];
        clear_padding(&mut tile, ld, 4, 3);
        for r in 0..ld {
            for c in 0..ld {
                let expected = if r < 4 && c < 3 { 7.0 } else { 0.0 };
                assert_eq!(tile[r * ld + c], expected);
            }
        }
    }

    #[test]
    fn clear_padding_full_extent_is_a_no_op() {
        let ld = 4;
        let mut tile = vec![2.0; ld * ld];
        clear_padding(&mut tile, ld, ld, ld);
        assert!(tile.iter().all(|&x| x == 2.0));
    }
}
