//! Macro-block orchestrator: pack → accumulate → unpack.

use super::l1_block::l1_block;
use crate::kernels::MicroKernel;
use crate::matrix::{MatrixView, MatrixViewMut};
use crate::pack::{clear_padding, pack, unpack};
use crate::params::BlockParams;
use crate::scratch::{PaddingPolicy, Scratch, ScratchTiles};

/// Blocked `C += A × B` for square matrices using microkernel `K`.
///
/// For every `tile × tile` output block (i, j) the C block is packed once,
/// then each k block of A and B is packed and accumulated into it, and
/// finally the C block is copied back. Existing C values enter the
/// computation only through that first pack.
///
/// Scratch tiles are allocated here and freed on return.
///
/// # Safety
///
/// Caller must ensure:
/// - the CPU supports `K` (see [`crate::KernelKind::is_available`])
/// - `params.validate(K::SHAPE)` succeeded
pub unsafe fn multiply_blocked<K: MicroKernel>(
    params: &BlockParams,
    padding: PaddingPolicy,
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
) {
    let n = c.dim();
    debug_assert_eq!(a.dim(), n);
    debug_assert_eq!(b.dim(), n);
    debug_assert_eq!(params.validate(K::SHAPE), Ok(()));
    if n == 0 {
        return;
    }

    let tile = params.tile;
    log::trace!(
        "multiply_blocked: n={} tile={} kernel={} padding={:?}",
        n,
        tile,
        K::KIND,
        padding
    );

    let mut scratch = Scratch::new(tile);
    let ScratchTiles {
        a: a_tile,
        b: b_tile,
        c: c_tile,
        ld,
    } = scratch.tiles();
    let zero_fill = padding == PaddingPolicy::ZeroFill;

    for i in (0..n).step_by(tile) {
        let cur_m = tile.min(n - i);

        for j in (0..n).step_by(tile) {
            let cur_n = tile.min(n - j);

            if zero_fill {
                clear_padding(c_tile, ld, cur_m, cur_n);
            }
            pack(c.as_view(), i, j, cur_m, cur_n, c_tile, ld);

            for k in (0..n).step_by(tile) {
                let cur_k = tile.min(n - k);

                if zero_fill {
                    clear_padding(a_tile, ld, cur_m, cur_k);
                    clear_padding(b_tile, ld, cur_k, cur_n);
                }
                pack(a, i, k, cur_m, cur_k, a_tile, ld);
                pack(b, k, j, cur_k, cur_n, b_tile, ld);

                unsafe {
                    l1_block::<K>(
                        params,
                        cur_m,
                        cur_n,
                        cur_k,
                        a_tile.as_ptr(),
                        b_tile.as_ptr(),
                        c_tile.as_mut_ptr(),
                        ld,
                    );
                }
            }

            unpack(c_tile, ld, c, i, j, cur_m, cur_n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::ScalarKernel;

    fn fused_reference(n: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
        for r in 0..n {
            for j in 0..n {
                let mut acc = c[r * n + j];
                for p in 0..n {
                    acc = a[r * n + p].mul_add(b[p * n + j], acc);
                }
                c[r * n + j] = acc;
            }
        }
    }

    fn run(
        params: &BlockParams,
        padding: PaddingPolicy,
        n: usize,
        a: &[f64],
        b: &[f64],
        c: &mut [f64],
    ) {
        let a = MatrixView::new(a, n);
        let b = MatrixView::new(b, n);
        let mut c = MatrixViewMut::new(c, n);
        unsafe {
            multiply_blocked::<ScalarKernel>(params, padding, a, b, &mut c);
        }
    }

    #[test]
    fn multi_block_with_ragged_edges() {
        // 3 macro blocks per axis with SMALL, last one 5 wide
        let n = 101;
        let a: Vec<f64> = (0..n * n).map(|i| ((i * 13) % 23) as f64 - 11.0).collect();
        let b: Vec<f64> = (0..n * n).map(|i| ((i * 7) % 29) as f64 * 0.5).collect();
        let mut c: Vec<f64> = (0..n * n).map(|i| (i % 3) as f64).collect();
        let mut expected = c.clone();

        run(&BlockParams::SMALL, PaddingPolicy::Reuse, n, &a, &b, &mut c);
        fused_reference(n, &a, &b, &mut expected);

        assert_eq!(c, expected);
    }

    #[test]
    fn stale_padding_never_leaks() {
        // large values in the first blocks, so anything stale in the padding
        // would show up in the ragged last block
        let n = 50;
        let a: Vec<f64> = (0..n * n)
            .map(|i| if i % n < 48 { 1e6 } else { 1.0 })
            .collect();
        let b: Vec<f64> = (0..n * n)
            .map(|i| if i / n < 48 { 1e6 } else { 2.0 })
            .collect();

        let mut reuse = vec![0.0; n * n];
        let mut zeroed = vec![0.0; n * n];
        let mut expected = vec![0.0; n * n];
        let small = &BlockParams::SMALL;
        run(small, PaddingPolicy::Reuse, n, &a, &b, &mut reuse);
        run(small, PaddingPolicy::ZeroFill, n, &a, &b, &mut zeroed);
        fused_reference(n, &a, &b, &mut expected);

        assert_eq!(reuse, expected);
        assert_eq!(zeroed, expected);
    }

    #[test]
    fn empty_matrix_is_a_no_op() {
        let mut c: Vec<f64> = vec![];
        let large = &BlockParams::LARGE;
        run(large, PaddingPolicy::Reuse, 0, &[], &[], &mut c);
        assert!(c.is_empty());
    }
}
