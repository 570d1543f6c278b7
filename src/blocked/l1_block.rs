//! L1-block driver.

use super::register_block::register_block;
use crate::kernels::MicroKernel;
use crate::params::BlockParams;

/// Walks an `m × n × k` packed macro block in `l1_m × l1_n × l1_k` pieces
/// and hands each to [`register_block`].
///
/// For a fixed (row, column) piece the k pieces run in increasing order, so
/// every C element still sees its reduction terms in order.
///
/// # Safety
///
/// Same contract as [`register_block`], with `params` validated for `K`'s
/// shape (`l1_m` and `l1_n` multiples of the kernel tile).
#[inline]
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn l1_block<K: MicroKernel>(
    params: &BlockParams,
    m: usize,
    n: usize,
    k: usize,
    a: *const f64,
    b: *const f64,
    c: *mut f64,
    ld: usize,
) {
    for i in (0..m).step_by(params.l1_m) {
        let cur_m = params.l1_m.min(m - i);

        for j in (0..n).step_by(params.l1_n) {
            let cur_n = params.l1_n.min(n - j);

            for p in (0..k).step_by(params.l1_k) {
                let cur_k = params.l1_k.min(k - p);

                register_block::<K>(
                    params,
                    cur_m,
                    cur_n,
                    cur_k,
                    a.add(i * ld + p),
                    b.add(p * ld + j),
                    c.add(i * ld + j),
                    ld,
                );
            }
        }
    }
}
