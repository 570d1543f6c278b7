//! Register-block driver.

use crate::kernels::MicroKernel;
use crate::params::BlockParams;

/// Runs the microkernel over an `m × n × k` block of packed tiles.
///
/// Rows and columns advance by the full kernel tile, so the last step along
/// each of them may run into padding. The reduction advances by `reg_k` and
/// the last step is trimmed to what is left, so padding along k is never read.
///
/// # Safety
///
/// Caller must ensure:
/// - the CPU supports `K`
/// - `a`, `b`, `c` point into `ld`-strided tiles with at least
///   `round_up(m, rows)` rows and `round_up(n, cols)` columns available past
///   the pointer, and `k` columns of A / rows of B
#[inline]
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn register_block<K: MicroKernel>(
    params: &BlockParams,
    m: usize,
    n: usize,
    k: usize,
    a: *const f64,
    b: *const f64,
    c: *mut f64,
    ld: usize,
) {
    let mr = K::SHAPE.rows;
    let nr = K::SHAPE.cols();

    for i in (0..m).step_by(mr) {
        for j in (0..n).step_by(nr) {
            for p in (0..k).step_by(params.reg_k) {
                let cur_k = params.reg_k.min(k - p);
                K::run(
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
