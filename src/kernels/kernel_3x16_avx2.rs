//! 3×16 AVX2 microkernel.

use super::{KernelKind, KernelShape, MicroKernel};

/// Register tile of the AVX2 kernel.
pub const SHAPE: KernelShape = KernelKind::Avx2.shape();

/// AVX2 + FMA implementation of the 3×16 tile.
pub struct Avx2Kernel;

impl MicroKernel for Avx2Kernel {
    const KIND: KernelKind = KernelKind::Avx2;
    const SHAPE: KernelShape = SHAPE;

    #[inline]
    unsafe fn run(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
        unsafe { kernel_3x16_avx2(k, a, b, c, ld) }
    }
}

/// Computes a 3×16 tile: C[0:3, 0:16] += A[0:3, 0:k] × B[0:k, 0:16]
///
/// Holds the whole tile in 12 YMM accumulators (3 rows × 4 vectors of 4
/// f64). Each reduction step broadcasts the three A values of column `p`
/// and streams one 16-wide row of B through four loads. That leaves 4
/// registers for the broadcasts and the B vector, so nothing spills.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA (checked via `#[target_feature]`)
/// - `a.add(r * ld + p)` is valid for r in 0..3, p in 0..k
/// - `b.add(p * ld)` allows reading 16 f64s for p in 0..k
/// - `c.add(r * ld)` allows read/write of 16 f64s for r in 0..3
#[target_feature(enable = "avx2,fma")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_3x16_avx2(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
    use std::arch::x86_64::*;

    // Load existing C values (we accumulate, not overwrite)
    let mut c00 = _mm256_loadu_pd(c.add(0 * ld + 0));
    let mut c01 = _mm256_loadu_pd(c.add(0 * ld + 4));
    let mut c02 = _mm256_loadu_pd(c.add(0 * ld + 8));
    let mut c03 = _mm256_loadu_pd(c.add(0 * ld + 12));
    let mut c10 = _mm256_loadu_pd(c.add(1 * ld + 0));
    let mut c11 = _mm256_loadu_pd(c.add(1 * ld + 4));
    let mut c12 = _mm256_loadu_pd(c.add(1 * ld + 8));
    let mut c13 = _mm256_loadu_pd(c.add(1 * ld + 12));
    let mut c20 = _mm256_loadu_pd(c.add(2 * ld + 0));
    let mut c21 = _mm256_loadu_pd(c.add(2 * ld + 4));
    let mut c22 = _mm256_loadu_pd(c.add(2 * ld + 8));
    let mut c23 = _mm256_loadu_pd(c.add(2 * ld + 12));

    for p in 0..k {
        let a0 = _mm256_broadcast_sd(&*a.add(0 * ld + p));
        let a1 = _mm256_broadcast_sd(&*a.add(1 * ld + p));
        let a2 = _mm256_broadcast_sd(&*a.add(2 * ld + p));
        let b_row = b.add(p * ld);

        let b_vec = _mm256_loadu_pd(b_row.add(0));
        c00 = _mm256_fmadd_pd(a0, b_vec, c00);
        c10 = _mm256_fmadd_pd(a1, b_vec, c10);
        c20 = _mm256_fmadd_pd(a2, b_vec, c20);

        let b_vec = _mm256_loadu_pd(b_row.add(4));
        c01 = _mm256_fmadd_pd(a0, b_vec, c01);
        c11 = _mm256_fmadd_pd(a1, b_vec, c11);
        c21 = _mm256_fmadd_pd(a2, b_vec, c21);

        let b_vec = _mm256_loadu_pd(b_row.add(8));
        c02 = _mm256_fmadd_pd(a0, b_vec, c02);
        c12 = _mm256_fmadd_pd(a1, b_vec, c12);
        c22 = _mm256_fmadd_pd(a2, b_vec, c22);

        let b_vec = _mm256_loadu_pd(b_row.add(12));
        c03 = _mm256_fmadd_pd(a0, b_vec, c03);
        c13 = _mm256_fmadd_pd(a1, b_vec, c13);
        c23 = _mm256_fmadd_pd(a2, b_vec, c23);
    }

    _mm256_storeu_pd(c.add(0 * ld + 0), c00);
    _mm256_storeu_pd(c.add(0 * ld + 4), c01);
    _mm256_storeu_pd(c.add(0 * ld + 8), c02);
    _mm256_storeu_pd(c.add(0 * ld + 12), c03);
    _mm256_storeu_pd(c.add(1 * ld + 0), c10);
    _mm256_storeu_pd(c.add(1 * ld + 4), c11);
    _mm256_storeu_pd(c.add(1 * ld + 8), c12);
    _mm256_storeu_pd(c.add(1 * ld + 12), c13);
    _mm256_storeu_pd(c.add(2 * ld + 0), c20);
    _mm256_storeu_pd(c.add(2 * ld + 4), c21);
    _mm256_storeu_pd(c.add(2 * ld + 8), c22);
    _mm256_storeu_pd(c.add(2 * ld + 12), c23);
}
