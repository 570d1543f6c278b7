//! 3×16 AVX-512 microkernel.

use super::{KernelKind, KernelShape, MicroKernel};

/// Register tile of the AVX-512 kernel.
pub const SHAPE: KernelShape = KernelKind::Avx512.shape();

/// AVX-512F implementation of the 3×16 tile.
pub struct Avx512Kernel;

impl MicroKernel for Avx512Kernel {
    const KIND: KernelKind = KernelKind::Avx512;
    const SHAPE: KernelShape = SHAPE;

    #[inline]
    unsafe fn run(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
        unsafe { kernel_3x16_avx512(k, a, b, c, ld) }
    }
}

/// Computes a 3×16 tile: C[0:3, 0:16] += A[0:3, 0:k] × B[0:k, 0:16]
///
/// Same tile as the AVX2 kernel, but each row of 16 columns fits in two
/// ZMM registers, so a reduction step is 2 B loads and 6 FMAs.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX-512F (checked via `#[target_feature]`)
/// - `a.add(r * ld + p)` is valid for r in 0..3, p in 0..k
/// - `b.add(p * ld)` allows reading 16 f64s for p in 0..k
/// - `c.add(r * ld)` allows read/write of 16 f64s for r in 0..3
#[target_feature(enable = "avx512f")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_3x16_avx512(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
    use std::arch::x86_64::*;

    let mut c00 = _mm512_loadu_pd(c.add(0 * ld + 0));
    let mut c01 = _mm512_loadu_pd(c.add(0 * ld + 8));
    let mut c10 = _mm512_loadu_pd(c.add(1 * ld + 0));
    let mut c11 = _mm512_loadu_pd(c.add(1 * ld + 8));
    let mut c20 = _mm512_loadu_pd(c.add(2 * ld + 0));
    let mut c21 = _mm512_loadu_pd(c.add(2 * ld + 8));

    for p in 0..k {
        let a0 = _mm512_set1_pd(*a.add(0 * ld + p));
        let a1 = _mm512_set1_pd(*a.add(1 * ld + p));
        let a2 = _mm512_set1_pd(*a.add(2 * ld + p));
        let b_row = b.add(p * ld);

        let b_vec = _mm512_loadu_pd(b_row.add(0));
        c00 = _mm512_fmadd_pd(a0, b_vec, c00);
        c10 = _mm512_fmadd_pd(a1, b_vec, c10);
        c20 = _mm512_fmadd_pd(a2, b_vec, c20);

        let b_vec = _mm512_loadu_pd(b_row.add(8));
        c01 = _mm512_fmadd_pd(a0, b_vec, c01);
        c11 = _mm512_fmadd_pd(a1, b_vec, c11);
        c21 = _mm512_fmadd_pd(a2, b_vec, c21);
    }

    _mm512_storeu_pd(c.add(0 * ld + 0), c00);
    _mm512_storeu_pd(c.add(0 * ld + 8), c01);
    _mm512_storeu_pd(c.add(1 * ld + 0), c10);
    _mm512_storeu_pd(c.add(1 * ld + 8), c11);
    _mm512_storeu_pd(c.add(2 * ld + 0), c20);
    _mm512_storeu_pd(c.add(2 * ld + 8), c21);
}
