//! 3×16 NEON microkernel for ARM64.

use super::{KernelKind, KernelShape, MicroKernel};
use std::arch::aarch64::*;

/// Register tile of the NEON kernel.
pub const SHAPE: KernelShape = KernelKind::Neon.shape();

/// NEON implementation of the 3×16 tile.
pub struct NeonKernel;

impl MicroKernel for NeonKernel {
    const KIND: KernelKind = KernelKind::Neon;
    const SHAPE: KernelShape = SHAPE;

    #[inline]
    unsafe fn run(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
        unsafe { kernel_3x16_neon(k, a, b, c, ld) }
    }
}

/// Computes a 3×16 tile: C[0:3, 0:16] += A[0:3, 0:k] × B[0:k, 0:16]
///
/// 128-bit registers hold 2 f64, so the tile takes 24 of the 32 V
/// registers as accumulators. The row loop is kept as an array of
/// accumulators; LLVM keeps it fully in registers.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports NEON
/// - `a.add(r * ld + p)` is valid for r in 0..3, p in 0..k
/// - `b.add(p * ld)` allows reading 16 f64s for p in 0..k
/// - `c.add(r * ld)` allows read/write of 16 f64s for r in 0..3
#[target_feature(enable = "neon")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_3x16_neon(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
    let mut acc = [[vdupq_n_f64(0.0); 8]; 3];
    for (r, row) in acc.iter_mut().enumerate() {
        for (v, reg) in row.iter_mut().enumerate() {
            *reg = vld1q_f64(c.add(r * ld + v * 2));
        }
    }

    for p in 0..k {
        let a0 = vdupq_n_f64(*a.add(p));
        let a1 = vdupq_n_f64(*a.add(ld + p));
        let a2 = vdupq_n_f64(*a.add(2 * ld + p));
        let b_row = b.add(p * ld);

        for v in 0..8 {
            let b_vec = vld1q_f64(b_row.add(v * 2));
            acc[0][v] = vfmaq_f64(acc[0][v], a0, b_vec);
            acc[1][v] = vfmaq_f64(acc[1][v], a1, b_vec);
            acc[2][v] = vfmaq_f64(acc[2][v], a2, b_vec);
        }
    }

    for (r, row) in acc.iter().enumerate() {
        for (v, reg) in row.iter().enumerate() {
            vst1q_f64(c.add(r * ld + v * 2), *reg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_util::tile_fixture;

    #[test]
    fn test_kernel_3x16_neon_correctness() {
        if !KernelKind::Neon.is_available() {
            println!("Skipping - NEON not available");
            return;
        }

        let (k, ld) = (17, 32);
        let (a, b, mut c, expected) = tile_fixture(k, ld);

        unsafe {
            NeonKernel::run(k, a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), ld);
        }

        for r in 0..3 {
            for j in 0..16 {
                let i = r * ld + j;
                assert_eq!(c[i], expected[i], "Mismatch at ({}, {})", r, j);
            }
        }
    }
}
