//! Portable 3×16 microkernel.
//!
//! Used when no vector unit is available, and as the bit-exact baseline the
//! SIMD kernels are checked against: `f64::mul_add` is a single rounding,
//! same as a hardware FMA lane.

use super::{KernelKind, KernelShape, MicroKernel};

/// Register tile of the scalar kernel.
pub const SHAPE: KernelShape = KernelKind::Scalar.shape();

const ROWS: usize = 3;
const COLS: usize = 16;

/// Scalar implementation of the 3×16 tile.
pub struct ScalarKernel;

impl MicroKernel for ScalarKernel {
    const KIND: KernelKind = KernelKind::Scalar;
    const SHAPE: KernelShape = SHAPE;

    #[inline]
    unsafe fn run(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
        unsafe { kernel_3x16_scalar(k, a, b, c, ld) }
    }
}

/// Computes a 3×16 tile: C[0:3, 0:16] += A[0:3, 0:k] × B[0:k, 0:16]
///
/// # Safety
///
/// - `a.add(r * ld + p)` is valid for r in 0..3, p in 0..k
/// - `b.add(p * ld)` allows reading 16 f64s for p in 0..k
/// - `c.add(r * ld)` allows read/write of 16 f64s for r in 0..3
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_3x16_scalar(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize) {
    let mut acc = [[0.0f64; COLS]; ROWS];
    for (r, row) in acc.iter_mut().enumerate() {
        row.copy_from_slice(std::slice::from_raw_parts(c.add(r * ld), COLS));
    }

    for p in 0..k {
        let b_row = std::slice::from_raw_parts(b.add(p * ld), COLS);
        for (r, row) in acc.iter_mut().enumerate() {
            let a_val = *a.add(r * ld + p);
            for (out, &b_val) in row.iter_mut().zip(b_row) {
                *out = a_val.mul_add(b_val, *out);
            }
        }
    }

    for (r, row) in acc.iter().enumerate() {
        std::slice::from_raw_parts_mut(c.add(r * ld), COLS).copy_from_slice(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_util::tile_fixture;

    #[test]
    fn test_kernel_3x16_scalar_correctness() {
        let (k, ld) = (16, 16);
        let (a, b, mut c, expected) = tile_fixture(k, ld);

        unsafe {
            ScalarKernel::run(k, a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), ld);
        }

        assert_eq!(c, expected);
    }

    #[test]
    fn test_kernel_3x16_scalar_accumulates() {
        // A = ones, B = ones, k = 4: every C cell grows by exactly 4
        let ld = 16;
        let a = vec![1.0; 3 * ld];
        let b = vec![1.0; 4 * ld];
        let mut c = vec![10.0; 3 * ld];

        unsafe {
            ScalarKernel::run(4, a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), ld);
        }

        assert!(c.iter().all(|&x| x == 14.0));
    }
}
