//! SIMD microkernels for the innermost tile of the multiply.
//!
//! Every kernel computes the same 3×16 tile `C[0:3, 0:16] += A[0:3, 0:k] × B[0:k, 0:16]`
//! out of packed scratch buffers that share one row stride. They differ only
//! in how the 16 columns are split into vectors:
//!
//! - `kernel_3x16_avx512`: 2 × 8 lanes, AVX-512F
//! - `kernel_3x16_avx2`: 4 × 4 lanes, AVX2 + FMA
//! - `kernel_3x16_neon`: 8 × 2 lanes, NEON (aarch64)
//! - `kernel_3x16_scalar`: 16 × 1 lane, portable `f64::mul_add`
//!
//! All of them do one fused multiply-add per element per reduction step in
//! increasing `k`, so their results are bit-identical.

use crate::cpu::cpu_features;
use std::fmt;

#[cfg(target_arch = "x86_64")]
pub mod kernel_3x16_avx2;
#[cfg(target_arch = "x86_64")]
pub mod kernel_3x16_avx512;
#[cfg(target_arch = "aarch64")]
pub mod kernel_3x16_neon;
pub mod kernel_3x16_scalar;

#[cfg(target_arch = "x86_64")]
pub use kernel_3x16_avx2::Avx2Kernel;
#[cfg(target_arch = "x86_64")]
pub use kernel_3x16_avx512::Avx512Kernel;
#[cfg(target_arch = "aarch64")]
pub use kernel_3x16_neon::NeonKernel;
pub use kernel_3x16_scalar::ScalarKernel;

/// Register tile geometry of a micro-kernel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KernelShape {
    /// Output rows held in registers
    pub rows: usize,
    /// f64 lanes per vector register
    pub lanes: usize,
    /// Vector registers per output row
    pub vectors: usize,
}

impl KernelShape {
    /// A tile of `rows` rows, each `vectors` registers of `lanes` f64.
    pub const fn new(rows: usize, lanes: usize, vectors: usize) -> Self {
        KernelShape {
            rows,
            lanes,
            vectors,
        }
    }

    /// Output columns per tile.
    pub const fn cols(&self) -> usize {
        self.lanes * self.vectors
    }
}

/// A fixed-shape tile product over packed, equally strided buffers.
pub trait MicroKernel {
    /// Which kernel this is.
    const KIND: KernelKind;
    /// Register tile computed by one call.
    const SHAPE: KernelShape;

    /// Computes `C[0:rows, 0:cols] += A[0:rows, 0:k] × B[0:k, 0:cols]`.
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - the CPU supports `Self::KIND` (see [`KernelKind::is_available`])
    /// - `a.add(r * ld + p)` is readable for `r < rows`, `p < k`
    /// - `b.add(p * ld)` is readable for `cols` f64s for `p < k`
    /// - `c.add(r * ld)` is readable and writable for `cols` f64s for `r < rows`
    unsafe fn run(k: usize, a: *const f64, b: *const f64, c: *mut f64, ld: usize);
}

/// Which micro-kernel implementation to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// Portable `f64::mul_add`
    Scalar,
    /// x86_64 AVX2 + FMA
    Avx2,
    /// x86_64 AVX-512F
    Avx512,
    /// aarch64 NEON
    Neon,
}

impl KernelKind {
    /// Every kernel, fastest first.
    pub const ALL: [KernelKind; 4] = [
        KernelKind::Avx512,
        KernelKind::Avx2,
        KernelKind::Neon,
        KernelKind::Scalar,
    ];

    /// Lowercase name, as accepted by `BLOCKGEMM_KERNEL`.
    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Scalar => "scalar",
            KernelKind::Avx2 => "avx2",
            KernelKind::Avx512 => "avx512",
            KernelKind::Neon => "neon",
        }
    }

    /// Register tile of this kernel, whether or not it is compiled in.
    pub const fn shape(self) -> KernelShape {
        match self {
            KernelKind::Scalar => KernelShape::new(3, 1, 16),
            KernelKind::Avx2 => KernelShape::new(3, 4, 4),
            KernelKind::Avx512 => KernelShape::new(3, 8, 2),
            KernelKind::Neon => KernelShape::new(3, 2, 8),
        }
    }

    /// Whether this kernel is compiled in and the CPU can execute it.
    pub fn is_available(self) -> bool {
        let ft = cpu_features();
        match self {
            KernelKind::Scalar => true,
            KernelKind::Avx2 => cfg!(target_arch = "x86_64") && ft.avx2 && ft.fma,
            KernelKind::Avx512 => cfg!(target_arch = "x86_64") && ft.avx512f,
            KernelKind::Neon => cfg!(target_arch = "aarch64") && ft.neon,
        }
    }

    /// Fastest kernel this CPU supports: AVX-512 > AVX2 > NEON > scalar.
    pub fn best_available() -> KernelKind {
        Self::ALL
            .into_iter()
            .find(|k| k.is_available())
            .unwrap_or(KernelKind::Scalar)
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
