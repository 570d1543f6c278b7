//! Cache-blocked square DGEMM: `C += A × B` on one core.
//!
//! The multiply is blocked three times. `tile`-sized macro blocks are packed
//! into aligned scratch tiles, each tile is walked in L1-sized pieces, and
//! each piece is walked by a 3×16 register-tile microkernel that keeps the
//! output in vector registers and does one FMA per element per step.
//! Packing lets the microkernel run at a fixed stride without edge cases:
//! partial blocks just leave padding in the tile that never gets copied back.
//!
//! ## Usage
//!
//! ```
//! use blockgemm::multiply_accumulate;
//!
//! let n = 200;
//! let a = vec![1.0f64; n * n];
//! let b = vec![2.0f64; n * n];
//! let mut c = vec![1.0f64; n * n];
//!
//! multiply_accumulate(n, &a, &b, &mut c);
//! assert!(c.iter().all(|&x| x == 1.0 + 2.0 * n as f64));
//! ```
//!
//! To pin the block sizes, kernel or padding policy, pass a [`Config`]:
//!
//! ```
//! use blockgemm::{multiply_accumulate_with, Config, KernelKind, ParamSet};
//!
//! let config = Config::default()
//!     .with_param_set(ParamSet::Small)
//!     .with_kernel(KernelKind::Scalar);
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [5.0, 6.0, 7.0, 8.0];
//! let mut c = vec![0.0; 4];
//! multiply_accumulate_with(&config, 2, &a, &b, &mut c).unwrap();
//! assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! ## Numerics
//!
//! Every output element is accumulated in increasing reduction order, one
//! fused multiply-add per term: `c = fma(a[r][p], b[p][c], c)` for
//! `p = 0..n`. Block sizes and kernel choice do not change the result, but
//! it can differ in the last bits from a loop that rounds the product
//! before adding.

#![warn(missing_docs)]

pub mod blocked;
pub mod config;
pub mod cpu;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod pack;
pub mod params;
pub mod scratch;

pub use config::{Config, GLOBAL_CONFIG};
pub use error::{Error, ParamError, Result};
pub use kernels::{KernelKind, KernelShape, MicroKernel};
pub use params::{BlockParams, ParamSet};
pub use scratch::PaddingPolicy;

use blocked::macro_block::multiply_blocked;
use kernels::ScalarKernel;
use matrix::{MatrixView, MatrixViewMut, check_len};

#[cfg(target_arch = "x86_64")]
use kernels::{Avx2Kernel, Avx512Kernel};

#[cfg(target_arch = "aarch64")]
use kernels::NeonKernel;

fn check_lengths(n: usize, a: &[f64], b: &[f64], c: &[f64]) {
    check_len("A", n, a.len());
    check_len("B", n, b.len());
    check_len("C", n, c.len());
}

/// Square matrix multiply-accumulate: C += A * B
///
/// All three matrices are `n × n`, row-major with stride `n`. Uses the
/// process-wide [`GLOBAL_CONFIG`]: the fastest kernel the CPU supports and
/// block sizes picked by matrix size, unless overridden by environment.
/// `n = 0` does nothing.
///
/// # Panics
///
/// Panics if any slice holds fewer than `n * n` elements.
pub fn multiply_accumulate(n: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
    if let Err(err) = multiply_accumulate_with(&GLOBAL_CONFIG, n, a, b, c) {
        // the global config only ever holds presets and available kernels
        unreachable!("global configuration rejected: {err}");
    }
}

/// Same as [`multiply_accumulate`] with an explicit [`Config`].
///
/// # Errors
///
/// - [`Error::KernelUnavailable`] if the config asks for a kernel this CPU
///   cannot run
/// - [`Error::InvalidParams`] if custom block sizes do not fit the kernel
///
/// # Panics
///
/// Panics if any slice holds fewer than `n * n` elements.
pub fn multiply_accumulate_with(
    config: &Config,
    n: usize,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
) -> Result<()> {
    check_lengths(n, a, b, c);

    let kind = config.kernel_kind()?;
    let params = config.params.resolve(n);
    params.validate(kind.shape())?;

    let a = MatrixView::new(a, n);
    let b = MatrixView::new(b, n);
    let mut c = MatrixViewMut::new(c, n);
    let p = &params;
    let pad = config.padding;

    // SAFETY: `kernel_kind` only returns kernels the CPU supports and the
    // params were validated against that kernel's shape above.
    unsafe {
        match kind {
            KernelKind::Scalar => multiply_blocked::<ScalarKernel>(p, pad, a, b, &mut c),
            #[cfg(target_arch = "x86_64")]
            KernelKind::Avx2 => multiply_blocked::<Avx2Kernel>(p, pad, a, b, &mut c),
            #[cfg(target_arch = "x86_64")]
            KernelKind::Avx512 => multiply_blocked::<Avx512Kernel>(p, pad, a, b, &mut c),
            #[cfg(target_arch = "aarch64")]
            KernelKind::Neon => multiply_blocked::<NeonKernel>(p, pad, a, b, &mut c),
            #[allow(unreachable_patterns)]
            other => return Err(Error::KernelUnavailable(other)),
        }
    }
    Ok(())
}
