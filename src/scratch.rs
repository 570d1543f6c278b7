//! Aligned scratch tiles for the packed operands.
//!
//! One `Scratch` is created per top-level call and dropped when the call
//! returns. Each tile is `tile × tile` f64s, zero-filled at creation and
//! aligned to a cache line so the first column of every packed row starts
//! on a vector boundary when `tile` is a multiple of 8.

use aligned_vec::{AVec, ConstAlign, avec};

/// Alignment of every scratch tile, in bytes.
pub const SCRATCH_ALIGN: usize = 64;

type Tile = AVec<f64, ConstAlign<SCRATCH_ALIGN>>;

/// What happens to tile cells outside the current block's extent.
///
/// The kernels always run the full register tile, so a partial block reads
/// padding rows of A and padding columns of B. Those only ever feed padding
/// rows and columns of C, which `unpack` never copies back, and the
/// reduction depth is always exact. Both policies therefore give the same
/// result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Leave whatever the previous block packed there.
    #[default]
    Reuse,
    /// Zero the padding of every tile before each pack.
    ZeroFill,
}

/// Packed A, B and C tiles sharing one row stride.
pub struct Scratch {
    a: Tile,
    b: Tile,
    c: Tile,
    ld: usize,
}

/// Mutable borrows of the three tiles, handed to the orchestrator.
pub struct ScratchTiles<'s> {
    /// Packed block of A
    pub a: &'s mut [f64],
    /// Packed block of B
    pub b: &'s mut [f64],
    /// Packed block of C, accumulated in place
    pub c: &'s mut [f64],
    /// Row stride shared by all three
    pub ld: usize,
}

impl Scratch {
    /// Allocates three zeroed `tile × tile` buffers.
    pub fn new(tile: usize) -> Self {
        let len = tile * tile;
        Scratch {
            a: avec![[SCRATCH_ALIGN]| 0.0; len],
            b: avec![[SCRATCH_ALIGN]| 0.0; len],
            c: avec![[SCRATCH_ALIGN]| 0.0; len],
            ld: tile,
        }
    }

    /// Row stride (and side length) of every tile.
    #[inline]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Borrows all three tiles at once.
    pub fn tiles(&mut self) -> ScratchTiles<'_> {
        ScratchTiles {
            a: &mut self.a,
            b: &mut self.b,
            c: &mut self.c,
            ld: self.ld,
        }
    }
}
