//! Block parameter sets for the three blocking levels.

use crate::error::ParamError;
use crate::kernels::KernelShape;

/// Tile sizes for one instantiation of the blocked multiply.
///
/// `tile` is the side of the packed macro block, `l1_*` the L1 block
/// inside it, and `reg_k` the reduction depth of one micro-kernel call.
/// The register tile's rows and columns come from the kernel itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockParams {
    /// Side of the square packed scratch tiles
    pub tile: usize,
    /// Rows of an L1 block
    pub l1_m: usize,
    /// Columns of an L1 block
    pub l1_n: usize,
    /// Reduction depth of an L1 block
    pub l1_k: usize,
    /// Reduction depth of one micro-kernel call
    pub reg_k: usize,
}

impl BlockParams {
    /// Tuned for matrices of a few hundred rows and up. Three 192×192
    /// tiles fill about 864 KiB of L2; a 48×32 L1 block of A plus a 32×32
    /// block of B stays under 32 KiB.
    pub const LARGE: BlockParams = BlockParams {
        tile: 192,
        l1_m: 48,
        l1_n: 32,
        l1_k: 32,
        reg_k: 32,
    };

    /// Tuned for small matrices, where a 192 tile would be mostly padding.
    pub const SMALL: BlockParams = BlockParams {
        tile: 48,
        l1_m: 48,
        l1_n: 16,
        l1_k: 16,
        reg_k: 16,
    };

    /// Checks that the fixed-shape kernel never writes past a tile and
    /// that register tiles never straddle two L1 blocks.
    pub fn validate(&self, shape: KernelShape) -> Result<(), ParamError> {
        let fields = [
            ("tile", self.tile),
            ("l1_m", self.l1_m),
            ("l1_n", self.l1_n),
            ("l1_k", self.l1_k),
            ("reg_k", self.reg_k),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ParamError::Zero { name });
            }
        }

        let l1 = [
            ("l1_m", self.l1_m),
            ("l1_n", self.l1_n),
            ("l1_k", self.l1_k),
        ];
        for (name, value) in l1 {
            if value > self.tile {
                return Err(ParamError::ExceedsTile {
                    name,
                    value,
                    tile: self.tile,
                });
            }
        }

        let rows = shape.rows;
        let cols = shape.cols();
        let multiples = [
            ("tile", self.tile, rows),
            ("l1_m", self.l1_m, rows),
            ("tile", self.tile, cols),
            ("l1_n", self.l1_n, cols),
        ];
        for (name, value, unit) in multiples {
            if value % unit != 0 {
                return Err(ParamError::NotMultiple { name, value, unit });
            }
        }
        Ok(())
    }
}

/// Which parameter set a call should use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamSet {
    /// [`BlockParams::LARGE`]
    Large,
    /// [`BlockParams::SMALL`]
    Small,
    /// `Small` below one large tile, `Large` otherwise.
    Auto,
    /// Caller-chosen sizes, validated per call
    Custom(BlockParams),
}

impl ParamSet {
    /// The block sizes to use for an `n × n` multiply.
    pub fn resolve(self, n: usize) -> BlockParams {
        match self {
            ParamSet::Large => BlockParams::LARGE,
            ParamSet::Small => BlockParams::SMALL,
            ParamSet::Auto if n < BlockParams::LARGE.tile => BlockParams::SMALL,
            ParamSet::Auto => BlockParams::LARGE,
            ParamSet::Custom(params) => params,
        }
    }
}
