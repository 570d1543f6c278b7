//! Cache-blocked multiply: the three loop levels above the microkernel.
//!
//! - `macro_block`: splits the n×n problem into `tile`-sized blocks, packs
//!   them into scratch tiles and unpacks the finished C block
//! - `l1_block`: walks a packed macro block in L1-sized pieces
//! - `register_block`: walks an L1 block in microkernel-sized tiles
//!
//! The two inner levels only do index arithmetic on the packed tiles; every
//! floating-point operation happens in the kernel.

pub mod l1_block;
pub mod macro_block;
pub mod register_block;
