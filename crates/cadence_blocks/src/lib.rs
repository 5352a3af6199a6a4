//! Cadence Authoring Blocks
//!
//! A named, path-addressable tree mirroring the playback nodes, for tools
//! that edit animations as data before turning them into something playable.
//!
//! - **Blocks**: [`Block`] trees of motions, timers, sequences and parallels
//! - **Addressing**: `"Parallel/Sequence1/Motion2D"` style lookups that return
//!   `None` on a miss instead of failing
//! - **Batch Operations**: bulk edits applied across a sibling list, one call
//!   per index
//!
//! A tree becomes playable through [`Block::build`].

pub mod batch;
pub mod block;
pub mod value;

pub use batch::{
    apply_batch, build_all, BatchOperation, CopyFromTemplate, IncrementalDuration, Rename,
    SetSetterTarget,
};
pub use block::{Block, CompositeBlock, MotionBlock, TimerBlock, PATH_SEPARATOR};
pub use value::{BlockInterpolation, BlockTarget, BlockValue, ValueKind};
