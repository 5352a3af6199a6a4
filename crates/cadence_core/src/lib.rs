//! Cadence Core
//!
//! Foundational types shared by the cadence animation crates:
//!
//! - **Values**: `Vec2`, `Vec3` and linear RGBA `Color`
//! - **Owner Identity**: keys for per-owner animation caches
//! - **Errors**: the fail-fast configuration error type

pub mod error;
pub mod owner;
pub mod values;

pub use error::{AnimationError, Result};
pub use owner::{OwnerId, OwnerIdGenerator};
pub use values::{Color, Vec2, Vec3};
