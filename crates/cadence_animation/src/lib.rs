//! Cadence Animation Engine
//!
//! Tick-driven composition and playback of value animations.
//!
//! # Features
//!
//! - **Numeric Abstraction**: one small [`Animatable`] impl per value type
//! - **Easing Library**: the standard easing families plus Blink, Pulse,
//!   Shake and Curve interpolations
//! - **Playback Nodes**: [`Motion`] and [`Timer`] leaves with an explicit
//!   lifecycle and callback hooks
//! - **Composition**: [`Sequence`] and [`Parallel`], nestable to any depth
//! - **Reuse Registry**: at most one live node per `(owner, id)` key
//! - **Follow Trackers**: ease and spring pursuit of a moving target
//!
//! # Example
//!
//! ```ignore
//! use cadence_animation::prelude::*;
//!
//! let opacity = SharedValue::new(0.0_f32);
//! let mut scheduler = Scheduler::new();
//! scheduler.spawn(
//!     Sequence::new()
//!         .with(Timer::new(0.1)?)
//!         .with(AnimationPreset::fade_in(&opacity, 0.3)?),
//! );
//! while scheduler.tick(&FrameTime::uniform(1.0 / 60.0)) {}
//! assert_eq!(opacity.get(), 1.0);
//! ```

pub mod clock;
pub mod config;
pub mod curve;
pub mod easing;
pub mod interpolation;
pub mod motion;
pub mod node;
pub mod parallel;
pub mod presets;
pub mod property;
pub mod registry;
pub mod scheduler;
pub mod sequence;
pub mod tracker;
pub mod values;

pub use clock::{Clock, FrameTime, ManualClock, SystemClock, TimeMode, TimeSource};
pub use config::{ClockConfig, EaseConfig, EngineConfig, SpringConfig};
pub use curve::{Curve, CurveKey};
pub use easing::Easing;
pub use interpolation::{Blink, Interpolation, Pulse, Shake};
pub use motion::{Motion, MotionBuilder, Timer};
pub use node::{Callbacks, Playable, PlayableExt, PlaybackCore, PlaybackState};
pub use parallel::Parallel;
pub use presets::AnimationPreset;
pub use property::SharedValue;
pub use registry::{OwnerKey, ReuseRegistry};
pub use scheduler::{NodeId, Scheduler, TrackerId};
pub use sequence::Sequence;
pub use tracker::{FollowLaw, Track, Tracker};
pub use values::Animatable;

pub use cadence_core::{AnimationError, Color, OwnerId, OwnerIdGenerator, Result, Vec2, Vec3};

/// Everything needed to build and drive animations
pub mod prelude {
    pub use crate::{
        AnimationPreset, Animatable, Blink, Clock, Curve, EaseConfig, Easing, EngineConfig,
        FrameTime, Interpolation, ManualClock, Motion, OwnerId, Parallel, Playable, PlayableExt,
        PlaybackState, Pulse, Scheduler, Sequence, Shake, SharedValue, SpringConfig, TimeMode,
        Timer, Tracker,
    };
}
