//! Engine configuration
//!
//! Clock tuning and follow-tracker presets. [`EngineConfig`] can be loaded
//! from TOML so hosts can keep animation feel in a data file:
//!
//! ```toml
//! default_time_mode = "Unscaled"
//!
//! [clock]
//! time_scale = 0.5
//!
//! [spring]
//! strength = 180.0
//! friction = 12.0
//! ```

use crate::clock::TimeMode;
use cadence_core::error::{ensure_non_negative, ensure_positive, AnimationError, Result};
use serde::{Deserialize, Serialize};

/// Clock tuning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Multiplier applied to the scaled time modes
    pub time_scale: f32,
    /// Weight of the newest delta in the smoothed delta (0..=1)
    pub smoothing: f32,
    /// Step used by the fixed time modes (seconds)
    pub fixed_step: f32,
    /// Upper bound on a single raw delta (seconds)
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            smoothing: 0.2,
            fixed_step: 1.0 / 60.0,
            max_delta: 0.25,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("time_scale", self.time_scale)?;
        ensure_positive("fixed_step", self.fixed_step)?;
        ensure_positive("max_delta", self.max_delta)?;
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(AnimationError::invalid(format!(
                "smoothing must lie in [0, 1] (got {})",
                self.smoothing
            )));
        }
        Ok(())
    }
}

/// Tuning for the first-order (ease) follow tracker
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaseConfig {
    /// Fraction of the remaining distance covered per second
    pub rapidity: f32,
    /// Distance at which the tracker snaps onto its target
    pub threshold: f32,
}

impl EaseConfig {
    pub fn new(rapidity: f32, threshold: f32) -> Self {
        Self {
            rapidity,
            threshold,
        }
    }

    /// Quick catch-up, good for cursors and selection highlights
    pub fn snappy() -> Self {
        Self::new(20.0, 0.01)
    }

    /// Slow, floaty pursuit (good for cameras)
    pub fn gentle() -> Self {
        Self::new(4.0, 0.01)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("ease rapidity", self.rapidity)?;
        ensure_non_negative("threshold", self.threshold)
    }
}

impl Default for EaseConfig {
    fn default() -> Self {
        Self::new(10.0, 0.01)
    }
}

/// Tuning for the second-order (spring-damper) follow tracker
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Acceleration per unit of distance to the target
    pub strength: f32,
    /// Fraction of the speed removed per second
    pub friction: f32,
    /// Distance at which the tracker snaps onto its target
    pub threshold: f32,
}

impl SpringConfig {
    pub fn new(strength: f32, friction: f32, threshold: f32) -> Self {
        Self {
            strength,
            friction,
            threshold,
        }
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 0.01)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 0.01)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 0.01)
    }

    /// A slow spring with no overshoot (critically damped)
    pub fn molasses() -> Self {
        Self::new(100.0, 20.0, 0.01)
    }

    /// Friction at which the spring stops oscillating
    pub fn critical_friction(&self) -> f32 {
        2.0 * self.strength.sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.friction < self.critical_friction()
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("spring strength", self.strength)?;
        ensure_non_negative("spring friction", self.friction)?;
        ensure_non_negative("threshold", self.threshold)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// Top-level engine configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Time mode given to nodes and trackers that do not pick one
    pub default_time_mode: TimeMode,
    pub clock: ClockConfig,
    pub ease: EaseConfig,
    pub spring: SpringConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| AnimationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AnimationError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.clock.validate()?;
        self.ease.validate()?;
        self.spring.validate()
    }
}
