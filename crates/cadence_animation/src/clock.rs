//! Frame timing
//!
//! The host supplies one [`FrameTime`] per tick. It carries a delta for every
//! [`TimeMode`], and each root node or tracker reads the one it was configured
//! with. [`Clock`] derives the five deltas from a single raw frame delta.

use crate::config::ClockConfig;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Selects which delta-time source drives a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeMode {
    /// Raw delta multiplied by the time scale
    #[default]
    Normal,
    /// Raw delta, ignoring the time scale
    Unscaled,
    /// Exponential moving average of the scaled delta
    Smooth,
    /// Fixed step multiplied by the time scale
    Fixed,
    /// Fixed step, ignoring the time scale
    FixedUnscaled,
}

/// Delta times for one tick, one per [`TimeMode`] (seconds)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub unscaled_delta: f32,
    pub smooth_delta: f32,
    pub fixed_delta: f32,
    pub fixed_unscaled_delta: f32,
}

impl FrameTime {
    /// Every mode sees the same delta
    pub fn uniform(dt: f32) -> Self {
        Self {
            delta: dt,
            unscaled_delta: dt,
            smooth_delta: dt,
            fixed_delta: dt,
            fixed_unscaled_delta: dt,
        }
    }

    pub fn delta(&self, mode: TimeMode) -> f32 {
        match mode {
            TimeMode::Normal => self.delta,
            TimeMode::Unscaled => self.unscaled_delta,
            TimeMode::Smooth => self.smooth_delta,
            TimeMode::Fixed => self.fixed_delta,
            TimeMode::FixedUnscaled => self.fixed_unscaled_delta,
        }
    }
}

/// Anything that can produce the next frame's timing
pub trait TimeSource {
    fn next_frame(&mut self) -> FrameTime;
}

/// Derives a [`FrameTime`] from raw frame deltas
#[derive(Clone, Debug)]
pub struct Clock {
    config: ClockConfig,
    smoothed: Option<f32>,
}

impl Clock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            smoothed: None,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }

    /// Advance by a raw delta (seconds)
    ///
    /// Negative or non-finite deltas are treated as zero; long stalls are
    /// capped at `max_delta`.
    pub fn advance(&mut self, raw: f32) -> FrameTime {
        let raw = if raw.is_finite() && raw >= 0.0 {
            raw
        } else {
            tracing::warn!("Clock: ignoring invalid raw delta {}", raw);
            0.0
        };
        let unscaled = raw.min(self.config.max_delta);
        let scaled = unscaled * self.config.time_scale;

        let smooth = match self.smoothed {
            Some(previous) => previous + (scaled - previous) * self.config.smoothing,
            None => scaled,
        };
        self.smoothed = Some(smooth);

        FrameTime {
            delta: scaled,
            unscaled_delta: unscaled,
            smooth_delta: smooth,
            fixed_delta: self.config.fixed_step * self.config.time_scale,
            fixed_unscaled_delta: self.config.fixed_step,
        }
    }

    /// Forget the smoothing history (e.g. after a pause)
    pub fn reset(&mut self) {
        self.smoothed = None;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

/// Wall-clock time source
pub struct SystemClock {
    clock: Clock,
    last_frame: Instant,
}

impl SystemClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            clock: Clock::new(config),
            last_frame: Instant::now(),
        }
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

impl TimeSource for SystemClock {
    fn next_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.clock.advance(dt)
    }
}

/// Time source that advances by the same raw delta every frame
pub struct ManualClock {
    clock: Clock,
    step: f32,
}

impl ManualClock {
    pub fn new(step: f32) -> Self {
        Self::with_config(step, ClockConfig::default())
    }

    pub fn with_config(step: f32, config: ClockConfig) -> Self {
        Self {
            clock: Clock::new(config),
            step,
        }
    }

    pub fn set_step(&mut self, step: f32) {
        self.step = step;
    }
}

impl TimeSource for ManualClock {
    fn next_frame(&mut self) -> FrameTime {
        self.clock.advance(self.step)
    }
}
