//! Interpolation laws
//!
//! [`Interpolation`] is what a `Motion` evaluates every tick. Besides the
//! plain [`Easing`] families it carries the parameterized easings, which wrap
//! or post-process a base lerp:
//!
//! - [`Blink`]: hard toggles between the endpoints
//! - [`Pulse`]: base lerp plus a bump that overshoots and returns
//! - [`Shake`]: base lerp plus Perlin jitter, optionally damped
//! - [`Curve`]: interpolation factor taken from a user curve

use crate::curve::Curve;
use crate::easing::{ease_in_out_quad, Easing};
use crate::values::Animatable;
use cadence_core::error::{ensure_non_negative, AnimationError, Result};
use noise::{NoiseFn, Perlin};
use rand::Rng;
use std::fmt;
use std::rc::Rc;

/// Custom interpolation closure
pub type InterpolateFn<T> = Rc<dyn Fn(T, T, f32) -> T>;

/// The `(a, b, t) -> value` law applied by a motion
pub enum Interpolation<T: Animatable> {
    Eased(Easing),
    Blink(Blink),
    Pulse(Pulse<T>),
    Shake(Shake<T>),
    Curve(Curve),
    Custom(InterpolateFn<T>),
}

impl<T: Animatable> Interpolation<T> {
    /// Wrap an arbitrary closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(T, T, f32) -> T + 'static,
    {
        Interpolation::Custom(Rc::new(f))
    }

    /// Evaluate at normalized time `t` (clamped to `[0, 1]`)
    pub fn evaluate(&self, a: T, b: T, t: f32) -> T {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolation::Eased(easing) => easing.interpolate(a, b, t),
            Interpolation::Blink(blink) => blink.evaluate(a, b, t),
            Interpolation::Pulse(pulse) => pulse.evaluate(a, b, t),
            Interpolation::Shake(shake) => shake.evaluate(a, b, t),
            Interpolation::Curve(curve) => a.lerp(b, curve.evaluate(t)),
            Interpolation::Custom(f) => f(a, b, t),
        }
    }
}

impl<T: Animatable> Default for Interpolation<T> {
    fn default() -> Self {
        Interpolation::Eased(Easing::Linear)
    }
}

impl<T: Animatable> From<Easing> for Interpolation<T> {
    fn from(easing: Easing) -> Self {
        Interpolation::Eased(easing)
    }
}

impl<T: Animatable> From<Curve> for Interpolation<T> {
    fn from(curve: Curve) -> Self {
        Interpolation::Curve(curve)
    }
}

impl<T: Animatable> Clone for Interpolation<T> {
    fn clone(&self) -> Self {
        match self {
            Interpolation::Eased(easing) => Interpolation::Eased(*easing),
            Interpolation::Blink(blink) => Interpolation::Blink(*blink),
            Interpolation::Pulse(pulse) => Interpolation::Pulse(*pulse),
            Interpolation::Shake(shake) => Interpolation::Shake(shake.clone()),
            Interpolation::Curve(curve) => Interpolation::Curve(curve.clone()),
            Interpolation::Custom(f) => Interpolation::Custom(Rc::clone(f)),
        }
    }
}

impl<T: Animatable> fmt::Debug for Interpolation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Eased(easing) => f.debug_tuple("Eased").field(easing).finish(),
            Interpolation::Blink(blink) => f.debug_tuple("Blink").field(blink).finish(),
            Interpolation::Pulse(pulse) => f.debug_tuple("Pulse").field(pulse).finish(),
            Interpolation::Shake(shake) => f.debug_tuple("Shake").field(shake).finish(),
            Interpolation::Curve(curve) => f.debug_tuple("Curve").field(curve).finish(),
            Interpolation::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// Blink
// ============================================================================

/// Alternates between `a` and `b` `count` times, landing on `b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blink {
    count: u32,
}

impl Blink {
    pub fn new(count: u32) -> Result<Self> {
        if count == 0 {
            return Err(AnimationError::invalid("blink count must be at least 1"));
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn evaluate<T: Animatable>(&self, a: T, b: T, t: f32) -> T {
        if t >= 1.0 - f32::EPSILON {
            return b;
        }
        let phase = (t * self.count as f32 * 2.0).floor() as u64;
        if phase % 2 == 0 {
            a
        } else {
            b
        }
    }
}

// ============================================================================
// Pulse
// ============================================================================

/// Linear interpolation plus a bump of `offset` peaking at `t = 0.5`
///
/// The bump rises and falls with two quad in-out halves, so the value leaves
/// the base lerp and rejoins it at both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse<T: Animatable> {
    offset: T,
}

impl<T: Animatable> Pulse<T> {
    pub fn new(offset: T) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> T {
        self.offset
    }

    pub fn evaluate(&self, a: T, b: T, t: f32) -> T {
        let base = a.lerp(b, t);
        base.add(self.offset.scale(pulse_bump(t)))
    }
}

fn pulse_bump(t: f32) -> f32 {
    if t < 0.5 {
        ease_in_out_quad(t * 2.0)
    } else {
        1.0 - ease_in_out_quad((t - 0.5) * 2.0)
    }
}

// ============================================================================
// Shake
// ============================================================================

// Non-integer lattice row; Perlin noise is zero on integer coordinates
const SHAKE_NOISE_ROW: f64 = 0.37;

/// Linear interpolation plus Perlin jitter scaled by `magnitude`
///
/// Each instance draws its own noise seed and phase, and so does every clone,
/// so shakes started together do not move in lockstep.
pub struct Shake<T: Animatable> {
    magnitude: T,
    frequency: f32,
    damper: Option<Curve>,
    phase: f32,
    perlin: Perlin,
}

impl<T: Animatable> Shake<T> {
    pub fn new(magnitude: T, frequency: f32) -> Result<Self> {
        let mut rng = rand::thread_rng();
        Self::seeded(magnitude, frequency, rng.gen(), rng.gen_range(0.0..1000.0))
    }

    /// Deterministic construction with an explicit noise seed and phase
    pub fn seeded(magnitude: T, frequency: f32, seed: u32, phase: f32) -> Result<Self> {
        ensure_non_negative("shake frequency", frequency)?;
        Ok(Self {
            magnitude,
            frequency,
            damper: None,
            phase,
            perlin: Perlin::new(seed),
        })
    }

    /// Scale the jitter by `damper.evaluate(t)`
    pub fn with_damper(mut self, damper: Curve) -> Self {
        self.damper = Some(damper);
        self
    }

    pub fn magnitude(&self) -> T {
        self.magnitude
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn damper(&self) -> Option<&Curve> {
        self.damper.as_ref()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Jitter factor in `[-0.5, 0.5]` before damping
    pub fn jitter(&self, t: f32) -> f32 {
        let x = (t * self.frequency + self.phase) as f64;
        let n = self.perlin.get([x, SHAKE_NOISE_ROW]);
        let normalized = (n * 0.5 + 0.5).clamp(0.0, 1.0) as f32;
        normalized - 0.5
    }

    pub fn evaluate(&self, a: T, b: T, t: f32) -> T {
        let base = a.lerp(b, t);
        let damping = self.damper.as_ref().map_or(1.0, |curve| curve.evaluate(t));
        base.add(self.magnitude.scale(self.jitter(t) * damping))
    }
}

impl<T: Animatable> Clone for Shake<T> {
    fn clone(&self) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            magnitude: self.magnitude,
            frequency: self.frequency,
            damper: self.damper.clone(),
            phase: rng.gen_range(0.0..1000.0),
            perlin: Perlin::new(rng.gen()),
        }
    }
}

impl<T: Animatable> fmt::Debug for Shake<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shake")
            .field("magnitude", &self.magnitude)
            .field("frequency", &self.frequency)
            .field("damper", &self.damper)
            .field("phase", &self.phase)
            .finish()
    }
}
