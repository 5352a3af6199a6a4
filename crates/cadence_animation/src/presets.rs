//! Animation presets for common entry/exit animations
//!
//! Pre-configured motions over a [`SharedValue`]. Each preset returns an
//! unplayed node, so it can be handed to a scheduler, a composite or the
//! reuse registry as is. Durations are in seconds.

use crate::curve::Curve;
use crate::easing::Easing;
use crate::interpolation::{Blink, Interpolation, Pulse, Shake};
use crate::motion::Motion;
use crate::property::SharedValue;
use cadence_core::error::Result;
use cadence_core::{Color, Vec2};

/// Pre-built animation presets for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fade animations
    // ========================================================================

    /// Fade in from transparent to opaque
    pub fn fade_in(opacity: &SharedValue<f32>, duration: f32) -> Result<Motion<f32>> {
        Motion::builder()
            .name("fade_in")
            .from(0.0)
            .to(1.0)
            .duration(duration)
            .easing(Easing::EaseOut)
            .property(opacity)
            .build()
    }

    /// Fade out from the current opacity
    pub fn fade_out(opacity: &SharedValue<f32>, duration: f32) -> Result<Motion<f32>> {
        Motion::builder()
            .name("fade_out")
            .from_current()
            .to(0.0)
            .duration(duration)
            .easing(Easing::EaseIn)
            .property(opacity)
            .build()
    }

    /// Blink `count` times, ending fully visible
    pub fn blink(opacity: &SharedValue<f32>, count: u32, duration: f32) -> Result<Motion<f32>> {
        Motion::builder()
            .name("blink")
            .from(0.0)
            .to(1.0)
            .duration(duration)
            .interpolation(Interpolation::Blink(Blink::new(count)?))
            .property(opacity)
            .build()
    }

    // ========================================================================
    // Scale animations
    // ========================================================================

    /// Scale in from nothing with slight overshoot
    pub fn scale_in(scale: &SharedValue<f32>, duration: f32) -> Result<Motion<f32>> {
        Motion::builder()
            .name("scale_in")
            .from(0.0)
            .to(1.0)
            .duration(duration)
            .easing(Easing::EaseOutBack)
            .property(scale)
            .build()
    }

    /// Pulse (scale up by `amount` and back)
    pub fn pulse(scale: &SharedValue<f32>, amount: f32, duration: f32) -> Result<Motion<f32>> {
        let rest = scale.get();
        Motion::builder()
            .name("pulse")
            .from(rest)
            .to(rest)
            .duration(duration)
            .interpolation(Interpolation::Pulse(Pulse::new(amount)))
            .property(scale)
            .build()
    }

    // ========================================================================
    // Slide animations
    // ========================================================================

    /// Slide in to the current position from `offset` away
    pub fn slide_in(
        position: &SharedValue<Vec2>,
        offset: Vec2,
        duration: f32,
    ) -> Result<Motion<Vec2>> {
        let rest = position.get();
        Motion::builder()
            .name("slide_in")
            .from(Vec2::new(rest.x + offset.x, rest.y + offset.y))
            .to(rest)
            .duration(duration)
            .easing(Easing::EaseOutCubic)
            .property(position)
            .build()
    }

    /// Slide out from the current position by `offset`
    pub fn slide_out(
        position: &SharedValue<Vec2>,
        offset: Vec2,
        duration: f32,
    ) -> Result<Motion<Vec2>> {
        let rest = position.get();
        Motion::builder()
            .name("slide_out")
            .from(rest)
            .to(Vec2::new(rest.x + offset.x, rest.y + offset.y))
            .duration(duration)
            .easing(Easing::EaseInCubic)
            .property(position)
            .build()
    }

    // ========================================================================
    // Special effect animations
    // ========================================================================

    /// Shake around the current position (for error feedback)
    ///
    /// The jitter fades out over the duration and the position ends where it
    /// started.
    pub fn shake(
        position: &SharedValue<Vec2>,
        intensity: f32,
        duration: f32,
    ) -> Result<Motion<Vec2>> {
        let rest = position.get();
        let shake =
            Shake::new(Vec2::new(intensity * 2.0, 0.0), 12.0)?.with_damper(Curve::ease_out());
        Motion::builder()
            .name("shake")
            .from(rest)
            .to(rest)
            .duration(duration)
            .interpolation(Interpolation::Shake(shake))
            .property(position)
            .build()
    }

    /// Fade a color toward `to` from its current value
    pub fn tint(color: &SharedValue<Color>, to: Color, duration: f32) -> Result<Motion<Color>> {
        Motion::builder()
            .name("tint")
            .from_current()
            .to(to)
            .duration(duration)
            .easing(Easing::EaseInOut)
            .property(color)
            .build()
    }
}
