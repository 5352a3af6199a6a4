//! Leaf nodes
//!
//! [`Motion`] interpolates one value between two endpoints and writes it
//! through a setter every tick. [`Timer`] carries no value and only occupies
//! time, typically as a delay inside a `Sequence`.

use crate::clock::TimeMode;
use crate::easing::Easing;
use crate::interpolation::Interpolation;
use crate::node::{Callbacks, PlayStart, Playable, PlaybackCore};
use crate::property::{Getter, SharedValue, Setter};
use crate::values::Animatable;
use cadence_core::error::{ensure_non_negative, AnimationError, Result};
use std::any::Any;

/// Duration used when a builder is not given one (seconds)
pub const DEFAULT_DURATION: f32 = 1.0;

// ============================================================================
// Motion
// ============================================================================

/// A single interpolation from an initial to a final value
pub struct Motion<T: Animatable> {
    core: PlaybackCore,
    duration: f32,
    /// `None` reads the getter when playback starts
    from: Option<T>,
    to: T,
    /// Initial value resolved at the last start
    start: T,
    interpolation: Interpolation<T>,
    getter: Option<Getter<T>>,
    setter: Setter<T>,
}

impl<T: Animatable> Motion<T> {
    pub fn builder() -> MotionBuilder<T> {
        MotionBuilder::new()
    }

    /// The configured initial value, if it is not read from the host
    pub fn from_value(&self) -> Option<T> {
        self.from
    }

    pub fn to_value(&self) -> T {
        self.to
    }

    /// Initial value used by the current (or last) playback
    pub fn start_value(&self) -> T {
        self.start
    }

    pub fn interpolation(&self) -> &Interpolation<T> {
        &self.interpolation
    }

    /// Set the initial value; `None` starts from the host's current value
    ///
    /// Fails if `None` is given and the motion has no getter.
    pub fn set_from(&mut self, from: Option<T>) -> Result<()> {
        if from.is_none() && self.getter.is_none() {
            return Err(AnimationError::invalid(
                "motion without a getter needs an explicit initial value",
            ));
        }
        self.from = from;
        Ok(())
    }

    pub fn set_to(&mut self, to: T) {
        self.to = to;
    }

    pub fn set_duration(&mut self, duration: f32) -> Result<()> {
        ensure_non_negative("motion duration", duration)?;
        self.duration = duration;
        Ok(())
    }

    pub fn set_interpolation(&mut self, interpolation: impl Into<Interpolation<T>>) {
        self.interpolation = interpolation.into();
    }

    /// The value at the current elapsed time, without applying it
    pub fn sample(&self) -> T {
        if self.duration <= 0.0 {
            return self.to;
        }
        self.interpolation
            .evaluate(self.start, self.to, self.core.elapsed() / self.duration)
    }

    fn resolve_start(&mut self) {
        self.start = match (self.from, &self.getter) {
            (Some(from), _) => from,
            (None, Some(getter)) => getter(),
            // Rejected at build time and by `set_from`
            (None, None) => self.start,
        };
    }

    fn finish(&mut self) {
        (self.setter)(self.to);
        self.core.fire_update();
        self.core.complete(self.duration);
    }
}

impl<T: Animatable> Playable for Motion<T> {
    fn core(&self) -> &PlaybackCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlaybackCore {
        &mut self.core
    }

    fn play(&mut self) {
        if self.core.begin_play() == PlayStart::Started {
            self.resolve_start();
            if self.duration <= 0.0 {
                self.finish();
            }
        }
    }

    fn pause(&mut self) {
        self.core.pause();
    }

    fn stop(&mut self) {
        self.core.reset();
    }

    fn interrupt(&mut self) {
        self.core.interrupt();
    }

    fn update(&mut self, dt: f32) {
        if !self.is_playing() {
            return;
        }
        if self.core.advance(dt, self.duration) {
            self.finish();
            return;
        }
        let value = self.sample();
        (self.setter)(value);
        self.core.fire_update();
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder for [`Motion`]
///
/// ```ignore
/// let opacity = SharedValue::new(0.0_f32);
/// let fade = Motion::builder()
///     .from(0.0)
///     .to(1.0)
///     .duration(0.3)
///     .easing(Easing::EaseOutCubic)
///     .property(&opacity)
///     .build()?;
/// ```
pub struct MotionBuilder<T: Animatable> {
    name: Option<String>,
    from: Option<T>,
    to: Option<T>,
    duration: f32,
    interpolation: Interpolation<T>,
    time_mode: TimeMode,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
    callbacks: Callbacks,
}

impl<T: Animatable> MotionBuilder<T> {
    pub fn new() -> Self {
        Self {
            name: None,
            from: None,
            to: None,
            duration: DEFAULT_DURATION,
            interpolation: Interpolation::default(),
            time_mode: TimeMode::default(),
            getter: None,
            setter: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from(mut self, value: T) -> Self {
        self.from = Some(value);
        self
    }

    /// Start from whatever the getter returns when playback starts
    pub fn from_current(mut self) -> Self {
        self.from = None;
        self
    }

    pub fn to(mut self, value: T) -> Self {
        self.to = Some(value);
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.interpolation = Interpolation::Eased(easing);
        self
    }

    pub fn interpolation(mut self, interpolation: impl Into<Interpolation<T>>) -> Self {
        self.interpolation = interpolation.into();
        self
    }

    pub fn time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    pub fn getter<F: Fn() -> T + 'static>(mut self, getter: F) -> Self {
        self.getter = Some(Box::new(getter));
        self
    }

    pub fn setter<F: FnMut(T) + 'static>(mut self, setter: F) -> Self {
        self.setter = Some(Box::new(setter));
        self
    }

    /// Read and write a shared cell
    pub fn property(self, value: &SharedValue<T>) -> Self {
        self.getter(value.getter()).setter(value.setter())
    }

    pub fn on_start<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_start(f);
        self
    }

    pub fn on_update<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_update(f);
        self
    }

    pub fn on_interrupt<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_interrupt(f);
        self
    }

    pub fn on_complete<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_complete(f);
        self
    }

    pub fn build(self) -> Result<Motion<T>> {
        let setter = self
            .setter
            .ok_or_else(|| AnimationError::invalid("motion requires a setter"))?;
        let to = self
            .to
            .ok_or_else(|| AnimationError::invalid("motion requires a final value"))?;
        if self.from.is_none() && self.getter.is_none() {
            return Err(AnimationError::invalid(
                "motion without a getter needs an explicit initial value",
            ));
        }
        ensure_non_negative("motion duration", self.duration)?;

        let mut core = PlaybackCore::new();
        if let Some(name) = self.name {
            core.set_name(name);
        }
        core.set_time_mode(self.time_mode);
        *core.callbacks_mut() = self.callbacks;

        Ok(Motion {
            core,
            duration: self.duration,
            from: self.from,
            to,
            start: self.from.unwrap_or(to),
            interpolation: self.interpolation,
            getter: self.getter,
            setter,
        })
    }
}

impl<T: Animatable> Default for MotionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Timer
// ============================================================================

/// A pure delay
pub struct Timer {
    core: PlaybackCore,
    duration: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Result<Self> {
        ensure_non_negative("timer duration", duration)?;
        Ok(Self {
            core: PlaybackCore::new(),
            duration,
        })
    }

    pub fn set_duration(&mut self, duration: f32) -> Result<()> {
        ensure_non_negative("timer duration", duration)?;
        self.duration = duration;
        Ok(())
    }

    fn finish(&mut self) {
        self.core.fire_update();
        self.core.complete(self.duration);
    }
}

impl Playable for Timer {
    fn core(&self) -> &PlaybackCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlaybackCore {
        &mut self.core
    }

    fn play(&mut self) {
        if self.core.begin_play() == PlayStart::Started && self.duration <= 0.0 {
            self.finish();
        }
    }

    fn pause(&mut self) {
        self.core.pause();
    }

    fn stop(&mut self) {
        self.core.reset();
    }

    fn interrupt(&mut self) {
        self.core.interrupt();
    }

    fn update(&mut self, dt: f32) {
        if !self.is_playing() {
            return;
        }
        if self.core.advance(dt, self.duration) {
            self.finish();
        } else {
            self.core.fire_update();
        }
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PlayableExt, PlaybackState};
    use cadence_core::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn test_motion_lands_exactly_on_final_value() {
        let value = SharedValue::new(0.0_f32);
        let (completions, on_complete) = counter();
        let mut motion = Motion::builder()
            .from(0.0)
            .to(0.3)
            .duration(0.7)
            .easing(Easing::EaseInOutSine)
            .property(&value)
            .on_complete(on_complete)
            .build()
            .unwrap();

        motion.play();
        for _ in 0..60 {
            motion.update(1.0 / 60.0);
        }
        assert_eq!(value.get(), 0.3);
        assert_eq!(motion.state(), PlaybackState::Completed);
        assert_eq!(completions.get(), 1);

        motion.update(1.0);
        assert_eq!(completions.get(), 1, "completed motions ignore updates");
    }

    #[test]
    fn test_motion_midpoint() {
        let value = SharedValue::new(Vec2::ZERO);
        let mut motion = Motion::builder()
            .from(Vec2::ZERO)
            .to(Vec2::new(10.0, -4.0))
            .duration(2.0)
            .property(&value)
            .build()
            .unwrap();

        motion.play();
        motion.update(1.0);
        assert!((value.get().x - 5.0).abs() < 1e-5);
        assert!((value.get().y + 2.0).abs() < 1e-5);
        assert!((motion.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_update_is_ignored_unless_playing() {
        let value = SharedValue::new(1.0_f32);
        let mut motion = Motion::builder()
            .from(0.0)
            .to(2.0)
            .property(&value)
            .build()
            .unwrap();

        motion.update(0.5);
        assert_eq!(value.get(), 1.0);
        assert_eq!(motion.elapsed(), 0.0);

        motion.play();
        motion.update(0.25);
        motion.pause();
        let paused_at = value.get();
        motion.update(0.25);
        assert_eq!(value.get(), paused_at);

        motion.play();
        assert_eq!(motion.elapsed(), 0.25, "resume keeps elapsed time");
    }

    #[test]
    fn test_from_current_reads_getter_at_play() {
        let value = SharedValue::new(4.0_f32);
        let mut motion = Motion::builder()
            .from_current()
            .to(8.0)
            .duration(1.0)
            .property(&value)
            .build()
            .unwrap();

        value.set(6.0);
        motion.play();
        assert_eq!(motion.start_value(), 6.0);
        motion.update(0.5);
        assert!((value.get() - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_duration_completes_on_play() {
        let value = SharedValue::new(0.0_f32);
        let (completions, on_complete) = counter();
        let mut motion = Motion::builder()
            .from(0.0)
            .to(3.0)
            .duration(0.0)
            .property(&value)
            .on_complete(on_complete)
            .build()
            .unwrap();

        motion.play();
        assert_eq!(value.get(), 3.0);
        assert_eq!(motion.state(), PlaybackState::Completed);
        assert_eq!(motion.progress(), 1.0);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_interrupt_skips_completion() {
        let value = SharedValue::new(0.0_f32);
        let (completions, on_complete) = counter();
        let (interrupts, on_interrupt) = counter();
        let mut motion = Motion::builder()
            .from(0.0)
            .to(1.0)
            .property(&value)
            .on_complete(on_complete)
            .on_interrupt(on_interrupt)
            .build()
            .unwrap();

        motion.play();
        motion.update(0.5);
        motion.interrupt();
        motion.interrupt();
        motion.update(1.0);

        assert_eq!(motion.state(), PlaybackState::Interrupted);
        assert_eq!(interrupts.get(), 1);
        assert_eq!(completions.get(), 0);
        assert!(value.get() < 1.0);
    }

    #[test]
    fn test_replay_restarts_from_zero() {
        let value = SharedValue::new(0.0_f32);
        let (starts, on_start) = counter();
        let mut motion = Motion::builder()
            .from(0.0)
            .to(1.0)
            .duration(0.5)
            .property(&value)
            .build()
            .unwrap()
            .on_start(on_start);

        motion.play();
        motion.update(1.0);
        motion.play();
        assert_eq!(motion.state(), PlaybackState::Playing);
        assert_eq!(motion.elapsed(), 0.0);
        assert_eq!(starts.get(), 2);
    }

    #[test]
    fn test_stop_fires_no_callbacks() {
        let value = SharedValue::new(0.0_f32);
        let (interrupts, on_interrupt) = counter();
        let (completions, on_complete) = counter();
        let mut motion = Motion::builder()
            .from(0.0)
            .to(1.0)
            .property(&value)
            .on_interrupt(on_interrupt)
            .on_complete(on_complete)
            .build()
            .unwrap();

        motion.play();
        motion.update(0.1);
        motion.stop();
        motion.stop();
        assert_eq!(motion.state(), PlaybackState::Idle);
        assert_eq!(motion.elapsed(), 0.0);
        assert_eq!(interrupts.get() + completions.get(), 0);
    }

    #[test]
    fn test_build_rejects_invalid_configuration() {
        let missing_setter = Motion::<f32>::builder().from(0.0).to(1.0).build();
        assert!(matches!(
            missing_setter,
            Err(AnimationError::InvalidConfiguration(_))
        ));

        let missing_initial = Motion::<f32>::builder().to(1.0).setter(|_| {}).build();
        assert!(missing_initial.is_err());

        let negative = Motion::<f32>::builder()
            .from(0.0)
            .to(1.0)
            .duration(-1.0)
            .setter(|_| {})
            .build();
        assert!(negative.is_err());

        let nan = Motion::<f32>::builder()
            .from(0.0)
            .to(1.0)
            .duration(f32::NAN)
            .setter(|_| {})
            .build();
        assert!(nan.is_err());
    }

    #[test]
    fn test_set_from_requires_getter() {
        let mut motion = Motion::<f32>::builder()
            .from(0.0)
            .to(1.0)
            .setter(|_| {})
            .build()
            .unwrap();
        assert!(motion.set_from(None).is_err());
        assert!(motion.set_from(Some(2.0)).is_ok());
        assert_eq!(motion.from_value(), Some(2.0));
    }

    #[test]
    fn test_timer() {
        let (completions, on_complete) = counter();
        let mut timer = Timer::new(0.3).unwrap().on_complete(on_complete);
        timer.play();
        timer.update(0.1);
        timer.update(0.1);
        assert_eq!(timer.state(), PlaybackState::Playing);
        timer.update(0.1);
        assert_eq!(timer.state(), PlaybackState::Completed);
        assert_eq!(completions.get(), 1);

        assert!(Timer::new(-0.1).is_err());
    }
}
