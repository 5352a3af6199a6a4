//! Continuous follow trackers
//!
//! A [`Tracker`] pursues a (possibly moving) target forever instead of running
//! to completion. Two laws are available:
//!
//! - **Ease**: first-order pursuit, `speed = (target - current) * rapidity`
//! - **Spring**: second-order spring-damper,
//!   `speed += (target - current) * strength * dt`, then
//!   `speed -= speed * friction * dt`
//!
//! In both cases `current += speed * dt`. Once the remaining distance drops to
//! the threshold the tracker snaps exactly onto the target, goes idle and fires
//! `on_became_idle` once. Moving the target away again wakes it up.

use crate::clock::TimeMode;
use crate::config::{EaseConfig, SpringConfig};
use crate::node::Callback;
use crate::property::{Getter, Setter};
use crate::values::Animatable;
use cadence_core::error::Result;
use smallvec::SmallVec;
use std::any::Any;

/// Pursuit law and its tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowLaw {
    Ease { rapidity: f32 },
    Spring { strength: f32, friction: f32 },
}

/// Object-safe view of a tracker, as stored by the scheduler
pub trait Track: Any {
    fn update(&mut self, dt: f32);

    fn is_active(&self) -> bool;

    fn time_mode(&self) -> TimeMode;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Drives a host property toward a target every tick
pub struct Tracker<T: Animatable> {
    name: Option<String>,
    getter: Getter<T>,
    setter: Setter<T>,
    law: FollowLaw,
    threshold: f32,
    time_mode: TimeMode,
    target: T,
    target_source: Option<Getter<T>>,
    speed: T,
    active: bool,
    on_became_idle: SmallVec<[Callback; 1]>,
}

impl<T: Animatable> Tracker<T> {
    /// First-order pursuit
    pub fn ease<G, S>(getter: G, setter: S, config: EaseConfig) -> Result<Self>
    where
        G: Fn() -> T + 'static,
        S: FnMut(T) + 'static,
    {
        config.validate()?;
        Ok(Self::with_law(
            Box::new(getter),
            Box::new(setter),
            FollowLaw::Ease {
                rapidity: config.rapidity,
            },
            config.threshold,
        ))
    }

    /// Second-order spring-damper pursuit
    pub fn spring<G, S>(getter: G, setter: S, config: SpringConfig) -> Result<Self>
    where
        G: Fn() -> T + 'static,
        S: FnMut(T) + 'static,
    {
        config.validate()?;
        Ok(Self::with_law(
            Box::new(getter),
            Box::new(setter),
            FollowLaw::Spring {
                strength: config.strength,
                friction: config.friction,
            },
            config.threshold,
        ))
    }

    fn with_law(getter: Getter<T>, setter: Setter<T>, law: FollowLaw, threshold: f32) -> Self {
        let current = getter();
        Self {
            name: None,
            getter,
            setter,
            law,
            threshold,
            time_mode: TimeMode::default(),
            target: current,
            target_source: None,
            speed: T::zero(),
            active: false,
            on_became_idle: SmallVec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    /// Read the target from `source` at the start of every update
    pub fn follow<F: Fn() -> T + 'static>(mut self, source: F) -> Self {
        self.target_source = Some(Box::new(source));
        self
    }

    /// Called once each time the tracker settles onto its target
    pub fn on_became_idle<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.on_became_idle.push(Box::new(f));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn law(&self) -> FollowLaw {
        self.law
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn speed(&self) -> T {
        self.speed
    }

    pub fn current(&self) -> T {
        (self.getter)()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Move the target; wakes the tracker if the new target is out of reach
    pub fn set_target(&mut self, target: T) {
        self.target = target;
        if !self.active && self.current().distance(target) > self.threshold {
            self.wake();
        }
    }

    /// Place the property and the target at `value` and go idle silently
    pub fn jump_to(&mut self, value: T) {
        (self.setter)(value);
        self.target = value;
        self.speed = T::zero();
        self.active = false;
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(source) = &self.target_source {
            let target = source();
            self.set_target(target);
        }

        let current = self.current();
        let offset = self.target.sub(current);
        if !self.active {
            if offset.magnitude() <= self.threshold {
                return;
            }
            self.wake();
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let next = match self.law {
            FollowLaw::Ease { rapidity } => {
                self.speed = offset.scale(rapidity);
                // Never step past the target, even for long frames
                current.add(offset.scale((rapidity * dt).min(1.0)))
            }
            FollowLaw::Spring { strength, friction } => {
                let steps = spring_substeps(strength, friction, dt);
                let step = dt / steps as f32;
                let mut position = current;
                for _ in 0..steps {
                    let speed = self
                        .speed
                        .add(self.target.sub(position).scale(strength * step));
                    self.speed = speed.sub(speed.scale((friction * step).min(1.0)));
                    position = position.add(self.speed.scale(step));
                }
                position
            }
        };

        if self.target.sub(next).magnitude() <= self.threshold {
            (self.setter)(self.target);
            self.speed = T::zero();
            self.settle();
        } else {
            (self.setter)(next);
        }
    }

    fn wake(&mut self) {
        tracing::debug!(
            "tracker {}: active, following {:?}",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.target
        );
        self.active = true;
    }

    fn settle(&mut self) {
        tracing::debug!(
            "tracker {}: settled at {:?}",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.target
        );
        self.active = false;
        for callback in self.on_became_idle.iter_mut() {
            callback();
        }
    }
}

/// Upper bound on spring sub-steps for a single update
const MAX_SPRING_SUBSTEPS: u32 = 1024;

/// Number of equal sub-steps a spring update of `dt` is split into
///
/// Each step covers at most half of `1 / friction` and of
/// `1 / sqrt(strength)`, so friction never wipes out the whole speed and the
/// integration stays stable on long frames. Typical frames take one step.
fn spring_substeps(strength: f32, friction: f32, dt: f32) -> u32 {
    let stiffness = friction.max(strength.sqrt()) * dt;
    ((stiffness * 2.0).ceil() as u32).clamp(1, MAX_SPRING_SUBSTEPS)
}

impl<T: Animatable> Track for Tracker<T> {
    fn update(&mut self, dt: f32) {
        Tracker::update(self, dt);
    }

    fn is_active(&self) -> bool {
        Tracker::is_active(self)
    }

    fn time_mode(&self) -> TimeMode {
        Tracker::time_mode(self)
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
    use crate::property::SharedValue;
    use cadence_core::{Color, Vec2};
    use std::cell::Cell;
    use std::rc::Rc;

    fn ease_tracker(value: &SharedValue<f32>) -> Tracker<f32> {
        Tracker::ease(value.getter(), value.setter(), EaseConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_idle_on_current_value() {
        let value = SharedValue::new(3.0_f32);
        let tracker = ease_tracker(&value);
        assert!(!tracker.is_active());
        assert_eq!(tracker.target(), 3.0);
    }

    #[test]
    fn test_ease_converges_monotonically_and_settles_once() {
        let value = SharedValue::new(0.0_f32);
        let idle_count = Rc::new(Cell::new(0));
        let counter = idle_count.clone();
        let mut tracker =
            ease_tracker(&value).on_became_idle(move || counter.set(counter.get() + 1));

        tracker.set_target(5.0);
        assert!(tracker.is_active());

        let mut distance = 5.0;
        let mut ticks = 0;
        while tracker.is_active() {
            tracker.update(1.0 / 60.0);
            let now = (5.0 - value.get()).abs();
            assert!(now < distance, "distance must shrink every tick");
            distance = now;
            ticks += 1;
            assert!(ticks < 1000);
        }

        assert_eq!(value.get(), 5.0);
        assert_eq!(idle_count.get(), 1);

        for _ in 0..10 {
            tracker.update(1.0 / 60.0);
        }
        assert_eq!(idle_count.get(), 1);
    }

    #[test]
    fn test_ease_never_overshoots_on_long_frames() {
        let value = SharedValue::new(0.0_f32);
        let mut tracker = ease_tracker(&value);
        tracker.set_target(1.0);
        tracker.update(10.0);
        assert_eq!(value.get(), 1.0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_idle_tracker_leaves_property_alone() {
        let writes = Rc::new(Cell::new(0));
        let counter = writes.clone();
        let mut tracker = Tracker::ease(
            || 1.0_f32,
            move |_| counter.set(counter.get() + 1),
            EaseConfig::default(),
        )
        .unwrap();

        for _ in 0..5 {
            tracker.update(0.1);
        }
        assert_eq!(writes.get(), 0);
    }

    #[test]
    fn test_reactivates_when_target_moves() {
        let value = SharedValue::new(0.0_f32);
        let idle_count = Rc::new(Cell::new(0));
        let counter = idle_count.clone();
        let mut tracker =
            ease_tracker(&value).on_became_idle(move || counter.set(counter.get() + 1));

        tracker.set_target(1.0);
        for _ in 0..600 {
            tracker.update(1.0 / 60.0);
        }
        tracker.set_target(-1.0);
        assert!(tracker.is_active());
        for _ in 0..600 {
            tracker.update(1.0 / 60.0);
        }
        assert_eq!(value.get(), -1.0);
        assert_eq!(idle_count.get(), 2);
    }

    #[test]
    fn test_spring_settles_exactly() {
        let value = SharedValue::new(Vec2::ZERO);
        let mut tracker =
            Tracker::spring(value.getter(), value.setter(), SpringConfig::wobbly()).unwrap();
        tracker.set_target(Vec2::new(100.0, 50.0));

        let mut overshot = false;
        for _ in 0..2000 {
            tracker.update(1.0 / 60.0);
            overshot |= value.get().x > 100.0;
            if !tracker.is_active() {
                break;
            }
        }
        assert!(!tracker.is_active());
        assert_eq!(value.get(), Vec2::new(100.0, 50.0));
        assert_eq!(tracker.speed(), Vec2::ZERO);
        assert!(overshot, "an underdamped spring overshoots");
    }

    #[test]
    fn test_follow_source_drives_target() {
        let value = SharedValue::new(Color::BLACK);
        let goal = SharedValue::new(Color::WHITE);
        let mut tracker = Tracker::ease(value.getter(), value.setter(), EaseConfig::snappy())
            .unwrap()
            .follow(goal.getter());

        for _ in 0..300 {
            tracker.update(1.0 / 60.0);
        }
        assert_eq!(value.get(), Color::WHITE);

        goal.set(Color::RED);
        tracker.update(1.0 / 60.0);
        assert!(tracker.is_active());
        assert_eq!(tracker.target(), Color::RED);
    }

    #[test]
    fn test_jump_to_is_silent() {
        let value = SharedValue::new(0.0_f32);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut tracker = ease_tracker(&value).on_became_idle(move || flag.set(true));
        tracker.set_target(4.0);
        tracker.jump_to(2.0);
        assert_eq!(value.get(), 2.0);
        assert!(!tracker.is_active());
        assert!(!fired.get());
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let value = SharedValue::new(0.0_f32);
        assert!(Tracker::ease(value.getter(), value.setter(), EaseConfig::new(0.0, 0.01)).is_err());
        assert!(Tracker::spring(
            value.getter(),
            value.setter(),
            SpringConfig::new(100.0, 10.0, -1.0)
        )
        .is_err());
    }

    fn settle_spring_at(dt: f32) -> (f32, u32, bool) {
        let value = SharedValue::new(0.0_f32);
        let idle_count = Rc::new(Cell::new(0));
        let counter = idle_count.clone();
        let mut tracker =
            Tracker::spring(value.getter(), value.setter(), SpringConfig::default())
                .unwrap()
                .on_became_idle(move || counter.set(counter.get() + 1));
        tracker.set_target(1.0);

        let mut ticks = 0;
        while tracker.is_active() && ticks < 1000 {
            tracker.update(dt);
            ticks += 1;
        }
        for _ in 0..10 {
            tracker.update(dt);
        }
        (value.get(), idle_count.get(), tracker.is_active())
    }

    #[test]
    fn test_spring_settles_at_low_frame_rates() {
        for dt in [1.0 / 30.0, 1.0 / 20.0, 0.25] {
            let (value, idle_count, active) = settle_spring_at(dt);
            assert!(!active, "spring still active at dt = {dt}");
            assert_eq!(value, 1.0, "dt = {dt}");
            assert_eq!(idle_count, 1, "dt = {dt}");
        }
    }

    #[test]
    fn test_spring_substeps_only_split_long_frames() {
        let stiff = SpringConfig::stiff();
        assert_eq!(spring_substeps(stiff.strength, stiff.friction, 1.0 / 120.0), 1);
        assert!((2..=3).contains(&spring_substeps(stiff.strength, stiff.friction, 1.0 / 30.0)));
        let wobbly = SpringConfig::wobbly();
        assert_eq!(spring_substeps(wobbly.strength, wobbly.friction, 1.0 / 60.0), 1);
        assert!(spring_substeps(stiff.strength, stiff.friction, 0.25) >= 15);
        assert_eq!(spring_substeps(stiff.strength, stiff.friction, 1.0e6), 1024);
    }
}
