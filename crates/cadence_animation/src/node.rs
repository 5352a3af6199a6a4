//! Playback nodes
//!
//! Every schedulable unit (motion, timer, sequence, parallel) implements
//! [`Playable`] and shares the same lifecycle:
//!
//! ```text
//! Idle --play--> Playing --pause--> Paused --play--> Playing
//! Playing --elapsed reaches duration--> Completed   (on_complete)
//! Playing|Paused --interrupt--> Interrupted          (on_interrupt)
//! any --stop--> Idle                                 (no callbacks)
//! Completed|Interrupted --play--> Playing            (restarts from 0)
//! ```
//!
//! The bookkeeping common to all nodes lives in [`PlaybackCore`]; node types
//! only add what happens to their payload or children.

use crate::clock::TimeMode;
use smallvec::SmallVec;
use std::any::Any;

/// Slack allowed when comparing accumulated time against a duration
pub const TIME_EPSILON: f32 = 1e-5;

/// Lifecycle state of a playback node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Interrupted,
    Completed,
}

impl PlaybackState {
    /// Playing or paused: the node holds a claim on its target
    pub fn is_running(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }

    /// Completed or interrupted
    pub fn is_finished(self) -> bool {
        matches!(self, PlaybackState::Completed | PlaybackState::Interrupted)
    }
}

/// A lifecycle callback
pub type Callback = Box<dyn FnMut()>;

/// Callback slots of a node; each slot may hold several handlers
#[derive(Default)]
pub struct Callbacks {
    on_start: SmallVec<[Callback; 1]>,
    on_update: SmallVec<[Callback; 1]>,
    on_interrupt: SmallVec<[Callback; 1]>,
    on_complete: SmallVec<[Callback; 1]>,
}

impl Callbacks {
    pub fn on_start<F: FnMut() + 'static>(&mut self, f: F) -> &mut Self {
        self.on_start.push(Box::new(f));
        self
    }

    pub fn on_update<F: FnMut() + 'static>(&mut self, f: F) -> &mut Self {
        self.on_update.push(Box::new(f));
        self
    }

    pub fn on_interrupt<F: FnMut() + 'static>(&mut self, f: F) -> &mut Self {
        self.on_interrupt.push(Box::new(f));
        self
    }

    pub fn on_complete<F: FnMut() + 'static>(&mut self, f: F) -> &mut Self {
        self.on_complete.push(Box::new(f));
        self
    }

    /// Drop every registered handler
    pub fn clear(&mut self) {
        self.on_start.clear();
        self.on_update.clear();
        self.on_interrupt.clear();
        self.on_complete.clear();
    }

    fn fire(slot: &mut SmallVec<[Callback; 1]>) {
        for callback in slot.iter_mut() {
            callback();
        }
    }
}

/// Outcome of a `play` request as seen by [`PlaybackCore::begin_play`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayStart {
    /// Already playing; nothing happened
    Ignored,
    /// Resumed from pause without resetting elapsed time
    Resumed,
    /// Started from elapsed time zero; `on_start` has fired
    Started,
}

/// State, time and callbacks shared by every node type
#[derive(Default)]
pub struct PlaybackCore {
    name: Option<String>,
    state: PlaybackState,
    elapsed: f32,
    time_mode: TimeMode,
    callbacks: Callbacks,
}

impl PlaybackCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        self.time_mode = mode;
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    fn set_state(&mut self, to: PlaybackState) {
        if self.state != to {
            tracing::trace!(
                "node {}: {:?} -> {:?}",
                self.name.as_deref().unwrap_or("<unnamed>"),
                self.state,
                to
            );
            self.state = to;
        }
    }

    /// Apply the state side of `play`
    pub fn begin_play(&mut self) -> PlayStart {
        match self.state {
            PlaybackState::Playing => PlayStart::Ignored,
            PlaybackState::Paused => {
                self.set_state(PlaybackState::Playing);
                PlayStart::Resumed
            }
            PlaybackState::Idle | PlaybackState::Completed | PlaybackState::Interrupted => {
                self.elapsed = 0.0;
                self.set_state(PlaybackState::Playing);
                Callbacks::fire(&mut self.callbacks.on_start);
                PlayStart::Started
            }
        }
    }

    /// Playing -> Paused; returns whether the transition happened
    pub fn pause(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
            true
        } else {
            false
        }
    }

    /// Playing|Paused -> Interrupted, firing `on_interrupt`
    ///
    /// Returns false (and does nothing) for any other state, which makes a
    /// second interrupt a no-op.
    pub fn interrupt(&mut self) -> bool {
        if self.state.is_running() {
            self.set_state(PlaybackState::Interrupted);
            Callbacks::fire(&mut self.callbacks.on_interrupt);
            true
        } else {
            false
        }
    }

    /// Back to Idle at time zero without callbacks
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.set_state(PlaybackState::Idle);
    }

    /// Add `dt` to the elapsed time, clamped to `duration`
    ///
    /// Returns true once the end has been reached.
    pub fn advance(&mut self, dt: f32, duration: f32) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed = (self.elapsed + dt).min(duration);
        self.elapsed >= duration - TIME_EPSILON
    }

    /// Overwrite the elapsed time, clamped to `[0, duration]`
    ///
    /// Composites use this to report time derived from their children.
    pub fn set_elapsed(&mut self, elapsed: f32, duration: f32) {
        self.elapsed = elapsed.clamp(0.0, duration.max(0.0));
    }

    pub fn fire_update(&mut self) {
        Callbacks::fire(&mut self.callbacks.on_update);
    }

    /// Playing -> Completed, firing `on_complete`
    pub fn complete(&mut self, duration: f32) {
        self.elapsed = duration;
        self.set_state(PlaybackState::Completed);
        Callbacks::fire(&mut self.callbacks.on_complete);
    }
}

/// Uniform contract of every schedulable node
pub trait Playable: Any {
    fn core(&self) -> &PlaybackCore;

    fn core_mut(&mut self) -> &mut PlaybackCore;

    /// Start, resume or restart; a no-op while already playing
    fn play(&mut self);

    fn pause(&mut self);

    /// Return to Idle without firing callbacks (used for eviction)
    fn stop(&mut self);

    /// Abort playback, firing `on_interrupt` but never `on_complete`
    fn interrupt(&mut self);

    /// Advance by `dt` seconds; a no-op unless playing
    fn update(&mut self, dt: f32);

    /// Total duration in seconds (computed for composites)
    fn duration(&self) -> f32;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn state(&self) -> PlaybackState {
        self.core().state()
    }

    fn elapsed(&self) -> f32 {
        self.core().elapsed()
    }

    fn name(&self) -> Option<&str> {
        self.core().name()
    }

    fn time_mode(&self) -> TimeMode {
        self.core().time_mode()
    }

    fn callbacks_mut(&mut self) -> &mut Callbacks {
        self.core_mut().callbacks_mut()
    }

    fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Normalized progress (1.0 for zero-length nodes)
    fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return if self.state() == PlaybackState::Completed {
                1.0
            } else {
                0.0
            };
        }
        (self.elapsed() / duration).clamp(0.0, 1.0)
    }
}

/// Builder-style helpers available on every concrete node
pub trait PlayableExt: Playable + Sized {
    fn named(mut self, name: impl Into<String>) -> Self {
        self.core_mut().set_name(name);
        self
    }

    fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.core_mut().set_time_mode(mode);
        self
    }

    fn on_start<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks_mut().on_start(f);
        self
    }

    fn on_update<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks_mut().on_update(f);
        self
    }

    fn on_interrupt<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks_mut().on_interrupt(f);
        self
    }

    fn on_complete<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.callbacks_mut().on_complete(f);
        self
    }

    fn boxed(self) -> Box<dyn Playable> {
        Box::new(self)
    }
}

impl<P: Playable> PlayableExt for P {}
