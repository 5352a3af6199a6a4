//! Ordered composition
//!
//! A [`Sequence`] plays its children one after another. Only the active child
//! receives ticks. When it completes, the next child is started in the same
//! tick but receives no time until the following tick; time left over by the
//! finished child is dropped. Zero-length children complete on start, so a run
//! of them is passed through at once.
//!
//! Elapsed time is derived from the children, so the dropped time never
//! counts toward progress. If the active child ends up interrupted, the
//! sequence is interrupted too.

use crate::node::{PlayStart, Playable, PlaybackCore, PlaybackState};
use std::any::Any;

/// Children played one after another
#[derive(Default)]
pub struct Sequence {
    core: PlaybackCore,
    children: Vec<Box<dyn Playable>>,
    active: usize,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child (builder style)
    pub fn with(mut self, child: impl Playable) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn with_boxed(mut self, child: Box<dyn Playable>) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Box<dyn Playable>) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Box<dyn Playable>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Playable>] {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the child currently receiving ticks
    ///
    /// Equals `len()` once every child has completed.
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_child(&self) -> Option<&dyn Playable> {
        self.children.get(self.active).map(|child| child.as_ref())
    }

    /// Start the active child, skipping past any that complete on start
    fn start_active(&mut self) {
        while let Some(child) = self.children.get_mut(self.active) {
            child.play();
            if child.state() != PlaybackState::Completed {
                return;
            }
            self.active += 1;
        }
        let duration = self.duration();
        self.core.complete(duration);
    }

    /// Durations of the finished children plus the active child's progress
    fn sync_elapsed(&mut self) {
        let done: f32 = self.children[..self.active]
            .iter()
            .map(|child| child.duration())
            .sum();
        let current = self
            .children
            .get(self.active)
            .map_or(0.0, |child| child.elapsed());
        let duration = self.duration();
        self.core.set_elapsed(done + current, duration);
    }
}

impl Playable for Sequence {
    fn core(&self) -> &PlaybackCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlaybackCore {
        &mut self.core
    }

    fn play(&mut self) {
        match self.core.begin_play() {
            PlayStart::Ignored => {}
            PlayStart::Resumed => {
                if let Some(child) = self.children.get_mut(self.active) {
                    child.play();
                }
            }
            PlayStart::Started => {
                for child in &mut self.children {
                    child.stop();
                }
                self.active = 0;
                self.start_active();
            }
        }
    }

    fn pause(&mut self) {
        if self.core.pause() {
            if let Some(child) = self.children.get_mut(self.active) {
                child.pause();
            }
        }
    }

    fn stop(&mut self) {
        for child in &mut self.children {
            child.stop();
        }
        self.active = 0;
        self.core.reset();
    }

    fn interrupt(&mut self) {
        if !self.core.state().is_running() {
            return;
        }
        if let Some(child) = self.children.get_mut(self.active) {
            child.interrupt();
        }
        self.core.interrupt();
    }

    fn update(&mut self, dt: f32) {
        if !self.is_playing() {
            return;
        }
        let Some(child) = self.children.get_mut(self.active) else {
            let duration = self.duration();
            self.core.complete(duration);
            return;
        };
        if child.state() != PlaybackState::Interrupted {
            child.update(dt);
        }
        let state = child.state();

        self.sync_elapsed();
        self.core.fire_update();

        match state {
            PlaybackState::Completed => {
                self.active += 1;
                self.start_active();
            }
            PlaybackState::Interrupted => {
                self.core.interrupt();
            }
            _ => {}
        }
    }

    /// Sum of the children's durations
    fn duration(&self) -> f32 {
        self.children.iter().map(|child| child.duration()).sum()
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
    use crate::motion::{Motion, Timer};
    use crate::node::PlayableExt;
    use crate::property::SharedValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn logged_timer(duration: f32, label: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Timer {
        let start_log = log.clone();
        let end_log = log.clone();
        Timer::new(duration)
            .unwrap()
            .on_start(move || start_log.borrow_mut().push(format!("start {label}")))
            .on_complete(move || end_log.borrow_mut().push(format!("end {label}")))
    }

    #[test]
    fn test_children_start_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sequence = Sequence::new()
            .with(logged_timer(0.2, "a", &log))
            .with(logged_timer(0.2, "b", &log))
            .with(logged_timer(0.2, "c", &log));

        sequence.play();
        for _ in 0..10 {
            sequence.update(0.1);
        }

        assert_eq!(sequence.state(), PlaybackState::Completed);
        assert_eq!(
            *log.borrow(),
            ["start a", "end a", "start b", "end b", "start c", "end c"]
        );
    }

    #[test]
    fn test_delay_then_motion() {
        let value = SharedValue::new(0.0_f32);
        let motion = Motion::builder()
            .from(0.0)
            .to(10.0)
            .duration(0.5)
            .property(&value)
            .build()
            .unwrap();
        let mut sequence = Sequence::new().with(Timer::new(0.1).unwrap()).with(motion);
        assert!((sequence.duration() - 0.6).abs() < 1e-6);

        sequence.play();
        sequence.update(0.1);
        assert_eq!(sequence.active_index(), 1);
        assert_eq!(value.get(), 0.0);

        for _ in 0..5 {
            sequence.update(0.1);
        }
        assert_eq!(value.get(), 10.0);
        assert_eq!(sequence.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_leftover_time_is_dropped() {
        let value = SharedValue::new(0.0_f32);
        let motion = Motion::builder()
            .from(0.0)
            .to(1.0)
            .duration(1.0)
            .property(&value)
            .build()
            .unwrap();
        let mut sequence = Sequence::new().with(Timer::new(0.05).unwrap()).with(motion);

        sequence.play();
        sequence.update(0.5);
        assert_eq!(sequence.active_index(), 1);
        assert_eq!(sequence.children()[1].elapsed(), 0.0);
    }

    #[test]
    fn test_zero_length_children_chain_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sequence = Sequence::new()
            .with(logged_timer(0.0, "a", &log))
            .with(logged_timer(0.0, "b", &log))
            .with(logged_timer(0.3, "c", &log));

        sequence.play();
        assert_eq!(sequence.active_index(), 2);
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn test_empty_sequence_completes_on_play() {
        let mut sequence = Sequence::new();
        sequence.play();
        assert_eq!(sequence.state(), PlaybackState::Completed);
        assert_eq!(sequence.progress(), 1.0);
    }

    #[test]
    fn test_interrupt_reaches_only_the_active_child() {
        let mut sequence = Sequence::new()
            .with(Timer::new(0.2).unwrap())
            .with(Timer::new(0.2).unwrap());

        sequence.play();
        sequence.update(0.1);
        sequence.interrupt();

        assert_eq!(sequence.state(), PlaybackState::Interrupted);
        assert_eq!(sequence.children()[0].state(), PlaybackState::Interrupted);
        assert_eq!(sequence.children()[1].state(), PlaybackState::Idle);
    }

    #[test]
    fn test_pause_and_replay() {
        let mut sequence = Sequence::new()
            .with(Timer::new(0.2).unwrap())
            .with(Timer::new(0.2).unwrap());

        sequence.play();
        sequence.update(0.3);
        sequence.pause();
        assert_eq!(sequence.children()[1].state(), PlaybackState::Paused);
        sequence.update(1.0);
        assert_eq!(sequence.active_index(), 1);

        sequence.play();
        sequence.update(0.2);
        assert_eq!(sequence.state(), PlaybackState::Completed);

        sequence.play();
        assert_eq!(sequence.active_index(), 0);
        assert_eq!(sequence.children()[1].state(), PlaybackState::Idle);
    }

    #[test]
    fn test_progress_ignores_dropped_time() {
        let mut sequence = Sequence::new();
        for _ in 0..10 {
            sequence.push(Box::new(Timer::new(0.01).unwrap()));
        }

        sequence.play();
        sequence.update(0.1);
        assert_eq!(sequence.state(), PlaybackState::Playing);
        assert_eq!(sequence.active_index(), 1);
        assert!((sequence.elapsed() - 0.01).abs() < 1e-6);
        assert!(sequence.progress() < 0.2);
    }

    #[test]
    fn test_interrupted_child_ends_the_sequence() {
        let interrupts = Rc::new(RefCell::new(0));
        let counter = interrupts.clone();
        let mut sequence = Sequence::new()
            .with(Timer::new(0.2).unwrap())
            .with(Timer::new(0.2).unwrap())
            .on_interrupt(move || *counter.borrow_mut() += 1);

        sequence.play();
        sequence.update(0.1);
        sequence.children_mut()[0].interrupt();
        sequence.update(0.1);

        assert_eq!(sequence.state(), PlaybackState::Interrupted);
        assert_eq!(sequence.children()[1].state(), PlaybackState::Idle);
        assert_eq!(*interrupts.borrow(), 1);

        for _ in 0..10 {
            sequence.update(0.1);
        }
        assert_eq!(*interrupts.borrow(), 1);
    }
}
