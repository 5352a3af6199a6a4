//! Concurrent composition
//!
//! A [`Parallel`] starts every child together and ticks each child that has
//! not completed yet, in list order. It completes once all of them have. If
//! every child has finished but one of them was interrupted, the parallel is
//! interrupted instead.

use crate::node::{PlayStart, Playable, PlaybackCore, PlaybackState};
use std::any::Any;

/// Children played together
#[derive(Default)]
pub struct Parallel {
    core: PlaybackCore,
    children: Vec<Box<dyn Playable>>,
}

impl Parallel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child (builder style)
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

    fn all_completed(&self) -> bool {
        self.children
            .iter()
            .all(|child| child.state() == PlaybackState::Completed)
    }

    fn all_finished(&self) -> bool {
        self.children
            .iter()
            .all(|child| child.state().is_finished())
    }
}

impl Playable for Parallel {
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
                for child in &mut self.children {
                    if child.state() == PlaybackState::Paused {
                        child.play();
                    }
                }
            }
            PlayStart::Started => {
                for child in &mut self.children {
                    child.stop();
                    child.play();
                }
                if self.all_completed() {
                    let duration = self.duration();
                    self.core.complete(duration);
                }
            }
        }
    }

    fn pause(&mut self) {
        if self.core.pause() {
            for child in &mut self.children {
                child.pause();
            }
        }
    }

    fn stop(&mut self) {
        for child in &mut self.children {
            child.stop();
        }
        self.core.reset();
    }

    fn interrupt(&mut self) {
        if !self.core.state().is_running() {
            return;
        }
        for child in &mut self.children {
            if child.state().is_running() {
                child.interrupt();
            }
        }
        self.core.interrupt();
    }

    fn update(&mut self, dt: f32) {
        if !self.is_playing() {
            return;
        }
        let duration = self.duration();
        self.core.advance(dt, duration);

        for child in &mut self.children {
            if !child.state().is_finished() {
                child.update(dt);
            }
        }
        self.core.fire_update();

        if self.all_completed() {
            self.core.complete(duration);
        } else if self.all_finished() {
            self.core.interrupt();
        }
    }

    /// Longest child duration
    fn duration(&self) -> f32 {
        self.children
            .iter()
            .map(|child| child.duration())
            .fold(0.0, f32::max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
