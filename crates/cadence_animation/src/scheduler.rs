//! Animation scheduler
//!
//! The session object that owns every live node and tracker and ticks them
//! once per frame. There is no global state: hosts create one scheduler per
//! session and pass it around.
//!
//! Nodes are kept in a slot map and addressed by [`NodeId`]. A node added with
//! [`Scheduler::add`] stays until removed and can be replayed; one started with
//! [`Scheduler::spawn`] is dropped automatically once it completes or is
//! interrupted. Nodes requested through [`Scheduler::get_or_create`] live in
//! the reuse registry until they are superseded or their owner is cleared.

use crate::clock::{FrameTime, TimeSource};
use crate::node::{Playable, PlaybackState};
use crate::registry::{OwnerKey, ReuseRegistry};
use crate::tracker::Track;
use cadence_core::error::Result;
use cadence_core::OwnerId;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct NodeId;
    pub struct TrackerId;
}

struct NodeEntry<O> {
    node: Box<dyn Playable>,
    reuse_key: Option<(O, String)>,
    transient: bool,
}

/// Ticks every live node and tracker
pub struct Scheduler<O: OwnerKey = OwnerId> {
    nodes: SlotMap<NodeId, NodeEntry<O>>,
    trackers: SlotMap<TrackerId, Box<dyn Track>>,
    registry: ReuseRegistry<O>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: OwnerKey> Default for Scheduler<O> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            trackers: SlotMap::with_key(),
            registry: ReuseRegistry::new(),
        }
    }
}

impl<O: OwnerKey> Scheduler<O> {
    // ========================================================================
    // Nodes
    // ========================================================================

    /// Take ownership of a node without playing it
    pub fn add(&mut self, node: impl Playable) -> NodeId {
        self.add_boxed(Box::new(node))
    }

    pub fn add_boxed(&mut self, node: Box<dyn Playable>) -> NodeId {
        self.insert(node, None, false)
    }

    /// Play a node and drop it once it completes or is interrupted
    pub fn spawn(&mut self, node: impl Playable) -> NodeId {
        self.spawn_boxed(Box::new(node))
    }

    pub fn spawn_boxed(&mut self, mut node: Box<dyn Playable>) -> NodeId {
        node.play();
        self.insert(node, None, true)
    }

    fn insert(
        &mut self,
        node: Box<dyn Playable>,
        reuse_key: Option<(O, String)>,
        transient: bool,
    ) -> NodeId {
        self.nodes.insert(NodeEntry {
            node,
            reuse_key,
            transient,
        })
    }

    /// Remove a node (and its registry key, if any) without callbacks
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn Playable>> {
        let entry = self.nodes.remove(id)?;
        if let Some((owner, key)) = &entry.reuse_key {
            if self.registry.get(*owner, key) == Some(id) {
                self.registry.remove(*owner, key);
            }
        }
        Some(entry.node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Playable> {
        self.nodes.get(id).map(|entry| entry.node.as_ref())
    }

    pub fn node_dyn_mut(&mut self, id: NodeId) -> Option<&mut dyn Playable> {
        match self.nodes.get_mut(id) {
            Some(entry) => Some(entry.node.as_mut()),
            None => None,
        }
    }

    /// Typed access to a node, e.g. to reconfigure a `Motion` before playing
    pub fn node_mut<N: Playable>(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes
            .get_mut(id)?
            .node
            .as_any_mut()
            .downcast_mut::<N>()
    }

    pub fn state(&self, id: NodeId) -> Option<PlaybackState> {
        self.node(id).map(|node| node.state())
    }

    /// Returns false for stale ids
    pub fn play(&mut self, id: NodeId) -> bool {
        self.with_node(id, |node| node.play())
    }

    pub fn pause(&mut self, id: NodeId) -> bool {
        self.with_node(id, |node| node.pause())
    }

    pub fn stop(&mut self, id: NodeId) -> bool {
        self.with_node(id, |node| node.stop())
    }

    pub fn interrupt(&mut self, id: NodeId) -> bool {
        self.with_node(id, |node| node.interrupt())
    }

    fn with_node(&mut self, id: NodeId, f: impl FnOnce(&mut dyn Playable)) -> bool {
        match self.nodes.get_mut(id) {
            Some(entry) => {
                f(entry.node.as_mut());
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Reuse registry
    // ========================================================================

    /// Build a node for `(owner, id)`, replacing any previous occupant
    ///
    /// A previous node that is still playing or paused is stopped (without
    /// callbacks) and dropped. The new node is returned unplayed so it can be
    /// reconfigured first.
    pub fn get_or_create<N, F>(&mut self, owner: O, id: &str, factory: F) -> NodeId
    where
        N: Playable,
        F: FnOnce() -> N,
    {
        self.evict(owner, id);
        let node = self.insert(Box::new(factory()), Some((owner, id.to_owned())), false);
        self.registry.insert(owner, id, node);
        node
    }

    /// Like [`get_or_create`](Self::get_or_create) with a fallible factory
    ///
    /// If the factory fails, the previous occupant is left untouched.
    pub fn try_get_or_create<N, F>(&mut self, owner: O, id: &str, factory: F) -> Result<NodeId>
    where
        N: Playable,
        F: FnOnce() -> Result<N>,
    {
        let built = factory()?;
        Ok(self.get_or_create(owner, id, move || built))
    }

    /// The node currently registered under `(owner, id)`
    pub fn reused(&self, owner: O, id: &str) -> Option<NodeId> {
        self.registry.get(owner, id)
    }

    pub fn registry(&self) -> &ReuseRegistry<O> {
        &self.registry
    }

    fn evict(&mut self, owner: O, id: &str) {
        let Some(previous) = self.registry.remove(owner, id) else {
            return;
        };
        if let Some(mut entry) = self.nodes.remove(previous) {
            if entry.node.state().is_running() {
                entry.node.stop();
            }
            tracing::debug!("Scheduler: evicted {:?}/{} ({:?})", owner, id, previous);
        }
    }

    /// Stop and drop every node registered for `owner`
    ///
    /// Must be called when the owner goes away. Calling it again is a no-op.
    /// Returns the number of nodes dropped.
    pub fn clear_owner(&mut self, owner: O) -> usize {
        let mut cleared = 0;
        for id in self.registry.take_owner(owner) {
            if let Some(mut entry) = self.nodes.remove(id) {
                entry.node.stop();
                cleared += 1;
            }
        }
        if cleared > 0 {
            tracing::debug!("Scheduler: cleared {} node(s) of {:?}", cleared, owner);
        }
        cleared
    }

    // ========================================================================
    // Trackers
    // ========================================================================

    pub fn add_tracker(&mut self, tracker: impl Track) -> TrackerId {
        self.trackers.insert(Box::new(tracker))
    }

    pub fn tracker(&self, id: TrackerId) -> Option<&dyn Track> {
        self.trackers.get(id).map(|tracker| tracker.as_ref())
    }

    /// Typed access to a tracker, e.g. to move its target
    pub fn tracker_mut<Tr: Track>(&mut self, id: TrackerId) -> Option<&mut Tr> {
        self.trackers.get_mut(id)?.as_any_mut().downcast_mut::<Tr>()
    }

    pub fn remove_tracker(&mut self, id: TrackerId) -> bool {
        self.trackers.remove(id).is_some()
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Advance every playing node and every tracker by one frame
    ///
    /// Each root node and tracker reads the delta for its own time mode.
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, frame: &FrameTime) -> bool {
        for (_, entry) in self.nodes.iter_mut() {
            if entry.node.is_playing() {
                let dt = frame.delta(entry.node.time_mode());
                entry.node.update(dt);
            }
        }

        for (_, tracker) in self.trackers.iter_mut() {
            let dt = frame.delta(tracker.time_mode());
            tracker.update(dt);
        }

        let before = self.nodes.len();
        self.nodes
            .retain(|_, entry| !(entry.transient && entry.node.state().is_finished()));
        let dropped = before - self.nodes.len();
        if dropped > 0 {
            tracing::debug!("Scheduler: dropped {} finished node(s)", dropped);
        }

        self.has_active_animations()
    }

    /// Pull the next frame from `source` and tick
    pub fn tick_from(&mut self, source: &mut impl TimeSource) -> bool {
        let frame = source.next_frame();
        self.tick(&frame)
    }

    /// Check if any node is playing or any tracker is moving
    pub fn has_active_animations(&self) -> bool {
        self.nodes.values().any(|entry| entry.node.is_playing())
            || self.trackers.values().any(|tracker| tracker.is_active())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &dyn Playable)> {
        self.nodes
            .iter()
            .map(|(id, entry)| (id, entry.node.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EaseConfig;
    use crate::motion::{Motion, Timer};
    use crate::node::PlayableExt;
    use crate::property::SharedValue;
    use crate::tracker::Tracker;
    use cadence_core::OwnerIdGenerator;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fade(value: &SharedValue<f32>, to: f32) -> Motion<f32> {
        Motion::builder()
            .from_current()
            .to(to)
            .duration(0.5)
            .property(value)
            .build()
            .unwrap()
    }

    #[test]
    fn test_spawned_nodes_are_dropped_when_finished() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.spawn(Timer::new(0.2).unwrap());
        assert_eq!(scheduler.state(id), Some(PlaybackState::Playing));

        assert!(scheduler.tick(&FrameTime::uniform(0.1)));
        assert!(!scheduler.tick(&FrameTime::uniform(0.1)));
        assert!(!scheduler.contains(id));
        assert!(!scheduler.play(id), "stale ids are ignored");
    }

    #[test]
    fn test_added_nodes_stay_and_replay() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.add(Timer::new(0.1).unwrap());
        assert_eq!(scheduler.state(id), Some(PlaybackState::Idle));

        scheduler.play(id);
        scheduler.tick(&FrameTime::uniform(0.1));
        assert_eq!(scheduler.state(id), Some(PlaybackState::Completed));

        scheduler.play(id);
        assert_eq!(scheduler.state(id), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_root_nodes_read_their_own_time_mode() {
        let mut scheduler = Scheduler::new();
        let normal = scheduler.spawn(Timer::new(1.0).unwrap());
        let unscaled = scheduler.spawn(
            Timer::new(1.0)
                .unwrap()
                .with_time_mode(crate::clock::TimeMode::Unscaled),
        );

        let frame = FrameTime {
            delta: 0.0,
            unscaled_delta: 0.25,
            ..FrameTime::uniform(0.0)
        };
        scheduler.tick(&frame);
        assert_eq!(scheduler.node(normal).unwrap().elapsed(), 0.0);
        assert_eq!(scheduler.node(unscaled).unwrap().elapsed(), 0.25);
    }

    #[test]
    fn test_newest_request_wins() {
        let mut owners = OwnerIdGenerator::new();
        let owner = owners.next();
        let value = SharedValue::new(0.0_f32);
        let mut scheduler = Scheduler::new();

        let first = scheduler.get_or_create(owner, "X", || fade(&value, 1.0));
        let second = scheduler.get_or_create(owner, "X", || fade(&value, 2.0));

        assert_ne!(first, second);
        assert!(!scheduler.contains(first));
        assert_eq!(scheduler.reused(owner, "X"), Some(second));
        assert_eq!(scheduler.node_count(), 1);
        let motion = scheduler.node_mut::<Motion<f32>>(second).unwrap();
        assert_eq!(motion.to_value(), 2.0);
        assert_eq!(motion.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_eviction_stops_without_callbacks() {
        let owner = OwnerId::new(1);
        let value = SharedValue::new(0.0_f32);
        let fired = Rc::new(Cell::new(0));
        let mut scheduler = Scheduler::new();

        let counter = fired.clone();
        let first = scheduler.get_or_create(owner, "fade", || {
            fade(&value, 1.0)
                .on_interrupt(move || counter.set(counter.get() + 1))
        });
        scheduler.play(first);
        scheduler.tick(&FrameTime::uniform(0.1));

        let second = scheduler.get_or_create(owner, "fade", || fade(&value, 0.0));
        scheduler.play(second);
        assert_eq!(fired.get(), 0);
        assert_eq!(scheduler.node_count(), 1);
    }

    #[test]
    fn test_clear_owner_is_idempotent() {
        let mut owners = OwnerIdGenerator::new();
        let (a, b) = (owners.next(), owners.next());
        let mut scheduler = Scheduler::new();
        for key in ["fade", "slide", "scale"] {
            let id = scheduler.get_or_create(a, key, || Timer::new(1.0).unwrap());
            scheduler.play(id);
        }
        scheduler.get_or_create(b, "fade", || Timer::new(1.0).unwrap());

        assert_eq!(scheduler.clear_owner(a), 3);
        assert_eq!(scheduler.clear_owner(a), 0);
        assert_eq!(scheduler.node_count(), 1);
        assert!(scheduler.reused(b, "fade").is_some());
    }

    #[test]
    fn test_try_get_or_create_keeps_previous_on_error() {
        let owner = OwnerId::new(3);
        let mut scheduler = Scheduler::new();
        let kept = scheduler
            .try_get_or_create(owner, "delay", || Timer::new(0.5))
            .unwrap();
        let failed = scheduler.try_get_or_create(owner, "delay", || Timer::new(-1.0));
        assert!(failed.is_err());
        assert_eq!(scheduler.reused(owner, "delay"), Some(kept));
    }

    #[test]
    fn test_remove_releases_registry_key() {
        let owner = OwnerId::new(9);
        let mut scheduler = Scheduler::new();
        let id = scheduler.get_or_create(owner, "x", || Timer::new(0.5).unwrap());
        assert!(scheduler.remove(id).is_some());
        assert!(scheduler.remove(id).is_none());
        assert!(scheduler.registry().is_empty());
    }

    #[test]
    fn test_trackers_keep_scheduler_active_until_settled() {
        let value = SharedValue::new(0.0_f32);
        let mut scheduler = Scheduler::new();
        let id = scheduler.add_tracker(
            Tracker::ease(value.getter(), value.setter(), EaseConfig::default()).unwrap(),
        );
        assert!(!scheduler.has_active_animations());

        scheduler
            .tracker_mut::<Tracker<f32>>(id)
            .unwrap()
            .set_target(1.0);
        let mut frames = 0;
        while scheduler.tick(&FrameTime::uniform(1.0 / 60.0)) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(value.get(), 1.0);
        assert!(scheduler.tracker_mut::<Tracker<cadence_core::Vec2>>(id).is_none());
        assert!(scheduler.remove_tracker(id));
    }
}
