//! Authoring blocks
//!
//! A [`Block`] tree mirrors the playback node tree: motions and timers are
//! leaves, sequences and parallels hold ordered children. Every block has a
//! name, and descendants are addressed by joining names with `/`:
//!
//! ```text
//! Intro                      (parallel)
//! ├── Fade                   (motion)
//! └── Slide                  (sequence)
//!     ├── Delay              (timer)
//!     └── Move               (motion)
//!
//! intro.child_at_path("Slide/Move")
//! ```
//!
//! Lookups that do not resolve return `None`; tools probe paths freely.

use crate::value::{expect_value, BlockInterpolation, BlockTarget, BlockValue, BlockValueType};
use cadence_animation::{
    Motion, Parallel, Playable, PlayableExt, Sequence, SharedValue, TimeMode, Timer,
};
use cadence_core::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};

/// Separator between names in a block path
pub const PATH_SEPARATOR: char = '/';

// ============================================================================
// Leaf and composite payloads
// ============================================================================

/// A single interpolation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionBlock {
    pub name: String,
    pub duration: f32,
    /// `None` starts from the target's current value
    #[serde(default)]
    pub from: Option<BlockValue>,
    pub to: BlockValue,
    #[serde(default)]
    pub interpolation: BlockInterpolation,
    #[serde(default)]
    pub time_mode: TimeMode,
    #[serde(skip)]
    pub target: Option<BlockTarget>,
}

impl MotionBlock {
    pub fn new(name: impl Into<String>, to: impl Into<BlockValue>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            from: None,
            to: to.into(),
            interpolation: BlockInterpolation::default(),
            time_mode: TimeMode::default(),
            target: None,
        }
    }

    pub fn with_from(mut self, value: impl Into<BlockValue>) -> Self {
        self.from = Some(value.into());
        self
    }

    pub fn with_interpolation(mut self, interpolation: impl Into<BlockInterpolation>) -> Self {
        self.interpolation = interpolation.into();
        self
    }

    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    pub fn with_target(mut self, target: impl Into<BlockTarget>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Point the block at a shared cell
    pub fn set_target<T: BlockValueType>(&mut self, value: &SharedValue<T>) {
        self.target = Some(T::wrap_target(value.clone()));
    }

    fn build(&self) -> Result<Box<dyn Playable>> {
        let target = self.target.as_ref().ok_or_else(|| {
            AnimationError::invalid(format!("motion block '{}' has no target", self.name))
        })?;
        match target {
            BlockTarget::Float(value) => self.build_for(value),
            BlockTarget::Vec2(value) => self.build_for(value),
            BlockTarget::Vec3(value) => self.build_for(value),
            BlockTarget::Color(value) => self.build_for(value),
        }
    }

    fn build_for<T: BlockValueType>(&self, target: &SharedValue<T>) -> Result<Box<dyn Playable>> {
        let to: T = expect_value(self.to, "final value")?;
        let mut builder = Motion::builder()
            .name(self.name.clone())
            .to(to)
            .duration(self.duration)
            .interpolation(self.interpolation.to_interpolation::<T>()?)
            .time_mode(self.time_mode)
            .property(target);
        if let Some(from) = self.from {
            builder = builder.from(expect_value(from, "initial value")?);
        }
        Ok(builder.build()?.boxed())
    }
}

/// A pure delay
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerBlock {
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub time_mode: TimeMode,
}

impl TimerBlock {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            time_mode: TimeMode::default(),
        }
    }
}

/// Children of a sequence or parallel
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompositeBlock {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Block>,
    #[serde(default)]
    pub time_mode: TimeMode,
}

impl CompositeBlock {
    pub fn new(name: impl Into<String>, children: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            children,
            time_mode: TimeMode::default(),
        }
    }
}

// ============================================================================
// Block
// ============================================================================

/// A node of the authoring tree
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Motion(MotionBlock),
    Timer(TimerBlock),
    Sequence(CompositeBlock),
    Parallel(CompositeBlock),
}

impl Block {
    pub fn motion(block: MotionBlock) -> Self {
        Block::Motion(block)
    }

    pub fn timer(name: impl Into<String>, duration: f32) -> Self {
        Block::Timer(TimerBlock::new(name, duration))
    }

    pub fn sequence(name: impl Into<String>, children: Vec<Block>) -> Self {
        Block::Sequence(CompositeBlock::new(name, children))
    }

    pub fn parallel(name: impl Into<String>, children: Vec<Block>) -> Self {
        Block::Parallel(CompositeBlock::new(name, children))
    }

    pub fn name(&self) -> &str {
        match self {
            Block::Motion(motion) => &motion.name,
            Block::Timer(timer) => &timer.name,
            Block::Sequence(composite) | Block::Parallel(composite) => &composite.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Block::Motion(motion) => motion.name = name,
            Block::Timer(timer) => timer.name = name,
            Block::Sequence(composite) | Block::Parallel(composite) => composite.name = name,
        }
    }

    /// Own duration for leaves; sum (sequence) or max (parallel) of children
    pub fn duration(&self) -> f32 {
        match self {
            Block::Motion(motion) => motion.duration,
            Block::Timer(timer) => timer.duration,
            Block::Sequence(composite) => composite.children.iter().map(Block::duration).sum(),
            Block::Parallel(composite) => composite
                .children
                .iter()
                .map(Block::duration)
                .fold(0.0, f32::max),
        }
    }

    /// Set a leaf's duration
    ///
    /// Composite durations are derived from their children, so this returns
    /// false for them and leaves the tree untouched.
    pub fn set_duration(&mut self, duration: f32) -> bool {
        match self {
            Block::Motion(motion) => motion.duration = duration,
            Block::Timer(timer) => timer.duration = duration,
            Block::Sequence(_) | Block::Parallel(_) => return false,
        }
        true
    }

    pub fn time_mode(&self) -> TimeMode {
        match self {
            Block::Motion(motion) => motion.time_mode,
            Block::Timer(timer) => timer.time_mode,
            Block::Sequence(composite) | Block::Parallel(composite) => composite.time_mode,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Block::Sequence(_) | Block::Parallel(_))
    }

    pub fn as_motion(&self) -> Option<&MotionBlock> {
        match self {
            Block::Motion(motion) => Some(motion),
            _ => None,
        }
    }

    pub fn as_motion_mut(&mut self) -> Option<&mut MotionBlock> {
        match self {
            Block::Motion(motion) => Some(motion),
            _ => None,
        }
    }

    // ========================================================================
    // Addressing
    // ========================================================================

    /// Direct children (empty for leaves)
    pub fn children(&self) -> &[Block] {
        match self {
            Block::Sequence(composite) | Block::Parallel(composite) => &composite.children,
            Block::Motion(_) | Block::Timer(_) => &[],
        }
    }

    /// Mutable child list; `None` for leaves
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Sequence(composite) | Block::Parallel(composite) => {
                Some(&mut composite.children)
            }
            Block::Motion(_) | Block::Timer(_) => None,
        }
    }

    /// First direct child called `name`
    pub fn child(&self, name: &str) -> Option<&Block> {
        self.children().iter().find(|child| child.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.children_mut()?
            .iter_mut()
            .find(|child| child.name() == name)
    }

    /// Resolve a `/`-separated path of child names
    ///
    /// Empty segments are skipped, so `""` resolves to `self` and
    /// `"A//B/"` to `"A/B"`.
    pub fn child_at_path(&self, path: &str) -> Option<&Block> {
        path_segments(path).try_fold(self, |block, name| block.child(name))
    }

    pub fn child_at_path_mut(&mut self, path: &str) -> Option<&mut Block> {
        let mut block = self;
        for name in path_segments(path) {
            block = block.child_mut(name)?;
        }
        Some(block)
    }

    /// Depth-first visit of this block and every descendant
    pub fn walk(&self, visit: &mut impl FnMut(&Block)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Turn the tree into an unplayed playback node
    ///
    /// Fails if a motion has no target, or if its values do not match the
    /// target's kind, or if any setting is invalid.
    pub fn build(&self) -> Result<Box<dyn Playable>> {
        match self {
            Block::Motion(motion) => motion.build(),
            Block::Timer(timer) => Ok(Timer::new(timer.duration)?
                .named(timer.name.clone())
                .with_time_mode(timer.time_mode)
                .boxed()),
            Block::Sequence(composite) => {
                let mut sequence = Sequence::new()
                    .named(composite.name.clone())
                    .with_time_mode(composite.time_mode);
                for child in &composite.children {
                    sequence.push(child.build()?);
                }
                Ok(sequence.boxed())
            }
            Block::Parallel(composite) => {
                let mut parallel = Parallel::new()
                    .named(composite.name.clone())
                    .with_time_mode(composite.time_mode);
                for child in &composite.children {
                    parallel.push(child.build()?);
                }
                Ok(parallel.boxed())
            }
        }
    }
}

impl Default for Block {
    /// An unnamed zero-length timer
    fn default() -> Self {
        Block::Timer(TimerBlock::default())
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}
