//! Batch operations over sibling lists
//!
//! A batch operation is invoked once per sibling with that sibling's index.
//! With a path configured it edits the addressed descendant instead of the
//! sibling itself; a path that does not resolve leaves the sibling as it was.

use crate::block::Block;
use crate::value::BlockTarget;
use cadence_animation::Playable;
use tracing::warn;

/// A tooling edit applied to each node of a sibling list
pub trait BatchOperation {
    /// Relative path of the descendant to edit
    fn path(&self) -> Option<&str> {
        None
    }

    /// Edit the resolved block in place
    fn apply(&self, block: &mut Block, index: usize);

    /// Resolve the path under `node`, apply, and hand the node back
    fn perform(&self, mut node: Block, index: usize) -> Block {
        match self.path() {
            None => self.apply(&mut node, index),
            Some(path) => match node.child_at_path_mut(path) {
                Some(target) => self.apply(target, index),
                None => warn!(path, node = node.name(), index, "batch path did not resolve"),
            },
        }
        node
    }
}

/// Run `op` over every sibling, passing each one its index
pub fn apply_batch(op: &dyn BatchOperation, siblings: &mut [Block]) {
    for (index, slot) in siblings.iter_mut().enumerate() {
        let node = std::mem::take(slot);
        *slot = op.perform(node, index);
    }
}

/// Build every block, skipping (and logging) the ones that fail
pub fn build_all(blocks: &[Block]) -> Vec<Box<dyn Playable>> {
    blocks
        .iter()
        .filter_map(|block| match block.build() {
            Ok(node) => Some(node),
            Err(err) => {
                warn!(block = block.name(), %err, "block failed to build");
                None
            }
        })
        .collect()
}

// ============================================================================
// Operations
// ============================================================================

/// Set the name, optionally suffixed with `index + 1`
#[derive(Clone, Debug, Default)]
pub struct Rename {
    pub name: String,
    pub append_index: bool,
    pub path: Option<String>,
}

impl Rename {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            append_index: false,
            path: None,
        }
    }

    /// `"Item"` becomes `"Item1"`, `"Item2"`, ...
    pub fn numbered(name: impl Into<String>) -> Self {
        Self {
            append_index: true,
            ..Self::new(name)
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl BatchOperation for Rename {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn apply(&self, block: &mut Block, index: usize) {
        if self.append_index {
            block.set_name(format!("{}{}", self.name, index + 1));
        } else {
            block.set_name(self.name.clone());
        }
    }
}

/// `duration = base + index * increment`, for staggering
#[derive(Clone, Debug)]
pub struct IncrementalDuration {
    pub base: f32,
    pub increment: f32,
    pub path: Option<String>,
}

impl IncrementalDuration {
    pub fn new(base: f32, increment: f32) -> Self {
        Self {
            base,
            increment,
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl BatchOperation for IncrementalDuration {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn apply(&self, block: &mut Block, index: usize) {
        let duration = self.base + index as f32 * self.increment;
        if !block.set_duration(duration) {
            warn!(
                block = block.name(),
                "composite duration is derived from its children"
            );
        }
    }
}

/// Replace the node with a deep copy of a template
#[derive(Clone, Debug)]
pub struct CopyFromTemplate {
    pub template: Block,
    pub path: Option<String>,
}

impl CopyFromTemplate {
    pub fn new(template: Block) -> Self {
        Self {
            template,
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl BatchOperation for CopyFromTemplate {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn apply(&self, block: &mut Block, _index: usize) {
        *block = self.template.clone();
    }
}

/// Give the motion at `index` the `index`-th target
#[derive(Clone, Debug, Default)]
pub struct SetSetterTarget {
    pub targets: Vec<BlockTarget>,
    pub path: Option<String>,
}

impl SetSetterTarget {
    pub fn new(targets: impl IntoIterator<Item = BlockTarget>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl BatchOperation for SetSetterTarget {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn apply(&self, block: &mut Block, index: usize) {
        let Some(target) = self.targets.get(index) else {
            warn!(index, len = self.targets.len(), "no setter target for index");
            return;
        };
        match block.as_motion_mut() {
            Some(motion) => motion.target = Some(target.clone()),
            None => warn!(block = block.name(), "setter target needs a motion block"),
        }
    }
}
