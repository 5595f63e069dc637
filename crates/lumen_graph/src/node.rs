//! Node behaviors and their per-graph instances.
//!
//! A [`Node`] is the behavior a caller plugs into the graph. The graph wraps
//! each one in a [`NodeInstance`] that owns its slot bindings and lifecycle
//! state. Hooks receive the instance, never the behavior.

use core::fmt;

use lumen_lifecycle::{HookResult, NodeStage};
use lumen_wiring::{NodeSchema, NodeWiring, ResourceHandle, SlotBindings, WiringError};

use crate::resource::ResourceAllocator;

// ─────────────────────────────────────────────────────────────────────────────
// NodeId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new node ID.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node
// ─────────────────────────────────────────────────────────────────────────────

/// The behavior of a render graph node.
///
/// Only [`schema`](Node::schema) is required. The lifecycle methods default
/// to doing nothing. The graph guarantees, per node, that `setup` runs before
/// `compile`, `compile` before any `execute`, and `cleanup` at most once
/// after a successful `setup`.
pub trait Node: Send + 'static {
    /// Declares the node's input and output slots.
    fn schema(&self) -> NodeSchema;

    /// Acquires long-lived state. Runs once per compilation.
    fn setup(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }

    /// Builds per-compilation state from connected inputs.
    fn compile(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }

    /// Does the node's per-frame work.
    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }

    /// Releases what `setup` and `compile` acquired.
    fn cleanup(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }
}

/// What a node sees while one of its lifecycle methods runs.
pub struct NodeContext<'a> {
    name: &'a str,
    stage: NodeStage,
    frame: u64,
    bindings: &'a mut SlotBindings,
    resources: &'a ResourceAllocator,
}

impl NodeContext<'_> {
    /// Returns the node's instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the lifecycle stage being run.
    #[must_use]
    pub fn stage(&self) -> NodeStage {
        self.stage
    }

    /// Returns the index of the current frame.
    ///
    /// Counts completed frames, so it is `0` for the first `execute`.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the node's slot declarations.
    #[must_use]
    pub fn schema(&self) -> &NodeSchema {
        self.bindings.schema()
    }

    /// Returns the handle bound to an input slot element.
    #[must_use]
    pub fn input(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.bindings.input(slot, array_index)
    }

    /// Returns the handle bound to an output slot element.
    #[must_use]
    pub fn output(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.bindings.output(slot, array_index)
    }

    /// Binds an output slot element.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::Sealed`] during `execute`, or a range error if
    /// the slot is not declared.
    pub fn set_output(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        if self.stage == NodeStage::Execute {
            return Err(WiringError::Sealed);
        }
        self.bindings.set_output(slot, array_index, handle)
    }

    /// Mints a fresh resource handle owned by the graph.
    #[must_use]
    pub fn allocate(&self) -> ResourceHandle {
        self.resources.allocate()
    }
}

impl fmt::Debug for NodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NodeInstance
// ─────────────────────────────────────────────────────────────────────────────

/// Where a node is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Added to the graph; `setup` has not run.
    Created,
    /// `setup` succeeded.
    SetUp,
    /// `compile` succeeded; the node may execute.
    Compiled,
    /// `execute` or one of its hooks is running. Wiring is sealed.
    Executing,
    /// `cleanup` has run.
    CleanedUp,
}

impl NodeState {
    /// Returns true if the node holds state that `cleanup` must release.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::SetUp | Self::Compiled | Self::Executing)
    }
}

/// A node placed in a graph.
///
/// Implements [`NodeWiring`], which is how the graph and node hooks connect
/// its slots. Writes are rejected with [`WiringError::Sealed`] while the
/// node is executing.
pub struct NodeInstance {
    id: NodeId,
    name: String,
    behavior: Box<dyn Node>,
    bindings: SlotBindings,
    dependencies: Vec<NodeId>,
    state: NodeState,
}

impl NodeInstance {
    pub(crate) fn new(id: NodeId, name: String, behavior: Box<dyn Node>) -> Self {
        let bindings = SlotBindings::new(behavior.schema());
        Self {
            id,
            name,
            behavior,
            bindings,
            dependencies: Vec::new(),
            state: NodeState::Created,
        }
    }

    /// Returns the node's ID.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's unique instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node's lifecycle state.
    #[must_use]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Returns the node's slot declarations.
    #[must_use]
    pub fn schema(&self) -> &NodeSchema {
        self.bindings.schema()
    }

    /// Returns the node's slot storage.
    #[must_use]
    pub fn bindings(&self) -> &SlotBindings {
        &self.bindings
    }

    /// Returns the nodes this node consumes resources from.
    #[must_use]
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    pub(crate) fn add_dependency(&mut self, producer: NodeId) {
        if !self.dependencies.contains(&producer) {
            self.dependencies.push(producer);
        }
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    /// Runs one lifecycle method of the behavior.
    pub(crate) fn run(
        &mut self,
        stage: NodeStage,
        frame: u64,
        resources: &ResourceAllocator,
    ) -> HookResult {
        let mut ctx = NodeContext {
            name: &self.name,
            stage,
            frame,
            bindings: &mut self.bindings,
            resources,
        };
        match stage {
            NodeStage::Setup => self.behavior.setup(&mut ctx),
            NodeStage::Compile => self.behavior.compile(&mut ctx),
            NodeStage::Execute => self.behavior.execute(&mut ctx),
            NodeStage::Cleanup => self.behavior.cleanup(&mut ctx),
        }
    }
}

impl NodeWiring for NodeInstance {
    fn input(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.bindings.input(slot, array_index)
    }

    fn output(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.bindings.output(slot, array_index)
    }

    fn set_input(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        if self.state == NodeState::Executing {
            return Err(WiringError::Sealed);
        }
        self.bindings.set_input(slot, array_index, handle)
    }

    fn set_output(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        if self.state == NodeState::Executing {
            return Err(WiringError::Sealed);
        }
        self.bindings.set_output(slot, array_index, handle)
    }
}

impl fmt::Debug for NodeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeInstance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
