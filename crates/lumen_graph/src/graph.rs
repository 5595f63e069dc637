//! The render graph and its compile/execute/cleanup driver.
//!
//! [`RenderGraph`] owns its nodes, the edges between them, and one
//! [`GraphHooks`] registry. It decides *when* node lifecycle methods and
//! hooks run; the nodes decide what they do.

use hashbrown::HashMap;
use lumen_lifecycle::{GraphLifecyclePhase, LifecycleHooks, NodeLifecyclePhase, NodeStage};
use lumen_wiring::{NodeWiring, SlotDirection, WiringError};

use crate::edge::{EdgeId, ResourceEdge};
use crate::error::GraphError;
use crate::node::{Node, NodeId, NodeInstance, NodeState};
use crate::plugin::Plugin;
use crate::resource::ResourceAllocator;
use crate::topology::Topology;

/// The hook registry a [`RenderGraph`] drives.
pub type GraphHooks = LifecycleHooks<RenderGraph, NodeInstance>;

// ─────────────────────────────────────────────────────────────────────────────
// GraphConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a [`RenderGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Name used in diagnostics.
    pub name: String,
    /// Reject compilation while a required input is unconnected.
    pub validate_required_inputs: bool,
    /// Clean up live nodes when the graph is dropped.
    pub cleanup_on_drop: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "render_graph".to_string(),
            validate_required_inputs: true,
            cleanup_on_drop: true,
        }
    }
}

impl GraphConfig {
    /// Creates the default configuration with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Enables or disables the required-input check before compilation.
    #[must_use]
    pub fn with_required_input_validation(mut self, enabled: bool) -> Self {
        self.validate_required_inputs = enabled;
        self
    }

    /// Enables or disables cleanup on drop.
    #[must_use]
    pub fn with_cleanup_on_drop(mut self, enabled: bool) -> Self {
        self.cleanup_on_drop = enabled;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RenderGraph
// ─────────────────────────────────────────────────────────────────────────────

/// A directed graph of render nodes connected through resource slots.
///
/// # Lifecycle
///
/// Building ([`add_node`], [`connect`]) only wires slots. [`compile`] runs
/// the graph phases in order, calling every node's `setup` and then every
/// node's `compile` in execution order. [`execute`] runs one frame.
/// [`cleanup`] tears nodes down in reverse execution order.
///
/// Any structural change marks the graph uncompiled. Compiling again first
/// cleans up the nodes of the previous compilation.
///
/// # Example
///
/// ```
/// use lumen_graph::{Node, RenderGraph};
/// use lumen_wiring::{NodeSchema, SlotDescriptor};
///
/// struct Producer;
/// impl Node for Producer {
///     fn schema(&self) -> NodeSchema {
///         NodeSchema::new().with_output(SlotDescriptor::new("color"))
///     }
/// }
///
/// struct Consumer;
/// impl Node for Consumer {
///     fn schema(&self) -> NodeSchema {
///         NodeSchema::new().with_input(SlotDescriptor::new("color"))
///     }
/// }
///
/// let mut graph = RenderGraph::new();
/// let producer = graph.add_node("producer", Producer).unwrap();
/// let consumer = graph.add_node("consumer", Consumer).unwrap();
/// graph.connect(producer, 0, consumer, 0).unwrap();
///
/// graph.compile().unwrap();
/// graph.execute().unwrap();
/// assert_eq!(graph.frame_index(), 1);
/// ```
///
/// [`add_node`]: RenderGraph::add_node
/// [`connect`]: RenderGraph::connect
/// [`compile`]: RenderGraph::compile
/// [`execute`]: RenderGraph::execute
/// [`cleanup`]: RenderGraph::cleanup
#[derive(Debug)]
pub struct RenderGraph {
    config: GraphConfig,
    nodes: Vec<NodeInstance>,
    names: HashMap<String, NodeId>,
    edges: Vec<ResourceEdge>,
    topology: Topology,
    execution_order: Vec<NodeId>,
    hooks: GraphHooks,
    resources: ResourceAllocator,
    compiled: bool,
    frame: u64,
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGraph {
    /// Creates an empty graph with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Creates an empty graph.
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            names: HashMap::new(),
            edges: Vec::new(),
            topology: Topology::default(),
            execution_order: Vec::new(),
            hooks: GraphHooks::new(),
            resources: ResourceAllocator::new(),
            compiled: false,
            frame: 0,
        }
    }

    /// Returns the graph's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the graph's configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns all nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    /// Returns all edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[ResourceEdge] {
        &self.edges
    }

    /// Returns the edges entering or leaving `node`.
    pub fn edges_of(&self, node: NodeId) -> impl Iterator<Item = &ResourceEdge> {
        self.edges.iter().filter(move |edge| edge.touches(node))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeInstance> {
        self.nodes.get(id.index())
    }

    /// Returns a node by ID for wiring.
    ///
    /// Wiring a node directly does not add an edge or mark the graph
    /// uncompiled; use [`connect`](Self::connect) for that.
    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeInstance> {
        self.nodes.get_mut(id.index())
    }

    /// Looks up a node by instance name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Returns the topology built by the last compilation.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the order computed by the last compilation.
    #[must_use]
    pub fn execution_order(&self) -> &[NodeId] {
        &self.execution_order
    }

    /// Returns true if the graph is compiled and may execute.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Returns the number of frames executed.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Returns the hook registry.
    #[must_use]
    pub fn hooks(&self) -> &GraphHooks {
        &self.hooks
    }

    /// Returns the hook registry for registration.
    #[must_use]
    pub fn hooks_mut(&mut self) -> &mut GraphHooks {
        &mut self.hooks
    }

    /// Registers a plugin's hooks.
    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        tracing::debug!(graph = %self.config.name, plugin = plugin.name(), "adding plugin");
        plugin.build(&mut self.hooks);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Building
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a node under a unique instance name.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if the name is taken.
    pub fn add_node<N: Node>(
        &mut self,
        name: impl Into<String>,
        node: N,
    ) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateNode(name));
        }

        let id = NodeId::new(self.nodes.len());
        tracing::debug!(graph = %self.config.name, node = %name, %id, "node added");
        self.names.insert(name.clone(), id);
        self.nodes.push(NodeInstance::new(id, name, Box::new(node)));
        self.compiled = false;
        Ok(id)
    }

    /// Connects an output slot of `from` to an input slot of `to`.
    ///
    /// Every array element the two slots share is connected at the same
    /// index. Output elements without a resource get a fresh handle first.
    /// `to` becomes dependent on `from` and the graph is marked uncompiled.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] for a foreign ID and
    /// [`GraphError::Wiring`] for an undeclared slot or a sealed node.
    pub fn connect(
        &mut self,
        from: NodeId,
        output: u32,
        to: NodeId,
        input: u32,
    ) -> Result<EdgeId, GraphError> {
        let source = self.node(from).ok_or(GraphError::UnknownNode(from))?;
        let target = self.node(to).ok_or(GraphError::UnknownNode(to))?;
        let output_len = slot_len(source, SlotDirection::Output, output)?;
        let input_len = slot_len(target, SlotDirection::Input, input)?;

        for index in 0..output_len.min(input_len) {
            let producer = &mut self.nodes[from.index()];
            let handle = match producer.output(output, index) {
                Some(handle) => handle,
                None => {
                    let handle = self.resources.allocate();
                    producer
                        .set_output(output, index, handle)
                        .map_err(|source| wiring_error(producer, source))?;
                    handle
                }
            };

            let consumer = &mut self.nodes[to.index()];
            consumer
                .set_input(input, index, handle)
                .map_err(|source| wiring_error(consumer, source))?;
        }

        self.nodes[to.index()].add_dependency(from);
        let edge = ResourceEdge::new(from, output, to, input);
        let id = edge.id.clone();
        tracing::debug!(graph = %self.config.name, %edge, "nodes connected");
        self.edges.push(edge);
        self.compiled = false;
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compilation
    // ─────────────────────────────────────────────────────────────────────────

    /// Compiles the graph.
    ///
    /// Runs, in order: required-input validation, `PreTopologyBuild`,
    /// topology build, `PostTopologyBuild`, `PreExecutionOrder`, execution
    /// ordering, `PostExecutionOrder`, `PreCompilation`, `setup` of every
    /// node, `compile` of every node, and `PostCompilation`.
    ///
    /// # Errors
    ///
    /// The first failure stops compilation and is returned; no later phase
    /// runs and the graph stays uncompiled. Nodes already set up are cleaned
    /// up by the next compilation, by [`cleanup`](Self::cleanup), or on drop.
    pub fn compile(&mut self) -> Result<(), GraphError> {
        tracing::info!(graph = %self.config.name, nodes = self.nodes.len(), "compiling graph");

        if self.nodes.iter().any(|node| node.state().is_live()) {
            self.cleanup()?;
        }
        self.compiled = false;

        if self.config.validate_required_inputs {
            self.validate()?;
        }

        self.run_graph_hooks(GraphLifecyclePhase::PreTopologyBuild)?;
        self.topology = Topology::build(self.nodes.len(), &self.edges);
        self.run_graph_hooks(GraphLifecyclePhase::PostTopologyBuild)?;

        self.run_graph_hooks(GraphLifecyclePhase::PreExecutionOrder)?;
        self.execution_order = self.topology.execution_order().map_err(|blocked| {
            GraphError::Cycle {
                nodes: blocked
                    .into_iter()
                    .map(|id| self.nodes[id.index()].name().to_string())
                    .collect(),
            }
        })?;
        self.run_graph_hooks(GraphLifecyclePhase::PostExecutionOrder)?;

        self.run_graph_hooks(GraphLifecyclePhase::PreCompilation)?;
        for position in 0..self.execution_order.len() {
            let id = self.execution_order[position];
            self.run_node_stage(id, NodeStage::Setup)?;
        }
        for position in 0..self.execution_order.len() {
            let id = self.execution_order[position];
            self.run_node_stage(id, NodeStage::Compile)?;
        }
        self.run_graph_hooks(GraphLifecyclePhase::PostCompilation)?;

        self.compiled = true;
        tracing::info!(graph = %self.config.name, order = ?self.execution_order, "graph compiled");
        Ok(())
    }

    /// Checks that every required input has a resource at array index 0.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingInputs`] for the first offending node.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in &self.nodes {
            let missing = node.bindings().missing_required_inputs();
            if !missing.is_empty() {
                return Err(GraphError::MissingInputs {
                    node: node.name().to_string(),
                    slots: missing
                        .into_iter()
                        .filter_map(|slot| node.schema().slot(SlotDirection::Input, slot))
                        .map(|slot| slot.name.clone())
                        .collect(),
                });
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Executes one frame: every node in execution order, each bracketed by
    /// its `PreExecute` and `PostExecute` hooks.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotCompiled`] if the graph must be compiled
    /// first. Otherwise the first failure stops the frame and the frame
    /// index is not advanced.
    pub fn execute(&mut self) -> Result<(), GraphError> {
        if !self.compiled {
            return Err(GraphError::NotCompiled);
        }

        for position in 0..self.execution_order.len() {
            let id = self.execution_order[position];
            self.nodes[id.index()].set_state(NodeState::Executing);
            let result = self.run_node_stage(id, NodeStage::Execute);
            self.nodes[id.index()].set_state(NodeState::Compiled);
            result?;
        }

        self.frame += 1;
        tracing::trace!(graph = %self.config.name, frame = self.frame, "frame executed");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cleanup
    // ─────────────────────────────────────────────────────────────────────────

    /// Cleans up every live node in reverse execution order.
    ///
    /// Each node is cleaned up at most once per compilation. The graph is
    /// left uncompiled.
    ///
    /// # Errors
    ///
    /// Stops at the first failure. Once a node's `cleanup` has been called
    /// it counts as cleaned up, even if it or a hook failed; nodes after it
    /// stay live and are retried by the next call.
    pub fn cleanup(&mut self) -> Result<(), GraphError> {
        self.compiled = false;

        let live: Vec<NodeId> = self
            .execution_order
            .iter()
            .rev()
            .copied()
            .filter(|id| self.nodes[id.index()].state().is_live())
            .collect();
        if live.is_empty() {
            return Ok(());
        }

        tracing::debug!(graph = %self.config.name, nodes = live.len(), "cleaning up graph");
        for id in live {
            self.run_node_stage(id, NodeStage::Cleanup)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn run_graph_hooks(&self, phase: GraphLifecyclePhase) -> Result<(), GraphError> {
        tracing::debug!(graph = %self.config.name, %phase, "graph phase");
        self.hooks
            .execute_graph_hooks(phase, self)
            .map_err(|source| GraphError::GraphHook { phase, source })
    }

    fn run_node_hooks(&mut self, id: NodeId, phase: NodeLifecyclePhase) -> Result<(), GraphError> {
        let node = &mut self.nodes[id.index()];
        self.hooks
            .execute_node_hooks(phase, node)
            .map_err(|source| GraphError::NodeHook {
                phase,
                node: node.name().to_string(),
                source,
            })
    }

    fn run_node_body(&mut self, id: NodeId, stage: NodeStage) -> Result<(), GraphError> {
        let node = &mut self.nodes[id.index()];
        tracing::trace!(node = %node.name(), %stage, frame = self.frame, "running node");
        let result = node.run(stage, self.frame, &self.resources);
        match stage {
            NodeStage::Setup if result.is_ok() => node.set_state(NodeState::SetUp),
            NodeStage::Compile if result.is_ok() => node.set_state(NodeState::Compiled),
            NodeStage::Cleanup => node.set_state(NodeState::CleanedUp),
            _ => {}
        }
        result.map_err(|source| GraphError::NodeFailed {
            node: node.name().to_string(),
            stage,
            source,
        })
    }

    fn run_node_stage(&mut self, id: NodeId, stage: NodeStage) -> Result<(), GraphError> {
        let (pre, post) = NodeLifecyclePhase::bracketing(stage);
        self.run_node_hooks(id, pre)?;
        self.run_node_body(id, stage)?;
        self.run_node_hooks(id, post)
    }
}

impl Drop for RenderGraph {
    fn drop(&mut self) {
        if !self.config.cleanup_on_drop {
            return;
        }
        if let Err(error) = self.cleanup() {
            tracing::error!(graph = %self.config.name, %error, "cleanup on drop failed");
        }
    }
}

fn slot_len(node: &NodeInstance, direction: SlotDirection, slot: u32) -> Result<u32, GraphError> {
    node.bindings()
        .array_len(direction, slot)
        .ok_or_else(|| {
            wiring_error(
                node,
                WiringError::SlotOutOfRange {
                    direction,
                    slot,
                    declared: node.schema().slots(direction).len(),
                },
            )
        })
}

fn wiring_error(node: &NodeInstance, source: WiringError) -> GraphError {
    GraphError::Wiring {
        node: node.name().to_string(),
        source,
    }
}
