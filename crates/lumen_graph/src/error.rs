//! Errors raised while building, compiling, or running a graph.

use lumen_lifecycle::{GraphLifecyclePhase, HookError, NodeLifecyclePhase, NodeStage};
use lumen_wiring::WiringError;

use crate::node::NodeId;

/// Errors returned by [`RenderGraph`](crate::RenderGraph) operations.
///
/// Hook and node failures keep the original error as their source.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node with this name already exists.
    #[error("a node named '{0}' already exists")]
    DuplicateNode(String),

    /// The ID does not refer to a node of this graph.
    #[error("{0} does not exist in this graph")]
    UnknownNode(NodeId),

    /// A wiring call was rejected.
    #[error("wiring '{node}' failed: {source}")]
    Wiring {
        /// The node whose slot was addressed.
        node: String,
        /// The rejected call.
        #[source]
        source: WiringError,
    },

    /// Required inputs are unconnected.
    #[error("node '{node}' has unconnected required inputs {slots:?}")]
    MissingInputs {
        /// The node.
        node: String,
        /// Names of the unconnected slots.
        slots: Vec<String>,
    },

    /// The dependency topology contains a cycle.
    #[error("dependency cycle through {nodes:?}")]
    Cycle {
        /// Names of the nodes on or behind the cycle.
        nodes: Vec<String>,
    },

    /// The graph must be compiled first.
    #[error("graph is not compiled")]
    NotCompiled,

    /// A graph hook failed.
    #[error("graph hook failed during {phase}")]
    GraphHook {
        /// The phase being run.
        phase: GraphLifecyclePhase,
        /// The hook's error.
        #[source]
        source: HookError,
    },

    /// A node hook failed.
    #[error("node hook failed during {phase} of '{node}'")]
    NodeHook {
        /// The phase being run.
        phase: NodeLifecyclePhase,
        /// The node the hook ran for.
        node: String,
        /// The hook's error.
        #[source]
        source: HookError,
    },

    /// A node's own lifecycle method failed.
    #[error("node '{node}' failed during {stage}")]
    NodeFailed {
        /// The failing node.
        node: String,
        /// The lifecycle method that failed.
        stage: NodeStage,
        /// The node's error.
        #[source]
        source: HookError,
    },
}

impl GraphError {
    /// Returns the underlying hook or node error, if any.
    #[must_use]
    pub fn hook_error(&self) -> Option<&(dyn core::error::Error + Send + Sync + 'static)> {
        match self {
            Self::GraphHook { source, .. }
            | Self::NodeHook { source, .. }
            | Self::NodeFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
