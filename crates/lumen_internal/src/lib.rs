//! # Lumen Internal Library
//!
//! Re-exports the core Lumen crates for convenience.

/// Lifecycle phases and the hook registry.
pub use lumen_lifecycle;

/// Slot wiring contract between graphs and nodes.
pub use lumen_wiring;

/// Render graph orchestration.
pub use lumen_graph;

/// Tracing and profiling plugins.
pub use lumen_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use lumen_core_plugins::{ProfilerPlugin, ProfilerReport, TracingFormat, TracingPlugin};
    pub use lumen_graph::dev::PhaseTracePlugin;
    pub use lumen_graph::{
        GraphConfig, GraphError, GraphHooks, Node, NodeContext, NodeId, NodeInstance, NodeState,
        Plugin, RenderGraph, RequiredInputsPlugin,
    };
    pub use lumen_lifecycle::{
        GraphLifecyclePhase, HookError, HookResult, LifecycleHooks, NodeLifecyclePhase, NodeStage,
    };
    pub use lumen_wiring::{
        NodeSchema, NodeWiring, ResourceHandle, SlotDescriptor, SlotDirection, WiringError,
    };
}
