//! Lifecycle phases and hook registry for Lumen render graphs.
//!
//! `lumen_lifecycle` defines the extension points a render graph exposes while
//! it is compiled, executed, and torn down. External code (validation,
//! profiling, resource instrumentation) attaches callbacks to those points
//! without touching node or graph code.
//!
//! # Core Concepts
//!
//! - [`GraphLifecyclePhase`] - The six graph-level compilation phases
//! - [`NodeLifecyclePhase`] - The eight per-node Setup/Compile/Execute/Cleanup phases
//! - [`LifecycleHooks`] - Ordered per-phase hook storage with register/execute/clear
//! - [`DiagnosticSink`] - Optional side-channel for diagnostic messages
//!
//! # Example
//!
//! ```
//! use lumen_lifecycle::{GraphLifecyclePhase, LifecycleHooks};
//!
//! struct Graph {
//!     name: &'static str,
//! }
//! struct Node;
//!
//! let mut hooks: LifecycleHooks<Graph, Node> = LifecycleHooks::new();
//! hooks.register_graph_hook(
//!     GraphLifecyclePhase::PreCompilation,
//!     |graph: &Graph| {
//!         assert_eq!(graph.name, "main");
//!         Ok(())
//!     },
//!     "check_name",
//! );
//!
//! hooks
//!     .execute_graph_hooks(GraphLifecyclePhase::PreCompilation, &Graph { name: "main" })
//!     .unwrap();
//! ```

/// Diagnostic side-channel used for optional instrumentation.
pub mod diagnostics;

/// Ordered hook registry keyed by lifecycle phase.
pub mod hooks;

/// Graph-level and node-level lifecycle phase enumerations.
pub mod phase;

pub use diagnostics::{DiagnosticSink, NullSink, Severity, TracingSink};
pub use hooks::{HookError, HookResult, LifecycleHooks};
pub use phase::{GraphLifecyclePhase, LifecyclePhase, NodeLifecyclePhase, NodeStage};
