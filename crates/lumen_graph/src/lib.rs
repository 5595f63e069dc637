//! Render graph orchestration for Lumen.
//!
//! `lumen_graph` drives the lifecycle that `lumen_lifecycle` describes. It
//! connects node slots through the `lumen_wiring` contract, orders nodes by
//! their resource dependencies, and runs setup, compile, execute, and
//! cleanup with the matching hooks around each.
//!
//! # Core Concepts
//!
//! - [`RenderGraph`] - Nodes, edges, hooks, and the compile/execute driver
//! - [`Node`] - The behavior a caller plugs in
//! - [`NodeInstance`] - A node placed in a graph; what node hooks receive
//! - [`Topology`] - Producer/consumer adjacency and execution order
//! - [`Plugin`] - A reusable bundle of hooks
//!
//! # Compile order
//!
//! | Step | Phase |
//! |------|-------|
//! | 1 | required-input validation |
//! | 2 | `PreTopologyBuild`, topology, `PostTopologyBuild` |
//! | 3 | `PreExecutionOrder`, ordering, `PostExecutionOrder` |
//! | 4 | `PreCompilation` |
//! | 5 | `PreSetup`/`setup`/`PostSetup` for every node |
//! | 6 | `PreCompile`/`compile`/`PostCompile` for every node |
//! | 7 | `PostCompilation` |

/// Development tools (phase tracing).
pub mod dev;

/// Resource edges between nodes.
pub mod edge;

/// Graph errors.
pub mod error;

/// The render graph.
pub mod graph;

/// Node behaviors and instances.
pub mod node;

/// Graph plugins.
pub mod plugin;

/// Resource handle allocation.
pub mod resource;

/// Dependency topology and execution order.
pub mod topology;

/// Required-input validation plugin.
pub mod validation;

pub use edge::{EdgeId, ResourceEdge};
pub use error::GraphError;
pub use graph::{GraphConfig, GraphHooks, RenderGraph};
pub use node::{Node, NodeContext, NodeId, NodeInstance, NodeState};
pub use plugin::Plugin;
pub use resource::ResourceAllocator;
pub use topology::Topology;
pub use validation::{MissingInputs, RequiredInputsPlugin};
