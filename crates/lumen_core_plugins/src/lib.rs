//! Core infrastructure plugins for Lumen.
//!
//! This crate provides plugins that most render graphs want:
//!
//! - [`TracingPlugin`] - Logging and observability via the `tracing` crate
//! - [`ProfilerPlugin`] - Per-node execute timings, collected through hooks
//!
//! # Example
//!
//! ```
//! use lumen_core_plugins::{ProfilerPlugin, TracingPlugin};
//! use lumen_graph::RenderGraph;
//! use tracing::Level;
//!
//! let profiler = ProfilerPlugin::new();
//! let report = profiler.report();
//!
//! let mut graph = RenderGraph::new();
//! graph
//!     .add_plugin(TracingPlugin::default().with_level(Level::DEBUG))
//!     .add_plugin(profiler);
//! # let _ = report;
//! ```

mod profiler;
mod tracing_plugin;

pub use profiler::{NodeTiming, ProfilerPlugin, ProfilerReport};
pub use tracing_plugin::{TracingConfig, TracingFormat, TracingPlugin};
