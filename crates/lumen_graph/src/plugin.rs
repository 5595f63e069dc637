//! Graph plugins.
//!
//! A plugin packages a set of hooks so that a cross-cutting concern
//! (tracing, validation, profiling) can be added to a graph in one call.
//!
//! # Example
//!
//! ```
//! use lumen_graph::{GraphHooks, Plugin, RenderGraph};
//! use lumen_lifecycle::GraphLifecyclePhase;
//!
//! struct AnnouncePlugin;
//!
//! impl Plugin for AnnouncePlugin {
//!     fn build(&self, hooks: &mut GraphHooks) {
//!         hooks.register_graph_hook(
//!             GraphLifecyclePhase::PostCompilation,
//!             |graph: &RenderGraph| {
//!                 tracing::info!(graph = %graph.name(), "compiled");
//!                 Ok(())
//!             },
//!             "announce",
//!         );
//!     }
//! }
//!
//! let mut graph = RenderGraph::new();
//! graph.add_plugin(AnnouncePlugin);
//! graph.compile().unwrap();
//! ```

use crate::graph::GraphHooks;

/// A reusable bundle of lifecycle hooks.
pub trait Plugin: Send + Sync + 'static {
    /// Registers the plugin's hooks. Called once when the plugin is added.
    fn build(&self, hooks: &mut GraphHooks);

    /// Returns the plugin's name for diagnostics.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}
