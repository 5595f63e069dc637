//! Development tools for graph compilation and execution.
//!
//! [`PhaseTracePlugin`] logs every graph and node phase as it is reached,
//! which makes the hook order visible with `RUST_LOG=lumen_graph=trace`.
//!
//! # Setup
//!
//! ```
//! use lumen_graph::RenderGraph;
//! use lumen_graph::dev::PhaseTracePlugin;
//!
//! let mut graph = RenderGraph::new();
//! graph.add_plugin(PhaseTracePlugin);
//! ```

use lumen_lifecycle::{GraphLifecyclePhase, NodeLifecyclePhase};

use crate::graph::{GraphHooks, RenderGraph};
use crate::node::NodeInstance;
use crate::plugin::Plugin;

/// Plugin that emits a `tracing` event at every lifecycle phase.
///
/// Graph phases are logged at `debug`, node phases at `trace` since they
/// repeat every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTracePlugin;

impl Plugin for PhaseTracePlugin {
    fn build(&self, hooks: &mut GraphHooks) {
        for phase in GraphLifecyclePhase::ALL {
            hooks.register_graph_hook(
                phase,
                move |graph: &RenderGraph| {
                    tracing::debug!(graph = %graph.name(), %phase, "phase reached");
                    Ok(())
                },
                "phase_trace",
            );
        }

        for phase in NodeLifecyclePhase::ALL {
            hooks.register_node_hook(
                phase,
                move |node: &mut NodeInstance| {
                    tracing::trace!(node = %node.name(), state = ?node.state(), %phase, "phase reached");
                    Ok(())
                },
                "phase_trace",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_one_hook_per_phase() {
        let mut hooks = GraphHooks::new();
        PhaseTracePlugin.build(&mut hooks);

        for phase in GraphLifecyclePhase::ALL {
            assert_eq!(hooks.graph_hook_names(phase), vec!["phase_trace"]);
        }
        for phase in NodeLifecyclePhase::ALL {
            assert_eq!(hooks.node_hook_count(phase), 1);
        }
    }
}
