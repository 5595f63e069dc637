//! Required-input validation as a hook.

use lumen_lifecycle::NodeLifecyclePhase;
use lumen_wiring::SlotDirection;

use crate::graph::GraphHooks;
use crate::node::NodeInstance;
use crate::plugin::Plugin;

/// A node reached compilation with required inputs unconnected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("node '{node}' is missing required inputs {slots:?}")]
pub struct MissingInputs {
    /// The node.
    pub node: String,
    /// Names of the unconnected slots.
    pub slots: Vec<String>,
}

/// Plugin that rejects a node at `PreCompile` if a required input has no
/// resource at array index 0.
///
/// Unlike the graph's own check, this runs after `PostSetup` hooks, so
/// inputs bound by setup hooks count as connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredInputsPlugin;

impl Plugin for RequiredInputsPlugin {
    fn build(&self, hooks: &mut GraphHooks) {
        hooks.register_node_hook(
            NodeLifecyclePhase::PreCompile,
            |node: &mut NodeInstance| {
                let missing = node.bindings().missing_required_inputs();
                if missing.is_empty() {
                    return Ok(());
                }
                Err(MissingInputs {
                    node: node.name().to_string(),
                    slots: missing
                        .into_iter()
                        .filter_map(|slot| node.schema().slot(SlotDirection::Input, slot))
                        .map(|slot| slot.name.clone())
                        .collect(),
                }
                .into())
            },
            "required_inputs",
        );
    }
}
