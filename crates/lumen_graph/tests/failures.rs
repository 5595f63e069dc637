//! Tests for failure propagation.
//!
//! A failing hook or node stops the operation in progress, is reported with
//! its phase and node, and leaves the graph uncompiled.


use std::sync::Arc;

use lumen_graph::{
    GraphConfig, GraphError, MissingInputs, NodeInstance, RenderGraph, RequiredInputsPlugin,
};
use lumen_lifecycle::{GraphLifecyclePhase, NodeLifecyclePhase, NodeStage};
use lumen_wiring::{NodeWiring, ResourceHandle, SlotDescriptor, WiringError};
use test_utils::{Boom, RecordingNode, consumer, drain, new_log, pass, producer, recorded_graph};

// ─────────────────────────────────────────────────────────────────────────────
// Graph hooks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn failing_graph_hook_stops_its_bucket_and_later_phases() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("solo", producer(&log)).unwrap();

    for name in ["A", "B", "C"] {
        let log = Arc::clone(&log);
        graph.hooks_mut().register_graph_hook(
            GraphLifecyclePhase::PostTopologyBuild,
            move |_: &RenderGraph| {
                log.lock().push(name.to_string());
                if name == "B" {
                    return Err(Box::new(Boom("B")));
                }
                Ok(())
            },
            name,
        );
    }
    let later = Arc::clone(&log);
    graph.hooks_mut().register_graph_hook(
        GraphLifecyclePhase::PreExecutionOrder,
        move |_: &RenderGraph| {
            later.lock().push("later".to_string());
            Ok(())
        },
        "later",
    );

    let error = graph.compile().unwrap_err();

    assert_eq!(drain(&log), ["A", "B"]);
    let GraphError::GraphHook { phase, source } = &error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(*phase, GraphLifecyclePhase::PostTopologyBuild);
    assert_eq!(source.downcast_ref::<Boom>(), Some(&Boom("B")));
    assert!(!graph.is_compiled());
    assert_eq!(graph.nodes()[0].state(), lumen_graph::NodeState::Created);
}

#[test]
fn compile_succeeds_once_failing_hooks_are_cleared() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("solo", producer(&log)).unwrap();
    graph.hooks_mut().register_graph_hook(
        GraphLifecyclePhase::PreCompilation,
        |_: &RenderGraph| Err("not yet".into()),
        "gate",
    );

    assert!(graph.compile().is_err());

    graph
        .hooks_mut()
        .clear_graph_hooks(GraphLifecyclePhase::PreCompilation);
    graph.compile().unwrap();
    assert!(graph.is_compiled());
}

// ─────────────────────────────────────────────────────────────────────────────
// Node hooks and node failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn failing_node_hook_names_the_node() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("first", producer(&log)).unwrap();
    graph.add_node("second", producer(&log)).unwrap();
    graph.hooks_mut().register_node_hook(
        NodeLifecyclePhase::PostSetup,
        |node: &mut NodeInstance| {
            if node.name() == "second" {
                return Err(Box::new(Boom("setup hook")));
            }
            Ok(())
        },
        "reject_second",
    );

    let error = graph.compile().unwrap_err();

    match error {
        GraphError::NodeHook { phase, node, .. } => {
            assert_eq!(phase, NodeLifecyclePhase::PostSetup);
            assert_eq!(node, "second");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(drain(&log), ["first:Setup", "second:Setup"]);
}

#[test]
fn failing_setup_stops_compile_and_is_cleaned_up_later() {
    let log = new_log();
    let mut graph = recorded_graph(&log);
    let a = graph.add_node("a", producer(&log)).unwrap();
    let b = graph
        .add_node("b", pass(&log).failing_at(NodeStage::Setup))
        .unwrap();
    graph.connect(a, 0, b, 0).unwrap();

    let error = graph.compile().unwrap_err();
    assert!(matches!(
        error,
        GraphError::NodeFailed {
            stage: NodeStage::Setup,
            ..
        }
    ));

    let entries = drain(&log);
    assert_eq!(entries.last().map(String::as_str), Some("b:Setup"));
    assert!(!entries.iter().any(|entry| entry.contains("Compile")));

    graph.cleanup().unwrap();
    let cleaned: Vec<String> = drain(&log)
        .into_iter()
        .filter(|entry| entry.ends_with(":Cleanup"))
        .collect();
    assert_eq!(cleaned, ["a:Cleanup"]);
}

#[test]
fn failing_execute_does_not_advance_the_frame() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph
        .add_node("flaky", producer(&log).failing_at(NodeStage::Execute))
        .unwrap();
    graph.compile().unwrap();

    let error = graph.execute().unwrap_err();

    assert!(matches!(
        error,
        GraphError::NodeFailed {
            stage: NodeStage::Execute,
            ..
        }
    ));
    assert_eq!(graph.frame_index(), 0);
    assert!(graph.is_compiled());
    assert_eq!(graph.nodes()[0].state(), lumen_graph::NodeState::Compiled);
}

#[test]
fn execute_before_compile_is_rejected() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("solo", producer(&log)).unwrap();

    assert!(matches!(graph.execute(), Err(GraphError::NotCompiled)));
    assert!(drain(&log).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Structure
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_names_are_rejected() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("same", producer(&log)).unwrap();

    let error = graph.add_node("same", producer(&log)).unwrap_err();

    assert!(matches!(error, GraphError::DuplicateNode(name) if name == "same"));
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn cycles_are_rejected_before_setup() {
    let log = new_log();
    let mut graph = recorded_graph(&log);
    let a = graph.add_node("a", pass(&log)).unwrap();
    let b = graph.add_node("b", pass(&log)).unwrap();
    graph.connect(a, 0, b, 0).unwrap();
    graph.connect(b, 0, a, 0).unwrap();

    let error = graph.compile().unwrap_err();

    match error {
        GraphError::Cycle { nodes } => assert_eq!(nodes, ["a", "b"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        drain(&log),
        [
            "graph:PreTopologyBuild",
            "graph:PostTopologyBuild",
            "graph:PreExecutionOrder",
        ]
    );
}

#[test]
fn unconnected_required_input_fails_validation() {
    let log = new_log();
    let mut graph = recorded_graph(&log);
    graph.add_node("lonely", consumer(&log)).unwrap();

    let error = graph.compile().unwrap_err();

    match error {
        GraphError::MissingInputs { node, slots } => {
            assert_eq!(node, "lonely");
            assert_eq!(slots, ["in"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(drain(&log).is_empty());
}

#[test]
fn nullable_inputs_may_stay_unconnected() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph
        .add_node(
            "optional",
            RecordingNode::new(&log).with_input(SlotDescriptor::new("mask").nullable()),
        )
        .unwrap();

    graph.compile().unwrap();
}

#[test]
fn required_inputs_plugin_rejects_at_pre_compile() {
    let log = new_log();
    let mut graph = RenderGraph::with_config(
        GraphConfig::new("deferred").with_required_input_validation(false),
    );
    graph.add_plugin(RequiredInputsPlugin);
    graph.add_node("lonely", consumer(&log)).unwrap();

    let error = graph.compile().unwrap_err();

    let GraphError::NodeHook { phase, source, .. } = &error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(*phase, NodeLifecyclePhase::PreCompile);
    assert_eq!(
        source.downcast_ref::<MissingInputs>(),
        Some(&MissingInputs {
            node: "lonely".to_string(),
            slots: vec!["in".to_string()],
        })
    );
    assert_eq!(drain(&log), ["lonely:Setup"]);
}

#[test]
fn post_setup_hook_can_satisfy_required_inputs() {
    let log = new_log();
    let mut graph = RenderGraph::with_config(
        GraphConfig::new("bound_in_setup").with_required_input_validation(false),
    );
    graph.hooks_mut().register_node_hook(
        NodeLifecyclePhase::PostSetup,
        |node: &mut NodeInstance| {
            let handle = ResourceHandle::from_raw(99).ok_or("null handle")?;
            node.set_input(0, 0, handle)?;
            Ok(())
        },
        "bind_external",
    );
    graph.add_plugin(RequiredInputsPlugin);
    let id = graph.add_node("lonely", consumer(&log)).unwrap();

    graph.compile().unwrap();

    assert_eq!(graph.node(id).unwrap().input(0, 0).map(ResourceHandle::raw), Some(99));
}

// ─────────────────────────────────────────────────────────────────────────────
// Sealing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn wiring_is_sealed_during_execute_hooks() {
    let log = new_log();
    let mut graph = RenderGraph::new();
    graph.add_node("solo", producer(&log)).unwrap();
    graph.hooks_mut().register_node_hook(
        NodeLifecyclePhase::PreExecute,
        |node: &mut NodeInstance| {
            let handle = ResourceHandle::from_raw(7).ok_or("null handle")?;
            node.set_output(0, 0, handle)?;
            Ok(())
        },
        "rewire",
    );
    graph.compile().unwrap();

    let error = graph.execute().unwrap_err();

    let GraphError::NodeHook { phase, source, .. } = &error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(*phase, NodeLifecyclePhase::PreExecute);
    assert_eq!(
        source.downcast_ref::<WiringError>(),
        Some(&WiringError::Sealed)
    );
}
