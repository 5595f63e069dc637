//! Tests for the compile/execute/cleanup lifecycle.
//!
//! These tests verify the order in which `RenderGraph` runs graph phases,
//! node phases, and node lifecycle methods.


use lumen_graph::{GraphConfig, NodeState, RenderGraph};
use test_utils::{consumer, drain, entries_for, new_log, pass, producer, record_phases, recorded_graph};

fn node_stage(name: &str, stage: &str) -> Vec<String> {
    vec![
        format!("{name}:Pre{stage}"),
        format!("{name}:{stage}"),
        format!("{name}:Post{stage}"),
    ]
}

/// Builds `a -> b -> c`, inserted as `c`, `a`, `b`.
fn chain(log: &test_utils::Log) -> RenderGraph {
    let mut graph = recorded_graph(log);
    let c = graph.add_node("c", consumer(log)).unwrap();
    let a = graph.add_node("a", producer(log)).unwrap();
    let b = graph.add_node("b", pass(log)).unwrap();
    graph.connect(a, 0, b, 0).unwrap();
    graph.connect(b, 0, c, 0).unwrap();
    graph
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compile_runs_phases_in_pipeline_order() {
    let log = new_log();
    let mut graph = chain(&log);

    graph.compile().unwrap();

    let mut expected: Vec<String> = [
        "graph:PreTopologyBuild",
        "graph:PostTopologyBuild",
        "graph:PreExecutionOrder",
        "graph:PostExecutionOrder",
        "graph:PreCompilation",
    ]
    .map(String::from)
    .to_vec();
    for name in ["a", "b", "c"] {
        expected.extend(node_stage(name, "Setup"));
    }
    for name in ["a", "b", "c"] {
        expected.extend(node_stage(name, "Compile"));
    }
    expected.push("graph:PostCompilation".to_string());

    assert_eq!(drain(&log), expected);
    assert!(graph.is_compiled());
}

#[test]
fn execution_order_follows_dependencies() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();

    let names: Vec<&str> = graph
        .execution_order()
        .iter()
        .map(|id| graph.node(*id).unwrap().name())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn compiled_nodes_are_in_compiled_state() {
    let log = new_log();
    let mut graph = chain(&log);
    assert!(graph.nodes().iter().all(|node| node.state() == NodeState::Created));

    graph.compile().unwrap();

    assert!(graph.nodes().iter().all(|node| node.state() == NodeState::Compiled));
}

#[test]
fn empty_graph_compiles() {
    let log = new_log();
    let mut graph = recorded_graph(&log);

    graph.compile().unwrap();

    assert_eq!(drain(&log).len(), 6);
    graph.execute().unwrap();
    assert_eq!(graph.frame_index(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Execute
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn execute_brackets_each_node_every_frame() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();
    drain(&log);

    graph.execute().unwrap();
    graph.execute().unwrap();

    let frame: Vec<String> = ["a", "b", "c"]
        .into_iter()
        .flat_map(|name| node_stage(name, "Execute"))
        .collect();
    let expected: Vec<String> = frame.iter().chain(frame.iter()).cloned().collect();
    assert_eq!(drain(&log), expected);
    assert_eq!(graph.frame_index(), 2);
}

#[test]
fn execute_never_precedes_post_compile() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();
    graph.execute().unwrap();

    for name in ["a", "b", "c"] {
        let entries = entries_for(&log, &format!("{name}:"));
        let post_compile = entries
            .iter()
            .position(|entry| entry.ends_with(":PostCompile"))
            .unwrap();
        let pre_execute = entries
            .iter()
            .position(|entry| entry.ends_with(":PreExecute"))
            .unwrap();
        let post_setup = entries
            .iter()
            .position(|entry| entry.ends_with(":PostSetup"))
            .unwrap();
        let pre_compile = entries
            .iter()
            .position(|entry| entry.ends_with(":PreCompile"))
            .unwrap();
        assert!(post_setup < pre_compile, "{name}: {entries:?}");
        assert!(post_compile < pre_execute, "{name}: {entries:?}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cleanup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cleanup_runs_in_reverse_order_once() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();
    drain(&log);

    graph.cleanup().unwrap();
    graph.cleanup().unwrap();

    let expected: Vec<String> = ["c", "b", "a"]
        .into_iter()
        .flat_map(|name| node_stage(name, "Cleanup"))
        .collect();
    assert_eq!(drain(&log), expected);
    assert!(!graph.is_compiled());
    assert!(graph.nodes().iter().all(|node| node.state() == NodeState::CleanedUp));
}

#[test]
fn execute_after_cleanup_is_rejected() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();
    graph.cleanup().unwrap();

    assert!(matches!(
        graph.execute(),
        Err(lumen_graph::GraphError::NotCompiled)
    ));
}

#[test]
fn recompiling_tears_down_first() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();
    drain(&log);

    graph.compile().unwrap();

    let entries = drain(&log);
    let first_cleanup = entries
        .iter()
        .position(|entry| entry == "c:PreCleanup")
        .unwrap();
    let first_graph_phase = entries
        .iter()
        .position(|entry| entry == "graph:PreTopologyBuild")
        .unwrap();
    assert!(first_cleanup < first_graph_phase);
    assert_eq!(
        entries.iter().filter(|entry| entry.ends_with(":Cleanup")).count(),
        3
    );
    assert!(graph.is_compiled());
}

#[test]
fn drop_cleans_up_live_nodes() {
    let log = new_log();
    {
        let mut graph = chain(&log);
        graph.compile().unwrap();
        drain(&log);
    }

    let cleanups: Vec<String> = drain(&log)
        .into_iter()
        .filter(|entry| entry.ends_with(":Cleanup"))
        .collect();
    assert_eq!(cleanups, ["c:Cleanup", "b:Cleanup", "a:Cleanup"]);
}

#[test]
fn drop_cleanup_can_be_disabled() {
    let log = new_log();
    {
        let mut graph =
            RenderGraph::with_config(GraphConfig::new("no_drop").with_cleanup_on_drop(false));
        record_phases(graph.hooks_mut(), &log);
        graph.add_node("solo", producer(&log)).unwrap();
        graph.compile().unwrap();
        drain(&log);
    }

    assert!(drain(&log).is_empty());
}

#[test]
fn connect_after_compile_requires_recompile() {
    let log = new_log();
    let mut graph = chain(&log);
    graph.compile().unwrap();

    let extra = graph.add_node("extra", consumer(&log)).unwrap();
    let a = graph.find("a").unwrap();
    graph.connect(a, 0, extra, 0).unwrap();

    assert!(!graph.is_compiled());
    assert!(graph.execute().is_err());

    graph.compile().unwrap();
    graph.execute().unwrap();
    assert_eq!(graph.execution_order().len(), 4);
}
