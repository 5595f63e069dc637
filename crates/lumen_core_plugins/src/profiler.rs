//! Per-node execution profiling.
//!
//! [`ProfilerPlugin`] brackets every node's `execute` with a `PreExecute`
//! and a `PostExecute` hook and accumulates the elapsed wall time into a
//! shared [`ProfilerReport`].
//!
//! # Example
//!
//! ```
//! use lumen_core_plugins::ProfilerPlugin;
//! use lumen_graph::RenderGraph;
//!
//! let profiler = ProfilerPlugin::new();
//! let report = profiler.report();
//!
//! let mut graph = RenderGraph::new();
//! graph.add_plugin(profiler);
//! graph.compile().unwrap();
//! graph.execute().unwrap();
//!
//! assert!(report.nodes().is_empty());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use lumen_graph::{GraphHooks, NodeId, NodeInstance, Plugin};
use lumen_lifecycle::NodeLifecyclePhase;
use parking_lot::Mutex;

/// Accumulated execute timings for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeTiming {
    /// Number of completed `execute` calls.
    pub calls: u64,
    /// Sum of all measured durations.
    pub total: Duration,
    /// Duration of the most recent call.
    pub last: Duration,
}

impl NodeTiming {
    /// Returns the mean duration, or zero before the first call.
    #[must_use]
    pub fn average(&self) -> Duration {
        let calls = u32::try_from(self.calls).unwrap_or(u32::MAX);
        self.total.checked_div(calls).unwrap_or(Duration::ZERO)
    }

    fn record(&mut self, elapsed: Duration) {
        self.calls += 1;
        self.total += elapsed;
        self.last = elapsed;
    }
}

/// Distinguishes the graphs sharing one report; node ids repeat across graphs.
type GraphSlot = usize;

#[derive(Debug, Default)]
struct ProfilerState {
    /// `PreExecute` timestamps awaiting their `PostExecute`.
    started: HashMap<(GraphSlot, NodeId), Instant>,
    timings: HashMap<String, NodeTiming>,
    graphs: GraphSlot,
}

/// Shared handle to the timings a [`ProfilerPlugin`] collects.
///
/// Clones share the same data. When one plugin is added to several graphs,
/// timings of nodes with the same name are merged.
#[derive(Debug, Clone, Default)]
pub struct ProfilerReport {
    state: Arc<Mutex<ProfilerState>>,
}

impl ProfilerReport {
    /// Returns the timings for a node, by instance name.
    #[must_use]
    pub fn timing(&self, node: &str) -> Option<NodeTiming> {
        self.state.lock().timings.get(node).copied()
    }

    /// Returns the names of every node measured so far, sorted.
    #[must_use]
    pub fn nodes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().timings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the summed time of every measured node.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.state.lock().timings.values().map(|timing| timing.total).sum()
    }

    /// Returns the number of nodes whose `execute` started but did not
    /// finish.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.lock().started.len()
    }

    /// Discards all timings.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.started.clear();
        state.timings.clear();
    }

    fn attach_graph(&self) -> GraphSlot {
        let mut state = self.state.lock();
        let slot = state.graphs;
        state.graphs += 1;
        slot
    }

    fn begin(&self, graph: GraphSlot, node: NodeId) {
        self.state.lock().started.insert((graph, node), Instant::now());
    }

    fn end(&self, graph: GraphSlot, node: NodeId, name: &str) {
        let mut state = self.state.lock();
        let Some(start) = state.started.remove(&(graph, node)) else {
            return;
        };
        let elapsed = start.elapsed();
        state
            .timings
            .entry_ref(name)
            .or_default()
            .record(elapsed);
        tracing::trace!(node = %name, ?elapsed, "node profiled");
    }

    fn discard(&self, graph: GraphSlot, node: NodeId) {
        self.state.lock().started.remove(&(graph, node));
    }
}

/// Plugin that measures how long each node's `execute` takes.
///
/// A sample only counts once its `PostExecute` hook runs, so a frame that
/// fails part way records nothing for the failing node. Its pending sample is
/// dropped at `PreCleanup`.
#[derive(Debug, Clone, Default)]
pub struct ProfilerPlugin {
    report: ProfilerReport,
}

impl ProfilerPlugin {
    /// Creates a profiler with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the report this plugin fills.
    #[must_use]
    pub fn report(&self) -> ProfilerReport {
        self.report.clone()
    }
}

impl Plugin for ProfilerPlugin {
    fn build(&self, hooks: &mut GraphHooks) {
        let graph = self.report.attach_graph();

        let report = self.report.clone();
        hooks.register_node_hook(
            NodeLifecyclePhase::PreExecute,
            move |node: &mut NodeInstance| {
                report.begin(graph, node.id());
                Ok(())
            },
            "profiler_begin",
        );

        let report = self.report.clone();
        hooks.register_node_hook(
            NodeLifecyclePhase::PostExecute,
            move |node: &mut NodeInstance| {
                report.end(graph, node.id(), node.name());
                Ok(())
            },
            "profiler_end",
        );

        let report = self.report.clone();
        hooks.register_node_hook(
            NodeLifecyclePhase::PreCleanup,
            move |node: &mut NodeInstance| {
                report.discard(graph, node.id());
                Ok(())
            },
            "profiler_cleanup",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_no_calls_is_zero() {
        assert_eq!(NodeTiming::default().average(), Duration::ZERO);
    }

    #[test]
    fn record_accumulates() {
        let mut timing = NodeTiming::default();
        timing.record(Duration::from_millis(4));
        timing.record(Duration::from_millis(2));

        assert_eq!(timing.calls, 2);
        assert_eq!(timing.total, Duration::from_millis(6));
        assert_eq!(timing.last, Duration::from_millis(2));
        assert_eq!(timing.average(), Duration::from_millis(3));
    }

    #[test]
    fn end_without_begin_is_ignored() {
        let report = ProfilerReport::default();
        report.end(0, NodeId::new(0), "ghost");
        assert!(report.nodes().is_empty());
    }

    #[test]
    fn begin_end_records_one_call() {
        let report = ProfilerReport::default();
        report.begin(0, NodeId::new(1));
        assert_eq!(report.in_flight(), 1);

        report.end(0, NodeId::new(1), "blur");

        assert_eq!(report.in_flight(), 0);
        assert_eq!(report.timing("blur").map(|timing| timing.calls), Some(1));
        assert_eq!(report.nodes(), ["blur"]);
    }

    #[test]
    fn same_node_id_in_two_graphs_is_tracked_separately() {
        let report = ProfilerReport::default();
        let first = report.attach_graph();
        let second = report.attach_graph();
        report.begin(first, NodeId::new(0));
        report.begin(second, NodeId::new(0));
        assert_eq!(report.in_flight(), 2);

        report.end(second, NodeId::new(0), "blit");

        assert_eq!(report.in_flight(), 1);
        report.discard(first, NodeId::new(0));
        assert_eq!(report.in_flight(), 0);
    }

    #[test]
    fn registers_three_node_hooks() {
        let mut hooks = GraphHooks::new();
        ProfilerPlugin::new().build(&mut hooks);

        assert_eq!(
            hooks.node_hook_names(NodeLifecyclePhase::PreExecute),
            ["profiler_begin"]
        );
        assert_eq!(
            hooks.node_hook_names(NodeLifecyclePhase::PostExecute),
            ["profiler_end"]
        );
        assert_eq!(
            hooks.node_hook_names(NodeLifecyclePhase::PreCleanup),
            ["profiler_cleanup"]
        );
        assert_eq!(hooks.len(), 3);
    }
}
