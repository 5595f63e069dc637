//! Hook registry for graph and node lifecycle phases.
//!
//! [`LifecycleHooks`] keeps one ordered bucket of callbacks per phase, for
//! both graph phases and node phases. The buckets live in arrays sized by the
//! enumeration's `COUNT` and indexed by phase discriminant. `COUNT` is counted
//! from the variant list itself, so a phase added to either enumeration gets
//! its bucket.
//!
//! # Ordering
//!
//! Hooks run in registration order. There is no priority; a hook that relies
//! on the effect of another must be registered after it.
//!
//! # Failure
//!
//! The first hook that returns an error stops its bucket. The error is handed
//! back to the caller exactly as the hook produced it. Hooks in other phases
//! are unaffected.
//!
//! # Removal
//!
//! Hooks have no identity. Removal is per phase ([`clear_graph_hooks`],
//! [`clear_node_hooks`]) or total ([`clear_all`]).
//!
//! [`clear_graph_hooks`]: LifecycleHooks::clear_graph_hooks
//! [`clear_node_hooks`]: LifecycleHooks::clear_node_hooks
//! [`clear_all`]: LifecycleHooks::clear_all

use core::fmt;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, Severity, TracingSink};
use crate::phase::{GraphLifecyclePhase, LifecyclePhase, NodeLifecyclePhase};

/// Error produced by a failing hook.
pub type HookError = Box<dyn core::error::Error + Send + Sync>;

/// Result returned by every hook.
pub type HookResult = Result<(), HookError>;

type GraphHookFn<G> = Box<dyn Fn(&G) -> HookResult + Send + Sync>;
type NodeHookFn<N> = Box<dyn Fn(&mut N) -> HookResult + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// HookEntry
// ─────────────────────────────────────────────────────────────────────────────

/// A registered callback and its debug label.
struct HookEntry<F> {
    /// Label used in diagnostics. May be empty.
    name: String,
    hook: F,
}

impl<F> HookEntry<F> {
    fn label(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleHooks
// ─────────────────────────────────────────────────────────────────────────────

/// Per-phase hook storage for one graph.
///
/// `G` is the graph capability graph hooks receive and `N` is the node
/// capability node hooks receive. The registry only passes them through.
///
/// Graph hooks get a shared reference. Node hooks get a mutable one so that
/// hooks such as `PostSetup` can populate node resources.
///
/// The registry belongs to exactly one graph and is not `Clone`.
pub struct LifecycleHooks<G: ?Sized, N: ?Sized> {
    graph_hooks: [Vec<HookEntry<GraphHookFn<G>>>; GraphLifecyclePhase::COUNT],
    node_hooks: [Vec<HookEntry<NodeHookFn<N>>>; NodeLifecyclePhase::COUNT],
    sink: Arc<dyn DiagnosticSink>,
}

impl<G: ?Sized, N: ?Sized> Default for LifecycleHooks<G, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: ?Sized, N: ?Sized> LifecycleHooks<G, N> {
    /// Creates an empty registry reporting to [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph_hooks: core::array::from_fn(|_| Vec::new()),
            node_hooks: core::array::from_fn(|_| Vec::new()),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink and returns the registry.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the diagnostic sink.
    pub fn set_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = sink;
    }

    /// Returns the diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a graph hook to the bucket for `phase`.
    ///
    /// Duplicate callbacks and duplicate names are accepted; each
    /// registration runs once per execution of the phase.
    pub fn register_graph_hook<F>(
        &mut self,
        phase: GraphLifecyclePhase,
        hook: F,
        name: impl Into<String>,
    ) -> &mut Self
    where
        F: Fn(&G) -> HookResult + Send + Sync + 'static,
    {
        let entry = HookEntry {
            name: name.into(),
            hook: Box::new(hook) as GraphHookFn<G>,
        };
        self.sink.emit(
            Severity::Debug,
            &format!("registered graph hook '{}' for {phase}", entry.label()),
        );
        self.graph_hooks[phase.index()].push(entry);
        self
    }

    /// Appends a node hook to the bucket for `phase`.
    ///
    /// Node hooks run for every node reaching `phase`.
    pub fn register_node_hook<F>(
        &mut self,
        phase: NodeLifecyclePhase,
        hook: F,
        name: impl Into<String>,
    ) -> &mut Self
    where
        F: Fn(&mut N) -> HookResult + Send + Sync + 'static,
    {
        let entry = HookEntry {
            name: name.into(),
            hook: Box::new(hook) as NodeHookFn<N>,
        };
        self.sink.emit(
            Severity::Debug,
            &format!("registered node hook '{}' for {phase}", entry.label()),
        );
        self.node_hooks[phase.index()].push(entry);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs every graph hook registered for `phase`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first hook error unchanged. Hooks after the failing one
    /// are not run.
    pub fn execute_graph_hooks(&self, phase: GraphLifecyclePhase, graph: &G) -> HookResult {
        for entry in &self.graph_hooks[phase.index()] {
            if let Err(error) = (entry.hook)(graph) {
                self.sink.emit(
                    Severity::Error,
                    &format!("graph hook '{}' failed during {phase}: {error}", entry.label()),
                );
                return Err(error);
            }
        }
        Ok(())
    }

    /// Runs every node hook registered for `phase` against `node`, in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Returns the first hook error unchanged. Hooks after the failing one
    /// are not run.
    pub fn execute_node_hooks(&self, phase: NodeLifecyclePhase, node: &mut N) -> HookResult {
        for entry in &self.node_hooks[phase.index()] {
            if let Err(error) = (entry.hook)(node) {
                self.sink.emit(
                    Severity::Error,
                    &format!("node hook '{}' failed during {phase}: {error}", entry.label()),
                );
                return Err(error);
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Removal
    // ─────────────────────────────────────────────────────────────────────────

    /// Removes every hook from every graph and node phase.
    pub fn clear_all(&mut self) {
        self.graph_hooks.iter_mut().for_each(Vec::clear);
        self.node_hooks.iter_mut().for_each(Vec::clear);
    }

    /// Removes every graph hook registered for `phase`.
    pub fn clear_graph_hooks(&mut self, phase: GraphLifecyclePhase) {
        self.graph_hooks[phase.index()].clear();
    }

    /// Removes every node hook registered for `phase`.
    pub fn clear_node_hooks(&mut self, phase: NodeLifecyclePhase) {
        self.node_hooks[phase.index()].clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the diagnostic name of a graph or node phase.
    #[must_use]
    pub fn phase_name<P: LifecyclePhase>(phase: P) -> &'static str {
        phase.name()
    }

    /// Returns the number of graph hooks registered for `phase`.
    #[must_use]
    pub fn graph_hook_count(&self, phase: GraphLifecyclePhase) -> usize {
        self.graph_hooks[phase.index()].len()
    }

    /// Returns the number of node hooks registered for `phase`.
    #[must_use]
    pub fn node_hook_count(&self, phase: NodeLifecyclePhase) -> usize {
        self.node_hooks[phase.index()].len()
    }

    /// Returns the total number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph_hooks.iter().map(Vec::len).sum::<usize>()
            + self.node_hooks.iter().map(Vec::len).sum::<usize>()
    }

    /// Returns true if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the debug names of the graph hooks for `phase`, in order.
    #[must_use]
    pub fn graph_hook_names(&self, phase: GraphLifecyclePhase) -> Vec<&str> {
        self.graph_hooks[phase.index()]
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Returns the debug names of the node hooks for `phase`, in order.
    #[must_use]
    pub fn node_hook_names(&self, phase: NodeLifecyclePhase) -> Vec<&str> {
        self.node_hooks[phase.index()]
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }
}

impl<G: ?Sized, N: ?Sized> fmt::Debug for LifecycleHooks<G, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph: Vec<_> = GraphLifecyclePhase::ALL
            .iter()
            .map(|phase| (phase.name(), self.graph_hook_count(*phase)))
            .filter(|(_, count)| *count > 0)
            .collect();
        let node: Vec<_> = NodeLifecyclePhase::ALL
            .iter()
            .map(|phase| (phase.name(), self.node_hook_count(*phase)))
            .filter(|(_, count)| *count > 0)
            .collect();

        f.debug_struct("LifecycleHooks")
            .field("graph_hooks", &graph)
            .field("node_hooks", &node)
            .finish_non_exhaustive()
    }
}
