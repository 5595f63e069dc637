//! Example frame graph CLI.
//!
//! Builds the deferred-shading graph, compiles it, runs a number of frames,
//! and logs per-pass timings.
//!
//! # Usage
//!
//! ```bash
//! frame-graph [frames] [cascades]
//! ```
//!
//! Set `RUST_LOG`-style filters with `LUMEN_LOG`, e.g.
//! `LUMEN_LOG=lumen_graph=trace frame-graph 2`.

use std::process::ExitCode;

use lumen_core_plugins::{ProfilerPlugin, TracingPlugin};
use lumen_graph::dev::PhaseTracePlugin;
use lumen_graph::{GraphConfig, RenderGraph, RequiredInputsPlugin};
use tracing::Level;

fn main() -> ExitCode {
    let mut tracing = TracingPlugin::new().with_level(Level::DEBUG);
    if let Ok(filter) = std::env::var("LUMEN_LOG") {
        tracing = tracing.with_env_filter(filter);
    }

    let mut args = std::env::args().skip(1);
    let frames = parse_arg(args.next(), 3);
    let cascades = parse_arg(args.next(), 4);

    let profiler = ProfilerPlugin::new();
    let report = profiler.report();

    let mut graph = RenderGraph::with_config(GraphConfig::new("deferred"));
    graph
        .add_plugin(tracing)
        .add_plugin(PhaseTracePlugin)
        .add_plugin(RequiredInputsPlugin)
        .add_plugin(profiler);

    let (Some(frames), Some(cascades)) = (frames, cascades) else {
        tracing::error!("usage: frame-graph [frames] [cascades]");
        return ExitCode::FAILURE;
    };

    // On failure the graph is dropped on return, which cleans up any node
    // that was already set up.
    if let Err(error) = example::run(&mut graph, frames, cascades) {
        tracing::error!(%error, "frame graph failed");
        return ExitCode::FAILURE;
    }

    for name in report.nodes() {
        if let Some(timing) = report.timing(&name) {
            tracing::info!(
                pass = %name,
                calls = timing.calls,
                average = ?timing.average(),
                "pass timing"
            );
        }
    }
    ExitCode::SUCCESS
}

/// Parses an optional positional argument, using `default` when absent.
fn parse_arg<T: core::str::FromStr>(arg: Option<String>, default: T) -> Option<T> {
    match arg {
        Some(arg) => arg.parse().ok(),
        None => Some(default),
    }
}
