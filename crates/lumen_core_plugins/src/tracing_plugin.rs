//! Tracing and observability plugin.
//!
//! [`TracingPlugin`] installs the process-wide `tracing` subscriber the first
//! time a graph adds it, then points that graph's hook diagnostics at
//! [`TracingSink`]. Adding it to a second graph only rewires the sink.
//!
//! # Example
//!
//! ```
//! use lumen_core_plugins::{TracingFormat, TracingPlugin};
//! use lumen_graph::RenderGraph;
//! use tracing::Level;
//!
//! let mut graph = RenderGraph::new();
//! graph.add_plugin(
//!     TracingPlugin::new()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact),
//! );
//! ```

use std::sync::Arc;

use lumen_graph::{GraphHooks, Plugin};
use lumen_lifecycle::TracingSink;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line, colored.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Subscriber settings carried by a [`TracingPlugin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Most verbose level emitted when no filter is given.
    pub level: Level,
    /// Output format.
    pub format: TracingFormat,
    /// Per-target directives such as `lumen_graph=trace,lumen_lifecycle=warn`.
    pub filter: Option<String>,
    /// Log span enter and exit.
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Directives from `filter`, or just `level` if they do not parse.
    fn env_filter(&self) -> EnvFilter {
        self.filter
            .as_deref()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level.as_str()))
    }

    fn output_layer(&self) -> OutputLayer {
        let spans = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer().with_span_events(spans);
        match self.format {
            TracingFormat::Pretty => layer.pretty().boxed(),
            TracingFormat::Compact => layer.compact().boxed(),
            TracingFormat::Json => layer.json().boxed(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Installs a `tracing` subscriber and routes hook diagnostics into it.
///
/// ```
/// use lumen_core_plugins::{TracingFormat, TracingPlugin};
/// use tracing::Level;
///
/// // Local debugging: every node phase, with spans
/// let local = TracingPlugin::new()
///     .with_level(Level::TRACE)
///     .with_span_events(true);
///
/// // Capture runs: JSON, compile progress only
/// let capture = TracingPlugin::new()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("lumen_graph=info,lumen_lifecycle=warn");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingPlugin {
    config: TracingConfig,
}

impl TracingPlugin {
    /// Creates a plugin that logs at `INFO` in pretty format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a plugin from a complete configuration.
    #[must_use]
    pub fn from_config(config: TracingConfig) -> Self {
        Self { config }
    }

    /// Sets the level used when no filter applies.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Sets per-target directives, `target=level,target=level`.
    ///
    /// Directives that fail to parse are ignored in favor of the level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.filter = Some(filter.into());
        self
    }

    /// Logs span enter and exit events.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.config.span_events = enabled;
        self
    }

    /// Returns the settings this plugin installs.
    #[must_use]
    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    /// Installs the global subscriber.
    ///
    /// Returns false, changing nothing, if one is already installed.
    pub fn install(&self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.config.output_layer())
            .with(self.config.env_filter())
            .try_init()
            .is_ok();
        if installed {
            tracing::info!(
                level = %self.config.level,
                format = ?self.config.format,
                filter = self.config.filter.as_deref(),
                "tracing installed"
            );
        }
        installed
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, hooks: &mut GraphHooks) {
        self.install();
        hooks.set_sink(Arc::new(TracingSink));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_pretty_without_filter() {
        let config = TracingPlugin::new().config().clone();

        assert_eq!(config, TracingConfig::default());
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, TracingFormat::Pretty);
        assert!(config.filter.is_none());
    }

    #[test]
    fn builders_write_through_to_config() {
        let plugin = TracingPlugin::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("lumen_graph=debug")
            .with_span_events(true);

        assert_eq!(
            plugin.config(),
            &TracingConfig {
                level: Level::DEBUG,
                format: TracingFormat::Json,
                filter: Some("lumen_graph=debug".to_string()),
                span_events: true,
            }
        );
    }

    #[test]
    fn unparsable_filter_falls_back_to_level() {
        let config = TracingConfig {
            level: Level::WARN,
            filter: Some("lumen_graph=verbose".to_string()),
            ..TracingConfig::default()
        };

        assert_eq!(config.env_filter().to_string(), "warn");
    }

    #[test]
    fn second_install_is_a_no_op() {
        let plugin = TracingPlugin::new().with_format(TracingFormat::Compact);
        plugin.install();
        assert!(!plugin.install());
    }
}
