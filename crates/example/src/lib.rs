//! Example deferred-shading frame graph built with Lumen.
//!
//! The graph renders a frame in five passes:
//!
//! ```text
//! gbuffer ──albedo/normal/depth──┐
//!                                ├─> lighting ──hdr──> tonemap ──ldr──> present
//! shadows ──maps[cascades]───────┘
//! ```
//!
//! The passes do no GPU work; they log what they would do and check that
//! their inputs were wired.

use lumen_graph::{GraphConfig, GraphError, Node, NodeContext, RenderGraph};
use lumen_lifecycle::HookResult;
use lumen_wiring::{NodeSchema, SlotDescriptor};

// ─────────────────────────────────────────────────────────────────────────────
// Passes
// ─────────────────────────────────────────────────────────────────────────────

/// Writes the geometry buffer.
#[derive(Debug, Default)]
pub struct GBufferPass;

impl Node for GBufferPass {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new()
            .with_output(SlotDescriptor::new("albedo"))
            .with_output(SlotDescriptor::new("normal"))
            .with_output(SlotDescriptor::new("depth"))
    }

    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        tracing::debug!(pass = ctx.name(), frame = ctx.frame(), "drawing geometry");
        Ok(())
    }
}

/// Renders one shadow map per cascade.
#[derive(Debug)]
pub struct ShadowPass {
    cascades: u32,
}

impl ShadowPass {
    /// Creates a pass with `cascades` shadow maps.
    #[must_use]
    pub fn new(cascades: u32) -> Self {
        Self { cascades }
    }
}

impl Node for ShadowPass {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new().with_output(SlotDescriptor::new("maps").with_array_size(self.cascades))
    }

    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        for cascade in 0..self.cascades {
            if let Some(map) = ctx.output(0, cascade) {
                tracing::trace!(pass = ctx.name(), cascade, %map, "rendering cascade");
            }
        }
        Ok(())
    }
}

/// Shades the geometry buffer with the shadow cascades.
#[derive(Debug)]
pub struct LightingPass {
    cascades: u32,
    bound_cascades: u32,
}

impl LightingPass {
    /// Creates a pass that samples `cascades` shadow maps.
    #[must_use]
    pub fn new(cascades: u32) -> Self {
        Self {
            cascades,
            bound_cascades: 0,
        }
    }
}

impl Node for LightingPass {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new()
            .with_input(SlotDescriptor::new("albedo"))
            .with_input(SlotDescriptor::new("normal"))
            .with_input(SlotDescriptor::new("depth"))
            .with_input(SlotDescriptor::new("shadows").with_array_size(self.cascades))
            .with_input(SlotDescriptor::new("environment").nullable())
            .with_output(SlotDescriptor::new("hdr"))
    }

    fn compile(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        self.bound_cascades = (0..self.cascades)
            .filter(|cascade| ctx.input(3, *cascade).is_some())
            .count() as u32;
        if self.bound_cascades != self.cascades {
            return Err(format!(
                "lighting expects {} shadow cascades, {} are connected",
                self.cascades, self.bound_cascades
            )
            .into());
        }
        Ok(())
    }

    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        tracing::debug!(
            pass = ctx.name(),
            cascades = self.bound_cascades,
            environment = ctx.input(4, 0).is_some(),
            "shading"
        );
        Ok(())
    }
}

/// Maps HDR color to display range.
#[derive(Debug)]
pub struct TonemapPass {
    exposure: f32,
}

impl Default for TonemapPass {
    fn default() -> Self {
        Self { exposure: 1.0 }
    }
}

impl Node for TonemapPass {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new()
            .with_input(SlotDescriptor::new("hdr"))
            .with_output(SlotDescriptor::new("ldr"))
    }

    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        tracing::debug!(pass = ctx.name(), exposure = self.exposure, "tonemapping");
        Ok(())
    }
}

/// Hands the final image to the swapchain.
#[derive(Debug, Default)]
pub struct PresentPass {
    presented: u64,
}

impl Node for PresentPass {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new().with_input(SlotDescriptor::new("image"))
    }

    fn execute(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        self.presented += 1;
        tracing::debug!(pass = ctx.name(), presented = self.presented, "presenting");
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut NodeContext<'_>) -> HookResult {
        tracing::info!(pass = ctx.name(), presented = self.presented, "swapchain released");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graph
// ─────────────────────────────────────────────────────────────────────────────

/// Adds the five passes to `graph` and wires them.
///
/// # Errors
///
/// Returns [`GraphError`] if a pass name is taken or a connection is
/// rejected.
pub fn populate(graph: &mut RenderGraph, cascades: u32) -> Result<(), GraphError> {
    let gbuffer = graph.add_node("gbuffer", GBufferPass)?;
    let shadows = graph.add_node("shadows", ShadowPass::new(cascades))?;
    let lighting = graph.add_node("lighting", LightingPass::new(cascades))?;
    let tonemap = graph.add_node("tonemap", TonemapPass::default())?;
    let present = graph.add_node("present", PresentPass::default())?;

    for slot in 0..3 {
        graph.connect(gbuffer, slot, lighting, slot)?;
    }
    graph.connect(shadows, 0, lighting, 3)?;
    graph.connect(lighting, 0, tonemap, 0)?;
    graph.connect(tonemap, 0, present, 0)?;
    Ok(())
}

/// Creates a populated frame graph.
///
/// # Errors
///
/// See [`populate`].
pub fn frame_graph(cascades: u32) -> Result<RenderGraph, GraphError> {
    let mut graph = RenderGraph::with_config(GraphConfig::new("deferred"));
    populate(&mut graph, cascades)?;
    Ok(graph)
}

/// Populates `graph`, compiles it, runs `frames` frames and cleans up.
///
/// # Errors
///
/// Returns the first [`GraphError`]. Nodes already set up stay live until
/// the graph is cleaned up or dropped.
pub fn run(graph: &mut RenderGraph, frames: u64, cascades: u32) -> Result<(), GraphError> {
    populate(graph, cascades)?;
    graph.compile()?;
    for _ in 0..frames {
        graph.execute()?;
    }
    graph.cleanup()
}
