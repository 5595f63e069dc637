//! Phased lifecycle orchestration for render graphs.
//!
//! Lumen splits a render graph's compile/execute pipeline into named phases,
//! lets external code hook each phase in a fixed order, and connects nodes
//! through a narrow slot-wiring contract.
//!
//! # Example
//!
//! ```
//! use lumen::prelude::*;
//!
//! struct Clear;
//! impl Node for Clear {
//!     fn schema(&self) -> NodeSchema {
//!         NodeSchema::new().with_output(SlotDescriptor::new("target"))
//!     }
//! }
//!
//! let mut graph = RenderGraph::new();
//! graph.add_plugin(PhaseTracePlugin);
//! graph.add_node("clear", Clear).unwrap();
//! graph.compile().unwrap();
//! graph.execute().unwrap();
//! ```

pub use lumen_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use lumen_internal::prelude::*;
}
