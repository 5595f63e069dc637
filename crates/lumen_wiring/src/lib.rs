//! Slot wiring contract for Lumen render graphs.
//!
//! A node exposes numbered input and output slots. Each slot holds one
//! resource handle per array element; single-resource slots have exactly one
//! element at index `0`. The graph connects nodes through the four-method
//! [`NodeWiring`] trait and never needs to see node internals.
//!
//! # Core Concepts
//!
//! - [`ResourceHandle`] - Opaque, non-null reference to a graph-owned resource
//! - [`NodeSchema`] / [`SlotDescriptor`] - The slots a node declares
//! - [`SlotBindings`] - Schema-checked per-node slot storage
//! - [`NodeWiring`] - The get/set input/output contract
//!
//! # Example
//!
//! ```
//! use lumen_wiring::{NodeSchema, NodeWiring, ResourceHandle, SlotBindings, SlotDescriptor};
//!
//! let schema = NodeSchema::new()
//!     .with_input(SlotDescriptor::new("textures").with_array_size(3))
//!     .with_output(SlotDescriptor::new("target"));
//! let mut bindings = SlotBindings::new(schema);
//!
//! let handle = ResourceHandle::from_raw(7).unwrap();
//! bindings.set_input(0, 1, handle).unwrap();
//!
//! assert_eq!(bindings.input(0, 0), None);
//! assert_eq!(bindings.input(0, 1), Some(handle));
//! assert!(bindings.set_input(0, 3, handle).is_err());
//! ```

mod bindings;
mod handle;
mod schema;
mod wiring;

pub use bindings::SlotBindings;
pub use handle::ResourceHandle;
pub use schema::{NodeSchema, SlotDescriptor, SlotDirection};
pub use wiring::{NodeWiring, WiringError};
