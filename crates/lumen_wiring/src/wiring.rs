//! The wiring contract.
//!
//! [`NodeWiring`] is everything the graph may do to a node while building
//! connections. It cannot trigger setup, compile, execute, or cleanup, so all
//! connections can be finalized before any node runs.

use crate::handle::ResourceHandle;
use crate::schema::SlotDirection;

/// Errors raised when a wiring call breaks the slot contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    /// The slot index is not declared by the node.
    #[error("{direction} slot {slot} is out of range (node declares {declared})")]
    SlotOutOfRange {
        /// Which side of the node was addressed.
        direction: SlotDirection,
        /// The requested slot index.
        slot: u32,
        /// How many slots the node declares on that side.
        declared: usize,
    },

    /// The array index exceeds the slot's declared bound.
    #[error("array index {index} is out of range for {direction} slot {slot} (bound {bound})")]
    ArrayIndexOutOfRange {
        /// Which side of the node was addressed.
        direction: SlotDirection,
        /// The slot index.
        slot: u32,
        /// The requested array index.
        index: u32,
        /// The slot's declared array bound.
        bound: u32,
    },

    /// The node is executing and its wiring cannot change.
    #[error("wiring is sealed while the node is executing")]
    Sealed,
}

/// Slot access the graph uses to connect nodes.
///
/// Reads never fail: an unconnected or undeclared slot reads as `None`.
/// Writes validate the slot and array index and leave the slot untouched on
/// error. Writing a connected slot again replaces its handle.
///
/// Wiring happens during graph construction and compilation, on one thread,
/// before any node executes.
pub trait NodeWiring {
    /// Returns the handle bound to an input slot element.
    fn input(&self, slot: u32, array_index: u32) -> Option<ResourceHandle>;

    /// Returns the handle bound to an output slot element.
    fn output(&self, slot: u32, array_index: u32) -> Option<ResourceHandle>;

    /// Binds an input slot element to a resource.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] if the slot or array index is not declared.
    fn set_input(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError>;

    /// Binds an output slot element to a resource.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] if the slot or array index is not declared.
    fn set_output(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError>;
}
