//! Slot declarations.

use core::fmt;

/// Whether a slot consumes or produces a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    /// A slot the node reads from.
    Input,
    /// A slot the node writes to.
    Output,
}

impl fmt::Display for SlotDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotDirection::Input => f.write_str("input"),
            SlotDirection::Output => f.write_str("output"),
        }
    }
}

/// Declaration of a single input or output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Name used in diagnostics.
    pub name: String,
    /// Number of array elements. Always at least 1.
    pub array_size: u32,
    /// Whether the graph may compile with this slot unconnected.
    pub nullable: bool,
}

impl SlotDescriptor {
    /// Creates a required, single-element slot.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            array_size: 1,
            nullable: false,
        }
    }

    /// Sets the array bound. A bound of `0` is treated as `1`.
    #[must_use]
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size.max(1);
        self
    }

    /// Marks the slot as optional.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns true if the slot holds more than one element.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array_size > 1
    }
}

/// The input and output slots a node declares.
///
/// Slot indices are positions in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSchema {
    inputs: Vec<SlotDescriptor>,
    outputs: Vec<SlotDescriptor>,
}

impl NodeSchema {
    /// Creates a schema with no slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input slot.
    #[must_use]
    pub fn with_input(mut self, slot: SlotDescriptor) -> Self {
        self.inputs.push(slot);
        self
    }

    /// Appends an output slot.
    #[must_use]
    pub fn with_output(mut self, slot: SlotDescriptor) -> Self {
        self.outputs.push(slot);
        self
    }

    /// Returns the declared input slots.
    #[must_use]
    pub fn inputs(&self) -> &[SlotDescriptor] {
        &self.inputs
    }

    /// Returns the declared output slots.
    #[must_use]
    pub fn outputs(&self) -> &[SlotDescriptor] {
        &self.outputs
    }

    /// Returns the slots declared in one direction.
    #[must_use]
    pub fn slots(&self, direction: SlotDirection) -> &[SlotDescriptor] {
        match direction {
            SlotDirection::Input => &self.inputs,
            SlotDirection::Output => &self.outputs,
        }
    }

    /// Looks up a slot declaration.
    #[must_use]
    pub fn slot(&self, direction: SlotDirection, slot: u32) -> Option<&SlotDescriptor> {
        self.slots(direction).get(slot as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_required_and_scalar() {
        let slot = SlotDescriptor::new("color");
        assert_eq!(slot.array_size, 1);
        assert!(!slot.nullable);
        assert!(!slot.is_array());
    }

    #[test]
    fn zero_array_size_is_clamped() {
        assert_eq!(SlotDescriptor::new("x").with_array_size(0).array_size, 1);
        assert!(SlotDescriptor::new("x").with_array_size(4).is_array());
    }

    #[test]
    fn slots_are_indexed_in_declaration_order() {
        let schema = NodeSchema::new()
            .with_input(SlotDescriptor::new("a"))
            .with_input(SlotDescriptor::new("b").nullable())
            .with_output(SlotDescriptor::new("out"));

        assert_eq!(schema.slot(SlotDirection::Input, 1).unwrap().name, "b");
        assert_eq!(schema.slot(SlotDirection::Output, 0).unwrap().name, "out");
        assert!(schema.slot(SlotDirection::Output, 1).is_none());
    }
}
