//! Schema-checked slot storage.

use crate::handle::ResourceHandle;
use crate::schema::{NodeSchema, SlotDirection};
use crate::wiring::{NodeWiring, WiringError};

/// Per-node slot storage sized from a [`NodeSchema`].
///
/// Every declared slot owns exactly `array_size` elements, all unconnected
/// until set. Storage never grows: an index outside the schema is rejected
/// rather than allocated.
#[derive(Debug, Clone)]
pub struct SlotBindings {
    schema: NodeSchema,
    inputs: Vec<Vec<Option<ResourceHandle>>>,
    outputs: Vec<Vec<Option<ResourceHandle>>>,
}

impl SlotBindings {
    /// Creates empty storage for every slot in `schema`.
    #[must_use]
    pub fn new(schema: NodeSchema) -> Self {
        let inputs = schema
            .inputs()
            .iter()
            .map(|slot| vec![None; slot.array_size as usize])
            .collect();
        let outputs = schema
            .outputs()
            .iter()
            .map(|slot| vec![None; slot.array_size as usize])
            .collect();

        Self {
            schema,
            inputs,
            outputs,
        }
    }

    /// Returns the schema this storage was sized from.
    #[must_use]
    pub fn schema(&self) -> &NodeSchema {
        &self.schema
    }

    /// Returns the handle at a slot element, if connected.
    #[must_use]
    pub fn get(
        &self,
        direction: SlotDirection,
        slot: u32,
        array_index: u32,
    ) -> Option<ResourceHandle> {
        self.side(direction)
            .get(slot as usize)?
            .get(array_index as usize)
            .copied()
            .flatten()
    }

    /// Binds a slot element to `handle`, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::SlotOutOfRange`] or
    /// [`WiringError::ArrayIndexOutOfRange`] without modifying any slot.
    pub fn set(
        &mut self,
        direction: SlotDirection,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        let elements = match direction {
            SlotDirection::Input => &mut self.inputs,
            SlotDirection::Output => &mut self.outputs,
        };
        let declared = elements.len();
        let elements = elements
            .get_mut(slot as usize)
            .ok_or(WiringError::SlotOutOfRange {
                direction,
                slot,
                declared,
            })?;
        let bound = elements.len() as u32;
        let element =
            elements
                .get_mut(array_index as usize)
                .ok_or(WiringError::ArrayIndexOutOfRange {
                    direction,
                    slot,
                    index: array_index,
                    bound,
                })?;

        *element = Some(handle);
        Ok(())
    }

    /// Returns the array bound of a slot, or `None` if it is not declared.
    #[must_use]
    pub fn array_len(&self, direction: SlotDirection, slot: u32) -> Option<u32> {
        self.side(direction)
            .get(slot as usize)
            .map(|elements| elements.len() as u32)
    }

    /// Returns how many elements of a slot are connected.
    #[must_use]
    pub fn connected_count(&self, direction: SlotDirection, slot: u32) -> usize {
        self.side(direction)
            .get(slot as usize)
            .map_or(0, |elements| elements.iter().flatten().count())
    }

    /// Returns the required input slots whose first element is unconnected.
    #[must_use]
    pub fn missing_required_inputs(&self) -> Vec<u32> {
        self.schema
            .inputs()
            .iter()
            .zip(0u32..)
            .filter(|(descriptor, slot)| {
                !descriptor.nullable && self.get(SlotDirection::Input, *slot, 0).is_none()
            })
            .map(|(_, slot)| slot)
            .collect()
    }

    fn side(&self, direction: SlotDirection) -> &[Vec<Option<ResourceHandle>>] {
        match direction {
            SlotDirection::Input => &self.inputs,
            SlotDirection::Output => &self.outputs,
        }
    }
}

impl NodeWiring for SlotBindings {
    fn input(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.get(SlotDirection::Input, slot, array_index)
    }

    fn output(&self, slot: u32, array_index: u32) -> Option<ResourceHandle> {
        self.get(SlotDirection::Output, slot, array_index)
    }

    fn set_input(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        self.set(SlotDirection::Input, slot, array_index, handle)
    }

    fn set_output(
        &mut self,
        slot: u32,
        array_index: u32,
        handle: ResourceHandle,
    ) -> Result<(), WiringError> {
        self.set(SlotDirection::Output, slot, array_index, handle)
    }
}
