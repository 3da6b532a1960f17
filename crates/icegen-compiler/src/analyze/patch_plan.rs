//! Patch slot assignment for class-valued members.
//!
//! Indices are global across a class or exception hierarchy: inherited
//! members are numbered first, base-most layer first, in declaration order.
//! Each slice only carries the slots its own members need, but whether it
//! uses the indexed form depends on the count through that layer, so a
//! subclass adding a second class-valued member switches to indices even if
//! it declares only one.

use icegen_core::{DataMember, DefId, Type, Unit};

/// One member that is filled in by a patcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchSlot {
    pub index: usize,
    pub member: String,
    pub ty: Type,
    /// Type id the patched instance must be compatible with.
    pub type_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchPlan {
    slots: Vec<PatchSlot>,
    indexed: bool,
}

impl PatchPlan {
    /// Slots read by the slice of `id`, a class or exception layer.
    pub fn for_layer(unit: &Unit, id: DefId) -> Self {
        let offset: usize = unit
            .slice_chain(id)
            .into_iter()
            .take_while(|&layer| layer != id)
            .map(|layer| unit.class_data_members(layer).len())
            .sum();
        let own = unit.class_data_members(id);
        let indexed = offset + own.len() > 1;
        Self::from_members(unit, &own, offset, indexed)
    }

    /// Slots of a struct. Structs have a single layer.
    pub fn for_struct(unit: &Unit, id: DefId) -> Self {
        let own = unit.class_data_members(id);
        let indexed = own.len() > 1;
        Self::from_members(unit, &own, 0, indexed)
    }

    fn from_members(unit: &Unit, members: &[&DataMember], offset: usize, indexed: bool) -> Self {
        let slots = members
            .iter()
            .enumerate()
            .map(|(i, m)| PatchSlot {
                index: offset + i,
                member: m.name.clone(),
                ty: m.ty,
                type_id: unit.type_id(m.ty),
            })
            .collect();
        Self { slots, indexed }
    }

    pub fn slots(&self) -> &[PatchSlot] {
        &self.slots
    }

    pub fn slot(&self, member: &str) -> Option<&PatchSlot> {
        self.slots.iter().find(|s| s.member == member)
    }

    /// Whether the patcher takes a member index.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
