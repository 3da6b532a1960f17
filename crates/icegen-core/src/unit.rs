//! The definition table and the facts derived from it.
//!
//! Derived facts are recomputed on every call. Backends that need them
//! repeatedly hold on to the returned vectors for the duration of one
//! emission pass.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::defs::{
    ClassDef, DataMember, DefKind, Definition, DictionaryDef, EnumDef, ExceptionDef, Operation,
    SequenceDef, StructDef,
};
use crate::types::{BuiltinKind, DefId, Type};

/// Identity of an operation: the declaring class and its position there.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OpRef {
    pub class: DefId,
    pub index: usize,
}

/// A fully resolved compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub definitions: Vec<Definition>,
}

impl Unit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Append a definition and return its id.
    pub fn add(&mut self, def: Definition) -> DefId {
        let id = DefId(self.definitions.len() as u32);
        self.definitions.push(def);
        id
    }

    pub fn ids(&self) -> impl Iterator<Item = DefId> + '_ {
        (0..self.definitions.len()).map(|i| DefId(i as u32))
    }

    pub fn get(&self, id: DefId) -> Option<&Definition> {
        self.definitions.get(id.index())
    }

    pub fn class(&self, id: DefId) -> Option<&ClassDef> {
        match &self.get(id)?.kind {
            DefKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn exception(&self, id: DefId) -> Option<&ExceptionDef> {
        match &self.get(id)?.kind {
            DefKind::Exception(e) => Some(e),
            _ => None,
        }
    }

    pub fn struct_def(&self, id: DefId) -> Option<&StructDef> {
        match &self.get(id)?.kind {
            DefKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn enum_def(&self, id: DefId) -> Option<&EnumDef> {
        match &self.get(id)?.kind {
            DefKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn sequence(&self, id: DefId) -> Option<&SequenceDef> {
        match &self.get(id)?.kind {
            DefKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn dictionary(&self, id: DefId) -> Option<&DictionaryDef> {
        match &self.get(id)?.kind {
            DefKind::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn operation(&self, op: OpRef) -> Option<&Operation> {
        self.class(op.class)?.operations.get(op.index)
    }

    /// Scoped id (`::M::Name`); empty for unknown ids.
    pub fn scoped(&self, id: DefId) -> String {
        self.get(id).map(Definition::scoped).unwrap_or_default()
    }

    /// Wire type id of a type reference.
    pub fn type_id(&self, ty: Type) -> String {
        match ty {
            Type::Builtin(kind) => kind.slice_name().to_owned(),
            Type::Proxy(id) => format!("{}*", self.scoped(id)),
            Type::Class(id)
            | Type::Struct(id)
            | Type::Sequence(id)
            | Type::Dictionary(id)
            | Type::Enum(id) => self.scoped(id),
        }
    }

    /// The non-interface base of a class, if any.
    pub fn base_class(&self, id: DefId) -> Option<DefId> {
        let first = *self.class(id)?.bases.first()?;
        let base = self.class(first)?;
        (!base.is_interface).then_some(first)
    }

    /// Interface bases of a class or interface.
    pub fn interface_bases(&self, id: DefId) -> Vec<DefId> {
        let Some(class) = self.class(id) else {
            return Vec::new();
        };
        class
            .bases
            .iter()
            .copied()
            .filter(|b| self.class(*b).is_some_and(|c| c.is_interface))
            .collect()
    }

    /// Every ancestor, direct and indirect, deduplicated in first-seen order.
    pub fn all_bases(&self, id: DefId) -> Vec<DefId> {
        let mut seen = IndexSet::new();
        self.collect_bases(id, &mut seen);
        seen.shift_remove(&id);
        seen.into_iter().collect()
    }

    fn collect_bases(&self, id: DefId, seen: &mut IndexSet<DefId>) {
        let Some(class) = self.class(id) else {
            return;
        };
        for &base in &class.bases {
            if seen.insert(base) {
                self.collect_bases(base, seen);
            }
        }
    }

    /// Every operation reachable from `id`, own operations first.
    ///
    /// Diamond inheritance reaches the same operation along several paths;
    /// it is reported once, deduplicated by declaring class and position.
    pub fn all_operations(&self, id: DefId) -> Vec<OpRef> {
        let mut ops = IndexSet::new();
        for class_id in std::iter::once(id).chain(self.all_bases(id)) {
            let Some(class) = self.class(class_id) else {
                continue;
            };
            for index in 0..class.operations.len() {
                ops.insert(OpRef {
                    class: class_id,
                    index,
                });
            }
        }
        ops.into_iter().collect()
    }

    /// Interfaces are abstract, and so is any class that has operations.
    pub fn is_abstract(&self, id: DefId) -> bool {
        let Some(class) = self.class(id) else {
            return false;
        };
        class.is_interface || class.is_abstract || !self.all_operations(id).is_empty()
    }

    /// Whether a value of `ty` can carry class instances.
    pub fn uses_classes(&self, ty: Type) -> bool {
        let mut visited = HashSet::new();
        self.uses_classes_inner(ty, &mut visited)
    }

    fn uses_classes_inner(&self, ty: Type, visited: &mut HashSet<DefId>) -> bool {
        match ty {
            Type::Builtin(kind) => kind == BuiltinKind::Object,
            Type::Class(_) => true,
            Type::Proxy(_) | Type::Enum(_) => false,
            Type::Struct(id) => {
                if !visited.insert(id) {
                    return false;
                }
                self.struct_def(id).is_some_and(|s| {
                    s.members
                        .iter()
                        .any(|m| self.uses_classes_inner(m.ty, visited))
                })
            }
            Type::Sequence(id) => {
                if !visited.insert(id) {
                    return false;
                }
                self.sequence(id)
                    .is_some_and(|s| self.uses_classes_inner(s.element, visited))
            }
            Type::Dictionary(id) => {
                if !visited.insert(id) {
                    return false;
                }
                self.dictionary(id)
                    .is_some_and(|d| self.uses_classes_inner(d.value, visited))
            }
        }
    }

    /// Whether marshaling the in-parameters needs a pending-objects flush.
    pub fn sends_classes(&self, op: &Operation) -> bool {
        op.in_params().any(|p| self.uses_classes(p.ty))
    }

    /// Whether the reply (outs and return value) needs a pending-objects flush.
    pub fn returns_classes(&self, op: &Operation) -> bool {
        op.out_params().any(|p| self.uses_classes(p.ty))
            || op.returns.is_some_and(|ty| self.uses_classes(ty))
    }

    /// Declared members of a class, exception or struct.
    pub fn members(&self, id: DefId) -> &[DataMember] {
        match self.get(id).map(|d| &d.kind) {
            Some(DefKind::Class(c)) => &c.members,
            Some(DefKind::Exception(e)) => &e.members,
            Some(DefKind::Struct(s)) => &s.members,
            _ => &[],
        }
    }

    /// Own members that are read through a patcher.
    pub fn class_data_members(&self, id: DefId) -> Vec<&DataMember> {
        self.members(id)
            .iter()
            .filter(|m| m.ty.is_class_like())
            .collect()
    }

    /// Slice layers of a class or exception, base-most first, ending with `id`.
    pub fn slice_chain(&self, id: DefId) -> Vec<DefId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            if !visited.insert(cur) {
                break;
            }
            chain.push(cur);
            current = match self.get(cur).map(|d| &d.kind) {
                Some(DefKind::Class(_)) => self.base_class(cur),
                Some(DefKind::Exception(e)) => e.base,
                _ => None,
            };
        }
        chain.reverse();
        chain
    }

    /// Class-valued members across every slice layer, base-most first.
    pub fn all_class_data_members(&self, id: DefId) -> Vec<&DataMember> {
        self.slice_chain(id)
            .into_iter()
            .flat_map(|layer| self.class_data_members(layer))
            .collect()
    }

    /// An exception followed by its bases, most-derived first.
    pub fn exception_chain(&self, id: DefId) -> Vec<DefId> {
        let mut chain = self.slice_chain(id);
        chain.reverse();
        chain
    }
}
