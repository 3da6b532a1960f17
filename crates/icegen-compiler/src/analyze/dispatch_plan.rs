//! Dispatch tables of a class or interface.
//!
//! Operation names and type ids are interned while the plan is built:
//! deduplication is by symbol, ordering by the resolved string. The sorted
//! lists are exactly the ones the runtime tables in `icegen_wire` build, so
//! a generated switch index always matches the runtime binary search.

use icegen_core::{DefId, Interner, OpRef, Symbol, Unit};
use icegen_wire::{BUILTIN_OPERATIONS, OperationTable, ROOT_TYPE_ID, TypeIdTable};
use indexmap::{IndexMap, IndexSet};

use crate::{Error, Result, model};

/// Handler a dispatch table entry routes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchTarget {
    /// One of `ice_id`, `ice_ids`, `ice_isA`, `ice_ping`.
    Builtin,
    /// Declared on the dispatching type itself.
    Own(OpRef),
    /// Declared on an ancestor; the ancestor's handler is reused.
    Inherited(OpRef),
}

impl DispatchTarget {
    pub fn op(self) -> Option<OpRef> {
        match self {
            DispatchTarget::Builtin => None,
            DispatchTarget::Own(op) | DispatchTarget::Inherited(op) => Some(op),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchEntry {
    pub name: Symbol,
    pub target: DispatchTarget,
}

#[derive(Clone, Debug)]
pub struct DispatchPlan {
    interner: Interner,
    /// Sorted by operation name; the position is the switch case.
    entries: Vec<DispatchEntry>,
    /// Sorted type ids, including the root id.
    type_ids: Vec<Symbol>,
    own: usize,
}

impl DispatchPlan {
    pub fn build(unit: &Unit, class: DefId) -> Result<Self> {
        model::class(unit, class)?;
        let mut interner = Interner::new();

        // `all_operations` lists each operation once even under diamond
        // inheritance, own operations first.
        let mut targets: IndexMap<Symbol, DispatchTarget> = IndexMap::new();
        for op_ref in unit.all_operations(class) {
            let op = unit
                .operation(op_ref)
                .ok_or(Error::Dangling(op_ref.class))?;
            let name = interner.intern(&op.name);
            let target = if op_ref.class == class {
                DispatchTarget::Own(op_ref)
            } else {
                DispatchTarget::Inherited(op_ref)
            };
            targets.entry(name).or_insert(target);
        }
        for builtin in BUILTIN_OPERATIONS {
            let name = interner.intern(builtin);
            targets.entry(name).or_insert(DispatchTarget::Builtin);
        }
        let mut entries: Vec<DispatchEntry> = targets
            .into_iter()
            .map(|(name, target)| DispatchEntry { name, target })
            .collect();
        entries.sort_by(|a, b| interner.resolve(a.name).cmp(interner.resolve(b.name)));

        let own_symbol = interner.intern(&unit.scoped(class));
        let mut ids = IndexSet::new();
        ids.insert(own_symbol);
        for base in unit.all_bases(class) {
            model::class(unit, base)?;
            ids.insert(interner.intern(&unit.scoped(base)));
        }
        ids.insert(interner.intern(ROOT_TYPE_ID));
        let mut type_ids: Vec<Symbol> = ids.into_iter().collect();
        type_ids.sort_by(|a, b| interner.resolve(*a).cmp(interner.resolve(*b)));
        let own = type_ids
            .iter()
            .position(|&s| s == own_symbol)
            .unwrap_or_default();

        tracing::trace!(
            class = %unit.scoped(class),
            operations = entries.len(),
            type_ids = type_ids.len(),
            "dispatch plan"
        );

        Ok(Self {
            interner,
            entries,
            type_ids,
            own,
        })
    }

    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    pub fn operation_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| self.resolve(e.name)).collect()
    }

    pub fn type_ids(&self) -> Vec<&str> {
        self.type_ids.iter().map(|&s| self.resolve(s)).collect()
    }

    /// Position of the type's own id in [`type_ids`](Self::type_ids).
    pub fn own_position(&self) -> usize {
        self.own
    }

    /// Whether anything besides the built-ins is reachable. Types without
    /// operations get no table and no switch.
    pub fn has_operations(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.target != DispatchTarget::Builtin)
    }

    /// Binary search for an operation name.
    pub fn lookup(&self, operation: &str) -> Option<(usize, DispatchTarget)> {
        let pos = self
            .entries
            .binary_search_by(|e| self.resolve(e.name).cmp(operation))
            .ok()?;
        Some((pos, self.entries[pos].target))
    }

    /// The runtime table for the same type.
    pub fn operation_table(&self) -> OperationTable {
        OperationTable::new(self.operation_names())
    }

    pub fn type_id_table(&self) -> TypeIdTable {
        let ids = self.type_ids();
        TypeIdTable::new(ids[self.own], ids)
    }
}
