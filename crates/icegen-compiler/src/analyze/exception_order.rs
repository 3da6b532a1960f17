//! Derived-before-base ordering of thrown exceptions.
//!
//! Catch clauses match in listed order, so a base exception listed before
//! one of its subclasses would swallow it. The base relation is a forest of
//! chains; a topological sort with a name tie-break gives a reproducible
//! order.

use std::collections::{BTreeSet, HashMap};

use icegen_core::{DefId, Operation, Unit};
use indexmap::IndexSet;

use crate::{Error, Result, model};

/// Order `exceptions` so that every exception precedes all of its bases.
///
/// Duplicates are dropped. Exceptions unrelated by inheritance are ordered
/// by scoped name. Local exceptions are kept.
pub fn derived_first(unit: &Unit, exceptions: &[DefId]) -> Result<Vec<DefId>> {
    let set: IndexSet<DefId> = exceptions.iter().copied().collect();
    for &id in &set {
        model::exception(unit, id)?;
    }

    // Number of set members that still have to be emitted before each one.
    let mut pending: HashMap<DefId, usize> = set.iter().map(|&id| (id, 0)).collect();
    for &id in &set {
        for base in ancestors(unit, id) {
            if let Some(count) = pending.get_mut(&base) {
                *count += 1;
            }
        }
    }

    let mut ready: BTreeSet<(String, DefId)> = set
        .iter()
        .filter(|id| pending[*id] == 0)
        .map(|&id| (unit.scoped(id), id))
        .collect();

    let mut order = Vec::with_capacity(set.len());
    while let Some((_, id)) = ready.pop_first() {
        order.push(id);
        for base in ancestors(unit, id) {
            let Some(count) = pending.get_mut(&base) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                ready.insert((unit.scoped(base), base));
            }
        }
    }

    if order.len() != set.len() {
        let stuck = set
            .iter()
            .find(|&&id| !order.contains(&id))
            .map(|&id| unit.scoped(id))
            .unwrap_or_default();
        return Err(Error::CyclicExceptions(stuck));
    }
    Ok(order)
}

/// Exceptions an operation may put on the wire, most-derived first.
///
/// Local exceptions never cross the wire and are left out.
pub fn wire_throws(unit: &Unit, op: &Operation) -> Result<Vec<DefId>> {
    let mut remote = Vec::with_capacity(op.throws.len());
    for &id in &op.throws {
        if !model::exception(unit, id)?.is_local {
            remote.push(id);
        }
    }
    derived_first(unit, &remote)
}

fn ancestors(unit: &Unit, id: DefId) -> impl Iterator<Item = DefId> {
    unit.exception_chain(id).into_iter().skip(1)
}
