//! String interning for operation names and type ids.
//!
//! Dispatch tables are built from names gathered along every inheritance
//! path. Interning turns each distinct name into a `Symbol`, so duplicates
//! collapse by integer comparison before the table is sorted.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A handle to an interned string.
///
/// Symbols compare by insertion order. Use [`Interner::sorted`] when the
/// lexicographic order of the underlying strings matters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: HashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing symbol on a repeat.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), sym);
        sym
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Resolve a symbol created by this interner.
    ///
    /// # Panics
    /// Panics if the symbol came from another interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Every interned symbol, ordered by its string.
    pub fn sorted(&self) -> Vec<Symbol> {
        let mut syms: Vec<Symbol> = (0..self.strings.len() as u32).map(Symbol).collect();
        syms.sort_by(|a, b| self.resolve(*a).cmp(self.resolve(*b)));
        syms
    }
}
