//! Checked lookups into the unit.
//!
//! The model is validated before generation, so a failed lookup here means
//! the unit changed shape under us or a pass asked for the wrong kind.

use icegen_core::{
    ClassDef, DefId, DefKind, Definition, DictionaryDef, EnumDef, ExceptionDef, SequenceDef,
    StructDef, Unit,
};

use crate::{Error, Result};

pub(crate) fn definition(unit: &Unit, id: DefId) -> Result<&Definition> {
    unit.get(id).ok_or(Error::Dangling(id))
}

fn wrong_kind(def: &Definition, expected: &'static str) -> Error {
    Error::WrongKind {
        name: def.scoped(),
        expected,
        found: def.kind_name(),
    }
}

macro_rules! lookup {
    ($($fn_name:ident => $variant:ident($ty:ty), $expected:literal;)*) => {
        $(
            pub(crate) fn $fn_name(unit: &Unit, id: DefId) -> Result<&$ty> {
                let def = definition(unit, id)?;
                match &def.kind {
                    DefKind::$variant(inner) => Ok(inner),
                    _ => Err(wrong_kind(def, $expected)),
                }
            }
        )*
    };
}

lookup! {
    class => Class(ClassDef), "class or interface";
    exception => Exception(ExceptionDef), "exception";
    struct_def => Struct(StructDef), "struct";
    enum_def => Enum(EnumDef), "enum";
    sequence => Sequence(SequenceDef), "sequence";
    dictionary => Dictionary(DictionaryDef), "dictionary";
}
