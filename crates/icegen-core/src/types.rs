//! Type references.

use serde::{Deserialize, Serialize};

/// Index of a definition inside a [`Unit`](crate::Unit).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(pub u32);

impl DefId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Built-in Slice types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    /// `Object`: any class instance.
    Object,
    /// `Object*`: an untyped proxy.
    ObjectProxy,
    LocalObject,
}

impl BuiltinKind {
    /// Slice spelling, also used as the type id of non-object builtins.
    pub fn slice_name(self) -> &'static str {
        match self {
            BuiltinKind::Bool => "bool",
            BuiltinKind::Byte => "byte",
            BuiltinKind::Short => "short",
            BuiltinKind::Int => "int",
            BuiltinKind::Long => "long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::String => "string",
            BuiltinKind::Object => "::Ice::Object",
            BuiltinKind::ObjectProxy => "::Ice::Object*",
            BuiltinKind::LocalObject => "::Ice::LocalObject",
        }
    }

    /// Whether values of this kind have a primitive (unboxed) representation.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            BuiltinKind::Bool
                | BuiltinKind::Byte
                | BuiltinKind::Short
                | BuiltinKind::Int
                | BuiltinKind::Long
                | BuiltinKind::Float
                | BuiltinKind::Double
        )
    }
}

/// A type reference.
///
/// Every variant other than `Builtin` points at a definition of the matching
/// kind; `Proxy` and `Class` both point at a class or interface definition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Builtin(BuiltinKind),
    Proxy(DefId),
    Class(DefId),
    Struct(DefId),
    Sequence(DefId),
    Dictionary(DefId),
    Enum(DefId),
}

impl Type {
    pub const BOOL: Type = Type::Builtin(BuiltinKind::Bool);
    pub const BYTE: Type = Type::Builtin(BuiltinKind::Byte);
    pub const SHORT: Type = Type::Builtin(BuiltinKind::Short);
    pub const INT: Type = Type::Builtin(BuiltinKind::Int);
    pub const LONG: Type = Type::Builtin(BuiltinKind::Long);
    pub const FLOAT: Type = Type::Builtin(BuiltinKind::Float);
    pub const DOUBLE: Type = Type::Builtin(BuiltinKind::Double);
    pub const STRING: Type = Type::Builtin(BuiltinKind::String);
    pub const OBJECT: Type = Type::Builtin(BuiltinKind::Object);
    pub const OBJECT_PROXY: Type = Type::Builtin(BuiltinKind::ObjectProxy);

    /// A class-valued slot: read through a patcher rather than assigned directly.
    pub fn is_class_like(self) -> bool {
        matches!(self, Type::Class(_) | Type::Builtin(BuiltinKind::Object))
    }

    /// The referenced definition, if any.
    pub fn def_id(self) -> Option<DefId> {
        match self {
            Type::Builtin(_) => None,
            Type::Proxy(id)
            | Type::Class(id)
            | Type::Struct(id)
            | Type::Sequence(id)
            | Type::Dictionary(id)
            | Type::Enum(id) => Some(id),
        }
    }
}
