//! Type expressions for every usage position.

use icegen_core::utils::custom_collection;
use icegen_core::{BuiltinKind, Type};

use super::Emitter;
use crate::Result;

/// Where a type is used.
///
/// Out-parameters need a holder; collections of builtins need the boxed
/// class. In, Return and Member positions share the plain form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeMode {
    In,
    Out,
    Return,
    Member,
    Boxed,
}

impl Emitter<'_> {
    /// Java type expression for `ty` in `mode`. `metadata` is the directive
    /// list of the member or parameter, used for custom sequence mappings.
    pub fn type_string(&self, ty: Type, mode: TypeMode, metadata: &[String]) -> Result<String> {
        let holder = mode == TypeMode::Out;
        match ty {
            Type::Builtin(kind) => Ok(builtin_type(kind, mode).to_owned()),
            Type::Proxy(id) => {
                self.class(id)?;
                self.java_name(id, "", if holder { "PrxHolder" } else { "Prx" })
            }
            Type::Class(id) => {
                self.class(id)?;
                self.java_name(id, "", if holder { "Holder" } else { "" })
            }
            Type::Struct(id) => {
                self.struct_def(id)?;
                self.java_name(id, "", if holder { "Holder" } else { "" })
            }
            Type::Enum(id) => {
                self.enum_def(id)?;
                self.java_name(id, "", if holder { "Holder" } else { "" })
            }
            Type::Dictionary(id) => {
                self.dictionary(id)?;
                if holder {
                    return self.java_name(id, "", "Holder");
                }
                Ok("java.util.Map".to_owned())
            }
            Type::Sequence(id) => {
                let seq = self.sequence(id)?;
                if holder {
                    return self.java_name(id, "", "Holder");
                }
                let def = self.definition(id)?;
                if let Some(custom) = custom_collection(metadata, &def.metadata) {
                    return Ok(custom.to_owned());
                }
                let element = self.type_string(seq.element, TypeMode::In, &[])?;
                Ok(format!("{element}[]"))
            }
        }
    }

    /// `expr` converted to a `java.lang.Object` for storage in a collection.
    pub(super) fn boxed(&self, ty: Type, expr: &str) -> String {
        match ty {
            Type::Builtin(kind) if kind.is_primitive() => {
                format!("new {}({expr})", builtin_type(kind, TypeMode::Boxed))
            }
            _ => expr.to_owned(),
        }
    }

    /// `expr`, a `java.lang.Object` taken from a collection, converted back.
    pub(super) fn unboxed(&self, ty: Type, expr: &str) -> Result<String> {
        match ty {
            Type::Builtin(kind) if kind.is_primitive() => {
                let class = builtin_type(kind, TypeMode::Boxed);
                let plain = builtin_type(kind, TypeMode::In);
                Ok(format!("(({class}){expr}).{plain}Value()"))
            }
            _ => {
                let class = self.type_string(ty, TypeMode::In, &[])?;
                Ok(format!("({class}){expr}"))
            }
        }
    }
}

fn builtin_type(kind: BuiltinKind, mode: TypeMode) -> &'static str {
    match mode {
        TypeMode::In | TypeMode::Return | TypeMode::Member => match kind {
            BuiltinKind::Bool => "boolean",
            BuiltinKind::Byte => "byte",
            BuiltinKind::Short => "short",
            BuiltinKind::Int => "int",
            BuiltinKind::Long => "long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::String => "String",
            BuiltinKind::Object => "Ice.Object",
            BuiltinKind::ObjectProxy => "Ice.ObjectPrx",
            BuiltinKind::LocalObject => "Ice.LocalObject",
        },
        TypeMode::Out => match kind {
            BuiltinKind::Bool => "Ice.BooleanHolder",
            BuiltinKind::Byte => "Ice.ByteHolder",
            BuiltinKind::Short => "Ice.ShortHolder",
            BuiltinKind::Int => "Ice.IntHolder",
            BuiltinKind::Long => "Ice.LongHolder",
            BuiltinKind::Float => "Ice.FloatHolder",
            BuiltinKind::Double => "Ice.DoubleHolder",
            BuiltinKind::String => "Ice.StringHolder",
            BuiltinKind::Object => "Ice.ObjectHolder",
            BuiltinKind::ObjectProxy => "Ice.ObjectPrxHolder",
            BuiltinKind::LocalObject => "Ice.LocalObjectHolder",
        },
        TypeMode::Boxed => match kind {
            BuiltinKind::Bool => "java.lang.Boolean",
            BuiltinKind::Byte => "java.lang.Byte",
            BuiltinKind::Short => "java.lang.Short",
            BuiltinKind::Int => "java.lang.Integer",
            BuiltinKind::Long => "java.lang.Long",
            BuiltinKind::Float => "java.lang.Float",
            BuiltinKind::Double => "java.lang.Double",
            BuiltinKind::String => "String",
            BuiltinKind::Object => "Ice.Object",
            BuiltinKind::ObjectProxy => "Ice.ObjectPrx",
            BuiltinKind::LocalObject => "Ice.LocalObject",
        },
    }
}
