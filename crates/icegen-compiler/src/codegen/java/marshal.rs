//! Marshal code: write and read statements for a typed value.
//!
//! Write code uses the stream variable `__os`, read code `__is`. Sequences
//! without a custom mapping are marshaled with an inline counted loop; the
//! loop variables come from an [`IterCounter`] shared by the whole method, so
//! nested and sibling loops never shadow each other.

use std::collections::HashSet;

use icegen_core::utils::custom_collection;
use icegen_core::{BuiltinKind, DefId, Type, Unit};

use super::{Emitter, TypeMode};
use crate::{Error, Result};

/// Source of loop variable suffixes for one generated method.
#[derive(Debug, Default)]
pub struct IterCounter {
    next: u32,
}

impl IterCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }
}

/// Whether `ty` can only exist in-process.
pub fn is_local_type(unit: &Unit, ty: Type) -> bool {
    let mut visited = HashSet::new();
    local_inner(unit, ty, &mut visited)
}

fn local_inner(unit: &Unit, ty: Type, visited: &mut HashSet<DefId>) -> bool {
    match ty {
        Type::Builtin(kind) => kind == BuiltinKind::LocalObject,
        Type::Proxy(id) | Type::Class(id) => unit.class(id).is_some_and(|c| c.is_local),
        Type::Enum(_) => false,
        Type::Struct(id) => {
            if !visited.insert(id) {
                return false;
            }
            unit.struct_def(id).is_some_and(|s| {
                s.is_local || s.members.iter().any(|m| local_inner(unit, m.ty, visited))
            })
        }
        Type::Sequence(id) => {
            if !visited.insert(id) {
                return false;
            }
            unit.sequence(id)
                .is_some_and(|s| local_inner(unit, s.element, visited))
        }
        Type::Dictionary(id) => {
            if !visited.insert(id) {
                return false;
            }
            unit.dictionary(id).is_some_and(|d| {
                local_inner(unit, d.key, visited) || local_inner(unit, d.value, visited)
            })
        }
    }
}

fn write_call(kind: BuiltinKind) -> Option<&'static str> {
    Some(match kind {
        BuiltinKind::Bool => "writeBool",
        BuiltinKind::Byte => "writeByte",
        BuiltinKind::Short => "writeShort",
        BuiltinKind::Int => "writeInt",
        BuiltinKind::Long => "writeLong",
        BuiltinKind::Float => "writeFloat",
        BuiltinKind::Double => "writeDouble",
        BuiltinKind::String => "writeString",
        BuiltinKind::Object => "writeObject",
        BuiltinKind::ObjectProxy => "writeProxy",
        BuiltinKind::LocalObject => return None,
    })
}

fn read_call(kind: BuiltinKind) -> Option<&'static str> {
    Some(match kind {
        BuiltinKind::Bool => "readBool",
        BuiltinKind::Byte => "readByte",
        BuiltinKind::Short => "readShort",
        BuiltinKind::Int => "readInt",
        BuiltinKind::Long => "readLong",
        BuiltinKind::Float => "readFloat",
        BuiltinKind::Double => "readDouble",
        BuiltinKind::String => "readString",
        BuiltinKind::ObjectProxy => "readProxy",
        BuiltinKind::Object | BuiltinKind::LocalObject => return None,
    })
}

fn local_builtin(kind: BuiltinKind) -> Error {
    Error::LocalOnWire(kind.slice_name().to_owned())
}

/// `new T[len]`, keeping trailing dimensions of array element types:
/// `int[]` elements give `new int[len][]`.
fn new_array(element: &str, len: &str) -> String {
    match element.find('[') {
        Some(pos) => format!("new {}[{len}]{}", &element[..pos], &element[pos..]),
        None => format!("new {element}[{len}]"),
    }
}

impl Emitter<'_> {
    /// Fail if `ty` is local; local types have no wire form.
    pub(super) fn require_remote(&self, ty: Type) -> Result<()> {
        if is_local_type(self.unit, ty) {
            return Err(Error::LocalOnWire(self.unit.type_id(ty)));
        }
        Ok(())
    }

    /// Statements writing `value` to `__os`.
    pub fn write_marshal(
        &mut self,
        ty: Type,
        value: &str,
        metadata: &[String],
        iter: &mut IterCounter,
    ) -> Result<()> {
        self.require_remote(ty)?;
        match ty {
            Type::Builtin(kind) => {
                let call = write_call(kind).ok_or_else(|| local_builtin(kind))?;
                self.out.line(format!("__os.{call}({value});"));
            }
            Type::Proxy(id) => {
                let helper = self.java_name(id, "", "PrxHelper")?;
                self.out.line(format!("{helper}.__write(__os, {value});"));
            }
            Type::Class(id) => {
                self.class(id)?;
                self.out.line(format!("__os.writeObject({value});"));
            }
            Type::Struct(id) => {
                self.struct_def(id)?;
                self.out.line(format!("{value}.__write(__os);"));
            }
            Type::Enum(id) => {
                self.enum_def(id)?;
                self.out.line(format!("{value}.__write(__os);"));
            }
            Type::Dictionary(id) => {
                self.dictionary(id)?;
                let helper = self.java_name(id, "", "Helper")?;
                self.out.line(format!("{helper}.write(__os, {value});"));
            }
            Type::Sequence(id) => {
                let element = self.sequence(id)?.element;
                if self.is_custom_sequence(id, metadata)? {
                    let helper = self.java_name(id, "", "Helper")?;
                    self.out.line(format!("{helper}.writeList(__os, {value});"));
                } else {
                    self.write_array(element, value, iter)?;
                }
            }
        }
        Ok(())
    }

    /// Statements reading into `value` from `__is`.
    ///
    /// Class-valued slots are never assigned here: the read registers
    /// `patcher` (default `new Patcher()`) and the stream fills the slot once
    /// the instance is complete.
    pub fn read_marshal(
        &mut self,
        ty: Type,
        value: &str,
        metadata: &[String],
        iter: &mut IterCounter,
        patcher: Option<&str>,
    ) -> Result<()> {
        self.require_remote(ty)?;
        let patcher = patcher.unwrap_or("new Patcher()");
        match ty {
            Type::Builtin(BuiltinKind::Object) => {
                self.out.line(format!("__is.readObject({patcher});"));
            }
            Type::Builtin(kind) => {
                let call = read_call(kind).ok_or_else(|| local_builtin(kind))?;
                self.out.line(format!("{value} = __is.{call}();"));
            }
            Type::Proxy(id) => {
                let helper = self.java_name(id, "", "PrxHelper")?;
                self.out.line(format!("{value} = {helper}.__read(__is);"));
            }
            Type::Class(id) => {
                self.class(id)?;
                self.out.line(format!("__is.readObject({patcher});"));
            }
            Type::Struct(id) => {
                self.struct_def(id)?;
                let class = self.java_name(id, "", "")?;
                self.out.line(format!("{value} = new {class}();"));
                self.out.line(format!("{value}.__read(__is);"));
            }
            Type::Enum(id) => {
                self.enum_def(id)?;
                let class = self.java_name(id, "", "")?;
                self.out.line(format!("{value} = {class}.__read(__is);"));
            }
            Type::Dictionary(id) => {
                self.dictionary(id)?;
                let helper = self.java_name(id, "", "Helper")?;
                self.out.line(format!("{value} = {helper}.read(__is);"));
            }
            Type::Sequence(id) => {
                let element = self.sequence(id)?.element;
                if self.is_custom_sequence(id, metadata)? {
                    let class = self.type_string(ty, TypeMode::In, metadata)?;
                    let helper = self.java_name(id, "", "Helper")?;
                    self.out.line(format!("{value} = new {class}();"));
                    self.out.line(format!("{helper}.readList(__is, {value});"));
                } else {
                    self.read_array(element, value, iter)?;
                }
            }
        }
        Ok(())
    }

    fn is_custom_sequence(&self, id: DefId, metadata: &[String]) -> Result<bool> {
        let def = self.definition(id)?;
        Ok(custom_collection(metadata, &def.metadata).is_some())
    }

    /// Size-prefixed loop over a Java array; `null` writes as empty.
    pub(super) fn write_array(
        &mut self,
        element: Type,
        value: &str,
        iter: &mut IterCounter,
    ) -> Result<()> {
        let i = format!("__i{}", iter.next());
        self.out.line(format!("if({value} == null)"));
        self.out.block();
        self.out.line("__os.writeSize(0);");
        self.out.close();
        self.out.line("else");
        self.out.block();
        self.out.line(format!("__os.writeSize({value}.length);"));
        self.out.line(format!("for(int {i} = 0; {i} < {value}.length; {i}++)"));
        self.out.block();
        self.write_marshal(element, &format!("{value}[{i}]"), &[], iter)?;
        self.out.close();
        self.out.close();
        Ok(())
    }

    pub(super) fn read_array(
        &mut self,
        element: Type,
        value: &str,
        iter: &mut IterCounter,
    ) -> Result<()> {
        let n = iter.next();
        let (i, len) = (format!("__i{n}"), format!("__len{n}"));
        let element_type = self.type_string(element, TypeMode::In, &[])?;
        self.out.block();
        self.out.line(format!("int {len} = __is.readSize();"));
        self.out.line(format!("{value} = {};", new_array(&element_type, &len)));
        self.out.line(format!("for(int {i} = 0; {i} < {len}; {i}++)"));
        self.out.block();
        if element.is_class_like() {
            self.require_remote(element)?;
            let type_id = self.unit.type_id(element);
            self.out.line(format!(
                "__is.readObject(new IceInternal.SequencePatcher({value}, {element_type}.class, \"{type_id}\", {i}));"
            ));
        } else {
            self.read_marshal(element, &format!("{value}[{i}]"), &[], iter, None)?;
        }
        self.out.close();
        self.out.close();
        Ok(())
    }
}
