//! Language bindings: the Java type for each Slice definition.

use icegen_core::utils::custom_collection;
use icegen_core::{BuiltinKind, DataMember, DefId, DefKind, Type};
use icegen_wire::EnumWidth;

use super::patcher::patcher_expr;
use super::{Emitter, IterCounter, TypeMode};
use crate::analyze::PatchPlan;
use crate::{Error, Result};

impl Emitter<'_> {
    pub(super) fn emit_binding(&mut self) -> Result<()> {
        let def = self.def;
        match &def.kind {
            DefKind::Class(c) if c.is_interface => self.emit_interface_binding(),
            DefKind::Class(_) => self.emit_class_binding(),
            DefKind::Exception(_) => self.emit_exception_binding(),
            DefKind::Struct(_) => self.emit_struct_binding(),
            DefKind::Enum(_) => self.emit_enum_binding(),
            DefKind::Const(_) => self.emit_const_binding(),
            DefKind::Sequence(_) | DefKind::Dictionary(_) => Err(Error::WrongKind {
                name: def.scoped(),
                expected: "type with a Java binding",
                found: def.kind_name(),
            }),
        }
    }

    fn emit_interface_binding(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let root = if class.is_local {
            "Ice.LocalObject"
        } else {
            "Ice.Object"
        };
        let mut supers = vec![root.to_owned(), self.own_name("_", "Operations")];
        for &base in &class.bases {
            supers.push(self.java_name(base, "", "")?);
        }
        self.out.open(format!(
            "public interface {} extends {}",
            self.def.name,
            supers.join(", ")
        ));
        self.out.close();
        Ok(())
    }

    fn emit_class_binding(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let name = self.def.name.clone();
        let is_abstract = self.unit.is_abstract(self.id);

        let base = match self.unit.base_class(self.id) {
            Some(base) => self.java_name(base, "", "")?,
            None if class.is_local => "Ice.LocalObjectImpl".to_owned(),
            None => "Ice.ObjectImpl".to_owned(),
        };
        let mut implements = Vec::new();
        if is_abstract {
            implements.push(self.own_name("_", "Operations"));
        }
        for base in self.unit.interface_bases(self.id) {
            implements.push(self.java_name(base, "", "")?);
        }
        let mut header = format!(
            "public {}class {name} extends {base}",
            if is_abstract { "abstract " } else { "" }
        );
        if !implements.is_empty() {
            header.push_str(&format!(" implements {}", implements.join(", ")));
        }

        self.out.open(header);
        self.emit_fields(&class.members)?;
        if !class.is_local {
            if !is_abstract {
                self.emit_object_factory(&name);
            }
            self.emit_dispatch_section()?;
            self.emit_class_marshal(&class.members)?;
        }
        self.out.close();
        Ok(())
    }

    fn emit_fields(&mut self, members: &[DataMember]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        self.out.blank();
        for m in members {
            let ty = self.type_string(m.ty, TypeMode::Member, &m.metadata)?;
            self.out.line(format!("public {ty} {};", m.name));
        }
        Ok(())
    }

    /// Default factory, so concrete classes can be read without
    /// registering one by hand.
    fn emit_object_factory(&mut self, name: &str) {
        self.out.blank();
        self.out
            .open("private static class __F extends Ice.LocalObjectImpl implements Ice.ObjectFactory");
        self.out.open("public Ice.Object create(String type)");
        self.out.line("assert(type.equals(ice_staticId()));");
        self.out.line(format!("return new {name}();"));
        self.out.close();
        self.out.blank();
        self.out.open("public void destroy()");
        self.out.close();
        self.out.close();
        self.out
            .line("private static Ice.ObjectFactory _factory = new __F();");
        self.out.blank();
        self.out.open("public static Ice.ObjectFactory ice_factory()");
        self.out.line("return _factory;");
        self.out.close();
    }

    /// One slice: type id, own members bracketed by start/end slice, then
    /// the base slices.
    fn emit_class_marshal(&mut self, members: &[DataMember]) -> Result<()> {
        let plan = PatchPlan::for_layer(self.unit, self.id);

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open("public void __write(IceInternal.BasicStream __os)");
        self.out.line("__os.writeTypeId(ice_staticId());");
        self.out.line("__os.startWriteSlice();");
        for m in members {
            self.write_marshal(m.ty, &m.name, &m.metadata, &mut iter)?;
        }
        self.out.line("__os.endWriteSlice();");
        self.out.line("super.__write(__os);");
        self.out.close();

        self.emit_member_patcher(&plan)?;

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out
            .open("public void __read(IceInternal.BasicStream __is, boolean __rid)");
        self.out.line("if(__rid)");
        self.out.block();
        self.out.line("String myId = __is.readTypeId();");
        self.out.close();
        self.out.line("__is.startReadSlice();");
        for m in members {
            let patcher = patcher_expr(&plan, &m.name);
            self.read_marshal(m.ty, &m.name, &m.metadata, &mut iter, patcher.as_deref())?;
        }
        self.out.line("__is.endReadSlice();");
        self.out.line("super.__read(__is, true);");
        self.out.close();
        Ok(())
    }

    fn emit_exception_binding(&mut self) -> Result<()> {
        let ex = self.exception(self.id)?;
        let scoped = self.def.scoped();
        let base = match ex.base {
            Some(base) => self.java_name(base, "", "")?,
            None if ex.is_local => "Ice.LocalException".to_owned(),
            None => "Ice.UserException".to_owned(),
        };

        self.out
            .open(format!("public class {} extends {base}", self.def.name));
        self.emit_fields(&ex.members)?;
        self.out.blank();
        self.out.open("public String ice_name()");
        self.out.line(format!(
            "return \"{}\";",
            scoped.strip_prefix("::").unwrap_or(&scoped)
        ));
        self.out.close();

        if !ex.is_local {
            let plan = PatchPlan::for_layer(self.unit, self.id);

            let mut iter = IterCounter::new();
            self.out.blank();
            self.out.open("public void __write(IceInternal.BasicStream __os)");
            self.out.line(format!("__os.writeString(\"{scoped}\");"));
            self.out.line("__os.startWriteSlice();");
            for m in &ex.members {
                self.write_marshal(m.ty, &m.name, &m.metadata, &mut iter)?;
            }
            self.out.line("__os.endWriteSlice();");
            if ex.base.is_some() {
                self.out.line("super.__write(__os);");
            }
            self.out.close();

            self.emit_member_patcher(&plan)?;

            let mut iter = IterCounter::new();
            self.out.blank();
            self.out
                .open("public void __read(IceInternal.BasicStream __is, boolean __rid)");
            self.out.line("if(__rid)");
            self.out.block();
            self.out.line("String myId = __is.readString();");
            self.out.close();
            self.out.line("__is.startReadSlice();");
            for m in &ex.members {
                let patcher = patcher_expr(&plan, &m.name);
                self.read_marshal(m.ty, &m.name, &m.metadata, &mut iter, patcher.as_deref())?;
            }
            self.out.line("__is.endReadSlice();");
            if ex.base.is_some() {
                self.out.line("super.__read(__is, true);");
            }
            self.out.close();

            let base_uses_classes = ex.base.is_some_and(|b| self.exception_uses_classes(b));
            if self.exception_uses_classes(self.id) && !base_uses_classes {
                self.out.blank();
                self.out.open("public boolean __usesClasses()");
                self.out.line("return true;");
                self.out.close();
            }
        }
        self.out.close();
        Ok(())
    }

    fn exception_uses_classes(&self, id: DefId) -> bool {
        self.unit.exception_chain(id).into_iter().any(|layer| {
            self.unit
                .members(layer)
                .iter()
                .any(|m| self.unit.uses_classes(m.ty))
        })
    }

    fn emit_struct_binding(&mut self) -> Result<()> {
        let st = self.struct_def(self.id)?;
        let name = self.def.name.clone();

        self.out.open(format!(
            "public final class {name} implements java.lang.Cloneable"
        ));
        self.emit_fields(&st.members)?;

        self.out.blank();
        self.out.open("public boolean equals(java.lang.Object rhs)");
        self.out.line(format!("{name} _r = null;"));
        self.out.line("try");
        self.out.block();
        self.out.line(format!("_r = ({name})rhs;"));
        self.out.close();
        self.out.line("catch(ClassCastException ex)");
        self.out.block();
        self.out.close();
        self.out.blank();
        self.out.line("if(_r != null)");
        self.out.block();
        for m in &st.members {
            let test = self.member_differs(m)?;
            self.out.line(format!("if({test})"));
            self.out.block();
            self.out.line("return false;");
            self.out.close();
        }
        self.out.blank();
        self.out.line("return true;");
        self.out.close();
        self.out.blank();
        self.out.line("return false;");
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open("public int hashCode()");
        self.out.line("int __h = 0;");
        for m in &st.members {
            self.emit_hash(m.ty, &m.name, &m.metadata, &mut iter)?;
        }
        self.out.line("return __h;");
        self.out.close();

        self.out.blank();
        self.out.line("public java.lang.Object clone()");
        self.out.indent();
        self.out.line("throws java.lang.CloneNotSupportedException");
        self.out.dedent();
        self.out.block();
        self.out.line("return super.clone();");
        self.out.close();

        if !st.is_local {
            let plan = PatchPlan::for_struct(self.unit, self.id);

            let mut iter = IterCounter::new();
            self.out.blank();
            self.out.open("public void __write(IceInternal.BasicStream __os)");
            for m in &st.members {
                self.write_marshal(m.ty, &m.name, &m.metadata, &mut iter)?;
            }
            self.out.close();

            self.emit_member_patcher(&plan)?;

            let mut iter = IterCounter::new();
            self.out.blank();
            self.out.open("public void __read(IceInternal.BasicStream __is)");
            for m in &st.members {
                let patcher = patcher_expr(&plan, &m.name);
                self.read_marshal(m.ty, &m.name, &m.metadata, &mut iter, patcher.as_deref())?;
            }
            self.out.close();
        }
        self.out.close();
        Ok(())
    }

    /// Condition that is true when member `m` differs between `this` and `_r`.
    fn member_differs(&self, m: &DataMember) -> Result<String> {
        let n = &m.name;
        Ok(match m.ty {
            Type::Builtin(kind) if kind.is_primitive() => format!("{n} != _r.{n}"),
            Type::Sequence(id)
                if custom_collection(&m.metadata, &self.definition(id)?.metadata).is_none() =>
            {
                format!("!java.util.Arrays.equals({n}, _r.{n})")
            }
            _ => format!("{n} != _r.{n} && {n} != null && !{n}.equals(_r.{n})"),
        })
    }

    /// Fold `value` into `__h`. Array members are hashed element-wise with
    /// a loop variable from `iter`.
    fn emit_hash(
        &mut self,
        ty: Type,
        value: &str,
        metadata: &[String],
        iter: &mut IterCounter,
    ) -> Result<()> {
        match ty {
            Type::Builtin(BuiltinKind::Bool) => {
                self.out.line(format!("__h = 5 * __h + ({value} ? 1 : 0);"));
            }
            Type::Builtin(BuiltinKind::Byte | BuiltinKind::Short | BuiltinKind::Long) => {
                self.out.line(format!("__h = 5 * __h + (int){value};"));
            }
            Type::Builtin(BuiltinKind::Int) => {
                self.out.line(format!("__h = 5 * __h + {value};"));
            }
            Type::Builtin(BuiltinKind::Float) => {
                self.out.line(format!(
                    "__h = 5 * __h + java.lang.Float.floatToIntBits({value});"
                ));
            }
            Type::Builtin(BuiltinKind::Double) => {
                self.out.line(format!(
                    "__h = 5 * __h + (int)java.lang.Double.doubleToLongBits({value});"
                ));
            }
            Type::Sequence(id)
                if custom_collection(metadata, &self.definition(id)?.metadata).is_none() =>
            {
                let element = self.sequence(id)?.element;
                let i = format!("__i{}", iter.next());
                self.out.line(format!("if({value} != null)"));
                self.out.block();
                self.out
                    .line(format!("for(int {i} = 0; {i} < {value}.length; {i}++)"));
                self.out.block();
                self.emit_hash(element, &format!("{value}[{i}]"), &[], iter)?;
                self.out.close();
                self.out.close();
            }
            _ => {
                self.out.line(format!("if({value} != null)"));
                self.out.block();
                self.out.line(format!("__h = 5 * __h + {value}.hashCode();"));
                self.out.close();
            }
        }
        Ok(())
    }

    fn emit_enum_binding(&mut self) -> Result<()> {
        let enumerators = &self.enum_def(self.id)?.enumerators;
        let name = self.def.name.clone();
        let count = enumerators.len();

        self.out.open(format!("public final class {name}"));
        self.out.line(format!(
            "private static {name}[] __values = new {name}[{count}];"
        ));
        self.out.line("private int __value;");
        self.out.blank();
        for (ordinal, e) in enumerators.iter().enumerate() {
            self.out
                .line(format!("public static final int _{e} = {ordinal};"));
            self.out.line(format!(
                "public static final {name} {e} = new {name}(_{e});"
            ));
        }

        self.out.blank();
        self.out.open(format!("public static {name} convert(int val)"));
        self.out.line(format!("assert val < {count};"));
        self.out.line("return __values[val];");
        self.out.close();
        self.out.blank();
        self.out.open("public int value()");
        self.out.line("return __value;");
        self.out.close();
        self.out.blank();
        self.out.open("public String toString()");
        self.out.line("return __T[__value];");
        self.out.close();
        self.out.blank();
        self.out.open(format!("private {name}(int val)"));
        self.out.line("__value = val;");
        self.out.line("__values[val] = this;");
        self.out.close();

        let (write, read) = match EnumWidth::for_count(count) {
            EnumWidth::Byte => ("__os.writeByte((byte)__value);", "__is.readByte()"),
            EnumWidth::Short => ("__os.writeShort((short)__value);", "__is.readShort()"),
            EnumWidth::Int => ("__os.writeInt(__value);", "__is.readInt()"),
        };
        self.out.blank();
        self.out.open("public void __write(IceInternal.BasicStream __os)");
        self.out.line(write);
        self.out.close();
        self.out.blank();
        self.out.open(format!(
            "public static {name} __read(IceInternal.BasicStream __is)"
        ));
        self.out.line(format!("int __v = {read};"));
        self.out.line(format!("if(__v < 0 || __v >= {count})"));
        self.out.block();
        self.out
            .line("throw new Ice.MarshalException(\"enumerator out of range\");");
        self.out.close();
        self.out.line(format!("return {name}.convert(__v);"));
        self.out.close();

        self.out.blank();
        self.out.line("final static private String[] __T =");
        let names: Vec<&str> = enumerators.iter().map(String::as_str).collect();
        self.emit_string_array(&names);
        self.out.close();
        Ok(())
    }

    fn emit_const_binding(&mut self) -> Result<()> {
        let def = self.def;
        let DefKind::Const(c) = &def.kind else {
            return Ok(());
        };
        let ty = self.type_string(c.ty, TypeMode::In, &[])?;
        let literal = self.const_literal(c.ty, &c.value)?;
        self.out.open(format!("public interface {}", def.name));
        self.out.line(format!("{ty} value = {literal};"));
        self.out.close();
        Ok(())
    }
}
