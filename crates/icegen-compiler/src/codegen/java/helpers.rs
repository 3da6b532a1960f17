//! `XHelper` classes: out-of-line marshal code for sequences and
//! dictionaries.
//!
//! Sequences get both the array form and the `java.util.List` form, since
//! a custom mapping can be chosen per member as well as per definition.

use icegen_core::{DefKind, Type};

use super::{Emitter, IterCounter, TypeMode};
use crate::{Error, Result};

impl Emitter<'_> {
    pub(super) fn emit_helper(&mut self) -> Result<()> {
        let def = self.def;
        match &def.kind {
            DefKind::Sequence(seq) => self.emit_sequence_helper(seq.element),
            DefKind::Dictionary(dict) => self.emit_dictionary_helper(dict.key, dict.value),
            _ => Err(Error::WrongKind {
                name: def.scoped(),
                expected: "sequence or dictionary",
                found: def.kind_name(),
            }),
        }
    }

    fn emit_sequence_helper(&mut self, element: Type) -> Result<()> {
        let array = format!("{}[]", self.type_string(element, TypeMode::In, &[])?);
        let element_type = self.type_string(element, TypeMode::In, &[])?;

        self.out
            .open(format!("public final class {}", self.own_name("", "Helper")));

        let mut iter = IterCounter::new();
        self.out.open(format!(
            "public static void write(IceInternal.BasicStream __os, {array} __v)"
        ));
        self.write_array(element, "__v", &mut iter)?;
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open(format!(
            "public static {array} read(IceInternal.BasicStream __is)"
        ));
        self.out.line(format!("{array} __v;"));
        self.read_array(element, "__v", &mut iter)?;
        self.out.line("return __v;");
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open(
            "public static void writeList(IceInternal.BasicStream __os, java.util.List __v)",
        );
        self.out.line("if(__v == null)");
        self.out.block();
        self.out.line("__os.writeSize(0);");
        self.out.close();
        self.out.line("else");
        self.out.block();
        self.out.line("__os.writeSize(__v.size());");
        self.out.line("java.util.Iterator __i = __v.iterator();");
        self.out.line("while(__i.hasNext())");
        self.out.block();
        let next = self.unboxed(element, "__i.next()")?;
        self.out.line(format!("{element_type} __elem = {next};"));
        self.write_marshal(element, "__elem", &[], &mut iter)?;
        self.out.close();
        self.out.close();
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open(
            "public static void readList(IceInternal.BasicStream __is, java.util.List __v)",
        );
        self.out.line("final int __len = __is.readSize();");
        self.out.line("for(int __i = 0; __i < __len; __i++)");
        self.out.block();
        if element.is_class_like() {
            self.require_remote(element)?;
            self.out.line("__v.add(null);");
            self.out.line(format!(
                "__is.readObject(new IceInternal.ListPatcher(__v, {element_type}.class, \"{}\", __i));",
                self.unit.type_id(element)
            ));
        } else {
            self.out.line(format!("{element_type} __elem;"));
            self.read_marshal(element, "__elem", &[], &mut iter, None)?;
            self.out
                .line(format!("__v.add({});", self.boxed(element, "__elem")));
        }
        self.out.close();
        self.out.close();

        self.out.close();
        Ok(())
    }

    fn emit_dictionary_helper(&mut self, key: Type, value: Type) -> Result<()> {
        let key_type = self.type_string(key, TypeMode::In, &[])?;
        let value_type = self.type_string(value, TypeMode::In, &[])?;

        self.out
            .open(format!("public final class {}", self.own_name("", "Helper")));

        let mut iter = IterCounter::new();
        self.out.open(
            "public static void write(IceInternal.BasicStream __os, java.util.Map __v)",
        );
        self.out.line("if(__v == null)");
        self.out.block();
        self.out.line("__os.writeSize(0);");
        self.out.close();
        self.out.line("else");
        self.out.block();
        self.out.line("__os.writeSize(__v.size());");
        self.out
            .line("java.util.Iterator __i = __v.entrySet().iterator();");
        self.out.line("while(__i.hasNext())");
        self.out.block();
        self.out
            .line("java.util.Map.Entry __e = (java.util.Map.Entry)__i.next();");
        let k = self.unboxed(key, "__e.getKey()")?;
        self.out.line(format!("{key_type} __key = {k};"));
        self.write_marshal(key, "__key", &[], &mut iter)?;
        let v = self.unboxed(value, "__e.getValue()")?;
        self.out.line(format!("{value_type} __value = {v};"));
        self.write_marshal(value, "__value", &[], &mut iter)?;
        self.out.close();
        self.out.close();
        self.out.close();

        if value.is_class_like() {
            self.emit_entry_patcher(value, &value_type);
        }

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out
            .open("public static java.util.Map read(IceInternal.BasicStream __is)");
        self.out.line("int __sz = __is.readSize();");
        self.out.line("java.util.Map __r = new java.util.HashMap();");
        self.out.line("for(int __i = 0; __i < __sz; __i++)");
        self.out.block();
        self.out.line(format!("{key_type} __key;"));
        self.read_marshal(key, "__key", &[], &mut iter, None)?;
        let boxed_key = self.boxed(key, "__key");
        if value.is_class_like() {
            self.require_remote(value)?;
            self.out
                .line(format!("__is.readObject(new Patcher(__r, {boxed_key}));"));
        } else {
            self.out.line(format!("{value_type} __value;"));
            self.read_marshal(value, "__value", &[], &mut iter, None)?;
            self.out.line(format!(
                "__r.put({boxed_key}, {});",
                self.boxed(value, "__value")
            ));
        }
        self.out.close();
        self.out.line("return __r;");
        self.out.close();

        self.out.close();
        Ok(())
    }

    /// Patcher that stores a class-valued entry under its key.
    fn emit_entry_patcher(&mut self, value: Type, value_type: &str) {
        self.out.blank();
        self.out
            .open("private static class Patcher implements IceInternal.Patcher");
        self.out
            .open("Patcher(java.util.Map m, java.lang.Object key)");
        self.out.line("__m = m;");
        self.out.line("__key = key;");
        self.out.close();
        self.out.blank();
        self.out.open("public void patch(Ice.Object v)");
        if value == Type::OBJECT {
            self.out.line("__m.put(__key, v);");
        } else {
            self.emit_checked_cast(&format!("__m.put(__key, ({value_type})v);"));
        }
        self.out.close();
        self.out.blank();
        self.out.open("public String type()");
        self.out
            .line(format!("return \"{}\";", self.unit.type_id(value)));
        self.out.close();
        self.out.blank();
        self.out.line("private java.util.Map __m;");
        self.out.line("private java.lang.Object __key;");
        self.out.close();
    }
}
