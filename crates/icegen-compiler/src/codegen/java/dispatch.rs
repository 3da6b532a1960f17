//! Server-side dispatch: type-id tables, per-operation handlers and the
//! index-based router.
//!
//! Handlers are emitted only for operations declared on the type itself.
//! The router reaches inherited operations through the declaring type's
//! handler, so marshal code is never duplicated down a hierarchy.

use icegen_core::OpRef;

use super::signature::join_with;
use super::{Emitter, IterCounter, TypeMode};
use crate::Result;
use crate::analyze::{DispatchPlan, DispatchTarget};

const STATUS: &str = "IceInternal.DispatchStatus";

impl Emitter<'_> {
    /// `_XDisp`: the abstract servant base of an interface.
    pub(super) fn emit_dispatcher(&mut self) -> Result<()> {
        let name = self.def.name.clone();
        self.out.open(format!(
            "public abstract class _{name}Disp extends Ice.ObjectImpl implements {name}"
        ));
        self.out.line("protected void ice_copyStateFrom(Ice.Object __obj)");
        self.out.indent();
        self.out.line("throws java.lang.CloneNotSupportedException");
        self.out.dedent();
        self.out.block();
        self.out.line("throw new java.lang.CloneNotSupportedException();");
        self.out.close();
        self.emit_dispatch_section()?;
        self.out.close();
        Ok(())
    }

    pub(super) fn emit_dispatch_section(&mut self) -> Result<()> {
        let plan = DispatchPlan::build(self.unit, self.id)?;

        self.out.blank();
        self.out.line("public static final String[] __ids =");
        self.emit_string_array(&plan.type_ids());

        let own = plan.own_position();
        self.out.blank();
        self.out.open("public boolean ice_isA(String s, Ice.Current __current)");
        self.out.line("return java.util.Arrays.binarySearch(__ids, s) >= 0;");
        self.out.close();
        self.out.blank();
        self.out.open("public String[] ice_ids(Ice.Current __current)");
        self.out.line("return __ids;");
        self.out.close();
        self.out.blank();
        self.out.open("public String ice_id(Ice.Current __current)");
        self.out.line(format!("return __ids[{own}];"));
        self.out.close();
        self.out.blank();
        self.out.open("public static String ice_staticId()");
        self.out.line(format!("return __ids[{own}];"));
        self.out.close();

        let count = self.this_class()?.operations.len();
        for index in 0..count {
            self.emit_handler(OpRef {
                class: self.id,
                index,
            })?;
        }

        if plan.has_operations() {
            self.emit_router(&plan)?;
        }
        Ok(())
    }

    pub(super) fn emit_string_array(&mut self, items: &[&str]) {
        self.out.block();
        for (i, item) in items.iter().enumerate() {
            let comma = if i + 1 < items.len() { "," } else { "" };
            self.out.line(format!("\"{item}\"{comma}"));
        }
        self.out.close_with(";");
    }

    /// `__dispatch`: binary search over the sorted operation names, then a
    /// switch on the position.
    fn emit_router(&mut self, plan: &DispatchPlan) -> Result<()> {
        self.out.blank();
        self.out.line("private final static String[] __all =");
        self.emit_string_array(&plan.operation_names());

        self.out.blank();
        self.out.open(format!(
            "public {STATUS} __dispatch(IceInternal.Incoming in, Ice.Current __current)"
        ));
        self.out
            .line("int pos = java.util.Arrays.binarySearch(__all, __current.operation);");
        self.out.line("if(pos < 0)");
        self.out.block();
        self.out.line(format!("return {STATUS}.DispatchOperationNotExist;"));
        self.out.close();
        self.out.blank();
        self.out.line("switch(pos)");
        self.out.block();
        for (pos, entry) in plan.entries().iter().enumerate() {
            let name = plan.resolve(entry.name);
            let handler = match entry.target {
                DispatchTarget::Builtin | DispatchTarget::Own(_) => format!("___{name}"),
                DispatchTarget::Inherited(op) => {
                    let declaring = if self.class(op.class)?.is_interface {
                        self.java_name(op.class, "_", "Disp")?
                    } else {
                        self.java_name(op.class, "", "")?
                    };
                    format!("{declaring}.___{name}")
                }
            };
            self.out.line(format!("case {pos}:"));
            self.out.block();
            self.out.line(format!("return {handler}(this, in, __current);"));
            self.out.close();
        }
        self.out.close();
        self.out.blank();
        self.out.line("assert(false);");
        self.out.line(format!("return {STATUS}.DispatchOperationNotExist;"));
        self.out.close();
        Ok(())
    }

    /// Static `___op` handler: unmarshal inputs, call the servant, marshal
    /// outputs, and turn declared exceptions into a user-exception reply.
    fn emit_handler(&mut self, op_ref: OpRef) -> Result<()> {
        let op = self.operation(op_ref)?;
        let servant = self.java_name(op_ref.class, "", "")?;
        let throws = self.wire_throws_names(op)?;
        let mut iter = IterCounter::new();

        self.out.blank();
        self.out.open(format!(
            "public static {STATUS} ___{}({servant} __obj, IceInternal.Incoming __in, Ice.Current __current)",
            op.name
        ));
        if op.in_params().next().is_some() {
            self.out.line("IceInternal.BasicStream __is = __in.is();");
        }
        let has_reply = op.returns.is_some() || op.out_params().next().is_some();
        let amd = self.uses_amd(op_ref)?;
        if !amd && (has_reply || !throws.is_empty()) {
            self.out.line("IceInternal.BasicStream __os = __in.os();");
        }

        let mut args = Vec::with_capacity(op.params.len());
        for p in op.in_params() {
            if p.ty.is_class_like() {
                let holder = self.type_string(p.ty, TypeMode::Out, &[])?;
                self.out.line(format!("{holder} {} = new {holder}();", p.name));
                self.out
                    .line(format!("__is.readObject({}.getPatcher());", p.name));
                args.push(format!("{}.value", p.name));
            } else {
                let ty = self.type_string(p.ty, TypeMode::In, &p.metadata)?;
                self.out.line(format!("{ty} {};", p.name));
                self.read_marshal(p.ty, &p.name, &p.metadata, &mut iter, None)?;
                args.push(p.name.clone());
            }
        }
        if self.unit.sends_classes(op) {
            self.out.line("__is.readPendingObjects();");
        }

        if amd {
            let callback = self.callback_name(op_ref, "AMD_")?;
            let incoming = self.callback_name(op_ref, "_AMD_")?;
            self.out
                .line(format!("{callback} __cb = new {incoming}(__in);"));
            self.out.line("try");
            self.out.block();
            let mut async_args = vec!["__cb".to_owned()];
            async_args.extend(args);
            self.out.line(format!(
                "__obj.{}_async({});",
                op.name,
                join_with(&async_args, "__current")
            ));
            self.out.close();
            self.out.line("catch(java.lang.Exception ex)");
            self.out.block();
            self.out.line("__cb.ice_exception(ex);");
            self.out.close();
            self.out.line(format!("return {STATUS}.DispatchAsync;"));
            self.out.close();
            return Ok(());
        }

        for p in op.out_params() {
            let holder = self.type_string(p.ty, TypeMode::Out, &p.metadata)?;
            self.out.line(format!("{holder} {} = new {holder}();", p.name));
            args.push(p.name.clone());
        }

        if !throws.is_empty() {
            self.out.line("try");
            self.out.block();
        }
        let call = format!("__obj.{}({})", op.name, join_with(&args, "__current"));
        match op.returns {
            Some(ty) => {
                let ret = self.type_string(ty, TypeMode::Return, &[])?;
                self.out.line(format!("{ret} __ret = {call};"));
            }
            None => self.out.line(format!("{call};")),
        }
        for p in op.out_params() {
            self.write_marshal(p.ty, &format!("{}.value", p.name), &p.metadata, &mut iter)?;
        }
        if let Some(ty) = op.returns {
            self.write_marshal(ty, "__ret", &[], &mut iter)?;
        }
        if self.unit.returns_classes(op) {
            self.out.line("__os.writePendingObjects();");
        }
        self.out.line(format!("return {STATUS}.DispatchOK;"));
        if !throws.is_empty() {
            self.out.close();
            for ex in &throws {
                self.out.line(format!("catch({ex} ex)"));
                self.out.block();
                self.out.line("__os.writeUserException(ex);");
                self.out
                    .line(format!("return {STATUS}.DispatchUserException;"));
                self.out.close();
            }
        }
        self.out.close();
        Ok(())
    }
}
