//! Asynchronous variants of one operation.
//!
//! - `AMI_X_op`: client callback. `__invoke` marshals and sends without
//!   blocking; `__response` decodes the reply on the transport's thread and
//!   completes through exactly one of the callbacks.
//! - `AMD_X_op` / `_AMD_X_op`: server response callback and the incoming
//!   request it completes.

use icegen_core::OpRef;

use super::signature::{join_with, mode_constant};
use super::{Emitter, IterCounter, TypeMode};
use crate::Result;

impl Emitter<'_> {
    fn own_op_ref(&self, index: usize) -> Result<OpRef> {
        self.own_operation(index)?;
        Ok(OpRef {
            class: self.id,
            index,
        })
    }

    pub(super) fn emit_ami_callback(&mut self, index: usize) -> Result<()> {
        let op_ref = self.own_op_ref(index)?;
        let op = self.operation(op_ref)?;
        let throws = self.wire_throws_names(op)?;
        let response = self.response_params(op)?;
        let class = self.callback_name(op_ref, "AMI_")?;

        self.out.open(format!(
            "public abstract class {class} extends IceInternal.OutgoingAsync"
        ));
        self.out.line(format!(
            "public abstract void ice_response({});",
            join_with(&response, "")
        ));
        self.out
            .line("public abstract void ice_exception(Ice.LocalException ex);");
        if !throws.is_empty() {
            self.out
                .line("public abstract void ice_exception(Ice.UserException ex);");
        }

        let mut params = vec!["Ice.ObjectPrx __prx".to_owned()];
        for p in op.in_params() {
            params.push(format!(
                "{} {}",
                self.type_string(p.ty, TypeMode::In, &p.metadata)?,
                p.name
            ));
        }
        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open(format!(
            "public final void __invoke({})",
            join_with(&params, "java.util.Map __ctx")
        ));
        self.out.line("try");
        self.out.block();
        self.out.line(format!(
            "__prepare(__prx, \"{}\", {}, __ctx);",
            op.name,
            mode_constant(op)
        ));
        for p in op.in_params() {
            self.write_marshal(p.ty, &p.name, &p.metadata, &mut iter)?;
        }
        if self.unit.sends_classes(op) {
            self.out.line("__os.writePendingObjects();");
        }
        self.out.line("__os.endWriteEncaps();");
        self.out.close();
        self.out.line("catch(Ice.LocalException __ex)");
        self.out.block();
        self.out.line("__finished(__ex);");
        self.out.line("return;");
        self.out.close();
        self.out.line("__send();");
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out
            .open("protected final void __response(boolean __ok)");
        let mut args = Vec::new();
        let mut slots = Vec::new();
        if let Some(ty) = op.returns {
            slots.push(("__ret".to_owned(), ty, Vec::new()));
        }
        for p in op.out_params() {
            slots.push((p.name.clone(), p.ty, p.metadata.clone()));
        }
        for (name, ty, metadata) in &slots {
            if ty.is_class_like() {
                let holder = self.type_string(*ty, TypeMode::Out, &[])?;
                self.out.line(format!("{holder} {name} = new {holder}();"));
                args.push(format!("{name}.value"));
            } else {
                let plain = self.type_string(*ty, TypeMode::In, metadata)?;
                self.out.line(format!("{plain} {name};"));
                args.push(name.clone());
            }
        }
        self.out.line("try");
        self.out.block();
        self.out.line("if(!__ok)");
        self.out.block();
        self.emit_user_exception_rethrow(&throws);
        self.out.close();
        // Outputs first, then the return value: the order they were written.
        slots.rotate_left(usize::from(op.returns.is_some()));
        for (name, ty, metadata) in &slots {
            if ty.is_class_like() {
                self.require_remote(*ty)?;
                self.out
                    .line(format!("__is.readObject({name}.getPatcher());"));
            } else {
                self.read_marshal(*ty, name, metadata, &mut iter, None)?;
            }
        }
        if self.unit.returns_classes(op) {
            self.out.line("__is.readPendingObjects();");
        }
        self.out.close();
        self.out.line("catch(Ice.LocalException __ex)");
        self.out.block();
        self.out.line("__finished(__ex);");
        self.out.line("return;");
        self.out.close();
        if !throws.is_empty() {
            self.out.line("catch(Ice.UserException __ex)");
            self.out.block();
            self.out.line("ice_exception(__ex);");
            self.out.line("return;");
            self.out.close();
        }
        self.out
            .line(format!("ice_response({});", join_with(&args, "")));
        self.out.close();

        self.out.close();
        Ok(())
    }

    pub(super) fn emit_amd_callback(&mut self, index: usize) -> Result<()> {
        let op_ref = self.own_op_ref(index)?;
        let op = self.operation(op_ref)?;
        let response = self.response_params(op)?;
        self.out.open(format!(
            "public interface {}",
            self.callback_name(op_ref, "AMD_")?
        ));
        self.out.line(format!(
            "void ice_response({});",
            join_with(&response, "")
        ));
        self.out.blank();
        self.out.line("void ice_exception(java.lang.Exception ex);");
        self.out.close();
        Ok(())
    }

    /// `_AMD_X_op`: marshals the deferred reply. Each path ends in exactly
    /// one `__response` or `__exception`.
    pub(super) fn emit_amd_incoming(&mut self, index: usize) -> Result<()> {
        let op_ref = self.own_op_ref(index)?;
        let op = self.operation(op_ref)?;
        let throws = self.wire_throws_names(op)?;
        let response = self.response_params(op)?;
        let class = self.callback_name(op_ref, "_AMD_")?;
        let callback = self.callback_name(op_ref, "AMD_")?;

        self.out.open(format!(
            "final class {class} extends IceInternal.IncomingAsync implements {callback}"
        ));
        self.out.open(format!("public {class}(IceInternal.Incoming in)"));
        self.out.line("super(in);");
        self.out.close();

        let mut iter = IterCounter::new();
        self.out.blank();
        self.out.open(format!(
            "public void ice_response({})",
            join_with(&response, "")
        ));
        self.out.line("if(!_finished)");
        self.out.block();
        if op.returns.is_some() || op.out_params().next().is_some() {
            self.out.line("try");
            self.out.block();
            self.out
                .line("IceInternal.BasicStream __os = this.__os();");
            for p in op.out_params() {
                self.write_marshal(p.ty, &p.name, &p.metadata, &mut iter)?;
            }
            if let Some(ty) = op.returns {
                self.write_marshal(ty, "__ret", &[], &mut iter)?;
            }
            if self.unit.returns_classes(op) {
                self.out.line("__os.writePendingObjects();");
            }
            self.out.close();
            self.out.line("catch(Ice.LocalException __ex)");
            self.out.block();
            self.out.line("ice_exception(__ex);");
            self.out.line("return;");
            self.out.close();
        }
        self.out.line("__response(true);");
        self.out.close();
        self.out.close();

        self.out.blank();
        self.out
            .open("public void ice_exception(java.lang.Exception ex)");
        self.out.line("if(!_finished)");
        self.out.block();
        if throws.is_empty() {
            self.out.line("__exception(ex);");
        } else {
            self.out.line("try");
            self.out.block();
            self.out.line("throw ex;");
            self.out.close();
            for ex in &throws {
                self.out.line(format!("catch({ex} __ex)"));
                self.out.block();
                self.out.line("__os().writeUserException(__ex);");
                self.out.line("__response(false);");
                self.out.close();
            }
            self.out.line("catch(java.lang.Exception __ex)");
            self.out.block();
            self.out.line("__exception(__ex);");
            self.out.close();
        }
        self.out.close();
        self.out.close();

        self.out.close();
        Ok(())
    }
}
