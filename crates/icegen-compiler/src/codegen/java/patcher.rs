//! Patcher classes: deferred assignment of class-valued slots.
//!
//! A read of a class-valued slot registers a patcher with the stream. The
//! stream calls `patch` once, after the referenced instance has been read
//! completely, and checks the instance against `type()` when it does.

use icegen_core::Type;

use super::{Emitter, TypeMode};
use crate::Result;
use crate::analyze::PatchPlan;

/// Registration expression for the patcher of `member`, if it has one.
pub(super) fn patcher_expr(plan: &PatchPlan, member: &str) -> Option<String> {
    let slot = plan.slot(member)?;
    if plan.is_indexed() {
        Some(format!("new Patcher({})", slot.index))
    } else {
        Some("new Patcher()".to_owned())
    }
}

impl Emitter<'_> {
    /// Inner `Patcher` class for the class-valued members of one slice.
    ///
    /// With more than one slot through this layer the patcher takes the
    /// member index; the expected type id is fixed when it is constructed.
    pub fn emit_member_patcher(&mut self, plan: &PatchPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }
        let indexed = plan.is_indexed();

        self.out.blank();
        self.out.open("private class Patcher implements IceInternal.Patcher");
        if indexed {
            self.out.open("Patcher(int member)");
            self.out.line("__member = member;");
            self.out.line("switch(__member)");
            self.out.block();
            for slot in plan.slots() {
                self.out.line(format!("case {}:", slot.index));
                self.out.indent();
                self.out.line(format!("__typeId = \"{}\";", slot.type_id));
                self.out.line("break;");
                self.out.dedent();
            }
            self.out.close();
            self.out.close();
            self.out.blank();
        }

        self.out.open("public void patch(Ice.Object v)");
        if indexed {
            self.out.line("switch(__member)");
            self.out.block();
            for slot in plan.slots() {
                self.out.line(format!("case {}:", slot.index));
                self.out.indent();
                self.emit_patch_assignment(&slot.member, slot.ty)?;
                self.out.line("break;");
                self.out.dedent();
            }
            self.out.close();
        } else if let Some(slot) = plan.slots().first() {
            self.emit_patch_assignment(&slot.member, slot.ty)?;
        }
        self.out.close();

        self.out.blank();
        self.out.open("public String type()");
        match plan.slots().first() {
            Some(slot) if !indexed => self.out.line(format!("return \"{}\";", slot.type_id)),
            _ => self.out.line("return __typeId;"),
        }
        self.out.close();

        if indexed {
            self.out.blank();
            self.out.line("private int __member;");
            self.out.line("private String __typeId;");
        }
        self.out.close();
        Ok(())
    }

    /// Store the patched instance `v` into `target`.
    ///
    /// An instance of the wrong type is a decoding failure
    /// (`Ice.UnexpectedObjectException`), never a silent coercion.
    pub(super) fn emit_patch_assignment(&mut self, target: &str, ty: Type) -> Result<()> {
        if ty == Type::OBJECT {
            self.out.line(format!("{target} = v;"));
            return Ok(());
        }
        let class = self.type_string(ty, TypeMode::Member, &[])?;
        self.emit_checked_cast(&format!("{target} = ({class})v;"));
        Ok(())
    }

    /// `statement` wrapped so a failed cast reports the expected type.
    pub(super) fn emit_checked_cast(&mut self, statement: &str) {
        self.out.line("try");
        self.out.block();
        self.out.line(statement);
        self.out.close();
        self.out.line("catch(ClassCastException ex)");
        self.out.block();
        self.out
            .line("Ice.UnexpectedObjectException _e = new Ice.UnexpectedObjectException();");
        self.out.line("_e.type = v.ice_id();");
        self.out.line("_e.expectedType = type();");
        self.out.line("throw _e;");
        self.out.close();
    }
}
