//! Holder classes: the mutable box an out-parameter is written through.

use icegen_core::{DefKind, Type};

use super::{Emitter, TypeMode};
use crate::{Error, Result};

impl Emitter<'_> {
    /// The type this definition declares, as a type reference.
    pub(super) fn own_type(&self) -> Result<Type> {
        let id = self.id;
        Ok(match &self.def.kind {
            DefKind::Class(_) => Type::Class(id),
            DefKind::Struct(_) => Type::Struct(id),
            DefKind::Enum(_) => Type::Enum(id),
            DefKind::Sequence(_) => Type::Sequence(id),
            DefKind::Dictionary(_) => Type::Dictionary(id),
            DefKind::Exception(_) | DefKind::Const(_) => {
                return Err(Error::WrongKind {
                    name: self.def.scoped(),
                    expected: "type",
                    found: self.def.kind_name(),
                });
            }
        })
    }

    /// `XHolder`. Class holders also carry a patcher that fills `value`.
    pub(super) fn emit_holder(&mut self) -> Result<()> {
        let ty = self.own_type()?;
        let value = self.type_string(ty, TypeMode::Member, &[])?;
        let holder = self.own_name("", "Holder");

        self.emit_holder_class(&holder, &value);
        if ty.is_class_like() {
            self.out.blank();
            self.out
                .open("public class Patcher implements IceInternal.Patcher");
            self.out.open("public void patch(Ice.Object v)");
            self.emit_patch_assignment("value", ty)?;
            self.out.close();
            self.out.blank();
            self.out.open("public String type()");
            self.out
                .line(format!("return \"{}\";", self.unit.type_id(ty)));
            self.out.close();
            self.out.close();
            self.out.blank();
            self.out.open("public Patcher getPatcher()");
            self.out.line("return new Patcher();");
            self.out.close();
        }
        self.out.blank();
        self.out.line(format!("public {value} value;"));
        self.out.close();
        Ok(())
    }

    /// `XPrxHolder`.
    pub(super) fn emit_proxy_holder(&mut self) -> Result<()> {
        self.this_class()?;
        let value = self.own_name("", "Prx");
        let holder = self.own_name("", "PrxHolder");
        self.emit_holder_class(&holder, &value);
        self.out.blank();
        self.out.line(format!("public {value} value;"));
        self.out.close();
        Ok(())
    }

    /// Class header and both constructors; leaves the class open.
    fn emit_holder_class(&mut self, holder: &str, value: &str) {
        self.out.open(format!("public final class {holder}"));
        self.out.open(format!("public {holder}()"));
        self.out.close();
        self.out.blank();
        self.out.open(format!("public {holder}({value} value)"));
        self.out.line("this.value = value;");
        self.out.close();
    }
}
