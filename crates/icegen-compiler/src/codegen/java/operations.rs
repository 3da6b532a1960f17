//! `_XOperations`, the servant-side operation interface, and `_XTie`,
//! which forwards each operation to a delegate object.

use icegen_core::OpRef;

use super::signature::{join_with, throws_clause};
use super::Emitter;
use crate::Result;

/// Servant-side shape of one operation.
struct ServantMethod {
    /// Everything before the parameter list: `int add`
    head: String,
    params: String,
    throws: String,
    /// Name and arguments of the forwarding call: `add(a, b, __current)`
    call: String,
    returns: bool,
}

impl Emitter<'_> {
    fn servant_method(&self, op_ref: OpRef, local: bool) -> Result<ServantMethod> {
        let op = self.operation(op_ref)?;
        let current = if local { "" } else { "Ice.Current __current" };
        let current_arg = if local { "" } else { "__current" };

        if !local && self.uses_amd(op_ref)? {
            let params = self.async_params(op_ref, "AMD_")?;
            let mut args = vec!["__cb".to_owned()];
            args.extend(op.in_params().map(|p| p.name.clone()));
            return Ok(ServantMethod {
                head: format!("void {}_async", op.name),
                params: join_with(&params, current),
                throws: throws_clause(&self.wire_throws_names(op)?),
                call: format!("{}_async({})", op.name, join_with(&args, current_arg)),
                returns: false,
            });
        }

        let sig = self.signature(op)?;
        let throws = if local {
            self.all_throws_names(op)?
        } else {
            self.wire_throws_names(op)?
        };
        Ok(ServantMethod {
            head: format!("{} {}", sig.ret, op.name),
            params: sig.params_with(current),
            throws: throws_clause(&throws),
            call: format!("{}({})", op.name, sig.args_with(current_arg)),
            returns: op.returns.is_some(),
        })
    }

    pub(super) fn emit_operations(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let mut header = format!("public interface {}", self.own_name("_", "Operations"));
        let mut bases = Vec::new();
        for &base in &class.bases {
            if self.unit.is_abstract(base) {
                bases.push(self.java_name(base, "_", "Operations")?);
            }
        }
        if !bases.is_empty() {
            header.push_str(&format!(" extends {}", bases.join(", ")));
        }

        self.out.open(header);
        for index in 0..class.operations.len() {
            let op_ref = OpRef {
                class: self.id,
                index,
            };
            let m = self.servant_method(op_ref, class.is_local)?;
            self.out.blank();
            self.out
                .line(format!("{}({}){};", m.head, m.params, m.throws));
        }
        self.out.close();
        Ok(())
    }

    pub(super) fn emit_tie(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let name = self.def.name.clone();
        let tie = self.own_name("_", "Tie");
        let operations = self.own_name("_", "Operations");

        let header = match (class.is_interface, class.is_local) {
            (true, false) => format!("public class {tie} extends _{name}Disp implements Ice.TieBase"),
            (true, true) => format!("public class {tie} implements {name}, Ice.TieBase"),
            (false, _) => format!("public class {tie} extends {name} implements Ice.TieBase"),
        };
        self.out.open(header);
        self.out.open(format!("public {tie}()"));
        self.out.close();
        self.out.blank();
        self.out.open(format!("public {tie}({operations} delegate)"));
        self.out.line("_ice_delegate = delegate;");
        self.out.close();

        self.out.blank();
        self.out.open("public java.lang.Object ice_delegate()");
        self.out.line("return _ice_delegate;");
        self.out.close();
        self.out.blank();
        self.out.open("public void ice_delegate(java.lang.Object delegate)");
        self.out
            .line(format!("_ice_delegate = ({operations})delegate;"));
        self.out.close();

        self.out.blank();
        self.out.open("public boolean equals(java.lang.Object rhs)");
        self.out.line("if(this == rhs)");
        self.out.block();
        self.out.line("return true;");
        self.out.close();
        self.out.line(format!("if(!(rhs instanceof {tie}))"));
        self.out.block();
        self.out.line("return false;");
        self.out.close();
        self.out.blank();
        self.out.line(format!(
            "return _ice_delegate.equals((({tie})rhs)._ice_delegate);"
        ));
        self.out.close();
        self.out.blank();
        self.out.open("public int hashCode()");
        self.out.line("return _ice_delegate.hashCode();");
        self.out.close();

        for op_ref in self.unit.all_operations(self.id) {
            let m = self.servant_method(op_ref, class.is_local)?;
            let ret = if m.returns { "return " } else { "" };
            self.out.blank();
            self.out
                .open(format!("public {}({}){}", m.head, m.params, m.throws));
            self.out.line(format!("{ret}_ice_delegate.{};", m.call));
            self.out.close();
        }

        self.out.blank();
        self.out
            .line(format!("private {operations} _ice_delegate;"));
        self.out.close();
        Ok(())
    }
}
