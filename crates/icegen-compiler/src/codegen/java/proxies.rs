//! Client-side invocation paths: the proxy interface, its helper, and the
//! marshaled and collocated delegates behind it.
//!
//! The helper's context-taking overload owns the retry loop. Delegates
//! report a transport failure as `IceInternal.NonRepeatable` once the
//! request may have reached the server; the loop retries those only for
//! idempotent and nonmutating operations.

use icegen_core::utils::has_directive;
use icegen_core::{OpRef, Operation};

use super::signature::{join_with, mode_constant, returns_data, throws_clause};
use super::{Emitter, IterCounter, TypeMode};
use crate::Result;

impl Emitter<'_> {
    /// `XPrx`: both overloads of every own operation, plus the AMI entry
    /// points where requested.
    pub(super) fn emit_proxy(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let mut bases = Vec::with_capacity(class.bases.len());
        for &base in &class.bases {
            bases.push(self.java_name(base, "", "Prx")?);
        }
        if bases.is_empty() {
            bases.push("Ice.ObjectPrx".to_owned());
        }
        self.out.open(format!(
            "public interface {} extends {}",
            self.own_name("", "Prx"),
            bases.join(", ")
        ));
        for index in 0..class.operations.len() {
            let op_ref = OpRef {
                class: self.id,
                index,
            };
            let op = self.operation(op_ref)?;
            let sig = self.signature(op)?;
            let throws = throws_clause(&self.wire_throws_names(op)?);
            self.out.blank();
            self.out.line(format!(
                "public {} {}({}){throws};",
                sig.ret,
                op.name,
                sig.params_with("")
            ));
            self.out.line(format!(
                "public {} {}({}){throws};",
                sig.ret,
                op.name,
                sig.params_with("java.util.Map __ctx")
            ));
            if self.uses_ami(op_ref)? {
                let params = self.async_params(op_ref, "AMI_")?;
                self.out.blank();
                self.out.line(format!(
                    "public void {}_async({});",
                    op.name,
                    join_with(&params, "")
                ));
                self.out.line(format!(
                    "public void {}_async({});",
                    op.name,
                    join_with(&params, "java.util.Map __ctx")
                ));
            }
        }
        self.out.close();
        Ok(())
    }

    /// Whether the operation gets the callback-based client variant, by its
    /// own flag or an `ami` directive on the declaring type.
    pub(super) fn uses_ami(&self, op_ref: OpRef) -> Result<bool> {
        let op = self.operation(op_ref)?;
        let declaring = self.definition(op_ref.class)?;
        Ok(op.ami || has_directive(&declaring.metadata, "ami"))
    }

    /// Same for the deferred-response server variant and `amd`.
    pub(super) fn uses_amd(&self, op_ref: OpRef) -> Result<bool> {
        let op = self.operation(op_ref)?;
        let declaring = self.definition(op_ref.class)?;
        Ok(op.amd || has_directive(&declaring.metadata, "amd"))
    }

    /// `XPrxHelper`: implements every reachable operation and provides the
    /// casts and the proxy marshal helpers.
    pub(super) fn emit_proxy_helper(&mut self) -> Result<()> {
        self.this_class()?;
        let prx = self.own_name("", "Prx");
        let helper = self.own_name("", "PrxHelper");
        self.out.open(format!(
            "public final class {helper} extends Ice.ObjectPrxHelperBase implements {prx}"
        ));

        for op_ref in self.unit.all_operations(self.id) {
            self.emit_proxy_operation(op_ref)?;
        }

        self.emit_casts(&prx, &helper);

        self.out.blank();
        self.out.open("protected Ice._ObjectDelM __createDelegateM()");
        self.out
            .line(format!("return new {}();", self.own_name("_", "DelM")));
        self.out.close();
        self.out.blank();
        self.out.open("protected Ice._ObjectDelD __createDelegateD()");
        self.out
            .line(format!("return new {}();", self.own_name("_", "DelD")));
        self.out.close();

        self.out.blank();
        self.out.open(format!(
            "public static void __write(IceInternal.BasicStream __os, {prx} v)"
        ));
        self.out.line("__os.writeProxy(v);");
        self.out.close();
        self.out.blank();
        self.out.open(format!(
            "public static {prx} __read(IceInternal.BasicStream __is)"
        ));
        self.out.line("Ice.ObjectPrx proxy = __is.readProxy();");
        self.out.line("if(proxy != null)");
        self.out.block();
        self.out.line(format!("{helper} result = new {helper}();"));
        self.out.line("result.__copyFrom(proxy);");
        self.out.line("return result;");
        self.out.close();
        self.out.line("return null;");
        self.out.close();

        self.out.close();
        Ok(())
    }

    fn emit_proxy_operation(&mut self, op_ref: OpRef) -> Result<()> {
        let op = self.operation(op_ref)?;
        let sig = self.signature(op)?;
        let throws = throws_clause(&self.wire_throws_names(op)?);
        let ret = if op.returns.is_some() { "return " } else { "" };
        let delegate = self.java_name(op_ref.class, "_", "Del")?;

        self.out.blank();
        self.out.open(format!(
            "public {} {}({}){throws}",
            sig.ret,
            op.name,
            sig.params_with("")
        ));
        self.out.line(format!(
            "{ret}{}({});",
            op.name,
            sig.args_with("__defaultContext()")
        ));
        self.out.close();

        self.out.blank();
        self.out.open(format!(
            "public {} {}({}){throws}",
            sig.ret,
            op.name,
            sig.params_with("java.util.Map __ctx")
        ));
        self.out.line("int __cnt = 0;");
        self.out.line("while(true)");
        self.out.block();
        self.out.line("try");
        self.out.block();
        if returns_data(op) {
            self.out
                .line(format!("__checkTwowayOnly(\"{}\");", op.name));
        }
        self.out.line("Ice._ObjectDel __delBase = __getDelegate();");
        self.out
            .line(format!("{delegate} __del = ({delegate})__delBase;"));
        self.out.line(format!(
            "{ret}__del.{}({});",
            op.name,
            sig.args_with("__ctx")
        ));
        if op.returns.is_none() {
            self.out.line("return;");
        }
        self.out.close();
        self.out.line("catch(IceInternal.NonRepeatable __ex)");
        self.out.block();
        if op.mode.is_retry_safe() {
            self.out
                .line("__cnt = __handleException(__ex.get(), __cnt);");
        } else {
            self.out.line("__rethrowException(__ex.get());");
        }
        self.out.close();
        self.out.line("catch(Ice.LocalException __ex)");
        self.out.block();
        self.out.line("__cnt = __handleException(__ex, __cnt);");
        self.out.close();
        self.out.close();
        self.out.close();

        if self.uses_ami(op_ref)? {
            let params = self.async_params(op_ref, "AMI_")?;
            let mut args = Vec::new();
            for p in op.in_params() {
                args.push(p.name.clone());
            }
            let mut forward = vec!["__cb".to_owned()];
            forward.extend(args.iter().cloned());

            self.out.blank();
            self.out.open(format!(
                "public void {}_async({})",
                op.name,
                join_with(&params, "")
            ));
            self.out.line(format!(
                "{}_async({});",
                op.name,
                join_with(&forward, "__defaultContext()")
            ));
            self.out.close();

            let mut invoke = vec!["this".to_owned()];
            invoke.extend(args);
            self.out.blank();
            self.out.open(format!(
                "public void {}_async({})",
                op.name,
                join_with(&params, "java.util.Map __ctx")
            ));
            self.out
                .line(format!("__checkTwowayOnly(\"{}\");", op.name));
            self.out.line(format!(
                "__cb.__invoke({});",
                join_with(&invoke, "__ctx")
            ));
            self.out.close();
        }
        Ok(())
    }

    fn emit_casts(&mut self, prx: &str, helper: &str) {
        let scoped = self.def.scoped();

        self.out.blank();
        self.out
            .open(format!("public static {prx} checkedCast(Ice.ObjectPrx b)"));
        self.out.line(format!("{prx} d = null;"));
        self.out.line("if(b != null)");
        self.out.block();
        self.out.line("try");
        self.out.block();
        self.out.line(format!("d = ({prx})b;"));
        self.out.close();
        self.out.line("catch(ClassCastException ex)");
        self.out.block();
        self.out.line(format!("if(b.ice_isA(\"{scoped}\"))"));
        self.out.block();
        self.emit_copy_into(helper, "b");
        self.out.close();
        self.out.close();
        self.out.close();
        self.out.line("return d;");
        self.out.close();

        self.out.blank();
        self.out.open(format!(
            "public static {prx} checkedCast(Ice.ObjectPrx b, String f)"
        ));
        self.out.line(format!("{prx} d = null;"));
        self.out.line("if(b != null)");
        self.out.block();
        self.out.line("Ice.ObjectPrx bb = b.ice_newFacet(f);");
        self.out.line("try");
        self.out.block();
        self.out.line(format!("if(bb.ice_isA(\"{scoped}\"))"));
        self.out.block();
        self.emit_copy_into(helper, "bb");
        self.out.close();
        self.out.close();
        self.out.line("catch(Ice.FacetNotExistException ex)");
        self.out.block();
        self.out.close();
        self.out.close();
        self.out.line("return d;");
        self.out.close();

        self.out.blank();
        self.out
            .open(format!("public static {prx} uncheckedCast(Ice.ObjectPrx b)"));
        self.out.line(format!("{prx} d = null;"));
        self.out.line("if(b != null)");
        self.out.block();
        self.emit_copy_into(helper, "b");
        self.out.close();
        self.out.line("return d;");
        self.out.close();

        self.out.blank();
        self.out.open(format!(
            "public static {prx} uncheckedCast(Ice.ObjectPrx b, String f)"
        ));
        self.out.line(format!("{prx} d = null;"));
        self.out.line("if(b != null)");
        self.out.block();
        self.out.line("Ice.ObjectPrx bb = b.ice_newFacet(f);");
        self.emit_copy_into(helper, "bb");
        self.out.close();
        self.out.line("return d;");
        self.out.close();
    }

    fn emit_copy_into(&mut self, helper: &str, source: &str) {
        self.out.line(format!("{helper} h = new {helper}();"));
        self.out.line(format!("h.__copyFrom({source});"));
        self.out.line("d = h;");
    }

    /// `_XDel`: the operations a delegate must provide, own ones only.
    pub(super) fn emit_delegate(&mut self) -> Result<()> {
        let class = self.this_class()?;
        let mut bases = Vec::with_capacity(class.bases.len());
        for &base in &class.bases {
            bases.push(self.java_name(base, "_", "Del")?);
        }
        if bases.is_empty() {
            bases.push("Ice._ObjectDel".to_owned());
        }
        self.out.open(format!(
            "public interface {} extends {}",
            self.own_name("_", "Del"),
            bases.join(", ")
        ));
        for op in &class.operations {
            let sig = self.signature(op)?;
            let throws = self.delegate_throws(op)?;
            self.out.blank();
            self.out.line(format!(
                "{} {}({})",
                sig.ret,
                op.name,
                sig.params_with("java.util.Map __ctx")
            ));
            self.out.indent();
            self.out.line(format!("{throws};"));
            self.out.dedent();
        }
        self.out.close();
        Ok(())
    }

    /// `throws IceInternal.NonRepeatable` followed by the wire exceptions.
    fn delegate_throws(&self, op: &Operation) -> Result<String> {
        let mut names = vec!["IceInternal.NonRepeatable".to_owned()];
        names.extend(self.wire_throws_names(op)?);
        Ok(format!("throws {}", names.join(", ")))
    }

    /// `_XDelM`: marshals the request, waits for the reply and decodes it.
    pub(super) fn emit_delegate_m(&mut self) -> Result<()> {
        self.this_class()?;
        self.out.open(format!(
            "public final class {} extends Ice._ObjectDelM implements {}",
            self.own_name("_", "DelM"),
            self.own_name("_", "Del")
        ));
        for op_ref in self.unit.all_operations(self.id) {
            self.emit_marshaled_call(op_ref)?;
        }
        self.out.close();
        Ok(())
    }

    fn emit_marshaled_call(&mut self, op_ref: OpRef) -> Result<()> {
        let op = self.operation(op_ref)?;
        let sig = self.signature(op)?;
        let throws = self.wire_throws_names(op)?;
        let mut iter = IterCounter::new();

        self.out.blank();
        self.out.line(format!(
            "public {} {}({})",
            sig.ret,
            op.name,
            sig.params_with("java.util.Map __ctx")
        ));
        self.out.indent();
        self.out.line(self.delegate_throws(op)?);
        self.out.dedent();
        self.out.block();
        self.out.line(format!(
            "IceInternal.Outgoing __out = getOutgoing(\"{}\", {}, __ctx);",
            op.name,
            mode_constant(op)
        ));
        self.out.line("try");
        self.out.block();
        if op.in_params().next().is_some() {
            self.out.line("IceInternal.BasicStream __os = __out.os();");
        }
        for p in op.in_params() {
            self.write_marshal(p.ty, &p.name, &p.metadata, &mut iter)?;
        }
        if self.unit.sends_classes(op) {
            self.out.line("__os.writePendingObjects();");
        }
        self.out.line("boolean __ok = __out.invoke();");
        self.out.line("try");
        self.out.block();
        self.out.line("IceInternal.BasicStream __is = __out.is();");
        self.out.line("if(!__ok)");
        self.out.block();
        self.emit_user_exception_rethrow(&throws);
        self.out.close();

        for p in op.out_params() {
            if p.ty.is_class_like() {
                self.require_remote(p.ty)?;
                self.out
                    .line(format!("__is.readObject({}.getPatcher());", p.name));
            } else {
                let value = format!("{}.value", p.name);
                self.read_marshal(p.ty, &value, &p.metadata, &mut iter, None)?;
            }
        }
        if let Some(ty) = op.returns {
            if ty.is_class_like() {
                self.require_remote(ty)?;
                let holder = self.type_string(ty, TypeMode::Out, &[])?;
                self.out
                    .line(format!("{holder} __ret = new {holder}();"));
                self.out.line("__is.readObject(__ret.getPatcher());");
            } else {
                self.out.line(format!("{} __ret;", sig.ret));
                self.read_marshal(ty, "__ret", &[], &mut iter, None)?;
            }
        }
        if self.unit.returns_classes(op) {
            self.out.line("__is.readPendingObjects();");
        }
        match op.returns {
            Some(ty) if ty.is_class_like() => self.out.line("return __ret.value;"),
            Some(_) => self.out.line("return __ret;"),
            None => {}
        }
        self.out.close();
        self.out.line("catch(Ice.LocalException __ex)");
        self.out.block();
        self.out
            .line("throw new IceInternal.NonRepeatable(__ex);");
        self.out.close();
        self.out.close();
        self.out.line("finally");
        self.out.block();
        self.out.line("reclaimOutgoing(__out);");
        self.out.close();
        self.out.close();
        Ok(())
    }

    /// Rethrow the declared exception carried by a failed reply. Anything
    /// else becomes `Ice.UnknownUserException`.
    pub(super) fn emit_user_exception_rethrow(&mut self, throws: &[String]) {
        self.out.line("try");
        self.out.block();
        self.out.line("__is.throwException();");
        self.out.close();
        for ex in throws {
            self.out.line(format!("catch({ex} __ex)"));
            self.out.block();
            self.out.line("throw __ex;");
            self.out.close();
        }
        self.out.line("catch(Ice.UserException __ex)");
        self.out.block();
        self.out.line("throw new Ice.UnknownUserException();");
        self.out.close();
    }

    /// `_XDelD`: calls the servant in-process, without marshaling.
    pub(super) fn emit_delegate_d(&mut self) -> Result<()> {
        self.this_class()?;
        self.out.open(format!(
            "public final class {} extends Ice._ObjectDelD implements {}",
            self.own_name("_", "DelD"),
            self.own_name("_", "Del")
        ));
        for op_ref in self.unit.all_operations(self.id) {
            self.emit_direct_call(op_ref)?;
        }
        self.out.close();
        Ok(())
    }

    fn emit_direct_call(&mut self, op_ref: OpRef) -> Result<()> {
        let op = self.operation(op_ref)?;
        let sig = self.signature(op)?;
        let servant = self.def.name.clone();

        self.out.blank();
        self.out.line(format!(
            "public {} {}({})",
            sig.ret,
            op.name,
            sig.params_with("java.util.Map __ctx")
        ));
        self.out.indent();
        self.out.line(self.delegate_throws(op)?);
        self.out.dedent();
        self.out.block();

        if self.uses_amd(op_ref)? {
            self.out
                .line("throw new Ice.CollocationOptimizationException();");
            self.out.close();
            return Ok(());
        }

        self.out.line("Ice.Current __current = new Ice.Current();");
        self.out.line(format!(
            "__initCurrent(__current, \"{}\", {}, __ctx);",
            op.name,
            mode_constant(op)
        ));
        self.out.line("while(true)");
        self.out.block();
        self.out
            .line("IceInternal.Direct __direct = new IceInternal.Direct(__current);");
        self.out.line("try");
        self.out.block();
        self.out.line(format!("{servant} __servant = null;"));
        self.out.line("try");
        self.out.block();
        self.out
            .line(format!("__servant = ({servant})__direct.servant();"));
        self.out.close();
        self.out.line("catch(ClassCastException __ex)");
        self.out.block();
        self.out.line(
            "Ice.OperationNotExistException __opEx = new Ice.OperationNotExistException();",
        );
        self.out.line("__opEx.id = __current.id;");
        self.out.line("__opEx.facet = __current.facet;");
        self.out.line("__opEx.operation = __current.operation;");
        self.out.line("throw __opEx;");
        self.out.close();
        self.out.line("try");
        self.out.block();
        let ret = if op.returns.is_some() { "return " } else { "" };
        self.out.line(format!(
            "{ret}__servant.{}({});",
            op.name,
            sig.args_with("__current")
        ));
        if op.returns.is_none() {
            self.out.line("return;");
        }
        self.out.close();
        self.out.line("catch(Ice.LocalException __ex)");
        self.out.block();
        self.out
            .line("throw new IceInternal.NonRepeatable(__ex);");
        self.out.close();
        self.out.close();
        self.out.line("finally");
        self.out.block();
        self.out.line("__direct.destroy();");
        self.out.close();
        self.out.close();
        self.out.close();
        Ok(())
    }
}
