//! Core emitter struct and artifact selection.

use icegen_core::{
    ClassDef, DefId, Definition, DictionaryDef, EnumDef, ExceptionDef, OpRef, Operation,
    SequenceDef, StructDef, Unit,
};
use serde::Serialize;

use super::naming::package_of;
use super::{Config, Output};
use crate::{Error, Result, model};

/// The kinds of compilation unit generated from one definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The type itself: interface, class, exception, struct, enum or const.
    Binding,
    /// `_XOperations`
    Operations,
    /// `_XTie`
    Tie,
    /// `XHolder`
    Holder,
    /// `XPrxHolder`
    ProxyHolder,
    /// `XPrxHelper`
    ProxyHelper,
    /// `XHelper` for sequences and dictionaries
    Helper,
    /// `XPrx`
    Proxy,
    /// `_XDel`
    Delegate,
    /// `_XDelM`
    DelegateM,
    /// `_XDelD`
    DelegateD,
    /// `_XDisp`
    Dispatcher,
    /// `AMI_X_op`, for the operation at this index of the class
    AmiCallback(usize),
    /// `AMD_X_op`
    AmdCallback(usize),
    /// `_AMD_X_op`
    AmdIncoming(usize),
}

/// Java emitter bound to one definition.
pub struct Emitter<'a> {
    pub(super) unit: &'a Unit,
    pub(super) config: &'a Config,
    pub(super) id: DefId,
    pub(super) def: &'a Definition,
    /// Package of `def`; names in it are written unqualified
    pub(super) package: String,
    pub(super) out: Output,
}

impl<'a> Emitter<'a> {
    pub fn new(unit: &'a Unit, config: &'a Config, id: DefId) -> Result<Self> {
        let def = model::definition(unit, id)?;
        Ok(Self {
            unit,
            config,
            id,
            def,
            package: package_of(config, def),
            out: Output::new(),
        })
    }

    /// Unqualified Java class name of an artifact.
    pub fn class_name(&self, kind: ArtifactKind) -> Result<String> {
        let name = &self.def.name;
        Ok(match kind {
            ArtifactKind::Binding => name.clone(),
            ArtifactKind::Operations => format!("_{name}Operations"),
            ArtifactKind::Tie => format!("_{name}Tie"),
            ArtifactKind::Holder => format!("{name}Holder"),
            ArtifactKind::ProxyHolder => format!("{name}PrxHolder"),
            ArtifactKind::ProxyHelper => format!("{name}PrxHelper"),
            ArtifactKind::Helper => format!("{name}Helper"),
            ArtifactKind::Proxy => format!("{name}Prx"),
            ArtifactKind::Delegate => format!("_{name}Del"),
            ArtifactKind::DelegateM => format!("_{name}DelM"),
            ArtifactKind::DelegateD => format!("_{name}DelD"),
            ArtifactKind::Dispatcher => format!("_{name}Disp"),
            ArtifactKind::AmiCallback(i) => format!("AMI_{name}_{}", self.own_operation(i)?.name),
            ArtifactKind::AmdCallback(i) => format!("AMD_{name}_{}", self.own_operation(i)?.name),
            ArtifactKind::AmdIncoming(i) => format!("_AMD_{name}_{}", self.own_operation(i)?.name),
        })
    }

    /// Dot-separated name including the package.
    pub fn qualified_name(&self, kind: ArtifactKind) -> Result<String> {
        let class = self.class_name(kind)?;
        if self.package.is_empty() {
            return Ok(class);
        }
        Ok(format!("{}.{class}", self.package))
    }

    /// Emit one artifact as a complete compilation unit.
    pub fn emit(mut self, kind: ArtifactKind) -> Result<String> {
        match kind {
            ArtifactKind::Binding => self.emit_binding()?,
            ArtifactKind::Operations => self.emit_operations()?,
            ArtifactKind::Tie => self.emit_tie()?,
            ArtifactKind::Holder => self.emit_holder()?,
            ArtifactKind::ProxyHolder => self.emit_proxy_holder()?,
            ArtifactKind::ProxyHelper => self.emit_proxy_helper()?,
            ArtifactKind::Helper => self.emit_helper()?,
            ArtifactKind::Proxy => self.emit_proxy()?,
            ArtifactKind::Delegate => self.emit_delegate()?,
            ArtifactKind::DelegateM => self.emit_delegate_m()?,
            ArtifactKind::DelegateD => self.emit_delegate_d()?,
            ArtifactKind::Dispatcher => self.emit_dispatcher()?,
            ArtifactKind::AmiCallback(i) => self.emit_ami_callback(i)?,
            ArtifactKind::AmdCallback(i) => self.emit_amd_callback(i)?,
            ArtifactKind::AmdIncoming(i) => self.emit_amd_incoming(i)?,
        }

        let mut text = String::new();
        if self.config.header {
            text.push_str(&format!(
                "// Generated by icegen from `{}`. Do not edit.\n\n",
                self.def.scoped()
            ));
        }
        if !self.package.is_empty() {
            text.push_str(&format!("package {};\n\n", self.package));
        }
        text.push_str(&self.out.finish());
        Ok(text)
    }

    /// The body emitted so far, without header or package line.
    #[cfg(test)]
    pub(crate) fn body(&self) -> &str {
        self.out.as_str()
    }

    pub(super) fn definition(&self, id: DefId) -> Result<&'a Definition> {
        model::definition(self.unit, id)
    }

    pub(super) fn class(&self, id: DefId) -> Result<&'a ClassDef> {
        model::class(self.unit, id)
    }

    pub(super) fn exception(&self, id: DefId) -> Result<&'a ExceptionDef> {
        model::exception(self.unit, id)
    }

    pub(super) fn struct_def(&self, id: DefId) -> Result<&'a StructDef> {
        model::struct_def(self.unit, id)
    }

    pub(super) fn enum_def(&self, id: DefId) -> Result<&'a EnumDef> {
        model::enum_def(self.unit, id)
    }

    pub(super) fn sequence(&self, id: DefId) -> Result<&'a SequenceDef> {
        model::sequence(self.unit, id)
    }

    pub(super) fn dictionary(&self, id: DefId) -> Result<&'a DictionaryDef> {
        model::dictionary(self.unit, id)
    }

    /// The class or interface this emitter is bound to.
    pub(super) fn this_class(&self) -> Result<&'a ClassDef> {
        self.class(self.id)
    }

    pub(super) fn own_operation(&self, index: usize) -> Result<&'a Operation> {
        self.operation(OpRef {
            class: self.id,
            index,
        })
    }

    pub(super) fn operation(&self, op: OpRef) -> Result<&'a Operation> {
        self.class(op.class)?;
        self.unit.operation(op).ok_or(Error::Dangling(op.class))
    }
}
