//! Slice scoped names to Java names.
//!
//! A module path becomes a package (after the configured prefix); a name in
//! the package being emitted is written unqualified.

use icegen_core::{DefId, Definition, OpRef};

use super::{Config, Emitter};
use crate::Result;

pub(super) fn package_of(config: &Config, def: &Definition) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(def.module.len() + 1);
    if let Some(prefix) = &config.package_prefix {
        parts.push(prefix);
    }
    parts.extend(def.module.iter().map(String::as_str));
    parts.join(".")
}

impl Emitter<'_> {
    /// `prefix + name + suffix` for `id`, qualified unless it lives in the
    /// current package.
    pub(super) fn java_name(&self, id: DefId, prefix: &str, suffix: &str) -> Result<String> {
        let def = self.definition(id)?;
        let local = format!("{prefix}{}{suffix}", def.name);
        let package = package_of(self.config, def);
        if package.is_empty() || package == self.package {
            return Ok(local);
        }
        Ok(format!("{package}.{local}"))
    }

    /// Per-operation callback class, e.g. `AMI_Hello_sayHello`, named after
    /// the declaring class.
    pub(super) fn callback_name(&self, op: OpRef, prefix: &str) -> Result<String> {
        let name = &self.operation(op)?.name;
        self.java_name(op.class, prefix, &format!("_{name}"))
    }

    /// Name of a sibling artifact of the current definition.
    pub(super) fn own_name(&self, prefix: &str, suffix: &str) -> String {
        format!("{prefix}{}{suffix}", self.def.name)
    }
}
