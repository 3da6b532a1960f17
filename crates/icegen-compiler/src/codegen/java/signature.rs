//! Parameter lists, argument lists and throws clauses of operations.

use icegen_core::{OpRef, Operation, OperationMode};

use super::{Emitter, TypeMode};
use crate::Result;
use crate::analyze::{derived_first, wire_throws};

/// Java shape of an operation.
pub(super) struct Signature {
    /// Return type, `void` when there is none
    pub ret: String,
    /// `Type name` for every parameter, in declaration order
    pub params: Vec<String>,
    /// Parameter names, in declaration order
    pub args: Vec<String>,
}

impl Signature {
    /// Parameters with `extra` appended, comma separated.
    pub fn params_with(&self, extra: &str) -> String {
        join_with(&self.params, extra)
    }

    pub fn args_with(&self, extra: &str) -> String {
        join_with(&self.args, extra)
    }
}

/// Comma-separated `items`, followed by `extra` unless it is empty.
pub(super) fn join_with(items: &[String], extra: &str) -> String {
    let mut all: Vec<&str> = items.iter().map(String::as_str).collect();
    if !extra.is_empty() {
        all.push(extra);
    }
    all.join(", ")
}

/// ` throws A, B` or nothing.
pub(super) fn throws_clause(names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    format!(" throws {}", names.join(", "))
}

impl Emitter<'_> {
    pub(super) fn signature(&self, op: &Operation) -> Result<Signature> {
        let ret = match op.returns {
            Some(ty) => self.type_string(ty, TypeMode::Return, &[])?,
            None => "void".to_owned(),
        };
        let mut params = Vec::with_capacity(op.params.len());
        let mut args = Vec::with_capacity(op.params.len());
        for p in &op.params {
            let mode = if p.out { TypeMode::Out } else { TypeMode::In };
            params.push(format!("{} {}", self.type_string(p.ty, mode, &p.metadata)?, p.name));
            args.push(p.name.clone());
        }
        Ok(Signature { ret, params, args })
    }

    /// Declared exceptions that may cross the wire, most-derived first.
    pub(super) fn wire_throws_names(&self, op: &Operation) -> Result<Vec<String>> {
        wire_throws(self.unit, op)?
            .into_iter()
            .map(|id| self.java_name(id, "", ""))
            .collect()
    }

    /// Every declared exception, local ones included, most-derived first.
    pub(super) fn all_throws_names(&self, op: &Operation) -> Result<Vec<String>> {
        derived_first(self.unit, &op.throws)?
            .into_iter()
            .map(|id| self.java_name(id, "", ""))
            .collect()
    }

    /// Callback first, then the in-parameters: `AMI_X_op __cb, int a`.
    pub(super) fn async_params(&self, op_ref: OpRef, prefix: &str) -> Result<Vec<String>> {
        let op = self.operation(op_ref)?;
        let mut params = vec![format!("{} __cb", self.callback_name(op_ref, prefix)?)];
        for p in op.in_params() {
            params.push(format!(
                "{} {}",
                self.type_string(p.ty, TypeMode::In, &p.metadata)?,
                p.name
            ));
        }
        Ok(params)
    }

    /// Parameters of a success callback: `__ret` first, then the outputs.
    pub(super) fn response_params(&self, op: &Operation) -> Result<Vec<String>> {
        let mut params = Vec::new();
        if let Some(ty) = op.returns {
            params.push(format!("{} __ret", self.type_string(ty, TypeMode::In, &[])?));
        }
        for p in op.out_params() {
            params.push(format!(
                "{} {}",
                self.type_string(p.ty, TypeMode::In, &p.metadata)?,
                p.name
            ));
        }
        Ok(params)
    }
}

/// Whether a reply carries data, so a oneway invocation is not allowed.
pub(super) fn returns_data(op: &Operation) -> bool {
    op.returns.is_some() || op.params.iter().any(|p| p.out) || !op.throws.is_empty()
}

/// `Ice.OperationMode` constant of an operation.
pub(super) fn mode_constant(op: &Operation) -> &'static str {
    match op.mode {
        OperationMode::Normal => "Ice.OperationMode.Normal",
        OperationMode::Nonmutating => "Ice.OperationMode.Nonmutating",
        OperationMode::Idempotent => "Ice.OperationMode.Idempotent",
    }
}
