//! Referential consistency checks for a loaded unit.

use std::collections::HashSet;

use crate::defs::DefKind;
use crate::types::{DefId, Type};
use crate::unit::Unit;

/// A unit that a backend cannot safely consume.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{from}: reference to undefined definition #{id}")]
    Dangling { from: String, id: u32 },

    #[error("{from}: `{target}` is a {found}, expected {expected}")]
    WrongKind {
        from: String,
        target: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{class}: only the first base may be a class, and only one")]
    MisplacedClassBase { class: String },

    #[error("{class}: an interface cannot derive from class `{base}`")]
    InterfaceExtendsClass { class: String, base: String },

    #[error("{from}: inheritance cycle")]
    InheritanceCycle { from: String },

    #[error("{exception}: non-local exception derives from local `{base}`")]
    LocalBase { exception: String, base: String },

    #[error("{name}: enum has no enumerators")]
    EmptyEnum { name: String },
}

impl Unit {
    /// Verify every reference and the structural rules backends rely on.
    pub fn check(&self) -> Result<(), ModelError> {
        for id in self.ids() {
            self.check_definition(id)?;
        }
        Ok(())
    }

    fn check_definition(&self, id: DefId) -> Result<(), ModelError> {
        let Some(def) = self.get(id) else {
            return Ok(());
        };
        let from = def.scoped();

        match &def.kind {
            DefKind::Class(class) => {
                for (pos, &base) in class.bases.iter().enumerate() {
                    let base_class = self.expect_kind(&from, base, "class or interface")?;
                    let DefKind::Class(b) = base_class else {
                        continue;
                    };
                    if !b.is_interface {
                        if class.is_interface {
                            return Err(ModelError::InterfaceExtendsClass {
                                class: from,
                                base: self.scoped(base),
                            });
                        }
                        if pos != 0 {
                            return Err(ModelError::MisplacedClassBase { class: from });
                        }
                    }
                }
                self.check_acyclic_class(id, &from)?;
                for member in &class.members {
                    self.check_type(&from, member.ty)?;
                }
                for op in &class.operations {
                    let op_from = format!("{from}::{}", op.name);
                    for param in &op.params {
                        self.check_type(&op_from, param.ty)?;
                    }
                    if let Some(ret) = op.returns {
                        self.check_type(&op_from, ret)?;
                    }
                    for &ex in &op.throws {
                        self.expect_kind(&op_from, ex, "exception")?;
                    }
                }
            }
            DefKind::Exception(ex) => {
                let mut visited = HashSet::from([id]);
                let mut cursor = ex.base;
                let mut direct = true;
                while let Some(base) = cursor {
                    let DefKind::Exception(b) = self.expect_kind(&from, base, "exception")? else {
                        break;
                    };
                    if direct && b.is_local && !ex.is_local {
                        return Err(ModelError::LocalBase {
                            exception: from,
                            base: self.scoped(base),
                        });
                    }
                    if !visited.insert(base) {
                        return Err(ModelError::InheritanceCycle { from });
                    }
                    direct = false;
                    cursor = b.base;
                }
                for member in &ex.members {
                    self.check_type(&from, member.ty)?;
                }
            }
            DefKind::Struct(s) => {
                for member in &s.members {
                    self.check_type(&from, member.ty)?;
                }
            }
            DefKind::Enum(e) => {
                if e.enumerators.is_empty() {
                    return Err(ModelError::EmptyEnum { name: from });
                }
            }
            DefKind::Sequence(s) => self.check_type(&from, s.element)?,
            DefKind::Dictionary(d) => {
                self.check_type(&from, d.key)?;
                self.check_type(&from, d.value)?;
            }
            DefKind::Const(c) => self.check_type(&from, c.ty)?,
        }
        Ok(())
    }

    fn check_acyclic_class(&self, id: DefId, from: &str) -> Result<(), ModelError> {
        fn walk(
            unit: &Unit,
            id: DefId,
            path: &mut Vec<DefId>,
            from: &str,
        ) -> Result<(), ModelError> {
            if path.contains(&id) {
                return Err(ModelError::InheritanceCycle {
                    from: from.to_owned(),
                });
            }
            path.push(id);
            if let Some(class) = unit.class(id) {
                for &base in &class.bases {
                    walk(unit, base, path, from)?;
                }
            }
            path.pop();
            Ok(())
        }
        walk(self, id, &mut Vec::new(), from)
    }

    fn check_type(&self, from: &str, ty: Type) -> Result<(), ModelError> {
        let expected = match ty {
            Type::Builtin(_) => return Ok(()),
            Type::Proxy(_) | Type::Class(_) => "class or interface",
            Type::Struct(_) => "struct",
            Type::Sequence(_) => "sequence",
            Type::Dictionary(_) => "dictionary",
            Type::Enum(_) => "enum",
        };
        let Some(id) = ty.def_id() else {
            return Ok(());
        };
        self.expect_kind(from, id, expected).map(|_| ())
    }

    fn expect_kind(
        &self,
        from: &str,
        id: DefId,
        expected: &'static str,
    ) -> Result<&DefKind, ModelError> {
        let def = self.get(id).ok_or_else(|| ModelError::Dangling {
            from: from.to_owned(),
            id: id.0,
        })?;
        let matches = match &def.kind {
            DefKind::Class(_) => expected == "class or interface",
            other => other.name() == expected,
        };
        if !matches {
            return Err(ModelError::WrongKind {
                from: from.to_owned(),
                target: def.scoped(),
                expected,
                found: def.kind_name(),
            });
        }
        Ok(&def.kind)
    }
}
