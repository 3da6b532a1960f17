//! Runs the emitter over a unit: one pass per artifact kind and definition.

use icegen_core::utils::has_directive;
use icegen_core::{DefId, DefKind, Type, Unit};
use serde::Serialize;

use crate::codegen::java::{ArtifactKind, Config, Emitter, is_local_type};
use crate::{Result, model};

/// One generated Java compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Fully qualified class name, e.g. `demo.HelloPrx`
    pub class_name: String,
    pub kind: ArtifactKind,
    #[serde(skip)]
    pub source: String,
}

impl Artifact {
    /// Path relative to the output root: `demo/HelloPrx.java`.
    pub fn path(&self) -> String {
        format!("{}.java", self.class_name.replace('.', "/"))
    }
}

/// Artifact kinds generated for one definition, in emission order.
pub fn artifact_kinds(unit: &Unit, config: &Config, id: DefId) -> Result<Vec<ArtifactKind>> {
    let def = model::definition(unit, id)?;
    let kinds = match &def.kind {
        DefKind::Class(class) if class.is_local => {
            let mut kinds = vec![ArtifactKind::Binding];
            if unit.is_abstract(id) {
                kinds.push(ArtifactKind::Operations);
                if config.tie {
                    kinds.push(ArtifactKind::Tie);
                }
            }
            kinds.push(ArtifactKind::Holder);
            kinds
        }
        DefKind::Class(class) => {
            let mut kinds = vec![ArtifactKind::Binding];
            if unit.is_abstract(id) {
                kinds.push(ArtifactKind::Operations);
                if config.tie {
                    kinds.push(ArtifactKind::Tie);
                }
            }
            kinds.extend([
                ArtifactKind::Holder,
                ArtifactKind::ProxyHolder,
                ArtifactKind::ProxyHelper,
                ArtifactKind::Proxy,
                ArtifactKind::Delegate,
                ArtifactKind::DelegateM,
                ArtifactKind::DelegateD,
            ]);
            if class.is_interface {
                kinds.push(ArtifactKind::Dispatcher);
            }
            let ami = has_directive(&def.metadata, "ami");
            let amd = has_directive(&def.metadata, "amd");
            for (index, op) in class.operations.iter().enumerate() {
                if op.ami || ami {
                    kinds.push(ArtifactKind::AmiCallback(index));
                }
                if op.amd || amd {
                    kinds.push(ArtifactKind::AmdCallback(index));
                    kinds.push(ArtifactKind::AmdIncoming(index));
                }
            }
            kinds
        }
        DefKind::Exception(_) | DefKind::Const(_) => vec![ArtifactKind::Binding],
        DefKind::Struct(_) | DefKind::Enum(_) => {
            vec![ArtifactKind::Binding, ArtifactKind::Holder]
        }
        DefKind::Sequence(_) => collection_kinds(unit, Type::Sequence(id)),
        DefKind::Dictionary(_) => collection_kinds(unit, Type::Dictionary(id)),
    };
    Ok(kinds)
}

/// Collections of local types have no wire form, so no helper.
fn collection_kinds(unit: &Unit, ty: Type) -> Vec<ArtifactKind> {
    if is_local_type(unit, ty) {
        vec![ArtifactKind::Holder]
    } else {
        vec![ArtifactKind::Helper, ArtifactKind::Holder]
    }
}

/// Generate every artifact of every definition in `unit`.
///
/// The unit is checked first; any internal consistency failure aborts the
/// whole run rather than skipping the definition.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = unit.definitions.len()))]
pub fn generate(unit: &Unit, config: &Config) -> Result<Vec<Artifact>> {
    unit.check()?;

    let mut artifacts = Vec::new();
    for id in unit.ids() {
        for kind in artifact_kinds(unit, config, id)? {
            let emitter = Emitter::new(unit, config, id)?;
            let class_name = emitter.qualified_name(kind)?;
            let source = emitter.emit(kind)?;
            tracing::debug!(class = %class_name, ?kind, bytes = source.len(), "emitted");
            artifacts.push(Artifact {
                class_name,
                kind,
                source,
            });
        }
    }
    tracing::debug!(count = artifacts.len(), "generation finished");
    Ok(artifacts)
}
