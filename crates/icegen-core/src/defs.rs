//! Definitions: the named entities of a Slice unit.

use serde::{Deserialize, Serialize};

use crate::types::{DefId, Type};

/// A named definition with its module path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Enclosing module path, outermost first.
    pub module: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub metadata: Vec<String>,
    #[serde(flatten)]
    pub kind: DefKind,
}

impl Definition {
    /// Build a definition from a scoped name such as `::Demo::Hello`.
    pub fn new(scoped: &str, kind: impl Into<DefKind>) -> Self {
        let mut parts: Vec<String> = scoped
            .split("::")
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();
        let name = parts.pop().unwrap_or_default();
        Self {
            module: parts,
            name,
            metadata: Vec::new(),
            kind: kind.into(),
        }
    }

    pub fn with_metadata(mut self, directive: &str) -> Self {
        self.metadata.push(directive.to_owned());
        self
    }

    /// `::`-joined scoped id, always starting with `::`.
    pub fn scoped(&self) -> String {
        let mut out = String::new();
        for m in &self.module {
            out.push_str("::");
            out.push_str(m);
        }
        out.push_str("::");
        out.push_str(&self.name);
        out
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DefKind {
    Class(ClassDef),
    Exception(ExceptionDef),
    Struct(StructDef),
    Enum(EnumDef),
    Sequence(SequenceDef),
    Dictionary(DictionaryDef),
    Const(ConstDef),
}

impl DefKind {
    pub fn name(&self) -> &'static str {
        match self {
            DefKind::Class(c) if c.is_interface => "interface",
            DefKind::Class(_) => "class",
            DefKind::Exception(_) => "exception",
            DefKind::Struct(_) => "struct",
            DefKind::Enum(_) => "enum",
            DefKind::Sequence(_) => "sequence",
            DefKind::Dictionary(_) => "dictionary",
            DefKind::Const(_) => "const",
        }
    }
}

macro_rules! into_def_kind {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for DefKind {
            fn from(value: $ty) -> Self {
                DefKind::$variant(value)
            }
        })*
    };
}

into_def_kind! {
    ClassDef => Class,
    ExceptionDef => Exception,
    StructDef => Struct,
    EnumDef => Enum,
    SequenceDef => Sequence,
    DictionaryDef => Dictionary,
    ConstDef => Const,
}

/// A class or interface.
///
/// At most one base may be a non-interface class, and it is listed first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub bases: Vec<DefId>,
    #[serde(default)]
    pub members: Vec<DataMember>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl ClassDef {
    pub fn interface() -> Self {
        Self {
            is_interface: true,
            is_abstract: true,
            ..Self::default()
        }
    }

    pub fn class() -> Self {
        Self::default()
    }

    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }

    pub fn base(mut self, id: DefId) -> Self {
        self.bases.push(id);
        self
    }

    pub fn member(mut self, name: &str, ty: Type) -> Self {
        self.members.push(DataMember::new(name, ty));
        self
    }

    /// Add an operation. A class with operations is abstract.
    pub fn operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self.is_abstract = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionDef {
    #[serde(default)]
    pub base: Option<DefId>,
    #[serde(default)]
    pub members: Vec<DataMember>,
    #[serde(default)]
    pub is_local: bool,
}

impl ExceptionDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, id: DefId) -> Self {
        self.base = Some(id);
        self
    }

    pub fn member(mut self, name: &str, ty: Type) -> Self {
        self.members.push(DataMember::new(name, ty));
        self
    }

    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    #[serde(default)]
    pub members: Vec<DataMember>,
    #[serde(default)]
    pub is_local: bool,
}

impl StructDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: &str, ty: Type) -> Self {
        self.members.push(DataMember::new(name, ty));
        self
    }

    pub fn member_with(mut self, member: DataMember) -> Self {
        self.members.push(member);
        self
    }
}

/// Enumerators in wire order: position is the ordinal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub enumerators: Vec<String>,
}

impl EnumDef {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enumerators: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceDef {
    pub element: Type,
}

impl SequenceDef {
    pub fn of(element: Type) -> Self {
        Self { element }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DictionaryDef {
    pub key: Type,
    pub value: Type,
}

impl DictionaryDef {
    pub fn of(key: Type, value: Type) -> Self {
        Self { key, value }
    }
}

/// A constant. `value` is the literal as written in Slice; for enum-typed
/// constants it is the enumerator name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstDef {
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: String,
}

impl ConstDef {
    pub fn new(ty: Type, value: &str) -> Self {
        Self {
            ty,
            value: value.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub metadata: Vec<String>,
}

impl DataMember {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            metadata: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, directive: &str) -> Self {
        self.metadata.push(directive.to_owned());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    #[default]
    Normal,
    Nonmutating,
    Idempotent,
}

impl OperationMode {
    /// Whether a transport failure may be retried transparently.
    pub fn is_retry_safe(self) -> bool {
        matches!(self, OperationMode::Nonmutating | OperationMode::Idempotent)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub out: bool,
    #[serde(default)]
    pub metadata: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub mode: OperationMode,
    /// In-parameters precede out-parameters.
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub returns: Option<Type>,
    #[serde(default)]
    pub throws: Vec<DefId>,
    #[serde(default)]
    pub ami: bool,
    #[serde(default)]
    pub amd: bool,
}

impl Operation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            mode: OperationMode::Normal,
            params: Vec::new(),
            returns: None,
            throws: Vec::new(),
            ami: false,
            amd: false,
        }
    }

    pub fn mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn param_in(mut self, name: &str, ty: Type) -> Self {
        self.params.push(Param {
            name: name.to_owned(),
            ty,
            out: false,
            metadata: Vec::new(),
        });
        self
    }

    pub fn param_out(mut self, name: &str, ty: Type) -> Self {
        self.params.push(Param {
            name: name.to_owned(),
            ty,
            out: true,
            metadata: Vec::new(),
        });
        self
    }

    pub fn returns(mut self, ty: Type) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn throws(mut self, id: DefId) -> Self {
        self.throws.push(id);
        self
    }

    pub fn ami(mut self) -> Self {
        self.ami = true;
        self
    }

    pub fn amd(mut self) -> Self {
        self.amd = true;
        self
    }

    pub fn in_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| !p.out)
    }

    pub fn out_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.out)
    }
}
