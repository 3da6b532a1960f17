//! Fixtures shared by the compiler tests.

use icegen_core::{
    ClassDef, DefId, Definition, DictionaryDef, EnumDef, ExceptionDef, Operation, OperationMode,
    SequenceDef, StructDef, Type, Unit,
};

use crate::codegen::java::{ArtifactKind, Config, Emitter};

/// Emit one artifact without the generated-file header.
pub fn emit(unit: &Unit, id: DefId, kind: ArtifactKind) -> String {
    emit_with(unit, &Config::new().header(false), id, kind)
}

pub fn emit_with(unit: &Unit, config: &Config, id: DefId, kind: ArtifactKind) -> String {
    Emitter::new(unit, config, id).unwrap().emit(kind).unwrap()
}

/// Assert that `expected` appears in `text` as consecutive lines.
///
/// Indentation and blank lines are ignored on both sides.
#[track_caller]
pub fn assert_has_lines(text: &str, expected: &str) {
    let have: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let want: Vec<&str> = expected
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert!(!want.is_empty());
    let found = have.windows(want.len()).any(|w| w == want.as_slice());
    assert!(found, "missing lines:\n{expected}\nin:\n{text}");
}

/// `::Demo` interfaces forming a diamond: `Base` <- `Left`, `Right` <- `Bottom`.
pub struct Diamond {
    pub unit: Unit,
    pub base: DefId,
    pub left: DefId,
    pub right: DefId,
    pub bottom: DefId,
}

pub fn diamond() -> Diamond {
    let mut unit = Unit::new();
    let base = unit.add(Definition::new(
        "::Demo::Base",
        ClassDef::interface().operation(Operation::new("describe").returns(Type::STRING)),
    ));
    let left = unit.add(Definition::new(
        "::Demo::Left",
        ClassDef::interface()
            .base(base)
            .operation(Operation::new("turnLeft").mode(OperationMode::Idempotent)),
    ));
    let right = unit.add(Definition::new(
        "::Demo::Right",
        ClassDef::interface()
            .base(base)
            .operation(Operation::new("turnRight")),
    ));
    let bottom = unit.add(Definition::new(
        "::Demo::Bottom",
        ClassDef::interface().base(left).base(right).operation(
            Operation::new("land")
                .param_in("speed", Type::INT)
                .param_out("report", Type::STRING),
        ),
    ));
    Diamond {
        unit,
        base,
        left,
        right,
        bottom,
    }
}

/// `::Err` exceptions: `Leaf` extends `Middle` extends `Root`, plus an
/// unrelated `Other` and a local `Quiet`.
pub struct Exceptions {
    pub unit: Unit,
    pub root: DefId,
    pub middle: DefId,
    pub leaf: DefId,
    pub other: DefId,
    pub quiet: DefId,
}

pub fn exceptions() -> Exceptions {
    let mut unit = Unit::new();
    let root = unit.add(Definition::new("::Err::Root", ExceptionDef::new()));
    let middle = unit.add(Definition::new("::Err::Middle", ExceptionDef::new().base(root)));
    let leaf = unit.add(Definition::new(
        "::Err::Leaf",
        ExceptionDef::new().base(middle).member("code", Type::INT),
    ));
    let other = unit.add(Definition::new("::Err::Other", ExceptionDef::new()));
    let quiet = unit.add(Definition::new("::Err::Quiet", ExceptionDef::new().local()));
    Exceptions {
        unit,
        root,
        middle,
        leaf,
        other,
        quiet,
    }
}

/// `::Demo` data types covering every marshal path.
pub struct Shapes {
    pub unit: Unit,
    pub color: DefId,
    pub point: DefId,
    pub ints: DefId,
    pub grid: DefId,
    pub node: DefId,
    pub tree: DefId,
    pub pair: DefId,
    pub registry: DefId,
    pub nodes: DefId,
    pub node_list: DefId,
}

pub fn shapes() -> Shapes {
    let mut unit = Unit::new();
    let color = unit.add(Definition::new(
        "::Demo::Color",
        EnumDef::new(["red", "green", "blue"]),
    ));
    let point = unit.add(Definition::new(
        "::Demo::Point",
        StructDef::new().member("x", Type::INT).member("y", Type::INT),
    ));
    let ints = unit.add(Definition::new("::Demo::Ints", SequenceDef::of(Type::INT)));
    let grid = unit.add(Definition::new(
        "::Demo::Grid",
        SequenceDef::of(Type::Sequence(ints)),
    ));
    let node = DefId(unit.definitions.len() as u32);
    unit.add(Definition::new(
        "::Demo::Node",
        ClassDef::class()
            .member("value", Type::INT)
            .member("next", Type::Class(node)),
    ));
    let tree = unit.add(Definition::new(
        "::Demo::Tree",
        ClassDef::class()
            .base(node)
            .member("child", Type::Class(node)),
    ));
    let pair = unit.add(Definition::new(
        "::Demo::Pair",
        StructDef::new()
            .member("left", Type::Class(node))
            .member("right", Type::Class(node)),
    ));
    let registry = unit.add(Definition::new(
        "::Demo::Registry",
        DictionaryDef::of(Type::STRING, Type::Class(node)),
    ));
    let nodes = unit.add(Definition::new("::Demo::Nodes", SequenceDef::of(Type::Class(node))));
    let node_list = unit.add(
        Definition::new("::Demo::NodeList", SequenceDef::of(Type::Class(node)))
            .with_metadata("java:type:java.util.ArrayList"),
    );
    Shapes {
        unit,
        color,
        point,
        ints,
        grid,
        node,
        tree,
        pair,
        registry,
        nodes,
        node_list,
    }
}

/// `::Demo::Clock` with one operation using every async variant.
pub struct Clock {
    pub unit: Unit,
    pub bad_zone: DefId,
    pub clock: DefId,
}

pub fn clock() -> Clock {
    let mut unit = Unit::new();
    let bad_zone = unit.add(Definition::new(
        "::Demo::BadZone",
        ExceptionDef::new().member("zone", Type::STRING),
    ));
    let clock = unit.add(Definition::new(
        "::Demo::Clock",
        ClassDef::interface().operation(
            Operation::new("now")
                .param_in("zone", Type::STRING)
                .param_out("offset", Type::INT)
                .returns(Type::LONG)
                .throws(bad_zone)
                .ami()
                .amd(),
        ),
    ));
    Clock {
        unit,
        bad_zone,
        clock,
    }
}
