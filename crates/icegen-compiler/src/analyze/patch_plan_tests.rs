use icegen_core::{ClassDef, Definition, ExceptionDef, StructDef, Type, Unit};

use super::patch_plan::PatchPlan;

#[test]
fn struct_with_two_class_members_is_indexed() {
    let mut unit = Unit::new();
    let node = unit.add(Definition::new("::Demo::Node", ClassDef::class()));
    let pair = unit.add(Definition::new(
        "::Demo::Pair",
        StructDef::new()
            .member("first", Type::Class(node))
            .member("count", Type::INT)
            .member("second", Type::OBJECT),
    ));

    let plan = PatchPlan::for_struct(&unit, pair);
    assert!(plan.is_indexed());
    let first = plan.slot("first").unwrap();
    let second = plan.slot("second").unwrap();
    assert_eq!((first.index, first.type_id.as_str()), (0, "::Demo::Node"));
    assert_eq!((second.index, second.type_id.as_str()), (1, "::Ice::Object"));
    assert!(plan.slot("count").is_none());
}

#[test]
fn single_class_member_is_not_indexed() {
    let mut unit = Unit::new();
    let node = unit.add(Definition::new("::Demo::Node", ClassDef::class()));
    let holder = unit.add(Definition::new(
        "::Demo::Box",
        StructDef::new().member("item", Type::Class(node)),
    ));

    let plan = PatchPlan::for_struct(&unit, holder);
    assert!(!plan.is_indexed());
    assert_eq!(plan.slots().len(), 1);
}

#[test]
fn subclass_continues_base_numbering() {
    let mut unit = Unit::new();
    let node = unit.add(Definition::new("::Demo::Node", ClassDef::class()));
    let base = unit.add(Definition::new(
        "::Demo::Link",
        ClassDef::class().member("next", Type::Class(node)),
    ));
    let derived = unit.add(Definition::new(
        "::Demo::DoubleLink",
        ClassDef::class()
            .base(base)
            .member("label", Type::STRING)
            .member("prev", Type::Class(node)),
    ));

    let base_plan = PatchPlan::for_layer(&unit, base);
    assert!(!base_plan.is_indexed());
    assert_eq!(base_plan.slot("next").unwrap().index, 0);

    let derived_plan = PatchPlan::for_layer(&unit, derived);
    assert!(derived_plan.is_indexed());
    assert_eq!(derived_plan.slots().len(), 1);
    assert_eq!(derived_plan.slot("prev").unwrap().index, 1);
    assert!(derived_plan.slot("next").is_none());
}

#[test]
fn exception_layers_number_like_classes() {
    let mut unit = Unit::new();
    let node = unit.add(Definition::new("::Demo::Node", ClassDef::class()));
    let root = unit.add(Definition::new(
        "::Demo::Failure",
        ExceptionDef::new()
            .member("where", Type::Class(node))
            .member("what", Type::OBJECT),
    ));
    let leaf = unit.add(Definition::new(
        "::Demo::Crash",
        ExceptionDef::new().base(root).member("dump", Type::OBJECT),
    ));

    let plan = PatchPlan::for_layer(&unit, leaf);
    assert!(plan.is_indexed());
    assert_eq!(plan.slot("dump").unwrap().index, 2);
}

#[test]
fn no_class_members_no_slots() {
    let mut unit = Unit::new();
    let point = unit.add(Definition::new(
        "::Demo::Point",
        StructDef::new().member("x", Type::INT).member("y", Type::INT),
    ));
    assert!(PatchPlan::for_struct(&unit, point).is_empty());
}
