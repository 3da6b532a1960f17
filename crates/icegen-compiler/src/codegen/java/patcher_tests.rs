use icegen_core::{Definition, StructDef, Type};
use indoc::indoc;

use super::{ArtifactKind, Config, Emitter};
use crate::analyze::PatchPlan;
use crate::test_utils::{assert_has_lines, emit, shapes};

#[test]
fn single_slot_patcher() {
    let mut s = shapes();
    let boxed = s.unit.add(Definition::new(
        "::Demo::Box",
        StructDef::new().member("item", Type::Class(s.node)),
    ));
    let config = Config::new();
    let mut e = Emitter::new(&s.unit, &config, boxed).unwrap();
    e.emit_member_patcher(&PatchPlan::for_struct(&s.unit, boxed))
        .unwrap();

    assert_eq!(
        e.body(),
        indoc! {r#"
            private class Patcher implements IceInternal.Patcher
            {
                public void patch(Ice.Object v)
                {
                    try
                    {
                        item = (Node)v;
                    }
                    catch(ClassCastException ex)
                    {
                        Ice.UnexpectedObjectException _e = new Ice.UnexpectedObjectException();
                        _e.type = v.ice_id();
                        _e.expectedType = type();
                        throw _e;
                    }
                }

                public String type()
                {
                    return "::Demo::Node";
                }
            }
        "#}
    );
}

#[test]
fn untyped_slot_is_assigned_directly() {
    let mut s = shapes();
    let holder = s.unit.add(Definition::new(
        "::Demo::Any",
        StructDef::new().member("thing", Type::OBJECT),
    ));
    let text = emit(&s.unit, holder, ArtifactKind::Binding);

    assert_has_lines(
        &text,
        indoc! {r#"
            public void patch(Ice.Object v)
            {
                thing = v;
            }
            public String type()
            {
                return "::Ice::Object";
            }
        "#},
    );
}

#[test]
fn several_slots_switch_on_the_member_index() {
    let s = shapes();
    let text = emit(&s.unit, s.pair, ArtifactKind::Binding);

    assert_has_lines(
        &text,
        indoc! {r#"
            Patcher(int member)
            {
                __member = member;
                switch(__member)
                {
                    case 0:
                        __typeId = "::Demo::Node";
                        break;
                    case 1:
                        __typeId = "::Demo::Node";
                        break;
                }
            }
        "#},
    );
    assert_has_lines(
        &text,
        indoc! {"
            case 1:
            try
            {
                right = (Node)v;
            }
        "},
    );
    assert_has_lines(&text, "return __typeId;");
    assert_has_lines(&text, "__is.readObject(new Patcher(0));");
    assert_has_lines(&text, "__is.readObject(new Patcher(1));");
}

#[test]
fn subclass_slots_continue_the_base_numbering() {
    let s = shapes();

    let node = emit(&s.unit, s.node, ArtifactKind::Binding);
    assert_has_lines(&node, "__is.readObject(new Patcher());");
    assert!(!node.contains("Patcher(int member)"));

    let tree = emit(&s.unit, s.tree, ArtifactKind::Binding);
    assert_has_lines(&tree, "__is.readObject(new Patcher(1));");
    assert_has_lines(
        &tree,
        indoc! {r#"
            case 1:
            __typeId = "::Demo::Node";
            break;
        "#},
    );
    assert!(!tree.contains("case 0:"));
}

#[test]
fn no_class_members_no_patcher() {
    let s = shapes();
    let text = emit(&s.unit, s.point, ArtifactKind::Binding);
    assert!(!text.contains("Patcher"));
}
