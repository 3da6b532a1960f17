use icegen_core::{ClassDef, Definition, ExceptionDef, Operation, Unit};
use indoc::indoc;

use super::dump::{build_report, render};

fn unit() -> Unit {
    let mut unit = Unit::new();
    let root = unit.add(Definition::new("::Demo::Root", ExceptionDef::new()));
    let leaf = unit.add(Definition::new(
        "::Demo::Leaf",
        ExceptionDef::new().base(root),
    ));
    let base = unit.add(Definition::new(
        "::Demo::Base",
        ClassDef::interface().operation(Operation::new("hello")),
    ));
    unit.add(Definition::new(
        "::Demo::Derived",
        ClassDef::interface()
            .base(base)
            .operation(Operation::new("shout").throws(root).throws(leaf)),
    ));
    unit.add(Definition::new(
        "::Demo::Logger",
        ClassDef::interface()
            .local()
            .operation(Operation::new("print")),
    ));
    unit
}

#[test]
fn report_skips_local_types() {
    let report = build_report(&unit()).unwrap();
    let names: Vec<_> = report.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["::Demo::Base", "::Demo::Derived"]);
}

#[test]
fn report_resolves_inherited_operations() {
    let report = build_report(&unit()).unwrap();
    let derived = &report.types[1];

    assert_eq!(
        derived.type_ids,
        ["::Demo::Base", "::Demo::Derived", "::Ice::Object"]
    );
    assert_eq!(derived.own_position, 1);
    assert_eq!(derived.operations[0].name, "hello");
    assert_eq!(derived.operations[0].target, "inherited from ::Demo::Base");
    assert_eq!(derived.operations[5].name, "shout");
    assert_eq!(derived.operations[5].target, "own");
}

#[test]
fn catch_order_is_derived_first() {
    let report = build_report(&unit()).unwrap();
    let orders = &report.types[1].catch_orders;

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].operation, "shout");
    assert_eq!(orders[0].exceptions, ["::Demo::Leaf", "::Demo::Root"]);
    assert!(report.types[0].catch_orders.is_empty());
}

#[test]
fn render_text() {
    let report = build_report(&unit()).unwrap();

    assert_eq!(
        render(&report),
        indoc! {"
            ::Demo::Base
              type ids:
                0: ::Demo::Base *
                1: ::Ice::Object
              operations:
                0: hello (own)
                1: ice_id (builtin)
                2: ice_ids (builtin)
                3: ice_isA (builtin)
                4: ice_ping (builtin)

            ::Demo::Derived
              type ids:
                0: ::Demo::Base
                1: ::Demo::Derived *
                2: ::Ice::Object
              operations:
                0: hello (inherited from ::Demo::Base)
                1: ice_id (builtin)
                2: ice_ids (builtin)
                3: ice_isA (builtin)
                4: ice_ping (builtin)
                5: shout (own)
              catch shout: ::Demo::Leaf, ::Demo::Root
        "}
    );
}

#[test]
fn report_json_shape() {
    let report = build_report(&unit()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["types"][0]["name"], "::Demo::Base");
    assert_eq!(json["types"][1]["own_position"], 1);
    assert_eq!(
        json["types"][1]["catch_orders"][0]["exceptions"][0],
        "::Demo::Leaf"
    );
}
