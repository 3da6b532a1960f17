use icegen_core::{ClassDef, DefId, Definition, ExceptionDef, Operation, Type, Unit};
use indoc::indoc;

use super::ArtifactKind;
use crate::test_utils::{assert_has_lines, clock, diamond, emit};

fn logger() -> (Unit, DefId) {
    let mut unit = Unit::new();
    let full = unit.add(Definition::new("::Demo::LogFull", ExceptionDef::new().local()));
    let logger = unit.add(Definition::new(
        "::Demo::Logger",
        ClassDef::interface().local().operation(
            Operation::new("print")
                .param_in("message", Type::STRING)
                .throws(full),
        ),
    ));
    (unit, logger)
}

#[test]
fn operations_interface_extends_abstract_bases() {
    let d = diamond();
    assert_eq!(
        emit(&d.unit, d.bottom, ArtifactKind::Operations),
        indoc! {"
            package Demo;

            public interface _BottomOperations extends _LeftOperations, _RightOperations
            {
                void land(int speed, Ice.StringHolder report, Ice.Current __current);
            }
        "}
    );
    assert_has_lines(
        &emit(&d.unit, d.base, ArtifactKind::Operations),
        "String describe(Ice.Current __current);",
    );
}

#[test]
fn deferred_operations_take_the_callback() {
    let c = clock();
    assert_has_lines(
        &emit(&c.unit, c.clock, ArtifactKind::Operations),
        "void now_async(AMD_Clock_now __cb, String zone, Ice.Current __current) throws BadZone;",
    );
}

#[test]
fn local_operations_have_no_current_and_keep_local_throws() {
    let (unit, logger) = logger();
    assert_has_lines(
        &emit(&unit, logger, ArtifactKind::Operations),
        "void print(String message) throws LogFull;",
    );
}

#[test]
fn tie_forwards_every_operation() {
    let d = diamond();
    let text = emit(&d.unit, d.bottom, ArtifactKind::Tie);

    assert_has_lines(
        &text,
        indoc! {"
            public class _BottomTie extends _BottomDisp implements Ice.TieBase
            {
                public _BottomTie()
                {
                }
                public _BottomTie(_BottomOperations delegate)
                {
                    _ice_delegate = delegate;
                }
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            public void ice_delegate(java.lang.Object delegate)
            {
                _ice_delegate = (_BottomOperations)delegate;
            }
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            if(!(rhs instanceof _BottomTie))
            {
                return false;
            }
            return _ice_delegate.equals(((_BottomTie)rhs)._ice_delegate);
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            public void land(int speed, Ice.StringHolder report, Ice.Current __current)
            {
                _ice_delegate.land(speed, report, __current);
            }
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            public String describe(Ice.Current __current)
            {
                return _ice_delegate.describe(__current);
            }
        "},
    );
    assert_has_lines(&text, "_ice_delegate.turnLeft(__current);");
    assert_has_lines(&text, "_ice_delegate.turnRight(__current);");
    assert_has_lines(&text, "private _BottomOperations _ice_delegate;");
}

#[test]
fn tie_forwards_deferred_operations() {
    let c = clock();
    assert_has_lines(
        &emit(&c.unit, c.clock, ArtifactKind::Tie),
        indoc! {"
            public void now_async(AMD_Clock_now __cb, String zone, Ice.Current __current) throws BadZone
            {
                _ice_delegate.now_async(__cb, zone, __current);
            }
        "},
    );
}

#[test]
fn local_tie_implements_the_interface() {
    let (unit, logger) = logger();
    let text = emit(&unit, logger, ArtifactKind::Tie);

    assert_has_lines(&text, "public class _LoggerTie implements Logger, Ice.TieBase");
    assert_has_lines(
        &text,
        indoc! {"
            public void print(String message) throws LogFull
            {
                _ice_delegate.print(message);
            }
        "},
    );
}
