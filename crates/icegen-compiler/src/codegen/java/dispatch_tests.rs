use icegen_core::{ClassDef, Definition, Operation, Type};
use indoc::indoc;

use super::ArtifactKind;
use crate::test_utils::{assert_has_lines, clock, diamond, emit, exceptions};

#[test]
fn type_ids_are_sorted_with_own_position() {
    let d = diamond();
    let text = emit(&d.unit, d.bottom, ArtifactKind::Dispatcher);

    assert_has_lines(
        &text,
        indoc! {r#"
            public abstract class _BottomDisp extends Ice.ObjectImpl implements Bottom
            {
                protected void ice_copyStateFrom(Ice.Object __obj)
                    throws java.lang.CloneNotSupportedException
                {
                    throw new java.lang.CloneNotSupportedException();
                }

                public static final String[] __ids =
                {
                    "::Demo::Base",
                    "::Demo::Bottom",
                    "::Demo::Left",
                    "::Demo::Right",
                    "::Ice::Object"
                };
        "#},
    );
    assert_has_lines(
        &text,
        indoc! {"
            public String ice_id(Ice.Current __current)
            {
                return __ids[1];
            }
        "},
    );
}

#[test]
fn router_reuses_declaring_handlers() {
    let d = diamond();
    let text = emit(&d.unit, d.bottom, ArtifactKind::Dispatcher);

    assert_has_lines(
        &text,
        indoc! {r#"
            private final static String[] __all =
            {
                "describe",
                "ice_id",
                "ice_ids",
                "ice_isA",
                "ice_ping",
                "land",
                "turnLeft",
                "turnRight"
            };
        "#},
    );
    assert_has_lines(
        &text,
        indoc! {"
            case 0:
            {
                return _BaseDisp.___describe(this, in, __current);
            }
            case 1:
            {
                return ___ice_id(this, in, __current);
            }
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            case 5:
            {
                return ___land(this, in, __current);
            }
            case 6:
            {
                return _LeftDisp.___turnLeft(this, in, __current);
            }
            case 7:
            {
                return _RightDisp.___turnRight(this, in, __current);
            }
        "},
    );
    // Only the own operation gets a handler here.
    assert!(!text.contains("___describe(Bottom"));
    assert!(!text.contains("___turnLeft(Bottom"));
}

#[test]
fn handler_reads_calls_and_writes() {
    let d = diamond();
    let text = emit(&d.unit, d.bottom, ArtifactKind::Dispatcher);

    assert_has_lines(
        &text,
        indoc! {"
            public static IceInternal.DispatchStatus ___land(Bottom __obj, IceInternal.Incoming __in, Ice.Current __current)
            {
                IceInternal.BasicStream __is = __in.is();
                IceInternal.BasicStream __os = __in.os();
                int speed;
                speed = __is.readInt();
                Ice.StringHolder report = new Ice.StringHolder();
                __obj.land(speed, report, __current);
                __os.writeString(report.value);
                return IceInternal.DispatchStatus.DispatchOK;
            }
        "},
    );
}

#[test]
fn user_exceptions_are_caught_derived_first() {
    let mut x = exceptions();
    let service = x.unit.add(Definition::new(
        "::Err::Service",
        ClassDef::interface().operation(
            Operation::new("call")
                .returns(Type::INT)
                .throws(x.root)
                .throws(x.leaf)
                .throws(x.quiet)
                .throws(x.other),
        ),
    ));
    let text = emit(&x.unit, service, ArtifactKind::Dispatcher);

    assert_has_lines(
        &text,
        indoc! {"
            try
            {
                int __ret = __obj.call(__current);
                __os.writeInt(__ret);
                return IceInternal.DispatchStatus.DispatchOK;
            }
            catch(Leaf ex)
            {
                __os.writeUserException(ex);
                return IceInternal.DispatchStatus.DispatchUserException;
            }
            catch(Other ex)
            {
                __os.writeUserException(ex);
                return IceInternal.DispatchStatus.DispatchUserException;
            }
            catch(Root ex)
            {
                __os.writeUserException(ex);
                return IceInternal.DispatchStatus.DispatchUserException;
            }
        "},
    );
    assert!(!text.contains("Quiet"));
}

#[test]
fn deferred_handler_hands_off_to_the_callback() {
    let c = clock();
    let text = emit(&c.unit, c.clock, ArtifactKind::Dispatcher);

    assert_has_lines(
        &text,
        indoc! {"
            IceInternal.BasicStream __is = __in.is();
            String zone;
            zone = __is.readString();
            AMD_Clock_now __cb = new _AMD_Clock_now(__in);
            try
            {
                __obj.now_async(__cb, zone, __current);
            }
            catch(java.lang.Exception ex)
            {
                __cb.ice_exception(ex);
            }
            return IceInternal.DispatchStatus.DispatchAsync;
        "},
    );
    assert!(!text.contains("__in.os()"));
}

#[test]
fn types_without_operations_get_no_router() {
    let mut d = diamond();
    let empty = d
        .unit
        .add(Definition::new("::Demo::Empty", ClassDef::interface()));
    let text = emit(&d.unit, empty, ArtifactKind::Dispatcher);

    assert!(text.contains("__ids"));
    assert!(!text.contains("__dispatch"));
}
