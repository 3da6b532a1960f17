use icegen_core::{ClassDef, Definition, Operation, Type};
use indoc::indoc;

use super::{ArtifactKind, Config, Emitter};
use crate::Error;
use crate::test_utils::{assert_has_lines, clock, emit, shapes};

#[test]
fn ami_callback() {
    let c = clock();
    assert_eq!(
        emit(&c.unit, c.clock, ArtifactKind::AmiCallback(0)),
        indoc! {r#"
            package Demo;

            public abstract class AMI_Clock_now extends IceInternal.OutgoingAsync
            {
                public abstract void ice_response(long __ret, int offset);
                public abstract void ice_exception(Ice.LocalException ex);
                public abstract void ice_exception(Ice.UserException ex);

                public final void __invoke(Ice.ObjectPrx __prx, String zone, java.util.Map __ctx)
                {
                    try
                    {
                        __prepare(__prx, "now", Ice.OperationMode.Normal, __ctx);
                        __os.writeString(zone);
                        __os.endWriteEncaps();
                    }
                    catch(Ice.LocalException __ex)
                    {
                        __finished(__ex);
                        return;
                    }
                    __send();
                }

                protected final void __response(boolean __ok)
                {
                    long __ret;
                    int offset;
                    try
                    {
                        if(!__ok)
                        {
                            try
                            {
                                __is.throwException();
                            }
                            catch(BadZone __ex)
                            {
                                throw __ex;
                            }
                            catch(Ice.UserException __ex)
                            {
                                throw new Ice.UnknownUserException();
                            }
                        }
                        offset = __is.readInt();
                        __ret = __is.readLong();
                    }
                    catch(Ice.LocalException __ex)
                    {
                        __finished(__ex);
                        return;
                    }
                    catch(Ice.UserException __ex)
                    {
                        ice_exception(__ex);
                        return;
                    }
                    ice_response(__ret, offset);
                }
            }
        "#}
    );
}

#[test]
fn ami_callback_patches_class_results() {
    let mut s = shapes();
    let graph = s.unit.add(Definition::new(
        "::Demo::Graph",
        ClassDef::interface().operation(Operation::new("root").returns(Type::Class(s.node)).ami()),
    ));
    let text = emit(&s.unit, graph, ArtifactKind::AmiCallback(0));

    assert_has_lines(&text, "public abstract void ice_response(Node __ret);");
    assert!(!text.contains("Ice.UserException ex"));
    assert_has_lines(
        &text,
        indoc! {"
            NodeHolder __ret = new NodeHolder();
            try
        "},
    );
    assert_has_lines(
        &text,
        indoc! {"
            __is.readObject(__ret.getPatcher());
            __is.readPendingObjects();
        "},
    );
    assert_has_lines(&text, "ice_response(__ret.value);");
}

#[test]
fn amd_callback() {
    let c = clock();
    assert_eq!(
        emit(&c.unit, c.clock, ArtifactKind::AmdCallback(0)),
        indoc! {"
            package Demo;

            public interface AMD_Clock_now
            {
                void ice_response(long __ret, int offset);

                void ice_exception(java.lang.Exception ex);
            }
        "}
    );
}

#[test]
fn amd_incoming_completes_once() {
    let c = clock();
    assert_eq!(
        emit(&c.unit, c.clock, ArtifactKind::AmdIncoming(0)),
        indoc! {"
            package Demo;

            final class _AMD_Clock_now extends IceInternal.IncomingAsync implements AMD_Clock_now
            {
                public _AMD_Clock_now(IceInternal.Incoming in)
                {
                    super(in);
                }

                public void ice_response(long __ret, int offset)
                {
                    if(!_finished)
                    {
                        try
                        {
                            IceInternal.BasicStream __os = this.__os();
                            __os.writeInt(offset);
                            __os.writeLong(__ret);
                        }
                        catch(Ice.LocalException __ex)
                        {
                            ice_exception(__ex);
                            return;
                        }
                        __response(true);
                    }
                }

                public void ice_exception(java.lang.Exception ex)
                {
                    if(!_finished)
                    {
                        try
                        {
                            throw ex;
                        }
                        catch(BadZone __ex)
                        {
                            __os().writeUserException(__ex);
                            __response(false);
                        }
                        catch(java.lang.Exception __ex)
                        {
                            __exception(__ex);
                        }
                    }
                }
            }
        "}
    );
}

#[test]
fn amd_incoming_without_results_or_throws() {
    let mut s = shapes();
    let pinger = s.unit.add(Definition::new(
        "::Demo::Pinger",
        ClassDef::interface().operation(Operation::new("ping").amd()),
    ));
    let text = emit(&s.unit, pinger, ArtifactKind::AmdIncoming(0));

    assert_has_lines(
        &text,
        indoc! {"
            public void ice_response()
            {
                if(!_finished)
                {
                    __response(true);
                }
            }
            public void ice_exception(java.lang.Exception ex)
            {
                if(!_finished)
                {
                    __exception(ex);
                }
            }
        "},
    );
}

#[test]
fn callback_index_must_name_an_own_operation() {
    let c = clock();
    let config = Config::new();
    let err = Emitter::new(&c.unit, &config, c.clock)
        .unwrap()
        .emit(ArtifactKind::AmiCallback(3))
        .unwrap_err();
    assert_eq!(err, Error::Dangling(c.clock));
}
