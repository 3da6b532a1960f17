use crate::{DecodeError, EnumWidth, InputStream, OutputStream};

#[test]
fn width_follows_enumerator_count() {
    assert_eq!(EnumWidth::for_count(1), EnumWidth::Byte);
    assert_eq!(EnumWidth::for_count(100), EnumWidth::Byte);
    assert_eq!(EnumWidth::for_count(127), EnumWidth::Byte);
    assert_eq!(EnumWidth::for_count(128), EnumWidth::Short);
    assert_eq!(EnumWidth::for_count(130), EnumWidth::Short);
    assert_eq!(EnumWidth::for_count(32767), EnumWidth::Short);
    assert_eq!(EnumWidth::for_count(32768), EnumWidth::Int);
}

#[test]
fn hundred_enumerators_use_one_byte() {
    let mut os = OutputStream::new();
    os.write_enum(99, 100);
    assert_eq!(os.len(), 1);

    let bytes = os.finished();
    assert_eq!(InputStream::new(&bytes).read_enum(100).unwrap(), 99);
}

#[test]
fn hundred_thirty_enumerators_use_two_bytes() {
    let mut os = OutputStream::new();
    os.write_enum(129, 130);
    assert_eq!(os.len(), 2);

    let bytes = os.finished();
    assert_eq!(InputStream::new(&bytes).read_enum(130).unwrap(), 129);
}

#[test]
fn out_of_range_ordinal_fails() {
    let bytes = [5u8];
    assert_eq!(
        InputStream::new(&bytes).read_enum(3),
        Err(DecodeError::EnumOutOfRange { value: 5, count: 3 })
    );

    let bytes = (-1i16).to_le_bytes();
    assert_eq!(
        InputStream::new(&bytes).read_enum(200),
        Err(DecodeError::EnumOutOfRange {
            value: -1,
            count: 200
        })
    );
}
