use crate::{DecodeError, Identity, InputStream, OutputStream};

#[test]
fn primitives_roundtrip() {
    let mut os = OutputStream::new();
    os.write_bool(true);
    os.write_byte(0xfe);
    os.write_short(-2);
    os.write_int(0x0102_0304);
    os.write_long(-1);
    os.write_float(1.5);
    os.write_double(-0.25);
    os.write_string("héllo");

    let bytes = os.finished();
    assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);

    let mut is = InputStream::new(&bytes);
    assert!(is.read_bool().unwrap());
    assert_eq!(is.read_byte().unwrap(), 0xfe);
    assert_eq!(is.read_short().unwrap(), -2);
    assert_eq!(is.read_int().unwrap(), 0x0102_0304);
    assert_eq!(is.read_long().unwrap(), -1);
    assert_eq!(is.read_float().unwrap(), 1.5);
    assert_eq!(is.read_double().unwrap(), -0.25);
    assert_eq!(is.read_string().unwrap(), "héllo");
    assert!(is.is_empty());
}

#[test]
fn size_encoding() {
    let mut os = OutputStream::new();
    os.write_size(254);
    assert_eq!(os.len(), 1);
    os.write_size(255);
    assert_eq!(os.len(), 6);
    assert_eq!(&os.as_bytes()[1..], &[255, 255, 0, 0, 0]);

    let bytes = os.finished();
    let mut is = InputStream::new(&bytes);
    assert_eq!(is.read_size().unwrap(), 254);
    assert_eq!(is.read_size().unwrap(), 255);
}

#[test]
fn empty_sequences_and_strings() {
    let mut os = OutputStream::new();
    os.write_string_seq(&[]);
    os.write_string("");
    let bytes = os.finished();
    assert_eq!(bytes, [0, 0]);

    let mut is = InputStream::new(&bytes);
    assert!(is.read_string_seq().unwrap().is_empty());
    assert_eq!(is.read_string().unwrap(), "");
}

#[test]
fn oversized_sequence_is_rejected() {
    let mut os = OutputStream::new();
    os.write_size(1000);
    let bytes = os.finished();

    let mut is = InputStream::new(&bytes);
    assert!(matches!(
        is.read_and_check_seq_size(4),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn type_ids_are_compressed() {
    let mut os = OutputStream::new();
    os.write_type_id("::Demo::Node");
    os.write_type_id("::Ice::Object");
    os.write_type_id("::Demo::Node");
    let bytes = os.finished();
    assert_eq!(&bytes[bytes.len() - 2..], &[1, 0]);

    let mut is = InputStream::new(&bytes);
    assert_eq!(is.read_type_id().unwrap(), "::Demo::Node");
    assert_eq!(is.read_type_id().unwrap(), "::Ice::Object");
    assert_eq!(is.read_type_id().unwrap(), "::Demo::Node");
}

#[test]
fn unknown_type_id_index() {
    let bytes = [1u8, 3];
    let mut is = InputStream::new(&bytes);
    assert_eq!(is.read_type_id(), Err(DecodeError::UnknownTypeIdIndex(3)));
}

#[test]
fn end_read_slice_skips_unknown_trailing_data() {
    let mut os = OutputStream::new();
    os.start_write_slice();
    os.write_int(7);
    os.write_string("added in a later version");
    os.end_write_slice();
    os.write_int(42);
    let bytes = os.finished();

    let mut is = InputStream::new(&bytes);
    is.start_read_slice().unwrap();
    assert_eq!(is.read_int().unwrap(), 7);
    is.end_read_slice().unwrap();
    assert_eq!(is.read_int().unwrap(), 42);
}

#[test]
fn reading_past_slice_end_fails() {
    let mut os = OutputStream::new();
    os.start_write_slice();
    os.write_int(7);
    os.end_write_slice();
    os.write_int(8);
    let bytes = os.finished();

    let mut is = InputStream::new(&bytes);
    is.start_read_slice().unwrap();
    is.read_long().unwrap();
    assert_eq!(is.end_read_slice(), Err(DecodeError::SliceOverrun));
}

#[test]
fn skip_slice() {
    let mut os = OutputStream::new();
    os.start_write_slice();
    os.write_long(1);
    os.end_write_slice();
    os.write_bool(true);
    let bytes = os.finished();

    let mut is = InputStream::new(&bytes);
    is.skip_slice().unwrap();
    assert!(is.read_bool().unwrap());
}

#[test]
fn encapsulation_roundtrip() {
    let mut os = OutputStream::new();
    os.start_write_encaps();
    os.write_int(5);
    os.end_write_encaps();
    let bytes = os.finished();
    assert_eq!(&bytes[..6], &[10, 0, 0, 0, 1, 0]);

    let mut is = InputStream::new(&bytes);
    is.start_read_encaps().unwrap();
    assert_eq!(is.read_int().unwrap(), 5);
    is.end_read_encaps().unwrap();
    assert!(is.is_empty());
}

#[test]
fn truncated_encapsulation() {
    let bytes = [100u8, 0, 0, 0, 1, 0];
    let mut is = InputStream::new(&bytes);
    assert!(matches!(
        is.start_read_encaps(),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn unsupported_encoding() {
    let bytes = [6u8, 0, 0, 0, 2, 0];
    let mut is = InputStream::new(&bytes);
    assert_eq!(
        is.start_read_encaps(),
        Err(DecodeError::UnsupportedEncoding { major: 2, minor: 0 })
    );
}

#[test]
fn proxies_are_nullable() {
    let mut os = OutputStream::new();
    os.write_proxy(None);
    os.write_proxy(Some(&Identity::new("hello")));
    let bytes = os.finished();

    let mut is = InputStream::new(&bytes);
    assert_eq!(is.read_proxy().unwrap(), None);
    assert_eq!(is.read_proxy().unwrap(), Some(Identity::new("hello")));
}

#[test]
fn truncated_read() {
    let bytes = [1u8, 2];
    let mut is = InputStream::new(&bytes);
    assert_eq!(
        is.read_int(),
        Err(DecodeError::Truncated {
            needed: 4,
            remaining: 2
        })
    );
}
