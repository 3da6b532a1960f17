/// Failures while decoding a byte stream.
///
/// These describe malformed or unexpected input from the peer, never a
/// local programming error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("negative size {0}")]
    NegativeSize(i32),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("enum ordinal {value} out of range for {count} enumerators")]
    EnumOutOfRange { value: i64, count: usize },

    #[error("read past the end of a slice")]
    SliceOverrun,

    #[error("unsupported encoding {major}.{minor}")]
    UnsupportedEncoding { major: u8, minor: u8 },

    #[error("unknown type id index {0}")]
    UnknownTypeIdIndex(usize),

    #[error("illegal object reference {0}")]
    IllegalObjectReference(i32),

    #[error("no object factory for `{0}`")]
    NoObjectFactory(String),

    #[error("object #{0} was referenced but never sent")]
    UnresolvedInstance(i32),

    #[error("expected an instance of `{expected}`, got `{actual}`")]
    UnexpectedObjectType { expected: String, actual: String },
}
