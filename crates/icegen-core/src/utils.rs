//! Metadata directive helpers.

/// Prefix of the directive that maps a sequence to a custom collection.
pub const JAVA_TYPE_PREFIX: &str = "java:type:";

/// Value of the first directive starting with `prefix`, with the prefix removed.
pub fn find_metadata<'a>(metadata: &'a [String], prefix: &str) -> Option<&'a str> {
    metadata.iter().find_map(|d| d.strip_prefix(prefix))
}

/// Custom collection type for a sequence-typed slot.
///
/// A directive on the member or parameter wins over one on the sequence
/// definition itself.
pub fn custom_collection<'a>(member: &'a [String], definition: &'a [String]) -> Option<&'a str> {
    find_metadata(member, JAVA_TYPE_PREFIX).or_else(|| find_metadata(definition, JAVA_TYPE_PREFIX))
}

/// Whether a bare directive such as `ami` or `amd` is present.
pub fn has_directive(metadata: &[String], name: &str) -> bool {
    metadata.iter().any(|d| d == name)
}
