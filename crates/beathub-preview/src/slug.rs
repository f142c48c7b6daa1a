//! Share-link slug parsing.
//!
//! Share links look like `/addToCart/night-drive-trap-beat-Xy12abC`: a
//! human-readable title followed by the store document ID, joined with `-`.
//! Store IDs never contain `-`, so the key is always the last component.

/// Separator between the readable part of a slug and the record key.
pub const KEY_DELIMITER: char = '-';

/// Extract the record key from a share-link slug.
///
/// Returns the last `-`-separated component, or the whole slug when it has
/// no delimiter. The key is not validated here; an unknown or empty key
/// simply resolves to no record.
pub fn extract_key(slug: &str) -> &str {
    // rsplit always yields at least one item, even for ""
    slug.rsplit(KEY_DELIMITER).next().unwrap_or(slug)
}
