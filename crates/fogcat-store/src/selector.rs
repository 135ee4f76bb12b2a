//! Selector matching over `/`-separated keys.
//!
//! A selector is a key in which any segment may be the wildcard `*`, which
//! matches exactly one segment. Every other segment matches literally.

use crate::error::{StoreError, StoreResult};

/// The single-segment wildcard.
pub const WILDCARD: &str = "*";

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// Whether `selector` contains at least one wildcard segment.
pub fn is_selector(selector: &str) -> bool {
    selector.split(SEPARATOR).any(|segment| segment == WILDCARD)
}

/// Whether `key` is matched by `selector`.
pub fn matches(selector: &str, key: &str) -> bool {
    let mut want = selector.split(SEPARATOR);
    let mut have = key.split(SEPARATOR);
    loop {
        match (want.next(), have.next()) {
            (None, None) => return true,
            (Some(w), Some(h)) if w == WILDCARD || w == h => {}
            _ => return false,
        }
    }
}

/// The literal part of `selector` before its first wildcard segment.
///
/// Every key matched by `selector` starts with this prefix, which lets
/// ordered backends turn a selector read into a range scan.
pub fn literal_prefix(selector: &str) -> &str {
    let mut end = 0;
    for segment in selector.split(SEPARATOR) {
        if segment == WILDCARD {
            return &selector[..end];
        }
        end += segment.len() + SEPARATOR.len_utf8();
    }
    selector
}

/// Reject selectors that can never match a stored key.
pub fn validate(selector: &str) -> StoreResult<()> {
    if !selector.starts_with(SEPARATOR) || selector.len() < 2 {
        return Err(StoreError::InvalidSelector(selector.to_string()));
    }
    Ok(())
}
