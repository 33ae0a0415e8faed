//! Shared XML attribute parsing utilities.
//!
//! Sheet names are user text, so attribute values are unescaped
//! (`R&amp;D` becomes `R&D`) rather than taken as raw bytes.

use quick_xml::events::BytesStart;

use crate::error::DecodeResult;

/// Extract an unescaped attribute value by its full (possibly prefixed) key.
///
/// Returns `Ok(None)` if the attribute is missing; a malformed entity is an
/// error.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> DecodeResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Extract an unescaped attribute value by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> DecodeResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).ok().flatten().and_then(|s| s.parse().ok())
}

/// Extract a boolean attribute value by key.
///
/// Returns `None` if missing. Recognizes `"1"`, `"true"` as true.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_string(e, key)
        .ok()
        .flatten()
        .map(|s| matches!(s.as_str(), "1" | "true"))
}
