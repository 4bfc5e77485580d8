//! Info-hash encodings and magnet links.

use data_encoding::BASE32_NOPAD;

/// Normalized hex and base32 forms of a stored info hash.
///
/// Returns `None` when the stored value is not valid hex.
pub fn info_hash_forms(info_hash: &str) -> Option<(String, String)> {
    let bytes = hex::decode(info_hash).ok()?;
    Some((hex::encode(&bytes), BASE32_NOPAD.encode(&bytes)))
}

/// `magnet:?xt=urn:btih:<b32>&dn=<name>&tr=<tracker>...`
pub fn magnet_uri(hash_b32: &str, display_name: &str, trackers: &[String]) -> String {
    let mut uri = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        hash_b32,
        urlencoding::encode(display_name)
    );
    for tracker in trackers {
        uri.push_str("&tr=");
        uri.push_str(&urlencoding::encode(tracker));
    }
    uri
}
