const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A buffer containing a NUL byte is treated as binary.
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Decodes file bytes as UTF-8, replacing invalid sequences, and drops a
/// leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}
