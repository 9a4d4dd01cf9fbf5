use tracing::warn;

/// Decode file bytes as UTF-8, falling back to lossy conversion.
pub(super) fn decode_text(bytes: Vec<u8>, source: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(source, "file is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_text() {
        let content = "Ünïcödé text with émojis 🎉".as_bytes().to_vec();
        assert_eq!(decode_text(content, "a.txt"), "Ünïcödé text with émojis 🎉");
    }

    #[test]
    fn invalid_bytes_become_replacement_chars() {
        let content = vec![b'o', b'k', 0xff, b'!'];
        assert_eq!(decode_text(content, "bad.txt"), "ok\u{fffd}!");
    }

    #[test]
    fn empty_file() {
        assert_eq!(decode_text(Vec::new(), "empty.md"), "");
    }
}
