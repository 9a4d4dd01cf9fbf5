/// Characters removed by [`strip`]: Unicode `White_Space` plus the ASCII
/// information separators U+001C..=U+001F.
pub fn is_strip_char(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Trim [`is_strip_char`] characters from both ends of `s`.
pub fn strip(s: &str) -> &str {
    s.trim_matches(is_strip_char)
}

/// Normalize raw file text before it is stored.
///
/// `\r\n` becomes `\n`, non-breaking spaces become plain spaces, every line
/// is trimmed, and blank lines are dropped.
pub fn clean_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\u{00a0}', " ");
    text.split('\n')
        .map(strip)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
