//! Line and token splitting shared by the drift and guard checks.
//!
//! Whitespace here is Unicode `White_Space` plus the ASCII information
//! separators `\x1c`..=`\x1f`, and line breaks include the vertical tab,
//! form feed, `\x1c`..=`\x1e`, NEL and the Unicode line/paragraph
//! separators.

const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Split on every line break. A `\r\n` pair leaves an empty piece between
/// the two characters.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAKS)
}

pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_space).filter(|token| !token.is_empty())
}

pub fn trim(text: &str) -> &str {
    text.trim_matches(is_space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_lines_on_all_breaks() {
        let text = "a\rb\u{2028}c\r\nd\x0be\x0cf\u{85}g\u{2029}h\x1ei";
        let lines: Vec<&str> = split_lines(text).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
    }

    #[test]
    fn test_split_tokens_treats_separators_as_space() {
        let tokens: Vec<&str> = split_tokens("one\x1ftwo\u{3000}three  four\n").collect();
        assert_eq!(tokens, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_trim_strips_separators() {
        assert_eq!(trim("\x1c [meta] \x1f"), "[meta]");
        assert_eq!(trim("\x1d\x1e"), "");
    }
}
