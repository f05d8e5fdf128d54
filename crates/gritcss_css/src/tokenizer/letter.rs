//! Case-insensitive keyword matching that also accepts hex-escaped letters.
//!
//! CSS allows every letter of a keyword to be written as an escape of its code point, so
//! `@\49mport`, `@IMPORT` and `@import` are the same at-keyword. A keyword is matched by
//! composing [`match_letter`] for each of its letters.

use gritcss_shared::byte_stream::ByteStream;
use gritcss_shared::byte_stream::Character::Ch;

/// Matches a single letter at `pos` (relative to the current stream position) and returns the
/// position right after it.
///
/// Accepted forms are the letter in either case, or a backslash followed by zero to four `0`
/// digits, the two hex digits of the upper or lower case code point (hex digits in any case)
/// and an optional soft space (`\r\n` or a single whitespace character).
pub fn match_letter(stream: &ByteStream, pos: usize, letter: char) -> Option<usize> {
    match stream.look_ahead(pos) {
        Ch(c) if c.eq_ignore_ascii_case(&letter) => Some(pos + 1),
        Ch('\\') => {
            let mut i = pos + 1;
            let mut zeros = 0;
            while zeros < 4 && stream.look_ahead(i) == Ch('0') {
                zeros += 1;
                i += 1;
            }

            let (Ch(hi), Ch(lo)) = (stream.look_ahead(i), stream.look_ahead(i + 1)) else {
                return None;
            };
            if !hi.is_ascii_hexdigit() || !lo.is_ascii_hexdigit() {
                return None;
            }

            let code = hi.to_digit(16)? * 16 + lo.to_digit(16)?;
            let upper = letter.to_ascii_uppercase() as u32;
            let lower = letter.to_ascii_lowercase() as u32;
            if code != upper && code != lower {
                return None;
            }

            Some(match_soft_space(stream, i + 2))
        }
        _ => None,
    }
}

/// Matches a keyword letter by letter. Ascii letters go through [`match_letter`], any other
/// character (`@`, `-`, `(`, `<`, ...) must match literally.
pub fn match_keyword(stream: &ByteStream, pos: usize, keyword: &str) -> Option<usize> {
    let mut pos = pos;
    for c in keyword.chars() {
        if c.is_ascii_alphabetic() {
            pos = match_letter(stream, pos, c)?;
        } else if stream.look_ahead(pos) == Ch(c) {
            pos += 1;
        } else {
            return None;
        }
    }

    Some(pos)
}

/// Skips the optional whitespace that may terminate a hex escape
pub fn match_soft_space(stream: &ByteStream, pos: usize) -> usize {
    match stream.look_ahead(pos) {
        Ch('\r') if stream.look_ahead(pos + 1) == Ch('\n') => pos + 2,
        c if c.is_whitespace() => pos + 1,
        _ => pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn letter(input: &str, c: char) -> Option<usize> {
        let stream = ByteStream::from_text(input);
        match_letter(&stream, 0, c)
    }

    fn keyword(input: &str, kw: &str) -> Option<usize> {
        let stream = ByteStream::from_text(input);
        match_keyword(&stream, 0, kw)
    }

    #[test_case("m", 'm', Some(1); "lowercase literal")]
    #[test_case("M", 'm', Some(1); "uppercase literal")]
    #[test_case("\\4d", 'm', Some(3); "uppercase code point")]
    #[test_case("\\6D", 'm', Some(3); "lowercase code point with uppercase digits")]
    #[test_case("\\0004d", 'm', Some(6); "leading zeros")]
    #[test_case("\\00004d", 'm', Some(7); "four leading zeros")]
    #[test_case("\\000004d", 'm', None; "too many leading zeros")]
    #[test_case("\\4d x", 'm', Some(4); "trailing space is part of the escape")]
    #[test_case("\\4d\r\nx", 'm', Some(5); "trailing crlf is part of the escape")]
    #[test_case("\\4e", 'm', None; "other code point")]
    #[test_case("\\4", 'm', None; "truncated escape")]
    #[test_case("n", 'm', None; "other letter")]
    fn letters(input: &str, c: char, expected: Option<usize>) {
        assert_eq!(letter(input, c), expected);
    }

    #[test]
    fn keywords() {
        assert_eq!(keyword("@media", "@media"), Some(6));
        assert_eq!(keyword("@MEDIA", "@media"), Some(6));
        assert_eq!(keyword("@\\4d\\45\\44IA ", "@media"), Some(12));
        assert_eq!(keyword("@\\49mport", "@import"), Some(9));
        assert_eq!(keyword("@-WebKit-KeyFrames", "@-webkit-keyframes"), Some(18));
        assert_eq!(keyword("@_webkit-keyframes", "@-webkit-keyframes"), None);
        assert_eq!(keyword("@medi", "@media"), None);
        assert_eq!(keyword(":NoT(", ":not("), Some(5));
    }

    #[test]
    fn keyword_at_offset() {
        let stream = ByteStream::from_text("12\\70 x;");
        assert_eq!(match_keyword(&stream, 2, "px"), Some(7));
    }
}
