//! Materializing escaped lexemes.

use cow_utils::CowUtils;

/// Replaces every `\0{0,4}XY` escape (two hex digits, optionally followed by one soft space)
/// with the character it encodes. Other backslashes are left untouched.
pub fn unescape(lexeme: &str) -> String {
    if !lexeme.contains('\\') {
        return lexeme.to_string();
    }

    let chars: Vec<char> = lexeme.chars().collect();
    let mut out = String::with_capacity(lexeme.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' {
            if let Some((c, len)) = decode_escape(&chars[i + 1..]) {
                out.push(c);
                i += 1 + len;
                continue;
            }

            // `\\` is one escaped backslash, its second half never starts an escape
            out.push('\\');
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
            }
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Resolves every CSS escape: `\` plus one to six hex digits and an optional soft space becomes
/// the encoded character (U+FFFD when that is zero or not a character), an escaped newline
/// disappears and any other escaped character stands for itself.
pub fn decode_escapes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let digits = chars[i + 1..]
            .iter()
            .take(6)
            .take_while(|c| c.is_ascii_hexdigit())
            .count();

        if digits > 0 {
            let code = chars[i + 1..i + 1 + digits]
                .iter()
                .filter_map(|c| c.to_digit(16))
                .fold(0u32, |acc, d| acc * 16 + d);
            out.push(match char::from_u32(code) {
                Some(c) if code != 0 => c,
                _ => char::REPLACEMENT_CHARACTER,
            });

            i += 1 + digits;
            match (chars.get(i), chars.get(i + 1)) {
                (Some('\r'), Some('\n')) => i += 2,
                (Some(' ' | '\t' | '\r' | '\n' | '\x0C'), _) => i += 1,
                _ => {}
            }
            continue;
        }

        match (chars.get(i + 1), chars.get(i + 2)) {
            (Some('\r'), Some('\n')) => i += 3,
            (Some('\r' | '\n' | '\x0C'), _) => i += 2,
            (Some(&c), _) => {
                out.push(c);
                i += 2;
            }
            (None, _) => {
                out.push('\\');
                i += 1;
            }
        }
    }

    out
}

/// Unescapes the lexeme and lowercases the result. Used for unit suffixes and keyword-like
/// values where case carries no meaning.
pub fn normalize(lexeme: &str) -> String {
    unescape(lexeme).cow_to_lowercase().into_owned()
}

/// Decodes `0{0,4}XY` plus an optional soft space from the characters following a backslash.
/// Returns the character and the number of characters consumed.
fn decode_escape(chars: &[char]) -> Option<(char, usize)> {
    let zeros = chars.iter().take_while(|c| **c == '0').count();

    // Zeros are greedy, but give one back when the two digits would otherwise not fit
    for skip in (0..=zeros.min(4)).rev() {
        let (Some(hi), Some(lo)) = (chars.get(skip), chars.get(skip + 1)) else {
            continue;
        };
        let (Some(hi), Some(lo)) = (hi.to_digit(16), lo.to_digit(16)) else {
            continue;
        };
        let c = char::from_u32(hi * 16 + lo)?;

        let mut len = skip + 2;
        match (chars.get(len), chars.get(len + 1)) {
            (Some('\r'), Some('\n')) => len += 2,
            (Some(' ' | '\t' | '\r' | '\n' | '\x0C'), _) => len += 1,
            _ => {}
        }
        return Some((c, len));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("12px", "12px"; "lowercase")]
    #[test_case("12PX", "12px"; "uppercase")]
    #[test_case("12\\70 x", "12px")]
    #[test_case("12\\50X", "12px")]
    #[test_case("1\\00006Ds", "1ms")]
    #[test_case("\\000a", "\n")]
    fn normalize_lexemes(input: &str, expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn unescape_keeps_case() {
        assert_eq!(unescape("Foo/Bar.CSS"), "Foo/Bar.CSS");
        assert_eq!(unescape("a\\29 b"), "a)b");
        assert_eq!(unescape("a\\zb"), "a\\zb");
        assert_eq!(unescape("trailing\\"), "trailing\\");
        assert_eq!(unescape("a\\\\29 b"), "a\\\\29 b");
    }

    #[test_case("plain.png", "plain.png"; "no escapes")]
    #[test_case("x\\bc.png", "x\u{bc}.png"; "hex escape")]
    #[test_case("a\\ b", "a b"; "escaped space")]
    #[test_case("a\\)b", "a)b"; "escaped parenthesis")]
    #[test_case("a\\\"b", "a\"b"; "escaped quote")]
    #[test_case("a\\\\b", "a\\b"; "escaped backslash")]
    #[test_case("\\41 \\000042C", "ABC"; "soft space and six digits")]
    #[test_case("\\1F600!", "\u{1F600}!"; "astral character")]
    #[test_case("a\\0 b", "a\u{FFFD}b"; "zero")]
    #[test_case("\\110000", "\u{FFFD}"; "out of range")]
    #[test_case("a\\\r\nb\\\nc", "abc"; "escaped newlines")]
    #[test_case("x\\", "x\\"; "trailing backslash")]
    fn decode_all_escapes(input: &str, expected: &str) {
        assert_eq!(decode_escapes(input), expected);
    }
}
