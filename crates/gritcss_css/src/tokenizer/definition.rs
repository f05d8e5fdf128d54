//! The CSS2.1 lexical grammar as an immutable table of rules.
//!
//! Every rule reports how many characters it would match at the current stream position. The
//! tokenizer takes the longest match; equally long matches are resolved by the order of the
//! rules in the table.

use crate::tokenizer::letter::{match_keyword, match_soft_space};
use crate::tokenizer::TokenType;
use gritcss_shared::byte_stream::ByteStream;
use gritcss_shared::byte_stream::Character::{self, Ch};
use lazy_static::lazy_static;

/// Signature of a hand written matcher: returns the end position of the match that starts at
/// the given position, both relative to the current stream position.
pub type Matcher = fn(&ByteStream, usize) -> Option<usize>;

/// The shape of a lexical rule
pub enum Pattern {
    /// Exact text
    Literal(&'static str),
    /// Case-insensitive keyword whose letters may be written as hex escapes
    Keyword(&'static str),
    /// A number directly followed by one of the given unit keywords
    Quantity(&'static [&'static str]),
    /// Optional whitespace followed by exact text
    Spaced(&'static str),
    Matcher(Matcher),
}

pub struct Rule {
    pub token_type: TokenType,
    pub pattern: Pattern,
}

impl Rule {
    const fn new(token_type: TokenType, pattern: Pattern) -> Self {
        Self { token_type, pattern }
    }

    /// Returns the number of characters matched by this rule at the current stream position
    fn match_len(&self, stream: &ByteStream) -> Option<usize> {
        let end = match self.pattern {
            Pattern::Literal(text) => literal(stream, 0, text),
            Pattern::Keyword(word) => match_keyword(stream, 0, word),
            Pattern::Quantity(units) => {
                let start = num(stream, 0)?;
                units.iter().filter_map(|unit| match_keyword(stream, start, unit)).max()
            }
            Pattern::Spaced(text) => literal(stream, w(stream, 0), text),
            Pattern::Matcher(matcher) => matcher(stream, 0),
        }?;

        (end > 0).then_some(end)
    }
}

/// Scanner definition. Built once per process and shared by every tokenizer.
pub struct ScannerDefinition {
    rules: Vec<Rule>,
}

lazy_static! {
    pub static ref CSS21: ScannerDefinition = ScannerDefinition::css21();
}

impl ScannerDefinition {
    fn css21() -> Self {
        use Pattern::*;
        use TokenType as T;

        let rules = vec![
            Rule::new(T::Comment, Matcher(comment)),
            Rule::new(T::Cdo, Literal("<!--")),
            Rule::new(T::Cdc, Literal("-->")),
            Rule::new(T::GritIfEnd, Matcher(grit_if_end)),
            Rule::new(T::GritIf, Keyword("<if")),
            Rule::new(T::GritInclude, Keyword("<include")),
            Rule::new(T::CharsetSym, Literal("@charset ")),
            Rule::new(T::ImportSym, Keyword("@import")),
            Rule::new(T::PageSym, Keyword("@page")),
            Rule::new(T::MediaSym, Keyword("@media")),
            Rule::new(T::KeyframesSym, Keyword("@-webkit-keyframes")),
            Rule::new(T::ImportantSym, Matcher(important)),
            Rule::new(T::Not, Keyword(":not(")),
            Rule::new(T::Uri, Matcher(uri)),
            Rule::new(T::Function, Matcher(function)),
            Rule::new(T::Ems, Quantity(&["em"])),
            Rule::new(T::Exs, Quantity(&["ex"])),
            Rule::new(T::Length, Quantity(&["px", "cm", "mm", "in", "pt", "pc"])),
            Rule::new(T::Angle, Quantity(&["deg", "rad", "grad"])),
            Rule::new(T::Time, Quantity(&["ms", "s"])),
            Rule::new(T::Freq, Quantity(&["hz", "khz"])),
            Rule::new(T::Dimension, Matcher(dimension)),
            Rule::new(T::Percentage, Matcher(percentage)),
            Rule::new(T::Number, Matcher(num)),
            Rule::new(T::QuotedString, Matcher(string)),
            Rule::new(T::Invalid, Matcher(invalid)),
            Rule::new(T::GritExpr, Keyword("expr")),
            Rule::new(T::Ident, Matcher(ident)),
            Rule::new(T::Hash, Matcher(hash)),
            Rule::new(T::Includes, Spaced("~=")),
            Rule::new(T::DashMatch, Literal("|=")),
            Rule::new(T::PrefixMatch, Literal("^=")),
            Rule::new(T::SuffixMatch, Literal("$=")),
            Rule::new(T::SubstringMatch, Literal("*=")),
            Rule::new(T::LBrace, Spaced("{")),
            Rule::new(T::Plus, Spaced("+")),
            Rule::new(T::Greater, Spaced(">")),
            Rule::new(T::Comma, Spaced(",")),
            Rule::new(T::Tilde, Spaced("~")),
            Rule::new(T::S, Matcher(whitespace)),
            Rule::new(T::Delim('*'), Literal("*")),
            Rule::new(T::Delim('-'), Literal("-")),
            Rule::new(T::Delim(':'), Literal(":")),
            Rule::new(T::Delim(';'), Literal(";")),
            Rule::new(T::Delim('.'), Literal(".")),
            Rule::new(T::Delim('='), Literal("=")),
            Rule::new(T::Delim('/'), Literal("/")),
            Rule::new(T::Delim(')'), Literal(")")),
            Rule::new(T::Delim('}'), Literal("}")),
            Rule::new(T::Delim('['), Literal("[")),
            Rule::new(T::Delim(']'), Literal("]")),
            Rule::new(T::Delim('|'), Literal("|")),
        ];

        Self { rules }
    }

    /// Finds the rule with the longest match at the current stream position. Returns the token
    /// type together with the number of characters matched.
    pub fn longest_match(&self, stream: &ByteStream) -> Option<(TokenType, usize)> {
        let mut best: Option<(TokenType, usize)> = None;

        for rule in &self.rules {
            let Some(len) = rule.match_len(stream) else {
                continue;
            };
            // Strictly longer only, so earlier rules win ties
            match best {
                Some((_, best_len)) if len <= best_len => {}
                _ => best = Some((rule.token_type, len)),
            }
        }

        best
    }
}

fn at(stream: &ByteStream, pos: usize) -> Character {
    stream.look_ahead(pos)
}

fn is_nonascii(c: char) -> bool {
    c as u32 > 0x7F
}

fn literal(stream: &ByteStream, pos: usize, text: &str) -> Option<usize> {
    let mut pos = pos;
    for c in text.chars() {
        if at(stream, pos) != Ch(c) {
            return None;
        }
        pos += 1;
    }
    Some(pos)
}

/// `\` followed by one to six hex digits and a soft space, or by any character that is not a
/// newline or a hex digit
pub(crate) fn escape(stream: &ByteStream, pos: usize) -> Option<usize> {
    if at(stream, pos) != Ch('\\') {
        return None;
    }

    let mut i = pos + 1;
    while i - pos <= 6 && at(stream, i).is_hex_digit() {
        i += 1;
    }
    if i > pos + 1 {
        return Some(match_soft_space(stream, i));
    }

    match at(stream, i) {
        Ch('\r' | '\n' | '\x0C') => None,
        Ch(_) => Some(i + 1),
        _ => None,
    }
}

fn nmstart(stream: &ByteStream, pos: usize) -> Option<usize> {
    match at(stream, pos) {
        Ch(c) if c.is_ascii_alphabetic() || c == '_' || is_nonascii(c) => Some(pos + 1),
        Ch('\\') => escape(stream, pos),
        _ => None,
    }
}

fn nmchar(stream: &ByteStream, pos: usize) -> Option<usize> {
    match at(stream, pos) {
        Ch(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-' || is_nonascii(c) => Some(pos + 1),
        Ch('\\') => escape(stream, pos),
        _ => None,
    }
}

fn nmchars(stream: &ByteStream, pos: usize) -> usize {
    let mut pos = pos;
    while let Some(next) = nmchar(stream, pos) {
        pos = next;
    }
    pos
}

pub(crate) fn ident(stream: &ByteStream, pos: usize) -> Option<usize> {
    let start = if at(stream, pos) == Ch('-') { pos + 1 } else { pos };
    let end = nmstart(stream, start)?;
    Some(nmchars(stream, end))
}

fn hash(stream: &ByteStream, pos: usize) -> Option<usize> {
    if at(stream, pos) != Ch('#') {
        return None;
    }
    let end = nmchars(stream, pos + 1);
    (end > pos + 1).then_some(end)
}

/// `[0-9]+` or `[0-9]*\.[0-9]+`
pub(crate) fn num(stream: &ByteStream, pos: usize) -> Option<usize> {
    let mut i = pos;
    while at(stream, i).is_numeric() {
        i += 1;
    }
    if at(stream, i) == Ch('.') && at(stream, i + 1).is_numeric() {
        i += 1;
        while at(stream, i).is_numeric() {
            i += 1;
        }
    }
    (i > pos).then_some(i)
}

fn dimension(stream: &ByteStream, pos: usize) -> Option<usize> {
    ident(stream, num(stream, pos)?)
}

fn percentage(stream: &ByteStream, pos: usize) -> Option<usize> {
    literal(stream, num(stream, pos)?, "%")
}

fn function(stream: &ByteStream, pos: usize) -> Option<usize> {
    literal(stream, ident(stream, pos)?, "(")
}

/// Scans a quoted string body. Returns the end position and whether the closing quote was
/// found. Unterminated strings stop right before the offending newline (or the end of input).
fn scan_string(stream: &ByteStream, pos: usize) -> Option<(usize, bool)> {
    let Ch(quote @ ('"' | '\'')) = at(stream, pos) else {
        return None;
    };

    let mut i = pos + 1;
    loop {
        match at(stream, i) {
            Ch(c) if c == quote => return Some((i + 1, true)),
            Ch('\\') => match at(stream, i + 1) {
                Ch('\n' | '\x0C') => i += 2,
                Ch('\r') if at(stream, i + 2) == Ch('\n') => i += 3,
                Ch('\r') => i += 2,
                _ => match escape(stream, i) {
                    Some(next) => i = next,
                    None => return Some((i, false)),
                },
            },
            Ch('\n' | '\r' | '\x0C') => return Some((i, false)),
            Ch(_) => i += 1,
            _ => return Some((i, false)),
        }
    }
}

fn string(stream: &ByteStream, pos: usize) -> Option<usize> {
    match scan_string(stream, pos)? {
        (end, true) => Some(end),
        _ => None,
    }
}

fn invalid(stream: &ByteStream, pos: usize) -> Option<usize> {
    match scan_string(stream, pos)? {
        (end, false) => Some(end),
        _ => None,
    }
}

fn comment(stream: &ByteStream, pos: usize) -> Option<usize> {
    literal(stream, pos, "/*")?;

    let mut i = pos + 2;
    loop {
        match at(stream, i) {
            Ch('*') if at(stream, i + 1) == Ch('/') => return Some(i + 2),
            Ch(_) => i += 1,
            _ => return None,
        }
    }
}

fn whitespace(stream: &ByteStream, pos: usize) -> Option<usize> {
    let end = w(stream, pos);
    (end > pos).then_some(end)
}

/// Optional whitespace
fn w(stream: &ByteStream, pos: usize) -> usize {
    let mut i = pos;
    while at(stream, i).is_whitespace() {
        i += 1;
    }
    i
}

/// Unquoted url body: `([!#$%&*-~]|{nonascii}|{escape})*`
fn url_body(stream: &ByteStream, pos: usize) -> usize {
    let mut i = pos;
    loop {
        match at(stream, i) {
            Ch('\\') => match escape(stream, i) {
                Some(end) => i = end,
                None => return i,
            },
            Ch(c) if is_url_char(c) => i += 1,
            _ => return i,
        }
    }
}

/// Characters that may appear unescaped in an unquoted `url(...)`. The backslash is left out,
/// it always starts an escape.
pub fn is_url_char(c: char) -> bool {
    matches!(c, '!' | '#'..='&' | '*'..='[' | ']'..='~') || is_nonascii(c)
}

fn uri(stream: &ByteStream, pos: usize) -> Option<usize> {
    let start = w(stream, match_keyword(stream, pos, "url(")?);

    if let Some((end, true)) = scan_string(stream, start) {
        if let Some(end) = literal(stream, w(stream, end), ")") {
            return Some(end);
        }
    }

    let end = w(stream, url_body(stream, start));
    literal(stream, end, ")")
}

/// `!` followed by whitespace or comments, then the keyword `important`
fn important(stream: &ByteStream, pos: usize) -> Option<usize> {
    let mut i = literal(stream, pos, "!")?;
    loop {
        if let Some(next) = whitespace(stream, i).or_else(|| comment(stream, i)) {
            i = next;
        } else {
            break;
        }
    }
    match_keyword(stream, i, "important")
}

/// `</if>` with optional whitespace around its parts
fn grit_if_end(stream: &ByteStream, pos: usize) -> Option<usize> {
    let i = literal(stream, pos, "<")?;
    let i = literal(stream, w(stream, i), "/")?;
    let i = match_keyword(stream, w(stream, i), "if")?;
    literal(stream, w(stream, i), ">")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn first(input: &str) -> Option<(TokenType, usize)> {
        let stream = ByteStream::from_text(input);
        CSS21.longest_match(&stream)
    }

    #[test_case("/* x */a", TokenType::Comment, 7)]
    #[test_case("<!--", TokenType::Cdo, 4)]
    #[test_case("-->", TokenType::Cdc, 3)]
    #[test_case("< / IF >", TokenType::GritIfEnd, 8)]
    #[test_case("<if expr", TokenType::GritIf, 3)]
    #[test_case("<INCLUDE src", TokenType::GritInclude, 8)]
    #[test_case("@charset \"x\";", TokenType::CharsetSym, 9)]
    #[test_case("@\\49mport", TokenType::ImportSym, 9)]
    #[test_case("@-webkit-keyframes a", TokenType::KeyframesSym, 18)]
    #[test_case("! /* c */ IMPORTANT", TokenType::ImportantSym, 19)]
    #[test_case(":not(", TokenType::Not, 5)]
    #[test_case("url( a/b.css )x", TokenType::Uri, 14)]
    #[test_case("url(\"a b\")", TokenType::Uri, 10)]
    #[test_case("url()", TokenType::Uri, 5)]
    #[test_case("url(a\\ b.png)", TokenType::Uri, 13; "url with escaped space")]
    #[test_case("url(a\\)b)", TokenType::Uri, 9; "url with escaped parenthesis")]
    #[test_case("url(a\\\"b)", TokenType::Uri, 9; "url with escaped quote")]
    #[test_case("url(a\\41 b)", TokenType::Uri, 11; "url with hex escape")]
    #[test_case("rgb(", TokenType::Function, 4)]
    #[test_case("1em", TokenType::Ems, 3)]
    #[test_case("1emx", TokenType::Dimension, 4)]
    #[test_case(".5ex", TokenType::Exs, 4)]
    #[test_case("12\\70 x", TokenType::Length, 7)]
    #[test_case("90grad", TokenType::Angle, 6)]
    #[test_case("10s", TokenType::Time, 3)]
    #[test_case("1khz", TokenType::Freq, 4)]
    #[test_case("50%", TokenType::Percentage, 3)]
    #[test_case("3.14", TokenType::Number, 4)]
    #[test_case("3.", TokenType::Number, 1)]
    #[test_case("'it\\'s'", TokenType::QuotedString, 7)]
    #[test_case("\"open\n", TokenType::Invalid, 5)]
    #[test_case("expr", TokenType::GritExpr, 4)]
    #[test_case("expression", TokenType::Ident, 10)]
    #[test_case("-moz-x", TokenType::Ident, 6)]
    #[test_case("#fff", TokenType::Hash, 4)]
    #[test_case("  ~=", TokenType::Includes, 4)]
    #[test_case("|=", TokenType::DashMatch, 2)]
    #[test_case("*=", TokenType::SubstringMatch, 2)]
    #[test_case("  {", TokenType::LBrace, 3)]
    #[test_case(" + ", TokenType::Plus, 2)]
    #[test_case("\t\n x", TokenType::S, 3)]
    #[test_case("*", TokenType::Delim('*'), 1)]
    #[test_case("|a", TokenType::Delim('|'), 1)]
    fn longest_matches(input: &str, token_type: TokenType, len: usize) {
        assert_eq!(first(input), Some((token_type, len)));
    }

    #[test_case("$"; "dollar")]
    #[test_case("#"; "lone hash")]
    #[test_case("@"; "lone at")]
    #[test_case("\\\n"; "escaped newline")]
    fn no_match(input: &str) {
        assert_eq!(first(input), None);
    }

    #[test]
    fn unterminated_comment_is_a_slash() {
        assert_eq!(first("/* open"), Some((TokenType::Delim('/'), 1)));
    }

    #[test]
    fn url_chars() {
        assert!(is_url_char('a'));
        assert!(is_url_char('/'));
        assert!(!is_url_char('\\'));
        assert!(is_url_char('é'));
        assert!(!is_url_char(' '));
        assert!(!is_url_char('('));
        assert!(!is_url_char(')'));
        assert!(!is_url_char('"'));
        assert!(!is_url_char('\''));
    }
}
