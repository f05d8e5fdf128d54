use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io};

pub const CHAR_LF: char = '\u{000A}';
pub const CHAR_CR: char = '\u{000D}';
pub const CHAR_FF: char = '\u{000C}';

/// Encoding defines how the raw bytes of a stylesheet are decoded into characters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Encoding {
    /// Unknown encoding. The encoding is detected when bytes are read into the stream
    UNKNOWN,
    /// Stream is of UTF8 characters
    UTF8,
    /// Stream consists of 16-bit UTF characters (Little Endian)
    UTF16LE,
    /// Stream consists of 16-bit UTF characters (Big Endian)
    UTF16BE,
    /// Any other encoding, as named by a `@charset` rule or found by detection
    Legacy(&'static encoding_rs::Encoding),
}

impl Encoding {
    fn as_encoding_rs(self) -> &'static encoding_rs::Encoding {
        match self {
            Encoding::UNKNOWN | Encoding::UTF8 => encoding_rs::UTF_8,
            Encoding::UTF16LE => encoding_rs::UTF_16LE,
            Encoding::UTF16BE => encoding_rs::UTF_16BE,
            Encoding::Legacy(encoding) => encoding,
        }
    }

    fn from_encoding_rs(encoding: &'static encoding_rs::Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Encoding::UTF8
        } else if encoding == encoding_rs::UTF_16LE {
            Encoding::UTF16LE
        } else if encoding == encoding_rs::UTF_16BE {
            Encoding::UTF16BE
        } else {
            Encoding::Legacy(encoding)
        }
    }
}

/// Defines a single element in the stream. End of stream is denoted as a separate element, so
/// is Empty to indicate that the buffer is drained but not yet closed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Character {
    /// Standard UTF character
    Ch(char),
    /// Stream buffer empty and closed
    StreamEnd,
    /// Stream buffer empty (but not closed)
    StreamEmpty,
}

use Character::*;

/// Converts the given character to a char. End of stream markers are converted to 0x0000
impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            StreamEmpty | StreamEnd => 0x0000 as char,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ch(ch) => write!(f, "{ch}"),
            StreamEnd => write!(f, "StreamEnd"),
            StreamEmpty => write!(f, "StreamEmpty"),
        }
    }
}

impl Character {
    /// Returns true when the character is CSS whitespace (space, tab, CR, LF or FF)
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Ch(' ' | '\t' | CHAR_CR | CHAR_LF | CHAR_FF))
    }

    /// Returns true when the character is an ascii digit
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_digit())
    }

    /// Returns true when the character is an ascii hex digit
    pub fn is_hex_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_hexdigit())
    }
}

/// A stream of decoded characters. The tokenizer reads the stylesheet through this stream, so
/// bytes coming from disk or the network are decoded exactly once.
pub struct ByteStream {
    /// Decoded characters
    buffer: Vec<char>,
    /// Current position in the stream (in characters)
    position: usize,
    /// True when no more data will be added to the stream
    closed: bool,
    /// Encoding used (or detected) to decode the buffer
    encoding: Encoding,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new(Encoding::UNKNOWN)
    }
}

impl ByteStream {
    /// Create a new empty stream
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
            closed: false,
            encoding,
        }
    }

    /// Creates a closed stream from the given string
    #[must_use]
    pub fn from_text(data: &str) -> Self {
        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str(data);
        stream.close();
        stream
    }

    /// Populates the current buffer with the contents of the given string s
    pub fn read_from_str(&mut self, s: &str) {
        self.buffer = s.chars().collect();
        self.reset_stream();
    }

    /// Appends more characters to an open stream
    pub fn append_str(&mut self, s: &str) {
        self.buffer.extend(s.chars());
    }

    /// Decodes the given bytes into the buffer and closes the stream. When the encoding is
    /// unknown, it is detected first.
    pub fn read_from_bytes(&mut self, bytes: &[u8]) {
        if self.encoding == Encoding::UNKNOWN {
            self.encoding = Self::detect_encoding(bytes);
        }

        let (decoded, used, had_errors) = self.encoding.as_encoding_rs().decode(bytes);
        if had_errors {
            log::warn!("malformed {} sequences replaced while decoding", used.name());
        }
        self.encoding = Encoding::from_encoding_rs(used);
        self.buffer = decoded.chars().collect();
        self.reset_stream();
        self.close();
    }

    /// Populates the current buffer with everything the reader produces
    pub fn read_from_file(&mut self, mut f: impl io::Read) -> io::Result<()> {
        let mut bytes = Vec::new();
        f.read_to_end(&mut bytes)?;
        self.read_from_bytes(&bytes);
        Ok(())
    }

    /// Detect the encoding of a stylesheet: byte order mark first, then an ascii `@charset`
    /// rule at the very start, and finally statistical detection.
    #[must_use]
    pub fn detect_encoding(bytes: &[u8]) -> Encoding {
        if bytes.starts_with(b"\xEF\xBB\xBF") {
            return Encoding::UTF8;
        } else if bytes.starts_with(b"\xFF\xFE") {
            return Encoding::UTF16LE;
        } else if bytes.starts_with(b"\xFE\xFF") {
            return Encoding::UTF16BE;
        }

        if let Some(encoding) = charset_rule_label(bytes).and_then(encoding_rs::Encoding::for_label) {
            // A stylesheet that names a UTF-16 charset in ascii cannot actually be UTF-16
            if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
                return Encoding::UTF8;
            }
            return Encoding::from_encoding_rs(encoding);
        }

        // Cap the buffer size we will check to max 64KB
        const MAX_BUF_SIZE: usize = 64 * 1024;
        let (buf, complete) = if bytes.len() > MAX_BUF_SIZE {
            (&bytes[..MAX_BUF_SIZE], false)
        } else {
            (bytes, true)
        };

        let mut encoding_detector = chardetng::EncodingDetector::new();
        encoding_detector.feed(buf, complete);
        Encoding::from_encoding_rs(encoding_detector.guess(None, true))
    }

    /// Returns the encoding used to decode the stream
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Read current character
    #[must_use]
    pub fn read(&self) -> Character {
        self.look_ahead(0)
    }

    /// Looks ahead in the stream without moving the current position
    #[must_use]
    pub fn look_ahead(&self, offset: usize) -> Character {
        match self.buffer.get(self.position + offset) {
            Some(c) => Ch(*c),
            None if self.closed => StreamEnd,
            None => StreamEmpty,
        }
    }

    /// Advance with 1 character
    pub fn next(&mut self) {
        self.next_n(1);
    }

    /// Advance with n characters
    pub fn next_n(&mut self, n: usize) {
        self.position = (self.position + n).min(self.buffer.len());
    }

    /// Current position in characters
    #[must_use]
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Seeks to a specific position in characters
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.buffer.len());
    }

    /// Returns the characters between the two absolute positions as a string
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.buffer.len());
        if start >= end {
            return String::new();
        }
        self.buffer[start..end].iter().collect()
    }

    /// All decoded characters of the stream, regardless of the current position
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Resets the stream back to the start position
    pub fn reset_stream(&mut self) {
        self.position = 0;
    }

    /// Closes the stream (no more data can be added)
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true when the stream is closed
    #[must_use]
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Returns true when all characters of the buffer are read
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Returns true when the stream is closed and all characters have been read
    #[must_use]
    pub fn eof(&self) -> bool {
        self.closed() && self.exhausted()
    }
}

/// Extracts the label of a `@charset "label";` rule at the very start of the bytes
fn charset_rule_label(bytes: &[u8]) -> Option<&[u8]> {
    const PREFIX: &[u8] = b"@charset \"";

    let rest = bytes.strip_prefix(PREFIX)?;
    let end = rest.iter().take(64).position(|b| *b == b'"')?;
    if rest.get(end + 1) != Some(&b';') {
        return None;
    }
    Some(&rest[..end])
}

/// Location holds the start position of the given element in the data source
#[derive(Clone, PartialEq, Eq)]
pub struct Location {
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
    /// Character offset, starting with 0
    pub offset: usize,
}

impl Default for Location {
    /// Default to line 1, column 1
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Location {
    /// Create a new Location
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Advances the location over the given character. CR LF pairs count as a single line
    /// break, so the caller passes the previous character along.
    pub fn advance(&mut self, ch: char, previous: Option<char>) {
        self.offset += 1;
        match ch {
            CHAR_LF if previous == Some(CHAR_CR) => {}
            CHAR_LF | CHAR_CR | CHAR_FF => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stream() {
        let mut stream = ByteStream::from_text("ab\u{e9}");
        assert_eq!(stream.read(), Ch('a'));
        assert_eq!(stream.look_ahead(2), Ch('\u{e9}'));
        assert_eq!(stream.look_ahead(3), StreamEnd);

        stream.next_n(2);
        assert_eq!(stream.tell(), 2);
        assert!(!stream.eof());
        stream.next();
        assert!(stream.eof());
        assert_eq!(stream.read(), StreamEnd);

        stream.seek(1);
        assert_eq!(stream.slice(1, 3), "b\u{e9}");
    }

    #[test]
    fn test_open_stream() {
        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str("a");
        assert_eq!(stream.look_ahead(1), StreamEmpty);
        stream.append_str("b");
        assert_eq!(stream.look_ahead(1), Ch('b'));
        stream.close();
        assert_eq!(stream.look_ahead(2), StreamEnd);
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(ByteStream::detect_encoding(b"\xEF\xBB\xBFa{}"), Encoding::UTF8);
        assert_eq!(ByteStream::detect_encoding(b"\xFF\xFEa\x00"), Encoding::UTF16LE);
        assert_eq!(ByteStream::detect_encoding(b"\xFE\xFF\x00a"), Encoding::UTF16BE);
        assert_eq!(
            ByteStream::detect_encoding(b"@charset \"iso-8859-2\";"),
            Encoding::Legacy(encoding_rs::ISO_8859_2)
        );
        assert_eq!(
            ByteStream::detect_encoding(b"@charset \"utf-16\";"),
            Encoding::UTF8
        );
    }

    #[test]
    fn test_read_from_bytes() {
        let mut stream = ByteStream::default();
        stream.read_from_bytes(b"\xEF\xBB\xBFa{b:c}");
        assert_eq!(stream.encoding(), Encoding::UTF8);
        assert_eq!(stream.read(), Ch('a'));
        assert!(stream.closed());

        let mut stream = ByteStream::new(Encoding::Legacy(encoding_rs::WINDOWS_1252));
        stream.read_from_bytes(b"caf\xE9");
        assert_eq!(stream.slice(0, 4), "caf\u{e9}");
        stream.next();
        assert_eq!(stream.text(), "caf\u{e9}");
    }

    #[test]
    fn test_location_advance() {
        let mut loc = Location::default();
        loc.advance('a', None);
        assert_eq!(loc, Location::new(1, 2, 1));
        loc.advance(CHAR_CR, Some('a'));
        loc.advance(CHAR_LF, Some(CHAR_CR));
        assert_eq!(loc, Location::new(2, 1, 3));
        loc.advance(CHAR_LF, Some(CHAR_LF));
        assert_eq!(loc.line, 3);
        assert_eq!(format!("{loc}"), "3:1");
        assert_eq!(format!("{loc:?}"), "(3:1)");
    }
}
