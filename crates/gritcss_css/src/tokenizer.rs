use crate::tokenizer::definition::{ScannerDefinition, CSS21};
use gritcss_shared::byte_stream::{ByteStream, Character, Location};
use gritcss_shared::errors::{CssError, CssResult};
use crate::tokenizer::escape::normalize;
use cow_utils::CowUtils;
use std::fmt;

mod definition;
pub mod escape;
pub mod letter;

pub use definition::is_url_char;

/// Kinds of tokens produced by the CSS2.1 scanner. The matched text is kept in [`Token::value`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenType {
    /// `/* ... */`, never handed to the parser
    Comment,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// `</if>`
    GritIfEnd,
    /// `<if`
    GritIf,
    /// `<include`
    GritInclude,
    /// `@charset ` including the single trailing space
    CharsetSym,
    ImportSym,
    PageSym,
    MediaSym,
    KeyframesSym,
    /// `!important`, possibly with whitespace or comments after the `!`
    ImportantSym,
    /// `:not(`
    Not,
    /// `url(...)` with its quoted or unquoted target
    Uri,
    /// An identifier directly followed by `(`
    Function,
    Ems,
    Exs,
    Length,
    Angle,
    Time,
    Freq,
    /// A number followed by an identifier that is not a known unit
    Dimension,
    Percentage,
    Number,
    QuotedString,
    /// A string that is not closed before the end of the line
    Invalid,
    /// The `expr` attribute of a grit `<if>`
    GritExpr,
    Ident,
    Hash,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `{` with the whitespace before it
    LBrace,
    /// `+` with the whitespace before it
    Plus,
    /// `>` with the whitespace before it
    Greater,
    /// `,` with the whitespace before it
    Comma,
    /// `~` with the whitespace before it
    Tilde,
    /// Whitespace
    S,
    /// Single character literal: one of `* - : ; . = / ) } [ ] |`
    Delim(char),
    Eof,
}

impl TokenType {
    /// Returns true for the numeric token kinds that carry a value (and maybe a unit)
    pub fn is_quantity(&self) -> bool {
        matches!(
            self,
            TokenType::Ems
                | TokenType::Exs
                | TokenType::Length
                | TokenType::Angle
                | TokenType::Time
                | TokenType::Freq
                | TokenType::Dimension
                | TokenType::Percentage
                | TokenType::Number
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Text matched by the scanner
    pub value: String,
    /// Location of the token in the stream
    pub location: Location,
}

impl Token {
    /// Returns a new token for the given type on the given location
    pub fn new(token_type: TokenType, value: &str, location: Location) -> Token {
        Token {
            token_type,
            value: value.to_string(),
            location,
        }
    }

    pub(crate) fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    pub(crate) fn is_delim(&self, delim: char) -> bool {
        matches!(self.token_type, TokenType::Delim(c) if c == delim)
    }

    pub(crate) fn is_whitespace(&self) -> bool {
        self.is(TokenType::S)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.is(TokenType::Eof)
    }

    /// The lexeme with its escapes resolved and lowercased. When the decoded text would scan
    /// differently (`1\28 x` becomes `1(x`) the escapes are kept and only the case is folded.
    pub(crate) fn normalized(&self) -> String {
        if !self.value.contains('\\') {
            return self.value.cow_to_lowercase().into_owned();
        }

        let decoded = normalize(&self.value);
        let stream = ByteStream::from_text(&decoded);
        match CSS21.longest_match(&stream) {
            Some((token_type, len))
                if len == decoded.chars().count()
                    && (token_type == self.token_type
                        || (token_type.is_quantity() && self.token_type.is_quantity())) =>
            {
                decoded
            }
            _ => self.value.cow_to_lowercase().into_owned(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "end of input"),
            _ => write!(f, "{:?} '{}'", self.token_type, self.value),
        }
    }
}

/// CSS2.1 tokenizer.
///
/// Tokens are produced lazily and buffered, so the parser can look ahead and reconsume. Comments
/// are dropped. Characters that no rule matches are reported as lexical errors and skipped;
/// those errors are collected and can be retrieved with [`Tokenizer::take_errors`].
pub struct Tokenizer<'stream> {
    stream: &'stream mut ByteStream,
    definition: &'static ScannerDefinition,
    /// Position of the NEXT token to consume. Beyond the buffered tokens everything is EOF
    position: usize,
    /// Tokens produced so far
    tokens: Vec<Token>,
    /// Location of the next character in the stream
    cur_location: Location,
    /// Last character read from the stream, needed for CR LF line counting
    last_char: Option<char>,
    /// Lexical errors found while producing tokens
    errors: Vec<CssError>,
}

impl<'stream> Tokenizer<'stream> {
    /// Creates a new tokenizer with the given stream that starts on the given location. This does
    /// not have to be 1:1, which is useful when the stylesheet is embedded in another document.
    pub fn new(stream: &'stream mut ByteStream, location: Location) -> Self {
        Self {
            stream,
            definition: &CSS21,
            position: 0,
            tokens: Vec::new(),
            cur_location: location,
            last_char: None,
            errors: Vec::new(),
        }
    }

    /// Location of the next character that will be scanned
    pub fn current_location(&self) -> Location {
        self.cur_location.clone()
    }

    /// Returns true when the next token to consume is EOF
    pub fn eof(&mut self) -> bool {
        self.lookahead(0).is_eof()
    }

    /// Index of the next token to consume
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Looks ahead at the next token with offset. So lookahead(0) returns the token that the
    /// next consume() will return.
    pub fn lookahead(&mut self, offset: usize) -> Token {
        while self.tokens.len() <= self.position + offset {
            if self.tokens.last().is_some_and(Token::is_eof) {
                break;
            }
            let token = self.next_token();
            self.tokens.push(token);
        }

        match self.tokens.get(self.position + offset).or_else(|| self.tokens.last()) {
            Some(token) => token.clone(),
            None => Token::new(TokenType::Eof, "", self.current_location()),
        }
    }

    /// Looks ahead at the next token that is not whitespace
    pub fn lookahead_sc(&mut self, offset: usize) -> Token {
        let mut i = offset;
        loop {
            let t = self.lookahead(i);
            if !t.is_whitespace() {
                return t;
            }
            i += 1;
        }
    }

    /// Consumes the next token and returns it. Returns EOF forever once the stream is drained.
    pub fn consume(&mut self) -> Token {
        let token = self.lookahead(0);
        self.position += 1;

        log::trace!("{:?}", token);

        token
    }

    /// Pushes the current position back so the next read will return the same token again
    pub fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Returns the lexical errors collected so far and clears the list
    pub fn take_errors(&mut self) -> Vec<CssError> {
        std::mem::take(&mut self.errors)
    }

    /// Scans the next token directly from the stream, bypassing the lookahead buffer.
    ///
    /// Returns `None` at the end of the stream, and an error for a character that cannot start
    /// any token. Scanning resumes right after that character.
    pub fn scan(&mut self) -> Option<CssResult<Token>> {
        loop {
            let Character::Ch(current) = self.stream.read() else {
                return None;
            };
            let location = self.current_location();

            match self.definition.longest_match(self.stream) {
                Some((TokenType::Comment, len)) => {
                    self.advance(len);
                }
                Some((token_type, len)) => {
                    let start = self.stream.tell();
                    let value = self.stream.slice(start, start + len);
                    self.advance(len);
                    return Some(Ok(Token::new(token_type, &value, location)));
                }
                None => {
                    self.advance(1);
                    return Some(Err(CssError::Lexical {
                        character: current,
                        location,
                    }));
                }
            }
        }
    }

    /// Produces the next token for the buffer. Lexical errors are logged and collected.
    fn next_token(&mut self) -> Token {
        loop {
            match self.scan() {
                Some(Ok(token)) => return token,
                Some(Err(err)) => {
                    log::warn!("{err}");
                    self.errors.push(err);
                }
                None => return Token::new(TokenType::Eof, "", self.current_location()),
            }
        }
    }

    /// Moves the stream forward, keeping track of lines and columns
    fn advance(&mut self, len: usize) {
        for _ in 0..len {
            let Character::Ch(c) = self.stream.read() else {
                break;
            };
            self.cur_location.advance(c, self.last_char);
            self.last_char = Some(c);
            self.stream.next();
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = CssResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan()
    }
}
