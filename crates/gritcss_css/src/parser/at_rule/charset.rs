use crate::node::{Charset, CssString};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `CHARSET_SYM STRING ';'`
    pub fn parse_charset(&mut self) -> CssResult<Charset> {
        log::trace!("parse_charset");

        self.consume(TokenType::CharsetSym)?;
        let t = self.consume(TokenType::QuotedString)?;
        let encoding = CssString::from_lexeme(&t.value)?;
        self.consume_delim(';')?;

        Ok(Charset::new(&encoding.value()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Css, ParserConfig};
    use gritcss_shared::byte_stream::ByteStream;
    use test_case::test_case;

    #[test_case("@charset \"utf-8\";", Some("utf-8"))]
    #[test_case("@charset 'ISO-8859-1';", Some("ISO-8859-1"))]
    #[test_case("@charset  \"utf-8\";", None; "exactly one space")]
    #[test_case("@CHARSET \"utf-8\";", None; "lowercase only")]
    #[test_case("@charset \"utf-8\"", None; "missing semicolon")]
    #[test_case("@charset utf-8;", None; "unquoted")]
    fn charset(input: &str, expected: Option<&str>) {
        let mut stream = ByteStream::from_text(input);
        let mut parser = Css::new(&mut stream, ParserConfig::default());

        let result = parser.parse_charset().ok();
        assert_eq!(result.as_ref().map(|c| c.encoding()), expected);
    }
}
