use crate::node::{CssString, Import, Uri};
use crate::parser::value::uri_from_lexeme;
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `IMPORT_SYM S* (STRING | URI) S* [media_types] ';' S*`
    pub fn parse_import(&mut self) -> CssResult<Import> {
        log::trace!("parse_import");

        self.consume(TokenType::ImportSym)?;
        self.consume_whitespace();

        let t = self.consume_any();
        let source: Uri = match t.token_type {
            TokenType::QuotedString => CssString::from_lexeme(&t.value)?.into(),
            TokenType::Uri => uri_from_lexeme(&t.value)?,
            _ => {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&t, "a string or url"));
            }
        };
        self.consume_whitespace();

        let media_types = if self.peek().is_delim(';') {
            Vec::new()
        } else {
            self.parse_media_types()?
        };

        self.consume_delim(';')?;
        self.consume_whitespace();

        Ok(Import::new(source, media_types))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Css, ParserConfig};
    use gritcss_shared::byte_stream::ByteStream;
    use test_case::test_case;

    macro_rules! test {
        ($func:ident, $input:expr, $expected:expr) => {
            let mut stream = ByteStream::from_text($input);
            let mut parser = Css::new(&mut stream, ParserConfig::default());
            let result = parser.$func().unwrap();

            assert_eq!(result.to_string(), $expected);
            assert!(parser.tokenizer.eof());
        };
    }

    #[test]
    fn import() {
        test!(parse_import, "@import 'a.css';", "@import url(a.css);");
        test!(parse_import, "@import \"a.css\" ;", "@import url(a.css);");
        test!(parse_import, "@import url(a.css);", "@import url(a.css);");
        test!(parse_import, "@import url( 'a b.css' );", "@import url(\"a b.css\");");
        test!(parse_import, "@IMPORT url(x.css) screen, print;  ", "@import url(x.css) screen,print;");
        test!(parse_import, "@\\69mport 'x.css' print;", "@import url(x.css) print;");
    }

    #[test]
    fn import_source() {
        let mut stream = ByteStream::from_text("@import url(\"dir/a.css\") print;");
        let mut parser = Css::new(&mut stream, ParserConfig::default());
        let import = parser.parse_import().unwrap();

        assert_eq!(import.source().url(), "dir/a.css");
        assert_eq!(import.media_types(), ["print"]);
    }

    #[test_case("@import a.css;"; "bare target")]
    #[test_case("@import 'a.css'"; "missing semicolon")]
    #[test_case("@import 'a.css' print,;"; "dangling comma")]
    fn invalid_import(input: &str) {
        let mut stream = ByteStream::from_text(input);
        let mut parser = Css::new(&mut stream, ParserConfig::default());

        assert!(parser.parse_import().is_err());
    }
}
