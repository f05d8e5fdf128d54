use crate::node::{Ident, Page};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `PAGE_SYM S* [':' IDENT S*] LBRACE S* declarations '}' S*`
    pub fn parse_page(&mut self) -> CssResult<Page> {
        log::trace!("parse_page");

        self.consume(TokenType::PageSym)?;
        self.consume_whitespace();

        let mut pseudo_page = None;
        if self.peek().is_delim(':') {
            self.consume_any();
            let t = self.consume(TokenType::Ident)?;
            pseudo_page = Some(Ident::new(&t.value));
            self.consume_whitespace();
        }

        let declarations = self.parse_declaration_block()?;

        Ok(Page::new(declarations, pseudo_page))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Css, ParserConfig};
    use gritcss_shared::byte_stream::ByteStream;

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
    fn page() {
        test!(parse_page, "@page{}", "@page{}");
        test!(parse_page, "@page { margin: 1in }", "@page{margin:1in;}");
        test!(parse_page, "@page :left { margin-left: 4cm; }", "@page:left{margin-left:4cm;}");
        test!(parse_page, "@PAGE :first{}", "@page:first{}");
    }

    #[test]
    fn pseudo_page() {
        let mut stream = ByteStream::from_text("@page :right { a: b; c: d }");
        let mut parser = Css::new(&mut stream, ParserConfig::default());
        let page = parser.parse_page().unwrap();

        assert_eq!(page.pseudo_page().map(|p| p.name()), Some("right"));
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn pseudo_page_needs_a_name() {
        let mut stream = ByteStream::from_text("@page : {}");
        let mut parser = Css::new(&mut stream, ParserConfig::default());

        assert!(parser.parse_page().is_err());
    }
}
