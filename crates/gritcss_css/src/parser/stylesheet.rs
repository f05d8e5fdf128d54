use crate::node::{ImportItem, Statement, Stylesheet};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::{CssError, CssResult};

impl Css<'_> {
    /// `[charset] (S | CDO | CDC | import | include | statement)*`
    ///
    /// Imports and includes are collected separately from the other statements, wherever they
    /// appear at the top level.
    pub fn parse_stylesheet(&mut self) -> CssResult<Stylesheet> {
        log::trace!("parse_stylesheet");

        let charset = if self.peek().is(TokenType::CharsetSym) {
            self.parse_recoverable(false, |p| p.parse_charset())?
        } else {
            None
        };

        let mut imports = Vec::new();
        let mut statements = Vec::new();

        loop {
            self.consume_whitespace_sgml();

            match self.peek().token_type {
                TokenType::Eof => break,
                TokenType::ImportSym => {
                    if let Some(import) = self.parse_recoverable(false, |p| p.parse_import())? {
                        imports.push(ImportItem::Import(import));
                    }
                }
                TokenType::GritInclude => {
                    if let Some(include) = self.parse_recoverable(false, |p| p.parse_grit_include())? {
                        imports.push(ImportItem::Include(include));
                    }
                }
                _ => {
                    if let Some(statement) = self.parse_statement(false)? {
                        statements.push(statement);
                    }
                }
            }
        }

        Ok(Stylesheet::new(statements, imports, charset))
    }

    /// `ruleset | media | page | keyframes | grit conditional`
    pub fn parse_statement(&mut self, nested: bool) -> CssResult<Option<Statement>> {
        log::trace!("parse_statement");

        let t = self.peek();
        self.parse_recoverable(nested, |p| match t.token_type {
            TokenType::MediaSym => p.parse_media().map(Statement::Media),
            TokenType::PageSym => p.parse_page().map(Statement::Page),
            TokenType::KeyframesSym => p.parse_keyframes().map(Statement::Keyframes),
            TokenType::GritIf => p.parse_grit_statements().map(Statement::Conditional),
            TokenType::CharsetSym => Err(CssError::syntax(
                "@charset is only allowed at the start of a stylesheet",
                t.location.clone(),
            )),
            _ => p.parse_ruleset().map(Statement::Ruleset),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Css, ParserConfig};
    use gritcss_shared::errors::CssError;
    use test_case::test_case;

    fn parse(input: &str) -> String {
        Css::parse_str(input, ParserConfig::default()).unwrap().to_string()
    }

    #[test_case("", ""; "empty")]
    #[test_case("  <!-- a{} -->  ", "a{}\n"; "sgml comments")]
    #[test_case("a{} b{}", "a{}\nb{}\n"; "two rulesets")]
    #[test_case("@charset \"utf-8\"; a{}", "@charset \"utf-8\";\na{}\n"; "charset")]
    #[test_case("@import 'a.css'; a{}", "@import url(a.css);\na{}\n"; "import")]
    #[test_case("a{} @import 'b.css';", "@import url(b.css);\na{}\n"; "late import is hoisted")]
    #[test_case("<include src='x.css'> a{}", "<include src='x.css'>\na{}\n"; "include")]
    fn stylesheets(input: &str, expected: &str) {
        assert_eq!(parse(input), expected);
    }

    #[test]
    fn charset_must_come_first() {
        let err = Css::parse_str("a{} @charset \"utf-8\";", ParserConfig::default()).unwrap_err();
        assert!(matches!(err, CssError::Syntax { .. }));

        let err = Css::parse_str(" @charset \"utf-8\";", ParserConfig::default()).unwrap_err();
        assert!(matches!(err, CssError::Syntax { .. }));
    }

    #[test]
    fn iteration_follows_charset_imports_statements() {
        let sheet = Css::parse_str(
            "@charset \"utf-8\";@import 'a.css';a{}@media print{b{}}",
            ParserConfig::default(),
        )
        .unwrap();

        assert_eq!(sheet.len(), 4);
        assert!(sheet.charset().is_some());
        assert_eq!(sheet.imports().len(), 1);
        assert_eq!(sheet.statements().len(), 2);
    }
}
