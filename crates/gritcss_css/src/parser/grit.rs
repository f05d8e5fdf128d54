//! Grit preprocessor constructs. The guard of an `<if>` is opaque text, it is never evaluated.

use crate::node::{CssString, GritDeclarationList, GritInclude, GritMediaList, GritStatementList, Statement, Uri};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `GRIT_IF S* GRIT_EXPR S* '=' S* STRING S* GREATER`, returns the guard
    fn parse_grit_if(&mut self) -> CssResult<String> {
        log::trace!("parse_grit_if");

        self.consume(TokenType::GritIf)?;
        self.consume_whitespace();
        self.consume(TokenType::GritExpr)?;
        self.consume_whitespace();
        self.consume_delim('=')?;
        self.consume_whitespace();

        let t = self.consume(TokenType::QuotedString)?;
        let guard = CssString::from_lexeme(&t.value)?;

        self.consume_whitespace();
        self.consume(TokenType::Greater)?;

        Ok(guard.value().into_owned())
    }

    /// `<if expr="…">` statements `</if>`
    pub fn parse_grit_statements(&mut self) -> CssResult<GritStatementList> {
        log::trace!("parse_grit_statements");

        let guard = self.parse_grit_if()?;
        let statements = self.parse_nested(|p| p.parse_grit_statement_items())?;

        self.consume(TokenType::GritIfEnd)?;
        self.consume_whitespace();

        Ok(GritStatementList::new(&guard, statements))
    }

    fn parse_grit_statement_items(&mut self) -> CssResult<Vec<Statement>> {
        let mut statements = Vec::new();

        loop {
            self.consume_whitespace_sgml();

            match self.peek().token_type {
                TokenType::GritIfEnd | TokenType::Eof => break,
                TokenType::ImportSym => {
                    if let Some(import) = self.parse_recoverable(true, |p| p.parse_import())? {
                        statements.push(Statement::Import(import));
                    }
                }
                TokenType::GritInclude => {
                    if let Some(include) = self.parse_recoverable(true, |p| p.parse_grit_include())? {
                        statements.push(Statement::Include(include));
                    }
                }
                _ => {
                    if let Some(statement) = self.parse_statement(true)? {
                        statements.push(statement);
                    }
                }
            }
        }

        Ok(statements)
    }

    /// `<if expr="…">` declarations `</if>`, inside a declaration block
    pub fn parse_grit_declarations(&mut self) -> CssResult<GritDeclarationList> {
        log::trace!("parse_grit_declarations");

        let guard = self.parse_grit_if()?;
        let declarations = self.parse_nested(|p| p.parse_declarations())?;

        self.consume(TokenType::GritIfEnd)?;
        self.consume_whitespace();

        Ok(GritDeclarationList::new(&guard, declarations))
    }

    /// `<if expr="…">` rulesets `</if>`, inside `@media`
    pub fn parse_grit_media(&mut self) -> CssResult<GritMediaList> {
        log::trace!("parse_grit_media");

        let guard = self.parse_grit_if()?;
        let items = self.parse_nested(|p| p.parse_media_items())?;

        self.consume(TokenType::GritIfEnd)?;
        self.consume_whitespace();

        Ok(GritMediaList::new(&guard, items))
    }

    /// `GRIT_INCLUDE S* src S* '=' S* STRING S* GREATER`
    pub fn parse_grit_include(&mut self) -> CssResult<GritInclude> {
        log::trace!("parse_grit_include");

        self.consume(TokenType::GritInclude)?;
        self.consume_whitespace();
        self.consume_ident_ci("src")?;
        self.consume_whitespace();
        self.consume_delim('=')?;
        self.consume_whitespace();

        let t = self.consume(TokenType::QuotedString)?;
        let source = CssString::from_lexeme(&t.value)?;

        self.consume_whitespace();
        self.consume(TokenType::Greater)?;
        self.consume_whitespace();

        Ok(GritInclude::new(Uri::new(&source.value()), source.quote()))
    }
}
