use crate::tokenizer::{Token, TokenType};
use crate::Css;
use gritcss_shared::errors::{CssError, CssResult};

mod at_rule;
mod block;
mod declaration;
mod grit;
mod rule;
mod selector;
mod stylesheet;
mod value;

impl Css<'_> {
    /// Consumes a specific token
    pub fn consume(&mut self, token_type: TokenType) -> CssResult<Token> {
        let t = self.tokenizer.consume();
        if t.token_type != token_type {
            self.tokenizer.reconsume();
            return Err(self.unexpected(&t, &format!("{token_type:?}")));
        }

        Ok(t)
    }

    /// Consumes any token
    pub fn consume_any(&mut self) -> Token {
        self.tokenizer.consume()
    }

    pub fn consume_delim(&mut self, delimiter: char) -> CssResult<Token> {
        self.consume(TokenType::Delim(delimiter))
    }

    /// Consumes an identifier, compared case-insensitively
    pub fn consume_ident_ci(&mut self, ident: &str) -> CssResult<Token> {
        let t = self.tokenizer.consume();
        if t.is(TokenType::Ident) && t.value.eq_ignore_ascii_case(ident) {
            return Ok(t);
        }

        self.tokenizer.reconsume();
        Err(self.unexpected(&t, &format!("'{ident}'")))
    }

    /// Skips S tokens
    pub fn consume_whitespace(&mut self) {
        while self.tokenizer.lookahead(0).is_whitespace() {
            self.tokenizer.consume();
        }
    }

    /// Skips S, CDO and CDC tokens
    pub fn consume_whitespace_sgml(&mut self) {
        while matches!(
            self.tokenizer.lookahead(0).token_type,
            TokenType::S | TokenType::Cdo | TokenType::Cdc
        ) {
            self.tokenizer.consume();
        }
    }

    /// Returns the next token without consuming it
    pub fn peek(&mut self) -> Token {
        self.tokenizer.lookahead(0)
    }

    /// Syntax error for a token that does not fit the grammar at this point
    pub fn unexpected(&self, token: &Token, expected: &str) -> CssError {
        CssError::syntax(&format!("expected {expected}, found {token}"), token.location.clone())
    }

    /// Runs a production. When it fails and errors are ignored, the error is recorded, the input
    /// up to the end of the statement is skipped and `None` is returned. `nested` tells whether
    /// the statement lives inside a block, in which case the closing `}` or `</if>` of that
    /// block is left alone.
    pub(crate) fn parse_recoverable<T>(
        &mut self,
        nested: bool,
        production: impl FnOnce(&mut Self) -> CssResult<T>,
    ) -> CssResult<Option<T>> {
        let start = self.tokenizer.tell();

        match production(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.can_recover(&err) => {
                log::warn!("Ignoring error in statement: {err}");
                self.record(err);
                self.parse_until_rule_end(nested);
                self.ensure_progress(start);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Same as [`Css::parse_recoverable`], for a single declaration
    pub(crate) fn parse_recoverable_declaration<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> CssResult<T>,
    ) -> CssResult<Option<T>> {
        let start = self.tokenizer.tell();

        match production(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.can_recover(&err) => {
                log::warn!("Ignoring error in declaration: {err}");
                self.record(err);
                self.parse_until_declaration_end();
                self.ensure_progress(start);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Runs a production that may recurse into itself, failing once more than
    /// `max_nesting` of them are open
    pub(crate) fn parse_nested<T>(&mut self, production: impl FnOnce(&mut Self) -> CssResult<T>) -> CssResult<T> {
        if self.depth >= self.config.max_nesting {
            return Err(CssError::syntax(
                &format!("nesting deeper than {} levels", self.config.max_nesting),
                self.tokenizer.current_location(),
            ));
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    /// Stores a diagnostic, after the lexical errors found so far so the list stays in order
    pub(crate) fn record(&mut self, err: CssError) {
        self.collect_lexical_errors();
        self.diagnostics.push(err);
    }

    pub(crate) fn collect_lexical_errors(&mut self) {
        let errors = self.tokenizer.take_errors();
        self.diagnostics.extend(errors);
    }

    fn can_recover(&self, err: &CssError) -> bool {
        self.config.ignore_errors && matches!(err, CssError::Syntax { .. } | CssError::Construction { .. })
    }

    /// A statement that failed on its very first token (like a stray `}` in a nested block)
    /// would be retried forever, so make sure that at least that token is gone.
    fn ensure_progress(&mut self, start: usize) {
        if self.tokenizer.tell() == start && !self.tokenizer.eof() {
            self.consume_any();
        }
    }

    /// Skips to the end of the current statement: a `;` or a complete `{...}` block
    fn parse_until_rule_end(&mut self, nested: bool) {
        log::trace!("parse_until_rule_end, now at: {:?}", self.tokenizer.current_location());

        let mut depth = 0usize;
        loop {
            let t = self.consume_any();
            match t.token_type {
                TokenType::Eof => break,
                TokenType::LBrace => depth += 1,
                TokenType::Delim('}') if depth == 0 => {
                    if nested {
                        self.tokenizer.reconsume();
                    }
                    break;
                }
                TokenType::Delim('}') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenType::GritIfEnd if depth == 0 && nested => {
                    self.tokenizer.reconsume();
                    break;
                }
                TokenType::Delim(';') if depth == 0 => break,
                _ => {}
            }
        }
        self.consume_whitespace();
    }

    /// Skips to the `;`, `}` or `</if>` that ends the current declaration, without consuming it
    fn parse_until_declaration_end(&mut self) {
        log::trace!(
            "parse_until_declaration_end, now at: {:?}",
            self.tokenizer.current_location()
        );

        let mut depth = 0usize;
        loop {
            let t = self.consume_any();
            match t.token_type {
                TokenType::Eof => break,
                TokenType::LBrace => depth += 1,
                TokenType::Delim('}') if depth > 0 => depth -= 1,
                TokenType::Delim(';' | '}') | TokenType::GritIfEnd if depth == 0 => {
                    self.tokenizer.reconsume();
                    break;
                }
                _ => {}
            }
        }
    }
}
