use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

mod charset;
mod import;
mod keyframes;
mod media;
mod page;

impl Css<'_> {
    /// `IDENT S* (COMMA S* IDENT S*)*`
    ///
    /// Media types are kept as written. `expr` scans as a grit keyword but is a valid name here.
    pub fn parse_media_types(&mut self) -> CssResult<Vec<String>> {
        log::trace!("parse_media_types");

        let mut media_types = Vec::new();

        loop {
            let t = self.consume_any();
            if !matches!(t.token_type, TokenType::Ident | TokenType::GritExpr) {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&t, "a media type"));
            }
            media_types.push(t.value);
            self.consume_whitespace();

            if !self.peek().is(TokenType::Comma) {
                break;
            }
            self.consume_any();
            self.consume_whitespace();
        }

        Ok(media_types)
    }
}
