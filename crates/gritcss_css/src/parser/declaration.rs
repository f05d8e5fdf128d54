use crate::node::{Declaration, Ident};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `property S* ':' S* expr [IMPORTANT_SYM S*]`, followed by `;`, `}` or `</if>`
    pub fn parse_declaration(&mut self) -> CssResult<Declaration> {
        log::trace!("parse_declaration");

        let property = self.parse_property_name()?;
        self.consume_whitespace();
        self.consume_delim(':')?;
        self.consume_whitespace();

        let value = self.parse_expr()?;

        let important = self.peek().is(TokenType::ImportantSym);
        if important {
            self.consume_any();
            self.consume_whitespace();
        }

        let t = self.peek();
        match t.token_type {
            TokenType::Delim(';' | '}') | TokenType::GritIfEnd | TokenType::Eof => {}
            _ => return Err(self.unexpected(&t, "';' or '}' after the declaration")),
        }

        Ok(Declaration::new(property, value, important))
    }

    pub fn parse_property_name(&mut self) -> CssResult<Ident> {
        log::trace!("parse_property_name");

        let t = self.consume_any();
        match t.token_type {
            TokenType::Ident | TokenType::GritExpr => Ok(Ident::new(&t.value)),
            _ => {
                self.tokenizer.reconsume();
                Err(self.unexpected(&t, "a property name"))
            }
        }
    }
}
