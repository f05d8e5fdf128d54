use crate::node::DeclarationItem;
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `LBRACE S* declarations '}' S*`
    pub fn parse_declaration_block(&mut self) -> CssResult<Vec<DeclarationItem>> {
        log::trace!("parse_declaration_block");

        self.consume(TokenType::LBrace)?;
        let declarations = self.parse_declarations()?;
        self.consume_delim('}')?;
        self.consume_whitespace();

        Ok(declarations)
    }

    /// Declaration items up to, but not including, the `}` or `</if>` that closes the block.
    /// Empty declarations are dropped.
    pub fn parse_declarations(&mut self) -> CssResult<Vec<DeclarationItem>> {
        log::trace!("parse_declarations");

        let mut declarations = Vec::new();

        loop {
            self.consume_whitespace();

            match self.peek().token_type {
                TokenType::Delim('}') | TokenType::GritIfEnd | TokenType::Eof => break,
                TokenType::Delim(';') => {
                    self.consume_any();
                }
                TokenType::GritIf => {
                    if let Some(list) = self.parse_recoverable_declaration(|p| p.parse_grit_declarations())? {
                        declarations.push(DeclarationItem::Conditional(list));
                    }
                }
                TokenType::GritInclude => {
                    if let Some(include) = self.parse_recoverable_declaration(|p| p.parse_grit_include())? {
                        declarations.push(DeclarationItem::Include(include));
                    }
                }
                _ => {
                    if let Some(declaration) = self.parse_recoverable_declaration(|p| p.parse_declaration())? {
                        declarations.push(DeclarationItem::Declaration(declaration));
                    }
                }
            }
        }

        Ok(declarations)
    }
}
