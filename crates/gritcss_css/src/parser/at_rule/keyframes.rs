use crate::node::{KeyframeBlock, KeyframesRule};
use crate::tokenizer::escape::normalize;
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `KEYFRAMES_SYM S* IDENT S* LBRACE S* keyframe_block* '}' S*`
    pub fn parse_keyframes(&mut self) -> CssResult<KeyframesRule> {
        log::trace!("parse_keyframes");

        self.consume(TokenType::KeyframesSym)?;
        self.consume_whitespace();

        let t = self.consume_any();
        if !matches!(t.token_type, TokenType::Ident | TokenType::GritExpr) {
            self.tokenizer.reconsume();
            return Err(self.unexpected(&t, "an animation name"));
        }
        self.consume_whitespace();
        self.consume(TokenType::LBrace)?;

        let mut blocks = Vec::new();
        loop {
            self.consume_whitespace();

            let next = self.peek();
            if next.is_delim('}') || next.is_eof() {
                break;
            }

            if let Some(block) = self.parse_recoverable(true, |p| p.parse_keyframe_block())? {
                blocks.push(block);
            }
        }

        self.consume_delim('}')?;
        self.consume_whitespace();

        Ok(KeyframesRule::new(&t.value, blocks))
    }

    /// `key (COMMA S* key)* LBRACE S* declarations '}' S*`
    fn parse_keyframe_block(&mut self) -> CssResult<KeyframeBlock> {
        log::trace!("parse_keyframe_block");

        let mut selectors = vec![self.parse_keyframe_key()?];
        while self.peek().is(TokenType::Comma) {
            self.consume_any();
            self.consume_whitespace();
            selectors.push(self.parse_keyframe_key()?);
        }

        let declarations = self.parse_declaration_block()?;

        Ok(KeyframeBlock::new(selectors, declarations))
    }

    /// `from | to | PERCENTAGE`, lowercased
    fn parse_keyframe_key(&mut self) -> CssResult<String> {
        let t = self.consume_any();
        let key = match t.token_type {
            TokenType::Ident => {
                let name = normalize(&t.value);
                if name != "from" && name != "to" {
                    self.tokenizer.reconsume();
                    return Err(self.unexpected(&t, "'from', 'to' or a percentage"));
                }
                name
            }
            TokenType::Percentage => normalize(&t.value),
            _ => {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&t, "'from', 'to' or a percentage"));
            }
        };
        self.consume_whitespace();

        Ok(key)
    }
}
