//! Selectors are validated against the CSS2.1 grammar (plus `:not()` and the attribute
//! substring operators) and kept as canonical text: insignificant whitespace is dropped,
//! combinators are written without spaces around them.

use crate::tokenizer::{Token, TokenType};
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `selector (COMMA S* selector)*`
    pub fn parse_selectors_group(&mut self) -> CssResult<Vec<String>> {
        log::trace!("parse_selectors_group");

        let mut selectors = vec![self.parse_selector()?];
        while self.peek().is(TokenType::Comma) {
            self.consume_any();
            self.consume_whitespace();
            selectors.push(self.parse_selector()?);
        }

        Ok(selectors)
    }

    /// Simple selector sequences joined by combinators
    pub fn parse_selector(&mut self) -> CssResult<String> {
        log::trace!("parse_selector");

        let mut selector = self.parse_simple_selector_sequence()?;

        loop {
            let t = self.peek();
            match t.token_type {
                TokenType::Plus | TokenType::Greater | TokenType::Tilde => {
                    self.consume_any();
                    self.consume_whitespace();
                    selector.push_str(t.value.trim_start());
                    selector.push_str(&self.parse_simple_selector_sequence()?);
                }
                TokenType::S => {
                    self.consume_whitespace();

                    let next = self.peek();
                    if matches!(
                        next.token_type,
                        TokenType::Plus | TokenType::Greater | TokenType::Tilde
                    ) {
                        continue;
                    }
                    if !starts_simple_selector(&next) {
                        break;
                    }

                    selector.push(' ');
                    selector.push_str(&self.parse_simple_selector_sequence()?);
                }
                _ => break,
            }
        }

        Ok(selector)
    }

    /// `[type_selector | universal] (HASH | class | attrib | pseudo | negation)*`, at least one
    /// part must be present
    fn parse_simple_selector_sequence(&mut self) -> CssResult<String> {
        log::trace!("parse_simple_selector_sequence");

        let start = self.peek();
        let mut sequence = String::new();

        if is_ident_like(&start) || start.is_delim('*') || start.is_delim('|') {
            sequence.push_str(&self.parse_type_selector()?);
        }

        loop {
            let t = self.peek();
            match t.token_type {
                TokenType::Hash => {
                    self.consume_any();
                    sequence.push_str(&t.value);
                }
                TokenType::Delim('.') => sequence.push_str(&self.parse_class()?),
                TokenType::Delim('[') => sequence.push_str(&self.parse_attrib()?),
                TokenType::Delim(':') => sequence.push_str(&self.parse_pseudo()?),
                TokenType::Not => sequence.push_str(&self.parse_negation()?),
                _ => break,
            }
        }

        if sequence.is_empty() {
            return Err(self.unexpected(&start, "a selector"));
        }

        Ok(sequence)
    }

    /// `[namespace_prefix] (IDENT | '*')` where `namespace_prefix` is `[IDENT | '*'] '|'`
    fn parse_type_selector(&mut self) -> CssResult<String> {
        log::trace!("parse_type_selector");

        if self.peek().is_delim('|') {
            self.consume_any();
            return Ok(format!("|{}", self.parse_element_name()?));
        }

        let mut name = self.parse_element_name()?;

        let next = self.tokenizer.lookahead(1);
        if self.peek().is_delim('|') && (is_ident_like(&next) || next.is_delim('*')) {
            self.consume_any();
            name.push('|');
            name.push_str(&self.parse_element_name()?);
        }

        Ok(name)
    }

    fn parse_element_name(&mut self) -> CssResult<String> {
        let t = self.consume_any();
        if is_ident_like(&t) || t.is_delim('*') {
            return Ok(t.value);
        }

        self.tokenizer.reconsume();
        Err(self.unexpected(&t, "an element name"))
    }

    /// `'.' IDENT`
    fn parse_class(&mut self) -> CssResult<String> {
        log::trace!("parse_class");

        self.consume_delim('.')?;
        let t = self.consume_any();
        if !is_ident_like(&t) {
            self.tokenizer.reconsume();
            return Err(self.unexpected(&t, "a class name"));
        }

        Ok(format!(".{}", t.value))
    }

    /// `'[' S* [namespace_prefix] IDENT S* [op S* (IDENT | STRING) S*] ']'`
    fn parse_attrib(&mut self) -> CssResult<String> {
        log::trace!("parse_attrib");

        self.consume_delim('[')?;
        self.consume_whitespace();

        let mut attrib = String::from("[");

        let t = self.peek();
        if t.is_delim('|') {
            self.consume_any();
            attrib.push('|');
        } else if (is_ident_like(&t) || t.is_delim('*')) && self.tokenizer.lookahead(1).is_delim('|') {
            self.consume_any();
            self.consume_any();
            attrib.push_str(&t.value);
            attrib.push('|');
        }

        let name = self.consume_any();
        if !is_ident_like(&name) {
            self.tokenizer.reconsume();
            return Err(self.unexpected(&name, "an attribute name"));
        }
        attrib.push_str(&name.value);
        self.consume_whitespace();

        let t = self.peek();
        let operator = match t.token_type {
            TokenType::Delim('=')
            | TokenType::Includes
            | TokenType::DashMatch
            | TokenType::PrefixMatch
            | TokenType::SuffixMatch
            | TokenType::SubstringMatch => Some(t.value.trim_start()),
            _ => None,
        };

        if let Some(operator) = operator {
            self.consume_any();
            self.consume_whitespace();
            attrib.push_str(operator);

            let value = self.consume_any();
            if !is_ident_like(&value) && !value.is(TokenType::QuotedString) {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&value, "an identifier or string"));
            }
            attrib.push_str(&value.value);
            self.consume_whitespace();
        }

        self.consume_delim(']')?;
        attrib.push(']');

        Ok(attrib)
    }

    /// `':' [':'] (IDENT | FUNCTION S* expression ')')`
    fn parse_pseudo(&mut self) -> CssResult<String> {
        log::trace!("parse_pseudo");

        self.consume_delim(':')?;
        let mut pseudo = String::from(":");
        if self.peek().is_delim(':') {
            self.consume_any();
            pseudo.push(':');
        }

        let t = self.consume_any();
        match t.token_type {
            TokenType::Ident | TokenType::GritExpr => pseudo.push_str(&t.value),
            TokenType::Function => {
                self.consume_whitespace();
                pseudo.push_str(&t.value);
                pseudo.push_str(&self.parse_pseudo_arguments()?);
                self.consume_delim(')')?;
                pseudo.push(')');
            }
            _ => {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&t, "a pseudo class name"));
            }
        }

        Ok(pseudo)
    }

    /// `((PLUS | '-' | DIMENSION | NUMBER | STRING | IDENT) S*)+`
    ///
    /// Whitespace is only kept between two operands, so `2n + 1` becomes `2n+1`.
    fn parse_pseudo_arguments(&mut self) -> CssResult<String> {
        let mut arguments = String::new();
        let mut previous_sign = false;
        let mut spaced = false;

        loop {
            let t = self.peek();
            let sign = t.is(TokenType::Plus) || t.is_delim('-');
            let operand = t.token_type.is_quantity() || t.is(TokenType::QuotedString) || is_ident_like(&t);
            if !sign && !operand {
                break;
            }
            self.consume_any();

            if spaced && operand && !previous_sign && !arguments.is_empty() {
                arguments.push(' ');
            }
            arguments.push_str(t.value.trim_start());

            previous_sign = sign;
            spaced = self.peek().is_whitespace();
            self.consume_whitespace();
        }

        if arguments.is_empty() {
            let t = self.peek();
            return Err(self.unexpected(&t, "pseudo class arguments"));
        }

        Ok(arguments)
    }

    /// `:not( S* (type_selector | universal | HASH | class | attrib | pseudo) S* ')'`
    fn parse_negation(&mut self) -> CssResult<String> {
        log::trace!("parse_negation");

        self.consume(TokenType::Not)?;
        self.consume_whitespace();

        let t = self.peek();
        let argument = match t.token_type {
            TokenType::Ident | TokenType::GritExpr | TokenType::Delim('*' | '|') => self.parse_type_selector()?,
            TokenType::Hash => {
                self.consume_any();
                t.value
            }
            TokenType::Delim('.') => self.parse_class()?,
            TokenType::Delim('[') => self.parse_attrib()?,
            TokenType::Delim(':') => self.parse_pseudo()?,
            _ => return Err(self.unexpected(&t, "a negation argument")),
        };

        self.consume_whitespace();
        self.consume_delim(')')?;

        Ok(format!(":not({argument})"))
    }
}

/// The grit `expr` keyword is an ordinary identifier outside of `<if>`
fn is_ident_like(t: &Token) -> bool {
    matches!(t.token_type, TokenType::Ident | TokenType::GritExpr)
}

fn starts_simple_selector(t: &Token) -> bool {
    is_ident_like(t)
        || matches!(
            t.token_type,
            TokenType::Hash | TokenType::Not | TokenType::Delim('*' | '|' | '.' | '[' | ':')
        )
}
