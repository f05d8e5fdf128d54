use crate::node::{CssString, Expr, Function, Hexcolor, Ident, Operator, Term, Uri, Value};
use crate::tokenizer::escape::decode_escapes;
use crate::tokenizer::{Token, TokenType};
use crate::Css;
use gritcss_shared::errors::{CssError, CssResult};

impl Css<'_> {
    /// `term (operator? term)*` where the operator is `/` or `,`, and juxtaposition otherwise
    pub fn parse_expr(&mut self) -> CssResult<Expr> {
        log::trace!("parse_expr");

        let mut expr = Expr::new(self.parse_term()?);

        loop {
            let t = self.peek();
            let operator = match t.token_type {
                TokenType::Delim('/') => Operator::Slash,
                TokenType::Comma => Operator::Comma,
                _ if starts_term(&t) => {
                    expr = expr.with(Operator::Space, self.parse_term()?);
                    continue;
                }
                _ => break,
            };

            self.consume_any();
            self.consume_whitespace();
            expr = expr.with(operator, self.parse_term()?);
        }

        Ok(expr)
    }

    /// `[unary_operator] quantity S* | STRING S* | IDENT S* | URI S* | hexcolor | function`
    pub fn parse_term(&mut self) -> CssResult<Value> {
        log::trace!("parse_term");

        let t = self.consume_any();
        let value = match t.token_type {
            TokenType::Delim('-') | TokenType::Plus => {
                let sign = if t.is(TokenType::Plus) { '+' } else { '-' };

                // The sign must be directly attached to the quantity
                let q = self.consume_any();
                if !q.token_type.is_quantity() {
                    self.tokenizer.reconsume();
                    return Err(self.unexpected(&q, "a number after the unary operator"));
                }
                Value::Term(Term::new(&q.normalized(), Some(sign))?)
            }
            tt if tt.is_quantity() => Value::Term(Term::new(&t.normalized(), None)?),
            TokenType::QuotedString => Value::String(CssString::from_lexeme(&t.value)?),
            TokenType::Ident | TokenType::GritExpr => Value::Ident(Ident::new(&t.value)),
            TokenType::Uri => Value::Uri(uri_from_lexeme(&t.value)?),
            TokenType::Hash => Value::Hexcolor(Hexcolor::new(&t.value)?),
            TokenType::Function => return self.parse_function(&t),
            TokenType::Invalid => {
                return Err(CssError::syntax("unterminated string", t.location));
            }
            _ => {
                self.tokenizer.reconsume();
                return Err(self.unexpected(&t, "a value"));
            }
        };

        self.consume_whitespace();

        Ok(value)
    }

    /// `FUNCTION S* [expr] ')' S*`, the FUNCTION token is already consumed
    fn parse_function(&mut self, name: &Token) -> CssResult<Value> {
        log::trace!("parse_function");

        let name = name.value.strip_suffix('(').unwrap_or(&name.value);
        self.consume_whitespace();

        let parameters = self.parse_nested(|p| {
            if p.peek().is_delim(')') {
                Ok(Expr::default())
            } else {
                p.parse_expr()
            }
        })?;

        self.consume_delim(')')?;
        self.consume_whitespace();

        Ok(Value::Function(Function::new(name, parameters)))
    }
}

/// Returns true when the token can start a term
fn starts_term(t: &Token) -> bool {
    t.token_type.is_quantity()
        || matches!(
            t.token_type,
            TokenType::Delim('-')
                | TokenType::Plus
                | TokenType::QuotedString
                | TokenType::Ident
                | TokenType::GritExpr
                | TokenType::Uri
                | TokenType::Hash
                | TokenType::Function
                | TokenType::Invalid
        )
}

/// Extracts the target of a URI lexeme. Quotes are removed and every escape is resolved, so
/// the target is the url itself.
pub(crate) fn uri_from_lexeme(lexeme: &str) -> CssResult<Uri> {
    let body = lexeme
        .find('(')
        .and_then(|start| lexeme.get(start + 1..))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| CssError::construction(&format!("not a url: {lexeme}")))?;

    let is_space = |c: char| matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C');
    let body = body.trim_start_matches(is_space);
    let trimmed = body.trim_end_matches(is_space);
    if trimmed.starts_with(|c: char| c == '"' || c == '\'') {
        return Ok(Uri::from(CssString::from_lexeme(trimmed)?));
    }

    // An escaped space at the end belongs to the target
    let backslashes = trimmed.chars().rev().take_while(|c| *c == '\\').count();
    let body = if backslashes % 2 == 1 {
        body.get(..trimmed.len() + 1).unwrap_or(trimmed)
    } else {
        trimmed
    };

    Ok(Uri::new(&decode_escapes(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gritcss_shared::byte_stream::ByteStream;
    use test_case::test_case;

    fn expr(input: &str) -> CssResult<Expr> {
        let mut stream = ByteStream::from_text(input);
        let mut parser = Css::new(&mut stream, crate::ParserConfig::default());
        parser.parse_expr()
    }

    #[test_case("12PX", "12px"; "units are lowercased")]
    #[test_case("12\\70 x", "12px"; "escaped units")]
    #[test_case("1.5EM", "1.5em")]
    #[test_case("50%", "50%")]
    #[test_case("-1px", "-1px")]
    #[test_case("+.5", "+.5")]
    #[test_case("0 -1px +2px", "0 -1px +2px"; "signed terms in a list")]
    #[test_case("2Xyz", "2xyz"; "dimension")]
    #[test_case("1\\28 X", "1\\28 x"; "escape that would split the dimension")]
    #[test_case("1\\2d x", "1-x"; "escape that keeps the dimension")]
    #[test_case("a,b , c", "a,b,c")]
    #[test_case("a / b", "a/b")]
    #[test_case("Red", "Red"; "identifiers keep case")]
    #[test_case("#FfF", "#FfF")]
    #[test_case("'x'", "\"x\"")]
    #[test_case("rgb( 1 , 2,3 )", "rgb(1,2,3)")]
    #[test_case("foo()", "foo()"; "empty arguments")]
    #[test_case("story(bro)", "story(bro)")]
    #[test_case("url( 'a b.png' )", "url(\"a b.png\")")]
    #[test_case("url(Img/A.PNG)", "url(Img/A.PNG)")]
    #[test_case("url(\"x\\bc.png\")", "url(x\u{bc}.png)"; "decoded url")]
    #[test_case("url('a\\\\b')", "url(\"a\\\\b\")"; "backslash in url")]
    #[test_case("url(a\\)b)", "url(\"a)b\")"; "escaped parenthesis in url")]
    fn expressions(input: &str, expected: &str) {
        assert_eq!(expr(input).unwrap().to_string(), expected);
    }

    #[test_case("- 1px"; "detached sign")]
    #[test_case("+a"; "sign before identifier")]
    #[test_case("'open"; "unterminated string")]
    #[test_case("rgb(1"; "unclosed function")]
    #[test_case(";"; "no value")]
    fn invalid_expressions(input: &str) {
        assert!(matches!(expr(input), Err(CssError::Syntax { .. })));
    }

    #[test]
    fn function_nesting_is_limited() {
        let deep = format!("{}1{}", "f(".repeat(10_000), ")".repeat(10_000));
        let err = expr(&deep).unwrap_err();
        assert!(matches!(err, CssError::Syntax { ref message, .. } if message.contains("nesting")));

        let allowed = format!("{}1{}", "f(".repeat(64), ")".repeat(64));
        assert_eq!(expr(&allowed).unwrap().to_string(), allowed);

        let mut stream = ByteStream::from_text("f(g(1))");
        let config = crate::ParserConfig {
            max_nesting: 1,
            ..Default::default()
        };
        let mut parser = Css::new(&mut stream, config);
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn term_kinds() {
        let e = expr("1px a #fff 'b' url(c) d(e)").unwrap();
        let kinds: Vec<&str> = e
            .terms()
            .iter()
            .map(|t| match t.value {
                Value::Term(_) => "term",
                Value::Ident(_) => "ident",
                Value::Hexcolor(_) => "hexcolor",
                Value::String(_) => "string",
                Value::Uri(_) => "uri",
                Value::Function(_) => "function",
            })
            .collect();
        assert_eq!(kinds, vec!["term", "ident", "hexcolor", "string", "uri", "function"]);
    }

    #[test_case("url(a.css)", "a.css"; "bare")]
    #[test_case("URL( a.css )", "a.css"; "padded")]
    #[test_case("url('a.css')", "a.css"; "quoted")]
    #[test_case("url(\"a\\\"b\")", "a\"b"; "escaped quote")]
    #[test_case("url(a\\29 b)", "a)b"; "hex escape")]
    #[test_case("url(\"x\\bc.png\")", "x\u{bc}.png"; "quoted hex escape")]
    #[test_case("url('a\\\\b')", "a\\b"; "quoted backslash")]
    #[test_case("url(\"a\\\nb\")", "ab"; "quoted continuation")]
    #[test_case("url(a\\ b.png)", "a b.png"; "escaped space")]
    #[test_case("url(a\\)b)", "a)b"; "escaped parenthesis")]
    #[test_case("url( a\\  )", "a "; "escaped trailing space")]
    #[test_case("url()", ""; "empty")]
    fn uri_targets(lexeme: &str, expected: &str) {
        assert_eq!(uri_from_lexeme(lexeme).unwrap().url(), expected);
    }
}
