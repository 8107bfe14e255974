//! Parser for the JavaScript literal subset used by `codes.js`.
//!
//! The payload is a script assigning an array of object literals, not JSON:
//! keys are bare identifiers and strings are single-quoted. This module lexes
//! that subset and builds a [`serde_json::Value`] directly, without evaluating
//! anything. Accepted grammar:
//!
//! ```text
//! value  := array | object | string | number | true | false | null | undefined
//! array  := '[' (value? ',')* value? ']'          // holes become null
//! object := '{' (key ':' value ','?)* '}'
//! key    := identifier | string | number
//! ```
//!
//! Whitespace and `//` / `/* */` comments may appear between tokens.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Nesting limit for arrays/objects. The real payload is two levels deep.
const MAX_DEPTH: usize = 64;

/// 2^63: the first float magnitude outside `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// JS numbers are doubles, so `11.0` and `11` are the same value. Integral
/// values in `i64` range are kept as integers.
pub(crate) fn integral_f64(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < I64_BOUND).then_some(value as i64)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at byte {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl LiteralError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Str(String),
    Num(Number),
    Ident(String),
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::Colon => "`:`".into(),
            Token::Comma => "`,`".into(),
            Token::Str(_) => "string".into(),
            Token::Num(_) => "number".into(),
            Token::Ident(name) => format!("identifier `{name}`"),
            Token::End => "end of input".into(),
        }
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            match (self.peek_char(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() || c == '\u{FEFF}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.rest().find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => return Err(LiteralError::new(start, "unterminated comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Returns the next token and the byte offset it starts at.
    fn next_token(&mut self) -> Result<(Token, usize), LiteralError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok((Token::End, start));
        };
        let token = match c {
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '\'' | '"' => Token::Str(self.string()?),
            '0'..='9' | '.' | '-' | '+' => Token::Num(self.number()?),
            c if is_ident_start(c) => Token::Ident(self.ident()),
            other => {
                return Err(LiteralError::new(
                    start,
                    format!("unexpected character `{other}`"),
                ));
            }
        };
        Ok((token, start))
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_ident_continue(c) {
                break;
            }
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('\'');
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LiteralError::new(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '\n' | '\r' => {
                    return Err(LiteralError::new(self.pos - 1, "newline in string literal"));
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let at = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(LiteralError::new(at, "unterminated escape"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.peek_char().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.hex_digits(2, at)?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let code = self.unicode_escape(at)?;
                out.push(code);
            }
            // Line continuation.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.bump();
                }
            }
            '0'..='9' => {
                return Err(LiteralError::new(at, "octal escapes are not supported"));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize, at: usize) -> Result<u32, LiteralError> {
        let digits = self.rest().get(..count).unwrap_or("");
        if digits.len() != count || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
            return Err(LiteralError::new(at, "malformed hex escape"));
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| LiteralError::new(at, "malformed hex escape"))
    }

    fn unicode_escape(&mut self, at: usize) -> Result<char, LiteralError> {
        if self.peek_char() == Some('{') {
            self.bump();
            let end = self
                .rest()
                .find('}')
                .ok_or_else(|| LiteralError::new(at, "unterminated unicode escape"))?;
            let digits = &self.rest()[..end];
            let code = u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| LiteralError::new(at, "invalid unicode escape"))?;
            self.pos += end + 1;
            return Ok(code);
        }

        let high = self.hex_digits(4, at)?;
        if (0xD800..0xDC00).contains(&high) && self.rest().starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            let low = self.hex_digits(4, at)?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            self.pos = save;
        }
        Ok(char::from_u32(high).unwrap_or('\u{FFFD}'))
    }

    fn number(&mut self) -> Result<Number, LiteralError> {
        let start = self.pos;
        let negative = match self.peek_char() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        if self.peek_char() == Some('0') && matches!(self.peek_second(), Some('x' | 'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let value = i64::from_str_radix(&self.src[digits_start..self.pos], 16)
                .map_err(|_| LiteralError::new(start, "malformed hex literal"))?;
            return Ok(Number::from(if negative { -value } else { value }));
        }

        let digits_start = self.pos;
        let mut integral = true;
        self.digits();
        if self.peek_char() == Some('.') {
            integral = false;
            self.bump();
            self.digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            integral = false;
            self.bump();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.bump();
            }
            self.digits();
        }

        let text = &self.src[digits_start..self.pos];
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Err(LiteralError::new(start, "malformed number"));
        }
        if self.peek_char().is_some_and(is_ident_start) {
            return Err(LiteralError::new(start, "identifier directly after number"));
        }

        if integral && let Ok(value) = text.parse::<i64>() {
            return Ok(Number::from(if negative { -value } else { value }));
        }
        let value: f64 = text
            .parse()
            .map_err(|_| LiteralError::new(start, "malformed number"))?;
        let value = if negative { -value } else { value };
        if let Some(int) = integral_f64(value) {
            return Ok(Number::from(int));
        }
        Number::from_f64(value).ok_or_else(|| LiteralError::new(start, "number is not finite"))
    }

    fn digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(Token, usize)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<&Token, LiteralError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        match &self.peeked {
            Some((token, _)) => Ok(token),
            None => Err(LiteralError::new(self.lexer.pos, "lexer produced no token")),
        }
    }

    fn next(&mut self) -> Result<(Token, usize), LiteralError> {
        match self.peeked.take() {
            Some(t) => Ok(t),
            None => self.lexer.next_token(),
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let (token, at) = self.next()?;
        if depth > MAX_DEPTH && matches!(token, Token::LBracket | Token::LBrace) {
            return Err(LiteralError::new(at, "literal nested too deeply"));
        }
        match token {
            Token::LBracket => self.array(depth + 1),
            Token::LBrace => self.object(depth + 1),
            Token::Str(s) => Ok(Value::String(s)),
            Token::Num(n) => Ok(Value::Number(n)),
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" | "undefined" => Ok(Value::Null),
                _ => Err(LiteralError::new(
                    at,
                    format!("unexpected identifier `{name}`"),
                )),
            },
            other => Err(LiteralError::new(
                at,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    fn array(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let mut items = Vec::new();
        loop {
            if matches!(self.peek()?, Token::RBracket) {
                self.next()?;
                return Ok(Value::Array(items));
            }
            if matches!(self.peek()?, Token::Comma) {
                self.next()?;
                items.push(Value::Null);
                continue;
            }
            items.push(self.value(depth)?);
            let (token, at) = self.next()?;
            match token {
                Token::Comma => {}
                Token::RBracket => return Ok(Value::Array(items)),
                other => {
                    return Err(LiteralError::new(
                        at,
                        format!("expected `,` or `]`, found {}", other.describe()),
                    ));
                }
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let mut map = Map::new();
        loop {
            let (token, at) = self.next()?;
            let key = match token {
                Token::RBrace => return Ok(Value::Object(map)),
                Token::Ident(name) => name,
                Token::Str(s) => s,
                Token::Num(n) => n.to_string(),
                other => {
                    return Err(LiteralError::new(
                        at,
                        format!("expected a property name, found {}", other.describe()),
                    ));
                }
            };

            let (token, at) = self.next()?;
            if token != Token::Colon {
                return Err(LiteralError::new(
                    at,
                    format!("expected `:` after `{key}`, found {}", token.describe()),
                ));
            }

            let value = self.value(depth)?;
            map.insert(key, value);

            let (token, at) = self.next()?;
            match token {
                Token::Comma => {}
                Token::RBrace => return Ok(Value::Object(map)),
                other => {
                    return Err(LiteralError::new(
                        at,
                        format!("expected `,` or `}}`, found {}", other.describe()),
                    ));
                }
            }
        }
    }

    /// Byte offset just past the last consumed token.
    fn consumed(&self) -> usize {
        match &self.peeked {
            Some((_, at)) => *at,
            None => self.lexer.pos,
        }
    }
}

/// Parse one literal value from the start of `src`.
///
/// Returns the value and the byte offset where it ended; anything after it
/// (`;`, further statements) is left to the caller.
pub fn parse_prefix(src: &str) -> Result<(Value, usize), LiteralError> {
    let mut parser = Parser::new(src);
    let value = parser.value(0)?;
    Ok((value, parser.consumed()))
}

/// Parse `src` as exactly one literal, allowing a trailing `;`.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let (value, end) = parse_prefix(src)?;
    let mut lexer = Lexer::new(&src[end..]);
    lexer.skip_trivia()?;
    if lexer.peek_char() == Some(';') {
        lexer.bump();
        lexer.skip_trivia()?;
    }
    match lexer.peek_char() {
        None => Ok(value),
        Some(c) => Err(LiteralError::new(
            end + lexer.pos,
            format!("trailing `{c}` after literal"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unquoted_keys_and_single_quotes() {
        let v = parse_literal("[{oa: 'текст', form: 11, code: '0123'}]").unwrap();
        assert_eq!(v, json!([{ "oa": "текст", "form": 11, "code": "0123" }]));
    }

    #[test]
    fn double_quotes_inside_single_quoted_string() {
        let v = parse_literal(r#"{oa: '№5. "Турнир городов" ("математика")'}"#).unwrap();
        assert_eq!(v["oa"], r#"№5. "Турнир городов" ("математика")"#);
    }

    #[test]
    fn quoted_and_numeric_keys() {
        let v = parse_literal(r#"{"a": 1, 'b': 2, 3: 'c'}"#).unwrap();
        assert_eq!(v, json!({ "a": 1, "b": 2, "3": "c" }));
    }

    #[test]
    fn numbers_keep_their_kind() {
        let v = parse_literal("[10, -3, 2.5, 1e3, .5, 0x1F, +7]").unwrap();
        assert!(v[0].is_i64());
        assert_eq!(v[0], 10);
        assert_eq!(v[1], -3);
        assert!(v[2].is_f64());
        assert_eq!(v[2], 2.5);
        assert_eq!(v[3], 1000.0);
        assert_eq!(v[4], 0.5);
        assert_eq!(v[5], 31);
        assert_eq!(v[6], 7);
    }

    #[test]
    fn integral_floats_become_integers() {
        let v = parse_literal("[11.0, 1e3, -4.00, 2.5, 1e19]").unwrap();
        assert!(v[0].is_i64());
        assert_eq!(v[0], 11);
        assert!(v[1].is_i64());
        assert_eq!(v[1], 1000);
        assert_eq!(v[2], -4);
        assert!(v[3].is_f64());
        assert!(v[4].is_f64());
    }

    #[test]
    fn keywords() {
        let v = parse_literal("[true, false, null, undefined]").unwrap();
        assert_eq!(v, json!([true, false, null, null]));
    }

    #[test]
    fn trailing_commas_and_holes() {
        assert_eq!(parse_literal("[1, 2,]").unwrap(), json!([1, 2]));
        assert_eq!(parse_literal("{a: 1,}").unwrap(), json!({ "a": 1 }));
        assert_eq!(parse_literal("[1,,2]").unwrap(), json!([1, null, 2]));
    }

    #[test]
    fn escapes() {
        let v = parse_literal(r"'a\'b\n\t\\A\x42\u{1F600}\/'").unwrap();
        assert_eq!(v, "a'b\n\t\\AB\u{1F600}/");
    }

    #[test]
    fn surrogate_pair_escape() {
        let v = parse_literal(r"'\uD83D\uDE00'").unwrap();
        assert_eq!(v, "\u{1F600}");
    }

    #[test]
    fn line_continuation() {
        let v = parse_literal("'ab\\\ncd'").unwrap();
        assert_eq!(v, "abcd");
    }

    #[test]
    fn comments_between_tokens() {
        let v = parse_literal("[ // first\n {a: /* inline */ 1} ]").unwrap();
        assert_eq!(v, json!([{ "a": 1 }]));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let v = parse_literal("{a: 1, a: 2}").unwrap();
        assert_eq!(v, json!({ "a": 2 }));
    }

    #[test]
    fn prefix_stops_after_value() {
        let src = "[{a: 1}]; var other = 2;";
        let (v, end) = parse_prefix(src).unwrap();
        assert_eq!(v, json!([{ "a": 1 }]));
        assert_eq!(&src[end..], "; var other = 2;");
    }

    #[test]
    fn trailing_semicolon_allowed() {
        assert!(parse_literal("[1];\n").is_ok());
        assert!(parse_literal("[1]; x").is_err());
    }

    #[test]
    fn unterminated_string_reports_offset() {
        let err = parse_literal("[{oa: 'abc}]").unwrap_err();
        assert_eq!(err.offset, 6);
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn function_call_rejected() {
        let err = parse_literal("[alert('x')]").unwrap_err();
        assert!(err.message.contains("alert"));
    }

    #[test]
    fn missing_colon() {
        let err = parse_literal("{a 1}").unwrap_err();
        assert!(err.message.contains("expected `:`"));
    }

    #[test]
    fn missing_separator() {
        assert!(parse_literal("[1 2]").is_err());
        assert!(parse_literal("{a: 1 b: 2}").is_err());
    }

    #[test]
    fn unclosed_array() {
        let err = parse_literal("[1, 2").unwrap_err();
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn deep_nesting_rejected() {
        let src = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let err = parse_literal(&src).unwrap_err();
        assert!(err.message.contains("nested too deeply"));
    }
}
