//! Event filters used by presets and default subscriptions.
//!
//! Grammar:
//!
//! ```text
//! expr    := and ("or" and)*
//! and     := term ("and" term)*
//! term    := "(" expr ")" | field ("=" | "!=") string
//! field   := path, e.g. type, event, properties.plan
//! string  := "..." with \" and \\ escapes
//! ```
//!
//! `and` binds tighter than `or`. Keywords are case-insensitive.
//! Parentheses nest at most [`MAX_DEPTH`] levels.

use std::fmt;
use std::str::FromStr;

use conduit_core::Event;
use conduit_mapping::Path;
use serde_json::Value;

/// Deepest parenthesis nesting accepted by [`Subscription::parse`].
pub const MAX_DEPTH: usize = 32;

/// Errors from parsing a subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("subscription is empty")]
    Empty,

    #[error("invalid subscription at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Or(Vec<Expr>),
    And(Vec<Expr>),
    Compare { field: Path, op: Op, value: String },
}

/// A parsed subscription such as `type = "track" and event = "Signed Up"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    source: String,
    expr: Expr,
}

impl Subscription {
    pub fn parse(source: &str) -> Result<Self, SubscriptionError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(SubscriptionError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: source.len(),
            depth: 0,
        };
        let expr = parser.or()?;
        if let Some((offset, token)) = parser.tokens.get(parser.pos) {
            return Err(SubscriptionError::Syntax {
                offset: *offset,
                reason: format!("unexpected {token}"),
            });
        }
        Ok(Self {
            source: source.to_owned(),
            expr,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `event` satisfies the filter.
    ///
    /// A missing field never equals a value and always differs from one.
    pub fn matches(&self, event: &Event) -> bool {
        eval(&self.expr, event.as_value())
    }
}

impl FromStr for Subscription {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn eval(expr: &Expr, event: &Value) -> bool {
    match expr {
        Expr::Or(items) => items.iter().any(|e| eval(e, event)),
        Expr::And(items) => items.iter().all(|e| eval(e, event)),
        Expr::Compare { field, op, value } => {
            let equal = field.lookup(event).is_some_and(|actual| match actual {
                Value::String(s) => s == value,
                Value::Null => false,
                other => other.to_string() == *value,
            });
            match op {
                Op::Eq => equal,
                Op::Ne => !equal,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Eq,
    Ne,
    And,
    Or,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) => write!(f, "`{s}`"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Eq => f.write_str("`=`"),
            Self::Ne => f.write_str("`!=`"),
            Self::And => f.write_str("`and`"),
            Self::Or => f.write_str("`or`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
        }
    }
}

fn syntax(offset: usize, reason: impl Into<String>) -> SubscriptionError {
    SubscriptionError::Syntax {
        offset,
        reason: reason.into(),
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, SubscriptionError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((offset, Token::LParen));
            }
            ')' => {
                chars.next();
                tokens.push((offset, Token::RParen));
            }
            '=' => {
                chars.next();
                tokens.push((offset, Token::Eq));
            }
            '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => tokens.push((offset, Token::Ne)),
                    _ => return Err(syntax(offset, "expected `!=`")),
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => return Err(syntax(offset, "unterminated string")),
                        },
                        Some((_, ch)) => value.push(ch),
                        None => return Err(syntax(offset, "unterminated string")),
                    }
                }
                tokens.push((offset, Token::Str(value)));
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '(' | ')' | '=' | '!' | '"') {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                let token = match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => Token::Ident(word),
                };
                tokens.push((offset, token));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn or(&mut self) -> Result<Expr, SubscriptionError> {
        let mut items = vec![self.and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            items.push(self.and()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Or(items)
        })
    }

    fn and(&mut self) -> Result<Expr, SubscriptionError> {
        let mut items = vec![self.term()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            items.push(self.term()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::And(items)
        })
    }

    fn term(&mut self) -> Result<Expr, SubscriptionError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::LParen) => {
                if self.depth == MAX_DEPTH {
                    return Err(syntax(
                        offset,
                        format!("parentheses nested deeper than {MAX_DEPTH}"),
                    ));
                }
                self.depth += 1;
                let inner = self.or()?;
                self.depth -= 1;
                let close = self.offset();
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(syntax(close, "expected `)`")),
                }
            }
            Some(Token::Ident(name)) => {
                let field = Path::parse(&name).map_err(|e| syntax(offset, e.to_string()))?;
                let op_offset = self.offset();
                let op = match self.advance() {
                    Some(Token::Eq) => Op::Eq,
                    Some(Token::Ne) => Op::Ne,
                    _ => return Err(syntax(op_offset, "expected `=` or `!=`")),
                };
                let value_offset = self.offset();
                match self.advance() {
                    Some(Token::Str(value)) => Ok(Expr::Compare { field, op, value }),
                    _ => Err(syntax(value_offset, "expected a quoted string")),
                }
            }
            Some(other) => Err(syntax(offset, format!("unexpected {other}"))),
            None => Err(syntax(offset, "unexpected end of input")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::EventType;
    use rstest::rstest;
    use serde_json::json;

    fn track(name: &str) -> Event {
        Event::new(EventType::Track)
            .with("event", json!(name))
            .with("properties", json!({"plan": "pro", "seats": 3}))
    }

    #[rstest]
    #[case(r#"type = "track""#, true)]
    #[case(r#"type = "identify""#, false)]
    #[case(r#"type != "identify""#, true)]
    #[case(r#"type = "track" and event = "Signed Up""#, true)]
    #[case(r#"type = "track" and event = "Logged In""#, false)]
    #[case(r#"type = "identify" or event = "Signed Up""#, true)]
    #[case(r#"type = "identify" or type = "page" and event = "Signed Up""#, false)]
    #[case(r#"(type = "identify" or type = "track") and event = "Signed Up""#, true)]
    #[case(r#"properties.plan = "pro""#, true)]
    #[case(r#"properties.seats = "3""#, true)]
    #[case(r#"userId = "u-1""#, false)]
    #[case(r#"userId != "u-1""#, true)]
    #[case(r#"TYPE = "track" AND event = "Signed Up""#, false)]
    #[case(r#"type = "track" AND event = "Signed Up""#, true)]
    fn matching(#[case] source: &str, #[case] expected: bool) {
        let sub = Subscription::parse(source).unwrap();
        assert_eq!(sub.matches(&track("Signed Up")), expected, "{source}");
    }

    #[test]
    fn escaped_quotes() {
        let sub = Subscription::parse(r#"event = "Said \"hi\"""#).unwrap();
        assert!(sub.matches(&track(r#"Said "hi""#)));
    }

    #[rstest]
    #[case("", SubscriptionError::Empty)]
    #[case("   ", SubscriptionError::Empty)]
    fn empty(#[case] source: &str, #[case] expected: SubscriptionError) {
        assert_eq!(Subscription::parse(source).unwrap_err(), expected);
    }

    #[rstest]
    #[case(r#"type "track""#)]
    #[case(r#"type = track"#)]
    #[case(r#"type = "track" and"#)]
    #[case(r#"type = "track"#)]
    #[case(r#"(type = "track""#)]
    #[case(r#"type ! "track""#)]
    #[case(r#"type = "track" "extra""#)]
    #[case(r#"= "track""#)]
    fn syntax_errors(#[case] source: &str) {
        let err = Subscription::parse(source).unwrap_err();
        assert!(matches!(err, SubscriptionError::Syntax { .. }), "{source}: {err}");
    }

    fn nested(depth: usize) -> String {
        format!("{}type = \"track\"{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let sub = Subscription::parse(&nested(MAX_DEPTH)).unwrap();
        assert!(sub.matches(&track("Signed Up")));
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let err = Subscription::parse(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(
            err,
            SubscriptionError::Syntax {
                offset: MAX_DEPTH,
                reason: format!("parentheses nested deeper than {MAX_DEPTH}"),
            }
        );

        let err = Subscription::parse(&nested(100_000)).unwrap_err();
        assert!(matches!(err, SubscriptionError::Syntax { .. }));
    }

    #[test]
    fn syntax_error_reports_offset() {
        let err = Subscription::parse(r#"type = track"#).unwrap_err();
        assert_eq!(
            err,
            SubscriptionError::Syntax {
                offset: 7,
                reason: "expected a quoted string".into()
            }
        );
    }
}
