//! JSON path references used by `@path` directives.
//!
//! Supported forms:
//!
//! - `$` (the whole event)
//! - `$.a.b`, `$.a[0]`, `$['key with space']`, `$["key"]`
//! - `a.b` (implicit root)

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::MappingError;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// A parsed path into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    source: String,
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path expression.
    pub fn parse(source: &str) -> Result<Self, MappingError> {
        let segments = Parser::new(source).parse()?;
        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// The original expression.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look the path up in `root`. `None` when any step is missing.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                Segment::Key(key) => current.as_object()?.get(key),
                Segment::Index(idx) => current.as_array()?.get(*idx),
            })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Path {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> MappingError {
        MappingError::InvalidPath {
            path: self.source.to_owned(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse(mut self) -> Result<Vec<Segment>, MappingError> {
        let mut segments = Vec::new();

        match self.peek() {
            None => return Err(self.error("path is empty")),
            Some('$') => self.pos += 1,
            Some('.') => return Err(self.error("path cannot start with `.`")),
            Some('[') => {}
            Some(_) => segments.push(Segment::Key(self.identifier()?)),
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    segments.push(Segment::Key(self.identifier()?));
                }
                '[' => {
                    self.pos += 1;
                    segments.push(self.bracket()?);
                }
                other => return Err(self.error(format!("unexpected character `{other}`"))),
            }
        }

        Ok(segments)
    }

    fn identifier(&mut self) -> Result<String, MappingError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '.' || c == '[' {
                break;
            }
            if c == ']' || c.is_whitespace() {
                return Err(self.error(format!("unexpected character `{c}`")));
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("empty segment"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn bracket(&mut self) -> Result<Segment, MappingError> {
        let segment = match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated quoted key"));
                }
                let key: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Segment::Key(key)
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits: String = self.chars[start..self.pos].iter().collect();
                let idx = digits
                    .parse()
                    .map_err(|_| self.error(format!("index `{digits}` out of range")))?;
                Segment::Index(idx)
            }
            Some(c) => return Err(self.error(format!("unexpected character `{c}` in brackets"))),
            None => return Err(self.error("unterminated bracket")),
        };

        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(segment)
            }
            _ => Err(self.error("unterminated bracket")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn key(k: &str) -> Segment {
        Segment::Key(k.into())
    }

    #[rstest]
    #[case("$", vec![])]
    #[case("$.userId", vec![key("userId")])]
    #[case("$.traits.company_name", vec![key("traits"), key("company_name")])]
    #[case("$.products[1].sku", vec![key("products"), Segment::Index(1), key("sku")])]
    #[case("$['first name']", vec![key("first name")])]
    #[case("$.traits[\"a.b\"]", vec![key("traits"), key("a.b")])]
    #[case("traits.name", vec![key("traits"), key("name")])]
    #[case("  $.event ", vec![key("event")])]
    fn parses(#[case] source: &str, #[case] expected: Vec<Segment>) {
        assert_eq!(Path::parse(source).unwrap().segments(), expected.as_slice());
    }

    #[rstest]
    #[case("")]
    #[case("$.")]
    #[case("$..a")]
    #[case("$.a[")]
    #[case("$.a[x]")]
    #[case("$['a")]
    #[case("$.a b")]
    #[case(".a")]
    #[case("$a")]
    fn rejects(#[case] source: &str) {
        let err = Path::parse(source).unwrap_err();
        assert!(matches!(err, MappingError::InvalidPath { .. }), "{source}: {err}");
    }

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let doc = json!({
            "userId": "u-1",
            "traits": {"company_name": "Acme", "first name": "Ada"},
            "products": [{"sku": "a"}, {"sku": "b"}]
        });

        let get = |p: &str| Path::parse(p).unwrap().lookup(&doc).cloned();
        assert_eq!(get("$.userId"), Some(json!("u-1")));
        assert_eq!(get("$.traits.company_name"), Some(json!("Acme")));
        assert_eq!(get("$['traits']['first name']"), Some(json!("Ada")));
        assert_eq!(get("$.products[1].sku"), Some(json!("b")));
        assert_eq!(get("$"), Some(doc.clone()));
    }

    #[test]
    fn lookup_missing_is_none() {
        let doc = json!({"traits": {"name": "Ada"}, "list": [1]});
        for p in ["$.userId", "$.traits.email", "$.traits.name.first", "$.list[3]", "$.traits[0]"] {
            assert_eq!(Path::parse(p).unwrap().lookup(&doc), None, "{p}");
        }
    }
}
