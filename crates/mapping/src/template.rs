//! `{{ path }}` string templates used by `@template` directives.

use serde_json::Value;

use crate::error::MappingError;
use crate::path::Path;

/// Maximum number of placeholders in a single template.
const MAX_TEMPLATE_EXPRESSIONS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Static(String),
    Placeholder(Path),
}

/// A parsed template such as `"{{traits.name}} <{{traits.email}}>"`.
///
/// Placeholders are paths (implicit root allowed). Rendering never
/// fails: missing values render as the empty string, strings render raw
/// and every other value renders as compact JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, MappingError> {
        let error = |reason: String| MappingError::InvalidTemplate {
            template: source.to_owned(),
            reason,
        };

        let mut parts = Vec::new();
        let mut rest = source;
        let mut placeholders = 0usize;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                parts.push(Part::Static(rest[..open].to_owned()));
            }
            let after = &rest[open + 2..];
            let offset = source.len() - rest.len() + open;
            let close = after
                .find("}}")
                .ok_or_else(|| error(format!("unclosed `{{{{` at offset {offset}")))?;
            let expr = after[..close].trim();
            if expr.is_empty() {
                return Err(error("empty placeholder".into()));
            }
            let path = Path::parse(expr).map_err(|err| error(err.to_string()))?;
            parts.push(Part::Placeholder(path));

            placeholders += 1;
            if placeholders > MAX_TEMPLATE_EXPRESSIONS {
                return Err(error(format!(
                    "more than {MAX_TEMPLATE_EXPRESSIONS} placeholders"
                )));
            }
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            parts.push(Part::Static(rest.to_owned()));
        }

        Ok(Self {
            source: source.to_owned(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of `{{ }}` placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Placeholder(_)))
            .count()
    }

    /// Render against a JSON document.
    pub fn render(&self, root: &Value) -> String {
        let mut out = String::with_capacity(self.source.len());
        for part in &self.parts {
            match part {
                Part::Static(text) => out.push_str(text),
                Part::Placeholder(path) => match path.lookup(root) {
                    None | Some(Value::Null) => {}
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                },
            }
        }
        out
    }
}
