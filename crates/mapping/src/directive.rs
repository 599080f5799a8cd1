use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::MappingError;
use crate::path::Path;
use crate::template::Template;

const PATH_KEY: &str = "@path";
const TEMPLATE_KEY: &str = "@template";

/// A compiled mapping directive.
///
/// The JSON form is what field definitions and customer mappings carry:
///
/// | JSON | Directive |
/// |---|---|
/// | `{"@path": "$.userId"}` | [`Directive::Path`] |
/// | `{"@template": "{{traits.name}}"}` | [`Directive::Template`] |
/// | `{"user_id": {"@path": "$.userId"}}` | [`Directive::Object`] |
/// | `[...]` | [`Directive::Array`] |
/// | anything else | [`Directive::Literal`] |
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Literal(Value),
    Path(Path),
    Template(Template),
    Object(IndexMap<String, Directive>),
    Array(Vec<Directive>),
}

impl Directive {
    /// Compile the JSON form. `field` names the owning field in errors.
    pub fn parse(field: &str, value: &Value) -> Result<Self, MappingError> {
        match value {
            Value::Object(obj) => Self::parse_object(field, obj),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| Self::parse(&format!("{field}[{idx}]"), item))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Array),
            other => Ok(Self::Literal(other.clone())),
        }
    }

    fn parse_object(field: &str, obj: &Map<String, Value>) -> Result<Self, MappingError> {
        let invalid = |reason: String| MappingError::InvalidDirective {
            field: field.to_owned(),
            reason,
        };

        if let Some(directive_key) = obj.keys().find(|k| k.starts_with('@')) {
            if obj.len() != 1 {
                return Err(invalid(format!(
                    "`{directive_key}` cannot be combined with other keys"
                )));
            }
            let arg = obj[directive_key.as_str()]
                .as_str()
                .ok_or_else(|| invalid(format!("`{directive_key}` expects a string")))?;
            return match directive_key.as_str() {
                PATH_KEY => Path::parse(arg).map(Self::Path),
                TEMPLATE_KEY => Template::parse(arg).map(Self::Template),
                other => Err(invalid(format!("unknown directive `{other}`"))),
            };
        }

        obj.iter()
            .map(|(key, child)| {
                Self::parse(&format!("{field}.{key}"), child).map(|d| (key.clone(), d))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Self::Object)
    }

    /// Shorthand for an `@path` directive.
    pub fn path(source: &str) -> Result<Self, MappingError> {
        Path::parse(source).map(Self::Path)
    }

    /// Shorthand for a literal.
    pub fn literal(value: Value) -> Self {
        Self::Literal(value)
    }

    /// Evaluate against a JSON document.
    ///
    /// `None` is "undefined": the path did not exist. Object members that
    /// evaluate to `None` are omitted; array elements become `null`.
    pub fn evaluate(&self, root: &Value) -> Option<Value> {
        match self {
            Self::Literal(value) => Some(value.clone()),
            Self::Path(path) => path.lookup(root).cloned(),
            Self::Template(template) => Some(Value::String(template.render(root))),
            Self::Object(members) => Some(Value::Object(
                members
                    .iter()
                    .filter_map(|(key, d)| d.evaluate(root).map(|v| (key.clone(), v)))
                    .collect(),
            )),
            Self::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|d| d.evaluate(root).unwrap_or(Value::Null))
                    .collect(),
            )),
        }
    }

    /// Back to the JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Path(path) => single(PATH_KEY, path.as_str()),
            Self::Template(template) => single(TEMPLATE_KEY, template.as_str()),
            Self::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, d)| (k.clone(), d.to_value()))
                    .collect(),
            ),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_value).collect()),
        }
    }
}

fn single(key: &str, arg: &str) -> Value {
    let mut map = Map::new();
    map.insert(key.to_owned(), Value::String(arg.to_owned()));
    Value::Object(map)
}
