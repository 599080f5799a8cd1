use conduit_schema::FieldCollection;

use crate::error::MappingError;
use crate::mapping::Mapping;

/// Build the default mapping declared by a set of fields.
///
/// Each field with a `default` contributes its directive; fields without
/// one are left out and resolve to nothing unless overridden.
pub fn default_values(fields: &FieldCollection) -> Result<Mapping, MappingError> {
    let mut mapping = Mapping::new();
    for (key, field) in fields {
        if let Some(default) = &field.default {
            mapping.set(key.clone(), default)?;
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_schema::FieldDef;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn collects_declared_defaults_in_order() {
        let fields = FieldCollection::new()
            .with("company_keys", FieldDef::object("Company keys"))
            .with(
                "company_name",
                FieldDef::string("Company name")
                    .with_default(json!({"@path": "$.traits.company_name"})),
            )
            .with(
                "user_keys",
                FieldDef::object("User keys")
                    .required()
                    .with_default(json!({"user_id": {"@path": "$.userId"}})),
            );

        let mapping = default_values(&fields).unwrap();
        assert_eq!(
            mapping.keys().collect::<Vec<_>>(),
            vec!["company_name", "user_keys"]
        );
        assert_eq!(
            mapping.to_value(),
            json!({
                "company_name": {"@path": "$.traits.company_name"},
                "user_keys": {"user_id": {"@path": "$.userId"}}
            })
        );
    }

    #[test]
    fn malformed_default_is_an_error() {
        let fields = FieldCollection::new().with(
            "name",
            FieldDef::string("Name").with_default(json!({"@path": "$..x"})),
        );
        assert!(matches!(
            default_values(&fields),
            Err(MappingError::InvalidPath { .. })
        ));
    }
}
