//! declarative attribute tables of the resource handles
use super::state::{AttributeValue, ResourceState, StateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    StringList,
    /// list of strings where order is irrelevant and duplicates collapse
    StringSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// set by the provider, never by the configuration
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub presence: Presence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Required,
            default: None,
            description,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::required(name, field_type, description)
        }
    }

    pub const fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            presence: Presence::Computed,
            ..Self::required(name, FieldType::String, description)
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    fn check_type(&self, value: &AttributeValue) -> Result<(), StateError> {
        let matches = match (self.field_type, value) {
            (FieldType::String, AttributeValue::String(_)) => true,
            (FieldType::StringList | FieldType::StringSet, AttributeValue::List(elements)) => {
                elements.iter().all(|element| element.as_str().is_some())
            }
            _ => false,
        };

        if matches {
            return Ok(());
        }

        Err(StateError::TypeMismatch {
            attribute: self.name.to_string(),
            expected: match self.field_type {
                FieldType::String => "string",
                FieldType::StringList => "list of strings",
                FieldType::StringSet => "set of strings",
            },
            found: value.type_name(),
        })
    }
}

/// Checks configured attributes against `schema` and fills in defaults
///
/// Rejects unknown and computed attributes, missing required attributes and type mismatches.
pub fn conform_configuration(
    state: &mut ResourceState,
    schema: &[FieldSpec],
) -> Result<(), StateError> {
    for (key, _) in state.attributes() {
        match schema.iter().find(|field| field.name == key) {
            None => return Err(StateError::UnknownAttribute(key.to_string())),
            Some(field) if field.presence == Presence::Computed => {
                return Err(StateError::ComputedAttribute(key.to_string()))
            }
            Some(_) => {}
        }
    }

    for field in schema {
        match state.get(field.name) {
            Some(value) => field.check_type(value)?,
            None if field.presence == Presence::Required => {
                return Err(StateError::MissingAttribute(field.name.to_string()))
            }
            None => {
                if let Some(default) = field.default {
                    tracing::trace!(attribute = field.name, default, "applying default");
                    state.set(field.name, default);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec::required("name", FieldType::String, "name"),
        FieldSpec::computed("full_name", "formatted name"),
        FieldSpec::optional("scope", FieldType::String, "scope").with_default("ALL"),
        FieldSpec::optional("tags", FieldType::StringSet, "tags"),
    ];

    #[test]
    fn defaults_are_applied() {
        let mut state: ResourceState = [("name", "ops")].into_iter().collect();
        conform_configuration(&mut state, SCHEMA).unwrap();

        assert_eq!(state.string("scope"), Ok(Some("ALL")));
        assert_eq!(state.get("tags"), None);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mut unknown: ResourceState = [("name", "ops"), ("color", "red")].into_iter().collect();
        assert_eq!(
            conform_configuration(&mut unknown, SCHEMA),
            Err(StateError::UnknownAttribute("color".into()))
        );

        let mut computed: ResourceState = [("name", "ops"), ("full_name", "ops (TF managed)")]
            .into_iter()
            .collect();
        assert_eq!(
            conform_configuration(&mut computed, SCHEMA),
            Err(StateError::ComputedAttribute("full_name".into()))
        );

        let mut missing = ResourceState::default();
        assert_eq!(
            conform_configuration(&mut missing, SCHEMA),
            Err(StateError::MissingAttribute("name".into()))
        );

        let mut mismatch: ResourceState = [
            ("name", AttributeValue::from("ops")),
            ("tags", vec![AttributeValue::Integer(1)].into()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            conform_configuration(&mut mismatch, SCHEMA),
            Err(StateError::TypeMismatch {
                attribute: "tags".into(),
                expected: "set of strings",
                found: "list"
            })
        );
    }
}
