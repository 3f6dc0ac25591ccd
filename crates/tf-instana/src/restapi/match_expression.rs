//! wire model of match expressions
//!
//! ```json
//! {
//!   "type": "BINARY_OP",
//!   "left": { "type": "TAG_FILTER", "name": "entity.type", "operator": "EQUALS", "value": "jvm" },
//!   "conjunction": "AND",
//!   "right": { "type": "TAG_FILTER", "name": "call.erroneous", "operator": "IS_EMPTY", "entity": "SOURCE" }
//! }
//! ```
use super::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};

/// Tag filter operators known to the API, unary ones last
pub const SUPPORTED_TAG_FILTER_OPERATORS: &[&str] = &[
    "EQUALS",
    "NOT_EQUAL",
    "CONTAINS",
    "NOT_CONTAIN",
    "STARTS_WITH",
    "NOT_STARTS_WITH",
    "ENDS_WITH",
    "NOT_ENDS_WITH",
    "GREATER_THAN",
    "GREATER_OR_EQUAL_THAN",
    "LESS_THAN",
    "LESS_OR_EQUAL_THAN",
    "IS_EMPTY",
    "NOT_EMPTY",
    "IS_BLANK",
    "NOT_BLANK",
];

/// Tag filter operators which must not carry a value
pub const UNARY_TAG_FILTER_OPERATORS: &[&str] = &["IS_EMPTY", "NOT_EMPTY", "IS_BLANK", "NOT_BLANK"];

pub const SUPPORTED_MATCH_ENTITIES: &[&str] = &["SOURCE", "DESTINATION", "NOT_APPLICABLE"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchExpression {
    #[serde(rename = "BINARY_OP")]
    Binary(LogicalExpression),
    #[serde(rename = "TAG_FILTER")]
    TagFilter(TagMatcherExpression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalExpression {
    pub left: Box<MatchExpression>,
    pub conjunction: Conjunction,
    pub right: Box<MatchExpression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    And,
    Or,
}

/// Operator and entity stay raw wire strings, they are checked by [MatchExpression::validate]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatcherExpression {
    pub name: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl MatchExpression {
    pub fn logical(left: MatchExpression, conjunction: Conjunction, right: MatchExpression) -> Self {
        Self::Binary(LogicalExpression {
            left: Box::new(left),
            conjunction,
            right: Box::new(right),
        })
    }

    /// Checks every tag filter of the tree
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MatchExpression::Binary(logical) => {
                logical.left.validate()?;
                logical.right.validate()
            }
            MatchExpression::TagFilter(tag_filter) => tag_filter.validate(),
        }
    }
}

impl TagMatcherExpression {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require_non_blank("MatchSpecification.Name", &self.name)?;
        validation::require_supported(
            "MatchSpecification.Operator",
            &self.operator,
            SUPPORTED_TAG_FILTER_OPERATORS,
        )?;
        if let Some(entity) = &self.entity {
            validation::require_supported("MatchSpecification.Entity", entity, SUPPORTED_MATCH_ENTITIES)?;
        }

        let unary = UNARY_TAG_FILTER_OPERATORS.contains(&self.operator.as_str());
        match (&self.value, unary) {
            (None, false) => Err(ValidationError::Missing {
                field: "MatchSpecification.Value",
            }),
            (Some(_), true) => Err(ValidationError::Invalid {
                field: "MatchSpecification.Value",
                reason: format!("operator {} does not accept a value", self.operator),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag_filter(name: &str, operator: &str, value: Option<&str>) -> MatchExpression {
        MatchExpression::TagFilter(TagMatcherExpression {
            name: name.into(),
            operator: operator.into(),
            entity: None,
            value: value.map(Into::into),
        })
    }

    #[test]
    fn serializes_with_type_discriminator() {
        let expression = MatchExpression::logical(
            tag_filter("entity.type", "EQUALS", Some("jvm")),
            Conjunction::Or,
            tag_filter("call.erroneous", "IS_EMPTY", None),
        );

        let json = serde_json::to_value(&expression).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "BINARY_OP",
                "left": { "type": "TAG_FILTER", "name": "entity.type", "operator": "EQUALS", "value": "jvm" },
                "conjunction": "OR",
                "right": { "type": "TAG_FILTER", "name": "call.erroneous", "operator": "IS_EMPTY" }
            })
        );

        let back: MatchExpression = serde_json::from_value(json).unwrap();
        assert_eq!(back, expression);
    }

    #[test]
    fn unknown_node_type_is_rejected() {
        let result = serde_json::from_str::<MatchExpression>(r#"{"type":"NEGATION"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validation_of_tag_filters() {
        assert!(tag_filter("a", "EQUALS", Some("1")).validate().is_ok());
        assert!(tag_filter("a", "NOT_BLANK", None).validate().is_ok());

        assert_eq!(
            tag_filter(" ", "EQUALS", Some("1")).validate(),
            Err(ValidationError::Missing {
                field: "MatchSpecification.Name"
            })
        );
        assert_eq!(
            tag_filter("a", "EQUALS", None).validate(),
            Err(ValidationError::Missing {
                field: "MatchSpecification.Value"
            })
        );
        assert!(tag_filter("a", "IS_BLANK", Some("x")).validate().is_err());
        assert!(tag_filter("a", "LIKE", Some("x")).validate().is_err());
    }

    #[test]
    fn validation_descends_into_logical_nodes() {
        let expression = MatchExpression::logical(
            tag_filter("a", "EQUALS", Some("1")),
            Conjunction::And,
            tag_filter("b", "UNKNOWN", Some("1")),
        );
        assert_eq!(
            expression.validate(),
            Err(ValidationError::Unsupported {
                field: "MatchSpecification.Operator",
                value: "UNKNOWN".into()
            })
        );
    }
}
