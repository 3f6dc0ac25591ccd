//! conversion between [Expression] and the API's [MatchExpression]
//!
//! The two trees have the same shape except for negation: the API has no negation node, so a
//! `NOT` over a comparison becomes the comparison with the complementary operator. A `NOT` over
//! a logical expression cannot be represented and is rejected.
use super::ast::{Comparison, ComparisonOperator, EntityOrigin, Expression, LogicalOperator};
use crate::restapi::match_expression::{
    Conjunction, LogicalExpression, MatchExpression, TagMatcherExpression,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("negation of logical expression '{0}' is not supported by the API")]
    UnsupportedNegation(String),
    #[error("operator '{operator}' of tag filter '{tag}' has no textual equivalent")]
    UnknownOperator { tag: String, operator: String },
    #[error("entity '{entity}' of tag filter '{tag}' has no textual equivalent")]
    UnknownEntity { tag: String, entity: String },
    #[error("tag filter '{tag}' with operator {operator} requires a value")]
    MissingValue { tag: String, operator: String },
    #[error("tag filter '{tag}' with operator {operator} must not have a value")]
    UnexpectedValue { tag: String, operator: String },
    #[error("name of tag filter must not be blank")]
    BlankTag,
}

pub fn to_api_model(expression: &Expression) -> Result<MatchExpression, MappingError> {
    match expression {
        Expression::Binary {
            operator,
            left,
            right,
        } => Ok(MatchExpression::logical(
            to_api_model(left)?,
            conjunction(*operator),
            to_api_model(right)?,
        )),
        Expression::Not(operand) => match to_api_model(operand)? {
            MatchExpression::TagFilter(tag_filter) => negate(tag_filter).map(MatchExpression::TagFilter),
            MatchExpression::Binary(_) => {
                Err(MappingError::UnsupportedNegation(operand.render()))
            }
        },
        Expression::Comparison(comparison) => {
            Ok(MatchExpression::TagFilter(tag_filter(comparison)))
        }
    }
}

pub fn from_api_model(expression: &MatchExpression) -> Result<Expression, MappingError> {
    match expression {
        MatchExpression::Binary(LogicalExpression {
            left,
            conjunction,
            right,
        }) => Ok(Expression::Binary {
            operator: logical_operator(*conjunction),
            left: Box::new(from_api_model(left)?),
            right: Box::new(from_api_model(right)?),
        }),
        MatchExpression::TagFilter(tag_filter) => comparison(tag_filter).map(Expression::Comparison),
    }
}

fn conjunction(operator: LogicalOperator) -> Conjunction {
    match operator {
        LogicalOperator::And => Conjunction::And,
        LogicalOperator::Or => Conjunction::Or,
    }
}

fn logical_operator(conjunction: Conjunction) -> LogicalOperator {
    match conjunction {
        Conjunction::And => LogicalOperator::And,
        Conjunction::Or => LogicalOperator::Or,
    }
}

fn tag_filter(comparison: &Comparison) -> TagMatcherExpression {
    TagMatcherExpression {
        name: comparison.tag.clone(),
        operator: wire_operator(comparison.operator).to_string(),
        entity: comparison.entity.map(|e| wire_entity(e).to_string()),
        value: comparison.value.clone(),
    }
}

fn comparison(tag_filter: &TagMatcherExpression) -> Result<Comparison, MappingError> {
    if tag_filter.name.trim().is_empty() {
        return Err(MappingError::BlankTag);
    }

    let operator = operator_from_wire(&tag_filter.operator).ok_or_else(|| {
        MappingError::UnknownOperator {
            tag: tag_filter.name.clone(),
            operator: tag_filter.operator.clone(),
        }
    })?;

    let entity = tag_filter
        .entity
        .as_deref()
        .map(|entity| {
            entity_from_wire(entity).ok_or_else(|| MappingError::UnknownEntity {
                tag: tag_filter.name.clone(),
                entity: entity.to_string(),
            })
        })
        .transpose()?;

    match (&tag_filter.value, operator.is_unary()) {
        (None, false) => {
            return Err(MappingError::MissingValue {
                tag: tag_filter.name.clone(),
                operator: tag_filter.operator.clone(),
            })
        }
        (Some(_), true) => {
            return Err(MappingError::UnexpectedValue {
                tag: tag_filter.name.clone(),
                operator: tag_filter.operator.clone(),
            })
        }
        _ => {}
    }

    Ok(Comparison {
        entity,
        tag: tag_filter.name.clone(),
        operator,
        value: tag_filter.value.clone(),
    })
}

fn negate(mut tag_filter: TagMatcherExpression) -> Result<TagMatcherExpression, MappingError> {
    let operator = operator_from_wire(&tag_filter.operator).ok_or_else(|| {
        MappingError::UnknownOperator {
            tag: tag_filter.name.clone(),
            operator: tag_filter.operator.clone(),
        }
    })?;
    tracing::trace!(tag = %tag_filter.name, ?operator, "push negation into tag filter");
    tag_filter.operator = wire_operator(operator.negated()).to_string();
    Ok(tag_filter)
}

pub fn wire_operator(operator: ComparisonOperator) -> &'static str {
    use ComparisonOperator::*;
    match operator {
        Equals => "EQUALS",
        NotEqual => "NOT_EQUAL",
        Contains => "CONTAINS",
        NotContains => "NOT_CONTAIN",
        StartsWith => "STARTS_WITH",
        NotStartsWith => "NOT_STARTS_WITH",
        EndsWith => "ENDS_WITH",
        NotEndsWith => "NOT_ENDS_WITH",
        GreaterThan => "GREATER_THAN",
        GreaterOrEqual => "GREATER_OR_EQUAL_THAN",
        LessThan => "LESS_THAN",
        LessOrEqual => "LESS_OR_EQUAL_THAN",
        IsEmpty => "IS_EMPTY",
        NotEmpty => "NOT_EMPTY",
        IsBlank => "IS_BLANK",
        NotBlank => "NOT_BLANK",
    }
}

pub fn wire_entity(entity: EntityOrigin) -> &'static str {
    match entity {
        EntityOrigin::Source => "SOURCE",
        EntityOrigin::Destination => "DESTINATION",
        EntityOrigin::NotApplicable => "NOT_APPLICABLE",
    }
}

fn operator_from_wire(operator: &str) -> Option<ComparisonOperator> {
    ComparisonOperator::ALL
        .iter()
        .copied()
        .find(|op| wire_operator(*op) == operator)
}

fn entity_from_wire(entity: &str) -> Option<EntityOrigin> {
    EntityOrigin::ALL
        .iter()
        .copied()
        .find(|origin| wire_entity(*origin) == entity)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filterexpression::parse;
    use crate::restapi::match_expression::{SUPPORTED_MATCH_ENTITIES, SUPPORTED_TAG_FILTER_OPERATORS};
    use pretty_assertions::assert_eq;

    fn api(text: &str) -> Result<MatchExpression, MappingError> {
        to_api_model(&parse(text).expect("must parse"))
    }

    fn wire_tag_filter(name: &str, operator: &str, value: Option<&str>) -> TagMatcherExpression {
        TagMatcherExpression {
            name: name.into(),
            operator: operator.into(),
            entity: None,
            value: value.map(Into::into),
        }
    }

    #[test]
    fn wire_tables_cover_the_local_vocabulary() {
        for op in ComparisonOperator::ALL {
            assert!(SUPPORTED_TAG_FILTER_OPERATORS.contains(&wire_operator(*op)));
        }
        for origin in EntityOrigin::ALL {
            assert!(SUPPORTED_MATCH_ENTITIES.contains(&wire_entity(*origin)));
        }
    }

    #[test]
    fn translates_operators_and_entities() {
        assert_eq!(
            api("src:http.path NOT_CONTAINS /health").unwrap(),
            MatchExpression::TagFilter(TagMatcherExpression {
                name: "http.path".into(),
                operator: "NOT_CONTAIN".into(),
                entity: Some("SOURCE".into()),
                value: Some("/health".into()),
            })
        );
    }

    #[test]
    fn keeps_tree_shape_and_order() {
        assert_eq!(
            api("a EQUALS 1 OR b IS_EMPTY AND c EQUALS 3").unwrap(),
            MatchExpression::logical(
                MatchExpression::TagFilter(wire_tag_filter("a", "EQUALS", Some("1"))),
                Conjunction::Or,
                MatchExpression::logical(
                    MatchExpression::TagFilter(wire_tag_filter("b", "IS_EMPTY", None)),
                    Conjunction::And,
                    MatchExpression::TagFilter(wire_tag_filter("c", "EQUALS", Some("3"))),
                ),
            )
        );
    }

    #[test]
    fn negation_is_pushed_into_the_operator() {
        assert_eq!(
            api("NOT tag EQUALS x").unwrap(),
            MatchExpression::TagFilter(wire_tag_filter("tag", "NOT_EQUAL", Some("x")))
        );
        assert_eq!(
            api("NOT a GREATER_THAN 5").unwrap(),
            MatchExpression::TagFilter(wire_tag_filter("a", "LESS_OR_EQUAL_THAN", Some("5")))
        );
        assert_eq!(
            api("NOT NOT a IS_BLANK").unwrap(),
            MatchExpression::TagFilter(wire_tag_filter("a", "IS_BLANK", None))
        );
    }

    #[test]
    fn negation_of_logical_expression_is_rejected() {
        assert_eq!(
            api("NOT (a EQUALS 1 AND b EQUALS 2)"),
            Err(MappingError::UnsupportedNegation(
                "a equals 1 and b equals 2".into()
            ))
        );
        assert!(matches!(
            api("c EQUALS 3 OR NOT (a EQUALS 1 OR b EQUALS 2)"),
            Err(MappingError::UnsupportedNegation(_))
        ));
    }

    #[test]
    fn from_api_model_inverts_to_api_model() {
        for text in [
            "entity.type EQUALS jvm AND (status EQUALS up OR status EQUALS degraded)",
            "dest:a STARTS_WITH x OR na:b NOT_EMPTY OR src:c LESS_THAN 3",
            "'x y' ENDS_WITH 'a b' AND k GREATER_OR_EQUAL 1 AND k NOT_CONTAINS z",
        ] {
            let expression = parse(text).unwrap();
            let api = to_api_model(&expression).unwrap();
            assert_eq!(from_api_model(&api).unwrap(), expression, "{text}");
        }
    }

    #[test]
    fn negated_comparison_comes_back_with_complementary_operator() {
        let api = api("NOT a CONTAINS b").unwrap();
        assert_eq!(
            from_api_model(&api).unwrap(),
            parse("a NOT_CONTAINS b").unwrap()
        );
    }

    #[test]
    fn unknown_wire_vocabulary_is_rejected() {
        assert_eq!(
            from_api_model(&MatchExpression::TagFilter(wire_tag_filter(
                "a",
                "MATCHES",
                Some("x")
            ))),
            Err(MappingError::UnknownOperator {
                tag: "a".into(),
                operator: "MATCHES".into()
            })
        );

        let mut with_entity = wire_tag_filter("a", "EQUALS", Some("x"));
        with_entity.entity = Some("CALLER".into());
        assert_eq!(
            from_api_model(&MatchExpression::TagFilter(with_entity)),
            Err(MappingError::UnknownEntity {
                tag: "a".into(),
                entity: "CALLER".into()
            })
        );
    }

    #[test]
    fn value_must_match_operator_arity() {
        assert!(matches!(
            from_api_model(&MatchExpression::TagFilter(wire_tag_filter("a", "EQUALS", None))),
            Err(MappingError::MissingValue { .. })
        ));
        assert!(matches!(
            from_api_model(&MatchExpression::TagFilter(wire_tag_filter(
                "a",
                "IS_EMPTY",
                Some("x")
            ))),
            Err(MappingError::UnexpectedValue { .. })
        ));
        assert_eq!(
            from_api_model(&MatchExpression::TagFilter(wire_tag_filter("", "IS_EMPTY", None))),
            Err(MappingError::BlankTag)
        );
    }
}
