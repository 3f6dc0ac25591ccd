use super::formatter::ResourceNameFormatter;
use super::schema::{FieldSpec, FieldType};
use super::state::{ResourceState, StateError};
use crate::restapi::{AlertEventType, AlertingConfiguration, EventFilteringConfiguration};

pub const FIELD_ALERT_NAME: &str = "alert_name";
pub const FIELD_FULL_ALERT_NAME: &str = "full_alert_name";
pub const FIELD_INTEGRATION_IDS: &str = "integration_ids";
pub const FIELD_EVENT_FILTER_QUERY: &str = "event_filter_query";
pub const FIELD_EVENT_FILTER_EVENT_TYPES: &str = "event_filter_event_types";
pub const FIELD_EVENT_FILTER_RULE_IDS: &str = "event_filter_rule_ids";

pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ALERT_NAME, FieldType::String, "name of the alert"),
    FieldSpec::computed(
        FIELD_FULL_ALERT_NAME,
        "name of the alert including the configured prefix and suffix",
    ),
    FieldSpec::required(
        FIELD_INTEGRATION_IDS,
        FieldType::StringSet,
        "ids of the alerting channels to notify",
    ),
    FieldSpec::optional(
        FIELD_EVENT_FILTER_QUERY,
        FieldType::String,
        "dynamic focus query restricting the entities of the alert",
    ),
    FieldSpec::optional(
        FIELD_EVENT_FILTER_EVENT_TYPES,
        FieldType::StringSet,
        "event types triggering the alert, conflicts with event_filter_rule_ids",
    ),
    FieldSpec::optional(
        FIELD_EVENT_FILTER_RULE_IDS,
        FieldType::StringSet,
        "rule ids triggering the alert, conflicts with event_filter_event_types",
    ),
];

pub fn map_state_to_data_object(
    state: &ResourceState,
    formatter: &ResourceNameFormatter,
) -> Result<AlertingConfiguration, StateError> {
    let alert_name = formatter.full_name(state, FIELD_ALERT_NAME, FIELD_FULL_ALERT_NAME)?;

    let event_types = state
        .string_set(FIELD_EVENT_FILTER_EVENT_TYPES)?
        .iter()
        .map(|event_type| AlertEventType(event_type.to_lowercase()))
        .collect();

    Ok(AlertingConfiguration {
        id: state.id().unwrap_or_default().to_string(),
        alert_name,
        integration_ids: state.string_set(FIELD_INTEGRATION_IDS)?,
        event_filtering_configuration: EventFilteringConfiguration {
            query: state.string(FIELD_EVENT_FILTER_QUERY)?.map(str::to_string),
            rule_ids: state.string_set(FIELD_EVENT_FILTER_RULE_IDS)?,
            event_types,
        },
    })
}

pub fn update_state(state: &mut ResourceState, config: &AlertingConfiguration) {
    let filter = &config.event_filtering_configuration;

    state.set_id(config.id.as_str());
    state.set(FIELD_FULL_ALERT_NAME, config.alert_name.as_str());
    state.set(FIELD_INTEGRATION_IDS, config.integration_ids.clone());
    state.set_optional(FIELD_EVENT_FILTER_QUERY, filter.query.clone());

    let event_types: Vec<String> = filter
        .event_types
        .iter()
        .map(AlertEventType::harmonized)
        .collect();
    state.set_optional(
        FIELD_EVENT_FILTER_EVENT_TYPES,
        Some(event_types).filter(|types| !types.is_empty()),
    );
    state.set_optional(
        FIELD_EVENT_FILTER_RULE_IDS,
        Some(filter.rule_ids.clone()).filter(|ids| !ids.is_empty()),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resources::AttributeValue;
    use pretty_assertions::assert_eq;

    fn formatter() -> ResourceNameFormatter {
        ResourceNameFormatter::new("".into(), " (TF managed)".into())
    }

    #[test]
    fn event_types_are_lowercased() {
        let state: ResourceState = [
            ("alert_name", AttributeValue::from("jvm alerts")),
            ("integration_ids", vec!["channel-1"].into()),
            ("event_filter_event_types", vec!["CRITICAL", "Warning"].into()),
        ]
        .into_iter()
        .collect();

        let config = map_state_to_data_object(&state, &formatter()).unwrap();
        assert_eq!(config.alert_name, "jvm alerts (TF managed)");
        assert_eq!(
            config.event_filtering_configuration,
            EventFilteringConfiguration {
                query: None,
                rule_ids: vec![],
                event_types: vec!["critical".into(), "warning".into()],
            }
        );
    }

    #[test]
    fn state_is_harmonized() {
        let config = AlertingConfiguration {
            id: "alert-id".into(),
            alert_name: "jvm alerts (TF managed)".into(),
            integration_ids: vec!["channel-1".into()],
            event_filtering_configuration: EventFilteringConfiguration {
                query: Some("entity.type:jvm".into()),
                rule_ids: vec![],
                event_types: vec!["INCIDENT".into()],
            },
        };

        let mut state: ResourceState = [("event_filter_rule_ids", vec!["stale"])]
            .into_iter()
            .collect();
        update_state(&mut state, &config);

        assert_eq!(state.id(), Some("alert-id"));
        assert_eq!(
            state.string_list("event_filter_event_types"),
            Ok(vec!["incident".to_string()])
        );
        assert_eq!(state.get("event_filter_rule_ids"), None);
        assert_eq!(
            state.string("event_filter_query"),
            Ok(Some("entity.type:jvm"))
        );
    }
}
