use super::validation;
use super::{InstanaDataObject, ValidationError, EVENT_SETTINGS_BASE_PATH};
use serde::{Deserialize, Serialize};

/// Event types an alert can be triggered by
pub const SUPPORTED_ALERT_EVENT_TYPES: &[&str] = &[
    "incident",
    "critical",
    "warning",
    "change",
    "online",
    "offline",
    "none",
    "agent_monitoring_issue",
];

const MAX_ALERT_NAME_LENGTH: usize = 256;
const MAX_QUERY_LENGTH: usize = 2048;
const MAX_IDS: usize = 1024;

/// Event type of an alert, compared case-insensitively
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertEventType(pub String);

impl AlertEventType {
    pub fn is_supported(&self) -> bool {
        SUPPORTED_ALERT_EVENT_TYPES
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(&self.0))
    }

    /// lowercase representation used in the terraform state
    pub fn harmonized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for AlertEventType {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl From<&str> for AlertEventType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingConfiguration {
    pub id: String,
    pub alert_name: String,
    pub integration_ids: Vec<String>,
    pub event_filtering_configuration: EventFilteringConfiguration,
}

/// Selects the events of an alert either by rule ids or by event types
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilteringConfiguration {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub rule_ids: Vec<String>,
    #[serde(default)]
    pub event_types: Vec<AlertEventType>,
}

impl EventFilteringConfiguration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(query) = &self.query {
            validation::require_max_length("Query", query, MAX_QUERY_LENGTH)?;
        }

        validation::require_exactly_one_of(
            "RuleIDs",
            !self.rule_ids.is_empty(),
            "EventTypes",
            !self.event_types.is_empty(),
        )?;

        validation::require_max_items("RuleIDs", &self.rule_ids, MAX_IDS)?;
        validation::require_unique("RuleIDs", &self.rule_ids)?;

        validation::require_max_items(
            "EventTypes",
            &self.event_types,
            SUPPORTED_ALERT_EVENT_TYPES.len(),
        )?;
        validation::require_unique(
            "EventTypes",
            self.event_types.iter().map(AlertEventType::harmonized),
        )?;
        for event_type in &self.event_types {
            validation::require_supported_ignoring_case(
                "EventType",
                &event_type.0,
                SUPPORTED_ALERT_EVENT_TYPES,
            )?;
        }

        Ok(())
    }
}

impl InstanaDataObject for AlertingConfiguration {
    const RESOURCE_PATH: &'static str = "/events/settings/alerts";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_non_blank("ID", &self.id)?;
        validation::require_non_blank("AlertName", &self.alert_name)?;
        validation::require_max_length("AlertName", &self.alert_name, MAX_ALERT_NAME_LENGTH)?;
        validation::require_max_items("IntegrationIDs", &self.integration_ids, MAX_IDS)?;
        validation::require_unique("IntegrationIDs", &self.integration_ids)?;
        self.event_filtering_configuration.validate()
    }
}
