use super::validation;
use super::{InstanaDataObject, ValidationError};
use serde::{Deserialize, Serialize};

/// Binds custom event rules to a query of entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBinding {
    pub id: String,
    pub enabled: bool,
    pub triggering: bool,
    pub severity: i32,
    pub text: String,
    pub description: String,
    pub expiration_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub rule_ids: Vec<String>,
}

impl InstanaDataObject for RuleBinding {
    const RESOURCE_PATH: &'static str = "/ruleBindings";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_non_blank("ID", &self.id)?;
        validation::require_non_blank("Text", &self.text)?;
        validation::require_non_blank("Description", &self.description)?;
        validation::require_not_empty("RuleIds", &self.rule_ids)
    }
}
