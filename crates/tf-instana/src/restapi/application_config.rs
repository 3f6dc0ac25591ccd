use super::validation;
use super::{InstanaDataObject, MatchExpression, ValidationError};
use serde::{Deserialize, Serialize};

pub const SUPPORTED_APPLICATION_CONFIG_SCOPES: &[&str] = &[
    "INCLUDE_NO_DOWNSTREAM",
    "INCLUDE_IMMEDIATE_DOWNSTREAM_DATABASE_AND_MESSAGING",
    "INCLUDE_ALL_DOWNSTREAM",
];

pub const SUPPORTED_BOUNDARY_SCOPES: &[&str] = &["ALL", "INBOUND", "DEFAULT"];

const MAX_LABEL_LENGTH: usize = 256;

/// Which downstream calls belong to the application, kept as wire string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationConfigScope(pub String);

impl Default for ApplicationConfigScope {
    fn default() -> Self {
        Self(SUPPORTED_APPLICATION_CONFIG_SCOPES[0].to_string())
    }
}

/// Which calls into the application are part of it, kept as wire string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryScope(pub String);

impl Default for BoundaryScope {
    fn default() -> Self {
        Self("DEFAULT".to_string())
    }
}

/// Application perspective defined by a match specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    pub id: String,
    pub label: String,
    pub match_specification: MatchExpression,
    pub scope: ApplicationConfigScope,
    pub boundary_scope: BoundaryScope,
}

impl InstanaDataObject for ApplicationConfig {
    const RESOURCE_PATH: &'static str = "/application-monitoring/settings/application";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_non_blank("ID", &self.id)?;
        validation::require_non_blank("Label", &self.label)?;
        validation::require_max_length("Label", &self.label, MAX_LABEL_LENGTH)?;
        self.match_specification.validate()?;
        validation::require_supported("Scope", &self.scope.0, SUPPORTED_APPLICATION_CONFIG_SCOPES)?;
        validation::require_supported("BoundaryScope", &self.boundary_scope.0, SUPPORTED_BOUNDARY_SCOPES)
    }
}
