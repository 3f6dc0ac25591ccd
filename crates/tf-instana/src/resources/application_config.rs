use super::formatter::ResourceNameFormatter;
use super::schema::{FieldSpec, FieldType};
use super::state::ResourceState;
use crate::filterexpression;
use crate::restapi::{ApplicationConfig, ApplicationConfigScope, BoundaryScope};
use crate::Error;

pub const FIELD_LABEL: &str = "label";
pub const FIELD_FULL_LABEL: &str = "full_label";
pub const FIELD_SCOPE: &str = "scope";
pub const FIELD_BOUNDARY_SCOPE: &str = "boundary_scope";
pub const FIELD_MATCH_SPECIFICATION: &str = "match_specification";

const DEFAULT_SCOPE: &str = "INCLUDE_NO_DOWNSTREAM";
const DEFAULT_BOUNDARY_SCOPE: &str = "DEFAULT";

pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required(FIELD_LABEL, FieldType::String, "label of the application perspective"),
    FieldSpec::computed(
        FIELD_FULL_LABEL,
        "label including the configured prefix and suffix",
    ),
    FieldSpec::optional(FIELD_SCOPE, FieldType::String, "downstream scope").with_default(DEFAULT_SCOPE),
    FieldSpec::optional(FIELD_BOUNDARY_SCOPE, FieldType::String, "boundary scope")
        .with_default(DEFAULT_BOUNDARY_SCOPE),
    FieldSpec::required(
        FIELD_MATCH_SPECIFICATION,
        FieldType::String,
        "match expression selecting the entities of the application",
    ),
];

pub fn map_state_to_data_object(
    state: &ResourceState,
    formatter: &ResourceNameFormatter,
) -> Result<ApplicationConfig, Error> {
    let label = formatter.full_name(state, FIELD_LABEL, FIELD_FULL_LABEL)?;

    let expression = filterexpression::parse(state.required_string(FIELD_MATCH_SPECIFICATION)?)?;
    let match_specification = filterexpression::to_api_model(&expression)?;

    let scope = state.string(FIELD_SCOPE)?.unwrap_or(DEFAULT_SCOPE);
    let boundary_scope = state
        .string(FIELD_BOUNDARY_SCOPE)?
        .unwrap_or(DEFAULT_BOUNDARY_SCOPE);

    Ok(ApplicationConfig {
        id: state.id().unwrap_or_default().to_string(),
        label,
        match_specification,
        scope: ApplicationConfigScope(scope.to_string()),
        boundary_scope: BoundaryScope(boundary_scope.to_string()),
    })
}

/// Stores the match specification in its normalized rendering
pub fn update_state(state: &mut ResourceState, config: &ApplicationConfig) -> Result<(), Error> {
    let expression = filterexpression::from_api_model(&config.match_specification)?;

    state.set_id(config.id.as_str());
    state.set(FIELD_FULL_LABEL, config.label.as_str());
    state.set(FIELD_SCOPE, config.scope.0.as_str());
    state.set(FIELD_BOUNDARY_SCOPE, config.boundary_scope.0.as_str());
    state.set(FIELD_MATCH_SPECIFICATION, expression.render());
    Ok(())
}
