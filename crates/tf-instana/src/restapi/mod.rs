//! data objects of the Instana REST API and generic CRUD access to them
//!
//! Every data object implements [InstanaDataObject], which binds it to one resource path and
//! defines its validation rules. [RestResource] performs the CRUD operations on top of a
//! [RestClient] collaborator; [InstanaApi] hands out one resource per data object.
mod alerting_channel;
mod alerting_config;
mod application_config;
mod client;
pub mod match_expression;
mod resource;
mod rule_binding;
pub mod validation;

pub use alerting_channel::{AlertingChannel, AlertingChannelType};
pub use alerting_config::{
    AlertEventType, AlertingConfiguration, EventFilteringConfiguration, SUPPORTED_ALERT_EVENT_TYPES,
};
pub use application_config::{
    ApplicationConfig, ApplicationConfigScope, BoundaryScope, SUPPORTED_APPLICATION_CONFIG_SCOPES,
    SUPPORTED_BOUNDARY_SCOPES,
};
pub use client::{BoxError, RestClient, TransportError};
pub use match_expression::MatchExpression;
pub use resource::{DeserializationError, RestError, RestResource};
pub use rule_binding::RuleBinding;
pub use validation::ValidationError;

/// Base path of all event related settings
pub const EVENT_SETTINGS_BASE_PATH: &str = "/events/settings";

/// An object managed through the REST API
pub trait InstanaDataObject: serde::Serialize + serde::de::DeserializeOwned {
    /// Path of the collection the object lives in
    const RESOURCE_PATH: &'static str;

    fn id(&self) -> &str;

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Entry point handing out typed resources that share one [RestClient]
#[derive(derive_new::new)]
pub struct InstanaApi {
    client: Box<dyn RestClient>,
}

impl InstanaApi {
    pub fn resource<T: InstanaDataObject>(&self) -> RestResource<'_, T> {
        RestResource::new(self.client.as_ref())
    }

    pub fn rule_bindings(&self) -> RestResource<'_, RuleBinding> {
        self.resource()
    }

    pub fn alerting_channels(&self) -> RestResource<'_, AlertingChannel> {
        self.resource()
    }

    pub fn alerting_configurations(&self) -> RestResource<'_, AlertingConfiguration> {
        self.resource()
    }

    pub fn application_configs(&self) -> RestResource<'_, ApplicationConfig> {
        self.resource()
    }
}
