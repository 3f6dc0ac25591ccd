//! terraform resource handles
//!
//! A handle knows the attribute table ([FieldSpec]) of one terraform resource type and maps between
//! the [ResourceState] of a resource instance and the [DataObject] sent to the REST API.
//!
//! The lifecycle operations ([ResourceKind::create], [ResourceKind::read], [ResourceKind::update],
//! [ResourceKind::delete]) are shared by all handles and run on top of [InstanaApi].
pub mod alerting_channel;
pub mod alerting_config;
pub mod application_config;
mod formatter;
mod schema;
mod state;

pub use formatter::ResourceNameFormatter;
pub use schema::{conform_configuration, FieldSpec, FieldType, Presence};
pub use state::{AttributeValue, ResourceState, StateError, UnsupportedValue};

use crate::restapi::{
    AlertingChannel, AlertingChannelType, AlertingConfiguration, ApplicationConfig,
    InstanaApi, InstanaDataObject, RestError, ValidationError,
};
use crate::Error;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    AlertingChannelEmail,
    AlertingChannelSlack,
    AlertingChannelWebhook,
    AlertingConfig,
    ApplicationConfig,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::AlertingChannelEmail,
        ResourceKind::AlertingChannelSlack,
        ResourceKind::AlertingChannelWebhook,
        ResourceKind::AlertingConfig,
        ResourceKind::ApplicationConfig,
    ];

    /// terraform resource type
    pub fn resource_name(&self) -> &'static str {
        match self {
            ResourceKind::AlertingChannelEmail => "instana_alerting_channel_email",
            ResourceKind::AlertingChannelSlack => "instana_alerting_channel_slack",
            ResourceKind::AlertingChannelWebhook => "instana_alerting_channel_webhook",
            ResourceKind::AlertingConfig => "instana_alerting_config",
            ResourceKind::ApplicationConfig => "instana_application_config",
        }
    }

    pub fn from_resource_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.resource_name() == name)
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            ResourceKind::AlertingChannelEmail => alerting_channel::EMAIL_SCHEMA,
            ResourceKind::AlertingChannelSlack => alerting_channel::SLACK_SCHEMA,
            ResourceKind::AlertingChannelWebhook => alerting_channel::WEBHOOK_SCHEMA,
            ResourceKind::AlertingConfig => alerting_config::SCHEMA,
            ResourceKind::ApplicationConfig => application_config::SCHEMA,
        }
    }

    /// Attribute tables of all resource types, keyed by terraform resource type
    pub fn provider_schema() -> IndexMap<&'static str, &'static [FieldSpec]> {
        Self::ALL
            .iter()
            .map(|kind| (kind.resource_name(), kind.schema()))
            .collect()
    }

    fn channel_type(&self) -> Option<AlertingChannelType> {
        match self {
            ResourceKind::AlertingChannelEmail => Some(AlertingChannelType::Email),
            ResourceKind::AlertingChannelSlack => Some(AlertingChannelType::Slack),
            ResourceKind::AlertingChannelWebhook => Some(AlertingChannelType::WebHook),
            ResourceKind::AlertingConfig | ResourceKind::ApplicationConfig => None,
        }
    }

    pub fn map_state_to_data_object(
        &self,
        state: &ResourceState,
        formatter: &ResourceNameFormatter,
    ) -> Result<DataObject, Error> {
        if let Some(kind) = self.channel_type() {
            let channel = alerting_channel::map_state_to_data_object(kind, state, formatter)?;
            return Ok(DataObject::AlertingChannel(channel));
        }

        let object = match self {
            ResourceKind::AlertingConfig => DataObject::AlertingConfiguration(
                alerting_config::map_state_to_data_object(state, formatter)?,
            ),
            _ => DataObject::ApplicationConfig(application_config::map_state_to_data_object(
                state, formatter,
            )?),
        };

        Ok(object)
    }

    pub fn update_state(&self, state: &mut ResourceState, object: &DataObject) -> Result<(), Error> {
        match (self, object) {
            (ResourceKind::AlertingConfig, DataObject::AlertingConfiguration(config)) => {
                alerting_config::update_state(state, config);
                Ok(())
            }
            (ResourceKind::ApplicationConfig, DataObject::ApplicationConfig(config)) => {
                application_config::update_state(state, config)
            }
            (kind, DataObject::AlertingChannel(channel))
                if kind.channel_type() == Some(channel.kind) =>
            {
                alerting_channel::update_state(state, channel);
                Ok(())
            }
            (kind, object) => Err(Error::ObjectKindMismatch {
                resource: kind.resource_name(),
                found: object.kind_name(),
            }),
        }
    }

    /// Creates the object, a new id is generated unless the state already has one
    #[tracing::instrument(level = "debug", skip_all, fields(resource = self.resource_name()))]
    pub fn create(
        &self,
        api: &InstanaApi,
        state: &mut ResourceState,
        formatter: &ResourceNameFormatter,
    ) -> Result<(), Error> {
        if state.id().is_none() {
            state.set_id(uuid::Uuid::new_v4().to_string());
        }
        self.update(api, state, formatter)
    }

    /// Refreshes `state` from the API, a missing object clears the id
    #[tracing::instrument(level = "debug", skip_all, fields(resource = self.resource_name()))]
    pub fn read(&self, api: &InstanaApi, state: &mut ResourceState) -> Result<(), Error> {
        let id = state
            .id()
            .ok_or(Error::MissingId(self.resource_name()))?
            .to_string();

        match self.fetch(api, &id) {
            Ok(object) => {
                self.update_state(state, &object)?;
                state.commit();
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(%id, "object no longer exists");
                state.clear_id();
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(resource = self.resource_name()))]
    pub fn update(
        &self,
        api: &InstanaApi,
        state: &mut ResourceState,
        formatter: &ResourceNameFormatter,
    ) -> Result<(), Error> {
        let object = self.map_state_to_data_object(state, formatter)?;
        let stored = object.upsert(api)?;
        self.update_state(state, &stored)?;
        state.commit();
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(resource = self.resource_name()))]
    pub fn delete(&self, api: &InstanaApi, state: &mut ResourceState) -> Result<(), Error> {
        let id = state.id().ok_or(Error::MissingId(self.resource_name()))?;
        match self.channel_type() {
            Some(_) => api.alerting_channels().delete_by_id(id)?,
            None if *self == ResourceKind::AlertingConfig => {
                api.alerting_configurations().delete_by_id(id)?
            }
            None => api.application_configs().delete_by_id(id)?,
        }
        state.clear_id();
        Ok(())
    }

    fn fetch(&self, api: &InstanaApi, id: &str) -> Result<DataObject, RestError> {
        let object = match self {
            ResourceKind::AlertingConfig => {
                DataObject::AlertingConfiguration(api.alerting_configurations().get_one(id)?)
            }
            ResourceKind::ApplicationConfig => {
                DataObject::ApplicationConfig(api.application_configs().get_one(id)?)
            }
            _ => DataObject::AlertingChannel(api.alerting_channels().get_one(id)?),
        };
        Ok(object)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resource_name())
    }
}

/// Data object produced by a resource handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataObject {
    AlertingChannel(AlertingChannel),
    AlertingConfiguration(AlertingConfiguration),
    ApplicationConfig(ApplicationConfig),
}

impl DataObject {
    pub fn id(&self) -> &str {
        match self {
            DataObject::AlertingChannel(object) => object.id(),
            DataObject::AlertingConfiguration(object) => object.id(),
            DataObject::ApplicationConfig(object) => object.id(),
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self {
            DataObject::AlertingChannel(object) => object.id = id,
            DataObject::AlertingConfiguration(object) => object.id = id,
            DataObject::ApplicationConfig(object) => object.id = id,
        }
    }

    pub fn resource_path(&self) -> &'static str {
        match self {
            DataObject::AlertingChannel(_) => AlertingChannel::RESOURCE_PATH,
            DataObject::AlertingConfiguration(_) => AlertingConfiguration::RESOURCE_PATH,
            DataObject::ApplicationConfig(_) => ApplicationConfig::RESOURCE_PATH,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            DataObject::AlertingChannel(object) => object.validate(),
            DataObject::AlertingConfiguration(object) => object.validate(),
            DataObject::ApplicationConfig(object) => object.validate(),
        }
    }

    /// JSON body of the PUT request
    pub fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            DataObject::AlertingChannel(object) => serde_json::to_value(object),
            DataObject::AlertingConfiguration(object) => serde_json::to_value(object),
            DataObject::ApplicationConfig(object) => serde_json::to_value(object),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            DataObject::AlertingChannel(_) => "alerting channel",
            DataObject::AlertingConfiguration(_) => "alerting configuration",
            DataObject::ApplicationConfig(_) => "application config",
        }
    }

    fn upsert(&self, api: &InstanaApi) -> Result<DataObject, RestError> {
        let stored = match self {
            DataObject::AlertingChannel(object) => {
                DataObject::AlertingChannel(api.alerting_channels().upsert(object)?)
            }
            DataObject::AlertingConfiguration(object) => {
                DataObject::AlertingConfiguration(api.alerting_configurations().upsert(object)?)
            }
            DataObject::ApplicationConfig(object) => {
                DataObject::ApplicationConfig(api.application_configs().upsert(object)?)
            }
        };
        Ok(stored)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resource_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_resource_name(kind.resource_name()), Some(*kind));
            assert!(kind.resource_name().starts_with("instana_"));
        }
        assert_eq!(ResourceKind::from_resource_name("instana_unknown"), None);
    }

    #[test]
    fn every_schema_has_a_required_name_and_computed_full_name() {
        for kind in ResourceKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema[0].presence, Presence::Required, "{kind}");
            assert_eq!(schema[1].presence, Presence::Computed, "{kind}");
        }
    }

    #[test]
    fn provider_schema_describes_every_attribute() {
        let schema = serde_json::to_value(ResourceKind::provider_schema()).unwrap();

        assert_eq!(
            schema["instana_alerting_channel_email"],
            serde_json::json!([
                {
                    "name": "name",
                    "type": "string",
                    "presence": "required",
                    "description": "name of the alerting channel"
                },
                {
                    "name": "full_name",
                    "type": "string",
                    "presence": "computed",
                    "description": "name of the alerting channel including the configured prefix and suffix"
                },
                {
                    "name": "emails",
                    "type": "string_list",
                    "presence": "required",
                    "description": "email addresses to notify"
                }
            ])
        );
        assert_eq!(
            schema["instana_application_config"][2],
            serde_json::json!({
                "name": "scope",
                "type": "string",
                "presence": "optional",
                "default": "INCLUDE_NO_DOWNSTREAM",
                "description": "downstream scope"
            })
        );
        assert_eq!(
            schema.as_object().unwrap().len(),
            ResourceKind::ALL.len()
        );
    }

    #[test]
    fn update_state_rejects_foreign_objects() {
        let channel = DataObject::AlertingChannel(AlertingChannel::new(
            "id",
            "name",
            AlertingChannelType::Slack,
        ));
        let mut state = ResourceState::default();

        assert!(matches!(
            ResourceKind::AlertingChannelEmail.update_state(&mut state, &channel),
            Err(Error::ObjectKindMismatch {
                resource: "instana_alerting_channel_email",
                found: "alerting channel"
            })
        ));
        assert!(ResourceKind::AlertingChannelSlack
            .update_state(&mut state, &channel)
            .is_ok());
        assert_eq!(state.id(), Some("id"));
    }

    #[test]
    fn data_object_dispatch() {
        let mut object = DataObject::AlertingChannel(AlertingChannel::new(
            "id",
            "name",
            AlertingChannelType::Email,
        ));
        assert_eq!(object.resource_path(), "/events/settings/alertingChannels");
        assert!(object.validate().is_err());

        object.set_id("other");
        assert_eq!(object.id(), "other");
        assert_eq!(object.to_payload().unwrap()["id"], "other");
    }
}
