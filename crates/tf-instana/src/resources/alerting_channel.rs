//! handles of the alerting channel resources, one resource per channel kind
use super::formatter::ResourceNameFormatter;
use super::schema::{FieldSpec, FieldType};
use super::state::{ResourceState, StateError};
use crate::restapi::{AlertingChannel, AlertingChannelType};

pub const FIELD_NAME: &str = "name";
pub const FIELD_FULL_NAME: &str = "full_name";
pub const FIELD_EMAILS: &str = "emails";
pub const FIELD_WEBHOOK_URL: &str = "webhook_url";
pub const FIELD_ICON_URL: &str = "icon_url";
pub const FIELD_CHANNEL: &str = "channel";
pub const FIELD_WEBHOOK_URLS: &str = "webhook_urls";

const NAME: FieldSpec = FieldSpec::required(FIELD_NAME, FieldType::String, "name of the alerting channel");
const FULL_NAME: FieldSpec = FieldSpec::computed(
    FIELD_FULL_NAME,
    "name of the alerting channel including the configured prefix and suffix",
);

pub const EMAIL_SCHEMA: &[FieldSpec] = &[
    NAME,
    FULL_NAME,
    FieldSpec::required(FIELD_EMAILS, FieldType::StringList, "email addresses to notify"),
];

pub const SLACK_SCHEMA: &[FieldSpec] = &[
    NAME,
    FULL_NAME,
    FieldSpec::required(FIELD_WEBHOOK_URL, FieldType::String, "slack webhook url"),
    FieldSpec::optional(FIELD_ICON_URL, FieldType::String, "icon shown with the message"),
    FieldSpec::optional(FIELD_CHANNEL, FieldType::String, "slack channel to post to"),
];

pub const WEBHOOK_SCHEMA: &[FieldSpec] = &[
    NAME,
    FULL_NAME,
    FieldSpec::required(FIELD_WEBHOOK_URLS, FieldType::StringList, "urls to call"),
];

pub fn map_state_to_data_object(
    kind: AlertingChannelType,
    state: &ResourceState,
    formatter: &ResourceNameFormatter,
) -> Result<AlertingChannel, StateError> {
    let name = formatter.full_name(state, FIELD_NAME, FIELD_FULL_NAME)?;
    let mut channel = AlertingChannel::new(state.id().unwrap_or_default(), name, kind);

    match kind {
        AlertingChannelType::Email => channel.emails = state.string_list(FIELD_EMAILS)?,
        AlertingChannelType::Slack => {
            channel.webhook_url = state.string(FIELD_WEBHOOK_URL)?.map(str::to_string);
            channel.icon_url = state.string(FIELD_ICON_URL)?.map(str::to_string);
            channel.channel = state.string(FIELD_CHANNEL)?.map(str::to_string);
        }
        AlertingChannelType::WebHook => {
            channel.webhook_urls = state.string_list(FIELD_WEBHOOK_URLS)?
        }
    }

    Ok(channel)
}

pub fn update_state(state: &mut ResourceState, channel: &AlertingChannel) {
    state.set_id(channel.id.as_str());
    state.set(FIELD_FULL_NAME, channel.name.as_str());

    match channel.kind {
        AlertingChannelType::Email => state.set(FIELD_EMAILS, channel.emails.clone()),
        AlertingChannelType::Slack => {
            state.set_optional(FIELD_WEBHOOK_URL, channel.webhook_url.clone());
            state.set_optional(FIELD_ICON_URL, channel.icon_url.clone());
            state.set_optional(FIELD_CHANNEL, channel.channel.clone());
        }
        AlertingChannelType::WebHook => state.set(FIELD_WEBHOOK_URLS, channel.webhook_urls.clone()),
    }
}
