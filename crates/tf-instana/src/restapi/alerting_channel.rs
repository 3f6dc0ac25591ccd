use super::validation;
use super::{InstanaDataObject, ValidationError};
use serde::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertingChannelType {
    Email,
    Slack,
    WebHook,
}

/// Notification target of alerts
///
/// Which of the optional fields are required depends on [AlertingChannel::kind].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingChannel {
    pub id: String,
    pub name: String,
    pub kind: AlertingChannelType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhook_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl AlertingChannel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AlertingChannelType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            emails: vec![],
            webhook_url: None,
            webhook_urls: vec![],
            icon_url: None,
            channel: None,
        }
    }
}

impl InstanaDataObject for AlertingChannel {
    const RESOURCE_PATH: &'static str = "/events/settings/alertingChannels";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_non_blank("ID", &self.id)?;
        validation::require_non_blank("Name", &self.name)?;
        validation::require_max_length("Name", &self.name, MAX_NAME_LENGTH)?;

        match self.kind {
            AlertingChannelType::Email => {
                validation::require_not_empty("Emails", &self.emails)?;
                validation::require_unique("Emails", &self.emails)
            }
            AlertingChannelType::Slack => validation::require_non_blank(
                "WebhookURL",
                self.webhook_url.as_deref().unwrap_or_default(),
            ),
            AlertingChannelType::WebHook => {
                validation::require_not_empty("WebhookURLs", &self.webhook_urls)?;
                validation::require_unique("WebhookURLs", &self.webhook_urls)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn email_channel() -> AlertingChannel {
        AlertingChannel {
            emails: vec!["ops@example.com".into()],
            ..AlertingChannel::new("channel-id", "ops", AlertingChannelType::Email)
        }
    }

    #[test]
    fn email_channel_requires_unique_emails() {
        assert!(email_channel().validate().is_ok());

        let without_emails = AlertingChannel {
            emails: vec![],
            ..email_channel()
        };
        assert_eq!(
            without_emails.validate(),
            Err(ValidationError::Missing { field: "Emails" })
        );

        let duplicates = AlertingChannel {
            emails: vec!["a@b.c".into(), "a@b.c".into()],
            ..email_channel()
        };
        assert_eq!(
            duplicates.validate(),
            Err(ValidationError::NotUnique { field: "Emails" })
        );
    }

    #[test]
    fn slack_channel_requires_webhook_url() {
        let slack = AlertingChannel::new("id", "slack", AlertingChannelType::Slack);
        assert_eq!(
            slack.validate(),
            Err(ValidationError::Missing {
                field: "WebhookURL"
            })
        );

        let slack = AlertingChannel {
            webhook_url: Some("https://hooks.slack.com/x".into()),
            ..slack
        };
        assert!(slack.validate().is_ok());
    }

    #[test]
    fn webhook_channel_requires_urls() {
        let webhook = AlertingChannel::new("id", "hook", AlertingChannelType::WebHook);
        assert!(webhook.validate().is_err());
    }

    #[test]
    fn name_and_id_are_required() {
        let channel = AlertingChannel {
            name: " ".into(),
            ..email_channel()
        };
        assert_eq!(
            channel.validate(),
            Err(ValidationError::Missing { field: "Name" })
        );
    }

    #[test]
    fn kind_is_serialized_in_screaming_snake_case() {
        let json = serde_json::to_value(email_channel()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "channel-id",
                "name": "ops",
                "kind": "EMAIL",
                "emails": ["ops@example.com"]
            })
        );
        assert_eq!(
            serde_json::to_value(AlertingChannelType::WebHook).unwrap(),
            "WEB_HOOK"
        );
    }
}
