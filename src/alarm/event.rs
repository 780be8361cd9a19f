use aws_lambda_events::event::sns::SnsEvent;
use serde::{Deserialize, Serialize};
use shared::{AppError, Result};

/// The CloudWatch alarm state change embedded in an SNS message body.
///
/// Only the fields the notifier renders are kept; any of them may be
/// absent and read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmNotification {
    pub alarm_name: Option<String>,
    pub new_state_value: Option<String>,
    pub new_state_reason: Option<String>,
    pub state_change_time: Option<String>,
}

impl AlarmNotification {
    pub fn from_message(message: &str) -> Result<Self> {
        serde_json::from_str(message).map_err(|e| {
            AppError::malformed_event(format!("SNS message is not an alarm notification: {}", e))
        })
    }

    pub fn alarm_name(&self) -> &str {
        self.alarm_name.as_deref().unwrap_or_default()
    }

    pub fn state(&self) -> &str {
        self.new_state_value.as_deref().unwrap_or_default()
    }

    pub fn reason(&self) -> &str {
        self.new_state_reason.as_deref().unwrap_or_default()
    }
}

/// Message bodies of every record in the envelope, in delivery order.
pub fn sns_messages(event: &SnsEvent) -> Result<Vec<&str>> {
    if event.records.is_empty() {
        return Err(AppError::malformed_event("SNS event has no records"));
    }
    Ok(event.records.iter().map(|r| r.sns.message.as_str()).collect())
}
