//! SNS boundary for the alarm notifier.

use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::event::{sns_messages, AlarmNotification};
use super::format::render_message;
use super::slack::{post_to_slack, SlackMessage};
use crate::state::AppState;

pub const SUCCESS_BODY: &str = "Message was sent to Slack";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl NotifierResponse {
    pub fn sent() -> Self {
        Self {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
        }
    }
}

/// Forward every alarm in the envelope to Slack.
///
/// All messages are parsed and rendered before the webhook secret is
/// fetched or anything is posted. Returns the number of messages sent.
pub async fn notify_alarms(state: &AppState, event: &SnsEvent) -> shared::Result<usize> {
    let tz = state.config.alarm.tz()?;

    let alarms = sns_messages(event)?
        .into_iter()
        .map(AlarmNotification::from_message)
        .collect::<shared::Result<Vec<_>>>()?;
    let texts = alarms
        .iter()
        .map(|alarm| render_message(alarm, tz))
        .collect::<shared::Result<Vec<_>>>()?;

    let webhook_url = state
        .secrets
        .resolve(&state.config.alarm.slack_webhook_parameter)
        .await?;

    for (alarm, text) in alarms.iter().zip(&texts) {
        let message = SlackMessage {
            text,
            icon_emoji: &state.config.alarm.icon_emoji,
        };
        post_to_slack(&state.http_client, &webhook_url, &message).await?;

        info!(
            alarm_name = alarm.alarm_name(),
            alarm_state = alarm.state(),
            "🚨 alarm forwarded"
        );
    }

    Ok(texts.len())
}

pub async fn function_handler(
    state: &AppState,
    event: LambdaEvent<SnsEvent>,
) -> Result<NotifierResponse, Error> {
    match notify_alarms(state, &event.payload).await {
        Ok(_) => Ok(NotifierResponse::sent()),
        Err(e) => {
            // Surfaced to the runtime so the function's own error metric fires.
            error!(
                request_id = %event.context.request_id,
                error_code = e.error_code(),
                error = %e,
                "alarm notification failed"
            );
            Err(e.into())
        }
    }
}
