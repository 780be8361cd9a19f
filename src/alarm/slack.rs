use reqwest::Client;
use serde::Serialize;
use shared::Result;
use tracing::info;

/// Incoming-webhook payload.
#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage<'a> {
    pub text: &'a str,
    pub icon_emoji: &'a str,
}

/// POST one message to a Slack incoming webhook.
///
/// Any transport error or non-2xx status is returned as is; there is no retry.
pub async fn post_to_slack(
    http_client: &Client,
    webhook_url: &str,
    message: &SlackMessage<'_>,
) -> Result<()> {
    let response = http_client
        .post(webhook_url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .json(message)
        .send()
        .await?
        .error_for_status()?;

    info!(status = response.status().as_u16(), "Successfully sent message to Slack");
    Ok(())
}
