//! Configuration shared by the Lambda handlers and the local dev server

use crate::error::AppError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_IP_SALT_PARAMETER: &str = "/cloud-resume/visitor-counter/ip-salt";
pub const DEFAULT_SLACK_WEBHOOK_PARAMETER: &str = "/cloud-resume/slack/webhook";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub visitor: VisitorConfig,
    pub alarm: AlarmConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorConfig {
    pub counter_table: String,
    pub ip_table: String,
    pub counter_record_id: String,
    pub ip_salt_parameter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    pub slack_webhook_parameter: String,
    pub timezone: String,
    pub icon_emoji: String,
    pub webhook_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub port: u16,
    pub dev_ip_salt: String,
    pub dev_slack_webhook_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(AppError::configuration(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                other
            ))),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            visitor: VisitorConfig {
                counter_table: var_or("COUNTER_TABLE", "VisitorCounterIAC"),
                ip_table: var_or("IP_TABLE", "VisitorIPsIAC"),
                counter_record_id: var_or("COUNTER_RECORD_ID", "visitor_count"),
                ip_salt_parameter: var_or("IP_SALT_PARAMETER", DEFAULT_IP_SALT_PARAMETER),
            },
            alarm: AlarmConfig {
                slack_webhook_parameter: var_or(
                    "SLACK_WEBHOOK_PARAMETER",
                    DEFAULT_SLACK_WEBHOOK_PARAMETER,
                ),
                timezone: var_or("ALARM_TIMEZONE", "Europe/Sofia"),
                icon_emoji: var_or("ALARM_ICON_EMOJI", ":rotating_light:"),
                webhook_timeout_seconds: var_or("WEBHOOK_TIMEOUT_SECONDS", "10")
                    .parse()
                    .map_err(|e| {
                        AppError::configuration(format!("WEBHOOK_TIMEOUT_SECONDS: {}", e))
                    })?,
            },
            app: AppConfig {
                log_level: var_or("RUST_LOG", "info"),
                log_format: var_or("LOG_FORMAT", "json").parse()?,
                port: var_or("PORT", "8000")
                    .parse()
                    .map_err(|e| AppError::configuration(format!("PORT: {}", e)))?,
                dev_ip_salt: var_or("DEV_IP_SALT", "local-dev-salt"),
                dev_slack_webhook_url: env::var("DEV_SLACK_WEBHOOK_URL").ok(),
            },
        };

        // Fail at cold start rather than on the first alarm.
        config.alarm.tz()?;
        Ok(config)
    }
}

impl AlarmConfig {
    /// Target zone for rendered alarm times.
    pub fn tz(&self) -> crate::Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            AppError::configuration(format!("invalid ALARM_TIMEZONE '{}': {}", self.timezone, e))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            visitor: VisitorConfig {
                counter_table: "VisitorCounterIAC".to_string(),
                ip_table: "VisitorIPsIAC".to_string(),
                counter_record_id: "visitor_count".to_string(),
                ip_salt_parameter: DEFAULT_IP_SALT_PARAMETER.to_string(),
            },
            alarm: AlarmConfig {
                slack_webhook_parameter: DEFAULT_SLACK_WEBHOOK_PARAMETER.to_string(),
                timezone: "Europe/Sofia".to_string(),
                icon_emoji: ":rotating_light:".to_string(),
                webhook_timeout_seconds: 10,
            },
            app: AppConfig {
                log_level: "info".to_string(),
                log_format: LogFormat::Json,
                port: 8000,
                dev_ip_salt: "local-dev-salt".to_string(),
                dev_slack_webhook_url: None,
            },
        }
    }
}
