//! DynamoDB-backed visitor store.
//!
//! Two tables: the IP-hash table keyed by `ip`, and the counter table
//! holding a single row keyed by `id` with a numeric `count`.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;
use shared::config::VisitorConfig;
use shared::{AppError, Result};
use std::collections::HashMap;
use tracing::debug;

use super::store::VisitorStore;

const IP_KEY: &str = "ip";
const COUNTER_KEY: &str = "id";
const COUNT_ATTRIBUTE: &str = "count";

#[derive(Debug, Clone)]
pub struct DynamoVisitorStore {
    client: DynamoClient,
    counter_table: String,
    ip_table: String,
    counter_record_id: String,
}

impl DynamoVisitorStore {
    pub fn new(client: DynamoClient, config: &VisitorConfig) -> Self {
        Self {
            client,
            counter_table: config.counter_table.clone(),
            ip_table: config.ip_table.clone(),
            counter_record_id: config.counter_record_id.clone(),
        }
    }

    fn counter_key(&self) -> AttributeValue {
        AttributeValue::S(self.counter_record_id.clone())
    }
}

/// Read the `count` attribute out of an item, defaulting to zero.
fn parse_count(item: Option<&HashMap<String, AttributeValue>>) -> Result<u64> {
    let Some(value) = item.and_then(|item| item.get(COUNT_ATTRIBUTE)) else {
        return Ok(0);
    };

    let raw = value
        .as_n()
        .map_err(|_| AppError::store("parse_count", "'count' is not a number"))?;

    raw.parse::<u64>()
        .map_err(|e| AppError::store("parse_count", format!("'count' = {}: {}", raw, e)))
}

#[async_trait]
impl VisitorStore for DynamoVisitorStore {
    async fn visitor_exists(&self, hashed_id: &str) -> Result<bool> {
        let output = self
            .client
            .get_item()
            .table_name(&self.ip_table)
            .key(IP_KEY, AttributeValue::S(hashed_id.to_string()))
            .projection_expression("#ip")
            .expression_attribute_names("#ip", IP_KEY)
            .send()
            .await
            .map_err(|e| AppError::store("get_item", DisplayErrorContext(&e).to_string()))?;

        Ok(output.item().is_some())
    }

    async fn insert_visitor_if_absent(&self, hashed_id: &str) -> Result<bool> {
        let result = self
            .client
            .put_item()
            .table_name(&self.ip_table)
            .item(IP_KEY, AttributeValue::S(hashed_id.to_string()))
            .condition_expression("attribute_not_exists(#ip)")
            .expression_attribute_names("#ip", IP_KEY)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let lost_race = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);

                if lost_race {
                    debug!(table = %self.ip_table, "visitor record created concurrently");
                    Ok(false)
                } else {
                    Err(AppError::store("put_item", DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }

    async fn increment_count(&self) -> Result<u64> {
        // ADD initialises a missing attribute to zero before adding.
        let output = self
            .client
            .update_item()
            .table_name(&self.counter_table)
            .key(COUNTER_KEY, self.counter_key())
            .update_expression("ADD #c :inc")
            .expression_attribute_names("#c", COUNT_ATTRIBUTE)
            .expression_attribute_values(":inc", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| AppError::store("update_item", DisplayErrorContext(&e).to_string()))?;

        match output.attributes() {
            Some(attributes) if attributes.contains_key(COUNT_ATTRIBUTE) => {
                parse_count(Some(attributes))
            }
            _ => Err(AppError::store("update_item", "no updated 'count' returned")),
        }
    }

    async fn current_count(&self) -> Result<u64> {
        let output = self
            .client
            .get_item()
            .table_name(&self.counter_table)
            .key(COUNTER_KEY, self.counter_key())
            .send()
            .await
            .map_err(|e| AppError::store("get_item", DisplayErrorContext(&e).to_string()))?;

        parse_count(output.item())
    }
}
