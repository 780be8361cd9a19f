use serde::Serialize;
use shared::utils::{hash_visitor_ip, short_hash};
use shared::{Result, SecretResolver};
use std::fmt;
use tracing::info;

use super::store::VisitorStore;

/// Whether this request added a new unique visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitClassification {
    NewVisitor,
    ExistingVisitor,
}

impl fmt::Display for VisitClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitClassification::NewVisitor => f.write_str("new_visitor"),
            VisitClassification::ExistingVisitor => f.write_str("existing_visitor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOutcome {
    pub count: u64,
    pub classification: VisitClassification,
}

/// Wire body of the counter endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VisitorCountResponse {
    pub visitor_count: u64,
}

impl From<VisitOutcome> for VisitorCountResponse {
    fn from(outcome: VisitOutcome) -> Self {
        Self {
            visitor_count: outcome.count,
        }
    }
}

/// Count a visit from `source_ip`, once per distinct salted hash.
///
/// The dedup record is written with insert-if-absent, so two concurrent
/// first requests from one address still increment the counter only once;
/// the loser of the race reads the current count instead.
pub async fn count_visit(
    secrets: &dyn SecretResolver,
    store: &dyn VisitorStore,
    salt_parameter: &str,
    source_ip: &str,
) -> Result<VisitOutcome> {
    let salt = secrets.resolve(salt_parameter).await?;
    let hashed_id = hash_visitor_ip(&salt, source_ip);

    let outcome = if !store.visitor_exists(&hashed_id).await?
        && store.insert_visitor_if_absent(&hashed_id).await?
    {
        VisitOutcome {
            count: store.increment_count().await?,
            classification: VisitClassification::NewVisitor,
        }
    } else {
        VisitOutcome {
            count: store.current_count().await?,
            classification: VisitClassification::ExistingVisitor,
        }
    };

    info!(
        classification = %outcome.classification,
        count = outcome.count,
        visitor_hash = short_hash(&hashed_id),
        "visitor counted"
    );

    Ok(outcome)
}
