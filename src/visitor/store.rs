use async_trait::async_trait;
use dashmap::DashSet;
use shared::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// Persistence for the dedup set and the singleton counter.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Whether a record exists for this hashed visitor id.
    async fn visitor_exists(&self, hashed_id: &str) -> Result<bool>;

    /// Insert a visitor record unless one already exists.
    ///
    /// Returns `false` when another request created the record first.
    async fn insert_visitor_if_absent(&self, hashed_id: &str) -> Result<bool>;

    /// Atomically add one to the counter and return the new value.
    async fn increment_count(&self) -> Result<u64>;

    /// Current counter value; a missing counter row reads as zero.
    async fn current_count(&self) -> Result<u64>;
}

/// Process-local store for the dev server and tests.
#[derive(Debug, Default)]
pub struct InMemoryVisitorStore {
    visitors: DashSet<String>,
    count: AtomicU64,
}

impl InMemoryVisitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visitor_records(&self) -> usize {
        self.visitors.len()
    }
}

#[async_trait]
impl VisitorStore for InMemoryVisitorStore {
    async fn visitor_exists(&self, hashed_id: &str) -> Result<bool> {
        Ok(self.visitors.contains(hashed_id))
    }

    async fn insert_visitor_if_absent(&self, hashed_id: &str) -> Result<bool> {
        Ok(self.visitors.insert(hashed_id.to_string()))
    }

    async fn increment_count(&self) -> Result<u64> {
        Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn current_count(&self) -> Result<u64> {
        Ok(self.count.load(Ordering::SeqCst))
    }
}
