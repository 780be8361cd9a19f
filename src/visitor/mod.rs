pub mod counter;
pub mod dynamo;
pub mod handler;
pub mod store;

pub use counter::{count_visit, VisitClassification, VisitOutcome, VisitorCountResponse};
pub use dynamo::DynamoVisitorStore;
pub use store::{InMemoryVisitorStore, VisitorStore};
