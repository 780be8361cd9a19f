//! Visitor counter and alarm notifier for a personal resume site.
//!
//! Two Lambda entry points live in `src/bin`; `main.rs` runs both behind a
//! local axum server for development.

pub mod alarm;
pub mod observability;
pub mod routes;
pub mod state;
pub mod visitor;

pub use observability::init_tracing;
pub use routes::create_dev_router;
