//! Operations exposed to hosts (UI, CLI, HTTP).
//!
//! Each service validates its input in the domain crates first and only then
//! touches the store, so a rejected request never reaches the database.

pub mod catalog;
pub mod error;
pub mod history;
pub mod ledger;
pub mod registry;

pub use catalog::CatalogReader;
pub use error::ServiceError;
pub use history::HistoryAggregator;
pub use ledger::SalesLedger;
pub use registry::ClientRegistry;
