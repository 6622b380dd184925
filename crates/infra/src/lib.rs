//! Infrastructure layer: store boundary, adapters, services and configuration.
//!
//! Domain crates decide what a valid client or sale is; this crate moves
//! validated records in and out of a relational store and exposes the
//! operations hosts call (`ClientRegistry`, `SalesLedger`,
//! `HistoryAggregator`, `CatalogReader`).

pub mod config;
pub mod services;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::StoreConfig;
pub use services::{CatalogReader, ClientRegistry, HistoryAggregator, SalesLedger, ServiceError};
pub use store::{CatalogStore, ClientStore, InMemoryStore, PostgresStore, SalesStore, StoreError};
