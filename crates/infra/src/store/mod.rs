//! Relational store boundary.
//!
//! Services talk to the store through three narrow traits (clients, catalog,
//! sales) so the in-memory adapter and the Postgres adapter are
//! interchangeable.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{CatalogStore, ClientStore, SalesStore, StoreError};
