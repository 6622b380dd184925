//! `opticpos-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns)
//! shared by the client registry, the catalog and the sales ledger.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod text;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use money::Amount;
pub use value_object::ValueObject;
