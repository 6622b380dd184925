//! Client registry domain module.
//!
//! This crate contains the rules for client records (validation, normalization
//! and in-memory search), implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod client;
pub mod search;

pub use client::{Client, ClientDetails, ClientId, ClientInput, RegisterClient, UpdateClient};
pub use search::search_clients;
