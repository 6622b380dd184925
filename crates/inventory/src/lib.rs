//! Inventory catalog module (frames and lenses).
//!
//! The catalog is reference data: sales point at frames and lenses, but this
//! crate never tracks stock. Pure domain logic only (no IO, no storage).

pub mod frame;
pub mod lens;

pub use frame::{FrameId, InventoryFrame};
pub use lens::{InventoryLens, LensId};
