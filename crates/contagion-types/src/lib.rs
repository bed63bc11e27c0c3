//! Shared type definitions for the Contagion contact-tracing engine.
//!
//! # Modules
//!
//! - [`ids`] -- Dense index wrappers for entity identifiers
//! - [`structs`] -- Entity and contact trace records

pub mod ids;
pub mod structs;

pub use ids::EntityId;
pub use structs::{Entity, Timestamp, Trace};
