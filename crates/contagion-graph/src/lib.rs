//! Temporal contact graph for the Contagion engine.
//!
//! This crate records pairwise, timestamped contacts between named entities
//! and answers queries about direct contacts, time-filtered contacts, and a
//! simulated propagation set.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration with defaults and env overrides.
//! - [`error`] -- Error types for the mutation path.
//! - [`registry`] -- Append-only name to dense id mapping.
//! - [`matrix`] -- Symmetric, linearly growing matrix of timestamp sets.
//! - [`tracer`] -- [`ContactTracer`]: name-level queries and the
//!   time-respecting propagation search.
//!
//! # Usage
//!
//! ```
//! use contagion_graph::ContactTracer;
//!
//! let mut tracer = ContactTracer::new();
//! tracer.add_contact("alice", "bob", 10).ok();
//! tracer.add_contact("bob", "carol", 50).ok();
//!
//! // Bob becomes contagious at 10 + 60 = 70, after meeting Carol.
//! let infected = tracer.contact_trace("alice", 0);
//! assert!(infected.contains("bob"));
//! assert!(!infected.contains("carol"));
//! ```

pub mod config;
pub mod error;
pub mod matrix;
pub mod registry;
pub mod tracer;

// Re-export primary types at crate root.
pub use config::{ConfigError, ContagionConfig, TracerConfig};
pub use error::TracerError;
pub use matrix::TemporalMatrix;
pub use registry::EntityRegistry;
pub use tracer::ContactTracer;
