//! Error types for the `contagion-graph` crate.
//!
//! Query operations never fail: unknown names produce empty results. Only
//! the mutation path returns [`TracerError`], and only for contract
//! violations by the caller.

use contagion_types::EntityId;

/// Errors that can occur when recording contacts.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TracerError {
    /// A trace named a participant with an empty string.
    #[error("trace participant name must not be empty")]
    EmptyName,

    /// Both participants of a trace are the same entity.
    #[error("trace records {name} in contact with themselves")]
    SelfContact {
        /// The repeated participant.
        name: String,
    },

    /// An entity index fell outside the matrix after capacity was ensured.
    #[error("entity {id} outside matrix of dimension {dimension}")]
    CapacityExceeded {
        /// The offending entity.
        id: EntityId,
        /// Current matrix dimension.
        dimension: usize,
    },

    /// The growth arithmetic for the matrix overflowed `usize`.
    #[error("arithmetic overflow while growing the contact matrix")]
    ArithmeticOverflow,
}
