//! Type-safe identifier wrappers around dense integer indices.
//!
//! Entities are numbered 0, 1, 2, ... in order of first appearance. The
//! number doubles as the row/column index into the temporal adjacency
//! matrix, so identifiers are never reused or removed.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a dense `usize` index with standard derives.
macro_rules! define_index_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl $name {
            /// Wrap a raw index.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Return the inner index value.
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_index_id! {
    /// Dense identifier for an entity (a row/column of the contact matrix).
    EntityId
}
