//! Core record types shared by the graph engine and the ingestion driver.

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A point in time at which a contact occurred.
///
/// Units are whatever the ingestion source uses (minutes in the reference
/// datasets). Only ordering and the incubation offset matter to the engine.
pub type Timestamp = i64;

/// A uniquely named participant in the contact graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Stable dense identifier, assigned in order of first appearance.
    pub id: EntityId,
    /// External identity key.
    pub name: String,
}

/// A single timestamped, undirected contact between two named entities.
///
/// `Trace::new("a", "b", t)` and `Trace::new("b", "a", t)` describe the same
/// contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trace {
    /// One participant.
    pub person1: String,
    /// The other participant.
    pub person2: String,
    /// When the contact happened.
    pub time: Timestamp,
}

impl Trace {
    /// Build a trace from any pair of name-like values.
    pub fn new(person1: impl Into<String>, person2: impl Into<String>, time: Timestamp) -> Self {
        Self {
            person1: person1.into(),
            person2: person2.into(),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_json_shape() {
        let json = r#"{"person1":"alice","person2":"bob","time":42}"#;
        let trace: Result<Trace, _> = serde_json::from_str(json);
        assert!(trace.is_ok());
        let trace = trace.ok().unwrap_or_else(|| Trace::new("", "", 0));
        assert_eq!(trace, Trace::new("alice", "bob", 42));
    }
}
