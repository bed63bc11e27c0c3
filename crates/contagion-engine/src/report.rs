//! Query evaluation and the JSON report printed by the engine.
//!
//! Queries are read from the `queries` section of `contagion-config.yaml`.
//! Each one maps onto a single [`ContactTracer`] operation.

use std::collections::BTreeSet;
use std::path::Path;

use contagion_graph::ContactTracer;
use contagion_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A query against the contact graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// All contact times between two people.
    ContactTimes {
        /// First person.
        person: String,
        /// Second person.
        other: String,
    },
    /// Everyone a person has met.
    Contacts {
        /// The person.
        person: String,
    },
    /// Everyone a person has met at or after `time`.
    ContactsAfter {
        /// The person.
        person: String,
        /// Inclusive lower bound.
        time: Timestamp,
    },
    /// Simulated propagation from a person contagious since `time`.
    ContactTrace {
        /// The origin.
        person: String,
        /// When the origin became contagious.
        time: Timestamp,
    },
}

/// The answer to a single [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    /// Answer to [`Query::ContactTimes`].
    ContactTimes {
        /// First person.
        person: String,
        /// Second person.
        other: String,
        /// Ascending contact times.
        times: Vec<Timestamp>,
    },
    /// Answer to [`Query::Contacts`].
    Contacts {
        /// The person.
        person: String,
        /// Direct contacts.
        contacts: BTreeSet<String>,
    },
    /// Answer to [`Query::ContactsAfter`].
    ContactsAfter {
        /// The person.
        person: String,
        /// Inclusive lower bound.
        time: Timestamp,
        /// Direct contacts at or after `time`.
        contacts: BTreeSet<String>,
    },
    /// Answer to [`Query::ContactTrace`].
    ContactTrace {
        /// The origin.
        person: String,
        /// When the origin became contagious.
        time: Timestamp,
        /// Everyone who may have been infected, excluding the origin.
        infected: BTreeSet<String>,
    },
}

/// Summary of the graph plus every query answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Distinct entities seen.
    pub entities: usize,
    /// Distinct contacts recorded.
    pub events: usize,
    /// Current contact matrix dimension.
    pub matrix_dimension: usize,
    /// One entry per configured query, in order.
    pub results: Vec<QueryResult>,
}

/// Evaluate one query.
pub fn run_query(tracer: &mut ContactTracer, query: &Query) -> QueryResult {
    match query {
        Query::ContactTimes { person, other } => QueryResult::ContactTimes {
            person: person.clone(),
            other: other.clone(),
            times: tracer.get_contact_times(person, other),
        },
        Query::Contacts { person } => QueryResult::Contacts {
            person: person.clone(),
            contacts: tracer.get_contacts(person),
        },
        Query::ContactsAfter { person, time } => QueryResult::ContactsAfter {
            person: person.clone(),
            time: *time,
            contacts: tracer.get_contacts_after(person, *time),
        },
        Query::ContactTrace { person, time } => QueryResult::ContactTrace {
            person: person.clone(),
            time: *time,
            infected: tracer.contact_trace(person, *time),
        },
    }
}

/// Evaluate every query and assemble the report.
pub fn build_report(tracer: &mut ContactTracer, queries: &[Query]) -> Report {
    let results = queries.iter().map(|q| run_query(tracer, q)).collect();
    Report {
        entities: tracer.entity_count(),
        events: tracer.event_count(),
        matrix_dimension: tracer.matrix_dimension(),
        results,
    }
}

/// Load the `queries` section from the YAML config file.
///
/// A missing file or a file without `queries` yields an empty list.
pub fn load_queries(config_path: &Path) -> Result<Vec<Query>, EngineError> {
    if !config_path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(config_path).map_err(|e| EngineError::Queries {
        message: format!("failed to read config file: {e}"),
    })?;
    parse_queries(&contents)
}

/// Parse the `queries` section out of a full YAML config document.
pub fn parse_queries(yaml: &str) -> Result<Vec<Query>, EngineError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: serde_yml::Value = serde_yml::from_str(yaml).map_err(|e| EngineError::Queries {
        message: format!("failed to parse config YAML: {e}"),
    })?;

    raw.get("queries").map_or_else(
        || Ok(Vec::new()),
        |value| {
            serde_yml::from_value(value.clone()).map_err(|e| EngineError::Queries {
                message: format!("failed to parse queries: {e}"),
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tracer() -> ContactTracer {
        let mut tracer = ContactTracer::new();
        for (a, b, t) in [("a", "b", 10), ("a", "c", 5), ("b", "c", 50)] {
            assert!(tracer.add_contact(a, b, t).is_ok());
        }
        tracer
    }

    #[test]
    fn parse_every_query_kind() {
        let yaml = r"
tracer:
  incubation_offset: 60
queries:
  - kind: contact_times
    person: a
    other: b
  - kind: contacts
    person: a
  - kind: contacts_after
    person: a
    time: 8
  - kind: contact_trace
    person: a
    time: 0
";
        let queries = parse_queries(yaml);
        assert!(queries.is_ok());
        let queries = queries.ok().unwrap_or_default();
        assert_eq!(queries.len(), 4);
        assert_eq!(
            queries.get(2),
            Some(&Query::ContactsAfter {
                person: "a".to_owned(),
                time: 8,
            })
        );
    }

    #[test]
    fn missing_queries_section_is_empty() {
        let queries = parse_queries("tracer:\n  initial_capacity: 5\n");
        assert!(queries.is_ok_and(|q| q.is_empty()));
        assert!(parse_queries("").is_ok_and(|q| q.is_empty()));
    }

    #[test]
    fn unknown_query_kind_is_an_error() {
        let yaml = "queries:\n  - kind: teleport\n    person: a\n";
        assert!(matches!(parse_queries(yaml), Err(EngineError::Queries { .. })));
    }

    #[test]
    fn report_answers_queries_in_order() {
        let mut tracer = sample_tracer();
        let queries = vec![
            Query::ContactTrace {
                person: "a".to_owned(),
                time: 0,
            },
            Query::ContactsAfter {
                person: "a".to_owned(),
                time: 8,
            },
            Query::ContactTimes {
                person: "nobody".to_owned(),
                other: "a".to_owned(),
            },
        ];
        let report = build_report(&mut tracer, &queries);

        assert_eq!(report.entities, 3);
        assert_eq!(report.events, 3);
        assert_eq!(report.matrix_dimension, 50);
        let expected_infected: BTreeSet<String> =
            ["b", "c"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(
            report.results.first(),
            Some(&QueryResult::ContactTrace {
                person: "a".to_owned(),
                time: 0,
                infected: expected_infected,
            })
        );
        assert_eq!(
            report.results.get(2),
            Some(&QueryResult::ContactTimes {
                person: "nobody".to_owned(),
                other: "a".to_owned(),
                times: Vec::new(),
            })
        );
    }

    #[test]
    fn report_serializes_with_kind_tags() {
        let mut tracer = sample_tracer();
        let queries = vec![Query::Contacts {
            person: "c".to_owned(),
        }];
        let report = build_report(&mut tracer, &queries);
        let json = serde_json::to_value(&report);
        assert!(json.is_ok());
        let json = json.ok().unwrap_or_default();
        assert_eq!(json["results"][0]["kind"], "contacts");
        assert_eq!(json["results"][0]["contacts"], serde_json::json!(["a", "b"]));
    }
}
