//! Trace ingestion: read raw records and feed them into a [`ContactTracer`].
//!
//! The tracer treats malformed records as a caller contract violation, so
//! this module is where they are filtered out. Rejected records are logged
//! and skipped; any other tracer failure aborts ingestion.

use std::path::Path;

use contagion_graph::{ContactTracer, TracerError};
use contagion_types::Trace;
use tracing::{info, warn};

use crate::error::EngineError;

/// Outcome of feeding a batch of traces into the tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records that added a new contact time.
    pub recorded: usize,
    /// Records whose pair and time were already known.
    pub duplicates: usize,
    /// Malformed records that were skipped.
    pub rejected: usize,
}

/// Read a JSON array of traces from `path`.
pub fn load_traces(path: &Path) -> Result<Vec<Trace>, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::TraceFile {
        path: path.display().to_string(),
        source,
    })?;
    let traces: Vec<Trace> = serde_json::from_str(&contents)?;
    Ok(traces)
}

/// Record every valid trace, skipping malformed ones.
pub fn ingest(tracer: &mut ContactTracer, traces: &[Trace]) -> Result<IngestSummary, EngineError> {
    let mut summary = IngestSummary::default();
    for trace in traces {
        let before = tracer.event_count();
        match tracer.add_trace(trace) {
            Ok(()) => {
                if tracer.event_count() > before {
                    summary.recorded = summary.recorded.saturating_add(1);
                } else {
                    summary.duplicates = summary.duplicates.saturating_add(1);
                }
            }
            Err(err @ (TracerError::EmptyName | TracerError::SelfContact { .. })) => {
                warn!(
                    person1 = trace.person1,
                    person2 = trace.person2,
                    time = trace.time,
                    %err,
                    "skipping malformed trace"
                );
                summary.rejected = summary.rejected.saturating_add(1);
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        recorded = summary.recorded,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        entities = tracer.entity_count(),
        "traces ingested"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_counts_each_outcome() {
        let traces = vec![
            Trace::new("a", "b", 1),
            Trace::new("b", "a", 1),
            Trace::new("a", "a", 2),
            Trace::new("", "c", 3),
            Trace::new("b", "c", 4),
        ];
        let mut tracer = ContactTracer::new();
        let summary = ingest(&mut tracer, &traces);
        assert!(summary.is_ok());
        assert_eq!(
            summary.ok(),
            Some(IngestSummary {
                recorded: 2,
                duplicates: 1,
                rejected: 2,
            })
        );
        assert_eq!(tracer.entity_count(), 3);
    }

    #[test]
    fn missing_trace_file_reports_path() {
        let result = load_traces(Path::new("definitely/not/here.json"));
        assert!(matches!(result, Err(EngineError::TraceFile { .. })));
    }
}
