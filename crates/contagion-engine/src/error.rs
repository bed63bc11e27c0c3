//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup, ingestion, and
//! reporting so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: contagion_graph::ConfigError,
    },

    /// Recording a trace failed for a reason other than a malformed record.
    #[error("tracer error: {source}")]
    Tracer {
        /// The underlying tracer error.
        #[from]
        source: contagion_graph::TracerError,
    },

    /// The trace file could not be read.
    #[error("failed to read trace file {path}: {source}")]
    TraceFile {
        /// Path that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// JSON decoding or encoding failed.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The `queries` section of the config could not be parsed.
    #[error("query config error: {message}")]
    Queries {
        /// Description of the parse failure.
        message: String,
    },
}
