//! Engine binary for the Contagion contact-tracing core.
//!
//! Loads configuration, ingests a trace file into a [`ContactTracer`], runs
//! the configured queries, and prints a JSON report on stdout. Logs go to
//! stderr so the report can be piped.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `contagion-config.yaml` (or `CONTAGION_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the tracer from the `tracer` section
//! 4. Load and ingest traces from `input.traces_path`
//! 5. Evaluate the `queries` section and print the report

mod error;
mod ingest;
mod report;

use std::path::{Path, PathBuf};

use contagion_graph::{ContactTracer, ContagionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, ingestion, or report encoding fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(
        config = %config_path.display(),
        initial_capacity = config.tracer.initial_capacity,
        incubation_offset = config.tracer.incubation_offset,
        "contagion-engine starting"
    );

    // 3. Build the tracer.
    let mut tracer = ContactTracer::with_config(config.tracer)?;

    // 4. Ingest traces.
    let traces_path = Path::new(&config.input.traces_path);
    if traces_path.exists() {
        let traces = ingest::load_traces(traces_path)?;
        info!(path = %traces_path.display(), count = traces.len(), "Trace file loaded");
        ingest::ingest(&mut tracer, &traces)?;
    } else {
        info!(path = %traces_path.display(), "Trace file not found, starting empty");
    }

    // 5. Run queries and print the report.
    let queries = report::load_queries(&config_path)?;
    let report = report::build_report(&mut tracer, &queries);
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    println!("{json}");

    info!(
        queries = queries.len(),
        entities = report.entities,
        events = report.events,
        "contagion-engine finished"
    );
    Ok(())
}

/// Resolve the config file path, honouring `CONTAGION_CONFIG`.
fn config_path() -> PathBuf {
    std::env::var_os("CONTAGION_CONFIG")
        .map_or_else(|| PathBuf::from("contagion-config.yaml"), PathBuf::from)
}

/// Load the main configuration, falling back to defaults when the file is
/// absent.
fn load_config(path: &Path) -> Result<ContagionConfig, EngineError> {
    if path.exists() {
        Ok(ContagionConfig::from_file(path)?)
    } else {
        let mut config = ContagionConfig::default();
        config.input.apply_env_overrides();
        Ok(config)
    }
}
