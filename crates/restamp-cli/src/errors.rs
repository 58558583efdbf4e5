//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use restamp_at::{FormatError, UnappliedTransformsError};
use restamp_core::RunError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to load access transformers: {0}")]
    Transformers(#[from] FormatError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("could not apply access transformers: {0}")]
    Unapplied(#[from] UnappliedTransformsError),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
}
