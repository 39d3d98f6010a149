//! Error types emitted by the Sortie CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sortie_core::{
    ModelDefinitionError, ProblemError, ReportingError, SolveError, UnknownDimensionName,
};
use thiserror::Error;

/// Errors emitted by the Sortie CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The output format is neither `table` nor `json`.
    #[error("unknown output format `{value}` (expected `table` or `json`)")]
    UnknownFormat {
        /// Rejected value.
        value: String,
    },
    /// A requested report column does not name a dimension.
    #[error(transparent)]
    UnknownColumn(#[from] UnknownDimensionName),
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature to enable.
        feature: &'static str,
        /// Operation that needed it.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input file failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// An input file is not valid JSON of the expected shape.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// The problem record failed validation.
    #[error("problem in {path:?} is invalid: {source}")]
    InvalidProblem {
        /// Problem file.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: ProblemError,
    },
    /// The routing model could not be assembled.
    #[error("failed to build the routing model: {0}")]
    BuildModel(#[from] ModelDefinitionError),
    /// The engine found no acceptable assignment.
    #[error("solve failed: {source}")]
    Solve {
        /// Engine failure.
        source: SolveError,
    },
    /// Decoding the assignment failed.
    #[error("failed to decode itineraries: {0}")]
    Report(#[from] ReportingError),
    /// Serializing the report failed.
    #[error("failed to serialize report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing the solve output failed.
    #[error("failed to write solve output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
