//! JSON inputs: the problem record and optional initial routes.

use std::io::BufReader;

use camino::Utf8Path;
use serde::de::DeserializeOwned;
use sortie_core::{NodeIndex, ProblemData};

use crate::fs::open_utf8_file;
use crate::{ARG_SOLVE_INITIAL_ROUTES, ARG_SOLVE_PROBLEM, CliError};

fn load_json<T: DeserializeOwned>(path: &Utf8Path, field: &'static str) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a JSON-encoded [`ProblemData`] record from disk.
pub(crate) fn load_problem(path: &Utf8Path) -> Result<ProblemData, CliError> {
    load_json(path, ARG_SOLVE_PROBLEM)
}

/// Loads per-vehicle node sequences, depot excluded, from disk.
pub(crate) fn load_initial_routes(path: &Utf8Path) -> Result<Vec<Vec<NodeIndex>>, CliError> {
    load_json(path, ARG_SOLVE_INITIAL_ROUTES)
}
