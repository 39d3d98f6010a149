//! Solve command implementation for the Sortie CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sortie_core::{
    Assignment, DimensionId, ModelConfig, ProblemGraph, ReportColumns, RoutingEngine,
    RoutingModel, SearchConfig, decode,
};

use crate::input::{load_initial_routes, load_problem};
use crate::output::{OutputFormat, write_report};
use crate::{
    ARG_SOLVE_COLUMNS, ARG_SOLVE_FORMAT, ARG_SOLVE_INITIAL_ROUTES, ARG_SOLVE_MAX_GENERATIONS,
    ARG_SOLVE_PROBLEM, ARG_SOLVE_TIME_LIMIT, CliError, ENV_SOLVE_PROBLEM,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan pickup-and-delivery flights for a JSON problem record. \
                 The routing engine searches for routes unless initial routes \
                 are supplied, in which case those routes are evaluated and \
                 reported as they are.",
    about = "Plan routes for a problem record"
)]
#[ortho_config(prefix = "SORTIE")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing the problem record.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) problem_path: Option<Utf8PathBuf>,
    /// Output format: `table` (default) or `json`.
    #[arg(long = ARG_SOLVE_FORMAT, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<String>,
    /// Comma-separated dimensions to report, e.g. `global-time,load`.
    #[arg(long = ARG_SOLVE_COLUMNS, value_name = "list")]
    #[serde(default)]
    pub(crate) columns: Option<String>,
    /// Search time budget in seconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
    /// Upper bound on search generations.
    #[arg(long = ARG_SOLVE_MAX_GENERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_generations: Option<usize>,
    /// JSON list of per-vehicle node sequences to evaluate instead of
    /// searching.
    #[arg(long = ARG_SOLVE_INITIAL_ROUTES, value_name = "path")]
    #[serde(default)]
    pub(crate) initial_routes: Option<Utf8PathBuf>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON problem record.
    pub(crate) problem_path: Utf8PathBuf,
    /// Report rendering.
    pub(crate) format: OutputFormat,
    /// Dimensions reported per visit.
    pub(crate) columns: ReportColumns,
    /// Engine settings.
    pub(crate) search: SearchConfig,
    /// Routes to evaluate instead of searching.
    pub(crate) initial_routes: Option<Utf8PathBuf>,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.problem_path, ARG_SOLVE_PROBLEM)?;
        if let Some(routes) = &self.initial_routes {
            Self::require_existing(routes, ARG_SOLVE_INITIAL_ROUTES)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match crate::fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn parse_columns(list: &str) -> Result<ReportColumns, CliError> {
    let ids = list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::parse::<DimensionId>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReportColumns::new(ids))
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let problem_path = args.problem_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_PROBLEM,
            env: ENV_SOLVE_PROBLEM,
        })?;
        let format = args
            .format
            .as_deref()
            .map_or_else(|| Ok(OutputFormat::default()), str::parse)?;
        let columns = args
            .columns
            .as_deref()
            .map_or_else(|| Ok(ReportColumns::default()), parse_columns)?;

        let defaults = SearchConfig::default();
        let search = SearchConfig {
            time_limit: args
                .time_limit_secs
                .map_or(defaults.time_limit, Duration::from_secs),
            max_generations: args.max_generations.or(defaults.max_generations),
            ..defaults
        };

        Ok(Self {
            problem_path,
            format,
            columns,
            search,
            initial_routes: args.initial_routes,
        })
    }
}

/// Builds a routing engine for the current solve invocation.
pub(super) trait SolveEngineBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn RoutingEngine>, CliError>;
}

pub(super) struct DefaultSolveEngineBuilder;

impl SolveEngineBuilder for DefaultSolveEngineBuilder {
    #[cfg(feature = "solver-vrp")]
    fn build(&self, _config: &SolveConfig) -> Result<Box<dyn RoutingEngine>, CliError> {
        Ok(Box::new(sortie_solver_vrp::VrpEngine::new()))
    }

    #[cfg(not(feature = "solver-vrp"))]
    fn build(&self, _config: &SolveConfig) -> Result<Box<dyn RoutingEngine>, CliError> {
        Err(CliError::MissingFeature {
            feature: "solver-vrp",
            action: "searching for routes",
        })
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolveEngineBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveEngineBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let model = build_model(&config.problem_path)?;
    let assignment = execute_solve(&config, &model, builder)?;
    let report = decode(&model, &assignment, &config.columns)?;
    write_report(writer, &report, config.format)
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn build_model(path: &Utf8Path) -> Result<RoutingModel, CliError> {
    let data = load_problem(path)?;
    let graph = ProblemGraph::new(data).map_err(|source| CliError::InvalidProblem {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RoutingModel::standard(graph, ModelConfig::default())?)
}

fn execute_solve(
    config: &SolveConfig,
    model: &RoutingModel,
    builder: &dyn SolveEngineBuilder,
) -> Result<Assignment, CliError> {
    let outcome = match &config.initial_routes {
        Some(path) => {
            let routes = load_initial_routes(path)?;
            info!("evaluating {} initial routes from {path}", routes.len());
            model.evaluate_routes(&routes)
        }
        None => builder.build(config)?.solve(model, &config.search),
    };
    outcome.map_err(|source| CliError::Solve { source })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
