//! Rendering of decoded reports.

use std::io::Write;
use std::str::FromStr;

use sortie_core::{Itinerary, Report};

use crate::CliError;

/// How `solve` prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab-separated route tables, one per aircraft.
    #[default]
    Table,
    /// The full report as pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(CliError::UnknownFormat {
                value: value.to_owned(),
            }),
        }
    }
}

pub(crate) fn write_report(
    writer: &mut dyn Write,
    report: &Report,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => write_tables(writer, report).map_err(CliError::WriteOutput),
        OutputFormat::Json => write_json(writer, report),
    }
}

fn write_json(writer: &mut dyn Write, report: &Report) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

fn write_tables(writer: &mut dyn Write, report: &Report) -> std::io::Result<()> {
    let mut headings = vec!["flight", "vehicle", "node", "node_id"];
    headings.extend(report.columns.iter().map(|id| id.label()));
    let header = headings.join("\t");

    for itinerary in &report.itineraries {
        writeln!(writer, "Route for vehicle {}:", itinerary.vehicle)?;
        writeln!(writer, "{header}")?;
        write_rows(writer, itinerary)?;
        writeln!(writer, "Makespan of the route: {}m", itinerary.makespan)?;
        writeln!(writer)?;
    }
    writeln!(writer, "Total makespan of all routes: {}m", report.total_makespan)?;
    writeln!(writer, "Objective: {}", report.objective)?;
    if !report.unvisited.is_empty() {
        let nodes: Vec<String> = report.unvisited.iter().map(ToString::to_string).collect();
        writeln!(writer, "Unvisited nodes: {}", nodes.join(", "))?;
    }
    Ok(())
}

fn write_rows(writer: &mut dyn Write, itinerary: &Itinerary) -> std::io::Result<()> {
    for record in &itinerary.records {
        let mut cells = vec![
            record.flight.to_string(),
            record.vehicle.to_string(),
            record.node.clone(),
            record.node_id.to_string(),
        ];
        cells.extend(record.values.iter().map(ToString::to_string));
        writeln!(writer, "{}", cells.join("\t"))?;
    }
    Ok(())
}
