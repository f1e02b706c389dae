use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::flatten;
use crate::io::tsv;
use crate::parse;

/// Per-table outcome of a completed run.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub file: String,
    pub rows: usize,
}

/// Summary of one full export run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub rooms: usize,
    pub days: usize,
    pub tables: Vec<TableReport>,
}

/// Runs one full export: read the input, decode the object literal bound to
/// `var_name`, build all four tables, then write all four files into
/// `out_dir`. Nothing is written until every table has been built, so a
/// failing run leaves no partial output behind.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), out_dir = %out_dir.display())
)]
pub fn seed(input: &Path, out_dir: &Path, var_name: &str) -> Result<SeedReport> {
    let source = fs::read_to_string(input)?;
    let document = parse::parse_object(&source, var_name)?;

    let rooms = document
        .get("rooms")
        .and_then(Value::as_object)
        .map_or(0, |rooms| rooms.len());
    let days = document
        .get("event")
        .and_then(|event| event.get("days"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!(rooms, days, "event document decoded");

    let tables = [
        flatten::event_table(&document)?,
        flatten::rooms_table(&document)?,
        flatten::items_table(&document)?,
        flatten::schedule_table(&document)?,
    ];

    let mut reports = Vec::with_capacity(tables.len());
    for table in &tables {
        let path = tsv::write_table(out_dir, table)?;
        debug!(path = %path.display(), rows = table.rows.len(), "table written");
        reports.push(TableReport {
            file: table.name.clone(),
            rows: table.rows.len(),
        });
    }

    Ok(SeedReport {
        rooms,
        days,
        tables: reports,
    })
}
