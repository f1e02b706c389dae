use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::flatten::Table;

/// Renders a table as tab-separated text: a header row, then one line per
/// record. Values are written verbatim; a value containing a tab or newline
/// would corrupt the table, and avoiding that is the data author's job.
pub fn render_table(table: &Table) -> String {
    let mut text = String::new();
    text.push_str(&table.columns.join("\t"));
    text.push('\n');
    for row in &table.rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}

/// Writes a table into `dir` under the table's own file name, replacing any
/// previous run's output.
pub fn write_table(dir: &Path, table: &Table) -> Result<PathBuf> {
    let path = dir.join(&table.name);
    fs::write(&path, render_table(table))?;
    Ok(path)
}
