use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::classify::classify_and_fill;
use crate::loader::load_table;
use crate::scrub::scrub;
use crate::table::{Disposition, Highlight};
use crate::writer::{resolve_output_path, write_workbook};

/// Outcome of one processing run, reported back to the shell.
#[derive(Debug)]
pub struct Report {
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_filled: usize,
    pub rows_dropped: usize,
}

/// Runs the whole pipeline on one export: load, classify and fill, scrub,
/// filter, write. The fill pass runs before scrubbing so reference-row
/// lookups never cross a deleted gap. The function has no UI dependency and
/// owns the table exclusively for the duration of the run.
pub fn process_file(input: &Path) -> Result<Report> {
    let mut table = load_table(input)?;
    let rows_read = table.rows.len();

    classify_and_fill(&mut table);
    scrub(&mut table);

    let rows_dropped = table
        .rows
        .iter()
        .filter(|r| r.disposition == Disposition::Delete)
        .count();
    table.retain_kept();
    let rows_filled = table
        .rows
        .iter()
        .filter(|r| r.highlight == Highlight::Filled)
        .count();

    let output = resolve_output_path(input)?;
    write_workbook(&table, &output)?;

    Ok(Report {
        output,
        rows_read,
        rows_written: table.rows.len(),
        rows_filled,
        rows_dropped,
    })
}
