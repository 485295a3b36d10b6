use crate::schema::{CANONICAL_HEADER, SENTINEL_ROW};
use crate::table::{Disposition, Table};

/// Number of rows above a reprinted header block that are deleted with it;
/// the export tool inserts blank or partial rows there.
const HEADER_BLOCK_LEAD: usize = 3;

/// Flags duplicated header blocks and sentinel label rows for deletion.
/// Runs after the fill pass so reference-row lookups never see a gap; both
/// detections OR into the same disposition the classifier writes.
pub fn scrub(table: &mut Table) {
    scrub_header_blocks(table);
    scrub_sentinel_rows(table);
}

/// A row whose first 18 trimmed values exactly equal the canonical header is
/// an accidental reprint; it is deleted together with the three rows above it
/// (clamped at the top of the table).
fn scrub_header_blocks(table: &mut Table) {
    let mut to_delete = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        if matches_header(&trimmed_prefix(row, CANONICAL_HEADER.len())) {
            let start = i.saturating_sub(HEADER_BLOCK_LEAD);
            to_delete.extend(start..=i);
        }
    }
    for i in to_delete {
        table.rows[i].disposition = Disposition::Delete;
    }
}

fn matches_header(values: &[String]) -> bool {
    values.len() == CANONICAL_HEADER.len()
        && values.iter().zip(CANONICAL_HEADER.iter()).all(|(v, h)| v == h)
}

/// The 5-value template artifact row is matched case-insensitively.
fn scrub_sentinel_rows(table: &mut Table) {
    for row in &mut table.rows {
        let prefix = trimmed_prefix(row, SENTINEL_ROW.len());
        if prefix.len() == SENTINEL_ROW.len()
            && prefix
                .iter()
                .zip(SENTINEL_ROW.iter())
                .all(|(v, s)| v.to_lowercase() == *s)
        {
            row.disposition = Disposition::Delete;
        }
    }
}

/// First `len` cell values of a row, trimmed and stringified, padded with
/// empty strings where the row is short.
fn trimmed_prefix(row: &crate::table::Row, len: usize) -> Vec<String> {
    (0..len)
        .map(|i| {
            row.cells
                .get(i)
                .map(|c| c.as_trimmed_str())
                .unwrap_or_default()
        })
        .collect()
}
