use anyhow::{bail, Result};

/// Zero-based index of the column-header row inside the sheet. Monday.com
/// exports carry two banner rows above the real header.
pub const HEADER_ROW_INDEX: usize = 2;

/// Column whose text content drives row classification.
pub const MARKER_COLUMN: usize = 0;

/// Fallback source column for the `"Quote - SAP"` fill rule.
pub const QUOTE_FALLBACK_COLUMN: usize = 1;

/// Columns overwritten unconditionally from the reference row on every
/// continuation fill, even when the continuation already holds data.
pub const OVERWRITE_COLUMNS: [usize; 2] = [2, 4];

pub const QUOTE_SAP_COLUMN: &str = "Quote - SAP";

/// Columns whose date cells are displayed as `yyyy-mm-dd` in the output.
pub const DATE_COLUMNS: [&str; 3] = ["Received Date", "Required Bid Date", "Submitted Date"];

/// The canonical header of the export template, in order. A data row whose
/// first 18 trimmed values equal this list is a reprinted header block.
pub const CANONICAL_HEADER: [&str; 18] = [
    "Name",
    "Subitems",
    "RFQ Number",
    "Quote - SAP",
    "Processed by:",
    "Status",
    "Received Date",
    "Required Bid Date",
    "Submitted Date",
    "Factory Input",
    "Accounts",
    "Location",
    "DO AE",
    "Account Name",
    "DO #",
    "Response Time",
    "Late?",
    "ABBGDL Email",
];

/// Template artifact row emitted by the export tool; matched
/// case-insensitively against the first five trimmed cell values.
pub const SENTINEL_ROW: [&str; 5] = ["subitems", "name", "owner", "quote - sap", "special features"];

/// Minimum width the fill rules rely on (they index up to column 5).
const MIN_COLUMNS: usize = 5;

/// Fails fast when the loaded header cannot be the export template, instead
/// of erroring deep inside the fill loop.
pub fn validate_columns(columns: &[String]) -> Result<()> {
    if columns.len() < MIN_COLUMNS {
        bail!(
            "unrecognized file format: expected at least {} columns, found {}",
            MIN_COLUMNS,
            columns.len()
        );
    }
    if !columns.iter().any(|c| c == QUOTE_SAP_COLUMN) {
        bail!(
            "unrecognized file format: missing required column '{}'",
            QUOTE_SAP_COLUMN
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn canonical_header_passes() {
        assert!(validate_columns(&names(&CANONICAL_HEADER)).is_ok());
    }

    #[test]
    fn rejects_narrow_table() {
        let err = validate_columns(&names(&["Name", "Subitems"])).unwrap_err();
        assert!(err.to_string().contains("unrecognized file format"));
    }

    #[test]
    fn rejects_missing_quote_sap() {
        let err = validate_columns(&names(&["A", "B", "C", "D", "E", "F"])).unwrap_err();
        assert!(err.to_string().contains("Quote - SAP"));
    }
}
