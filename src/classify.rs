use crate::schema::{MARKER_COLUMN, OVERWRITE_COLUMNS, QUOTE_FALLBACK_COLUMN, QUOTE_SAP_COLUMN};
use crate::table::{Cell, Disposition, Highlight, Table};

/// Classifies every row and completes sub-item continuation rows in a single
/// forward pass.
///
/// Marker detection uses the substring rule: any first-column text that still
/// contains `subitem` after normalization starts a sub-item block. The exact
/// `subitems` variant seen in some exports is a special case of this rule.
///
/// Two pieces of state persist across the scan: whether we are inside a
/// sub-item block, and a snapshot of the last normal row (the reference row).
/// Continuation rows never become the reference row.
pub fn classify_and_fill(table: &mut Table) {
    let quote_sap = table.column_index(QUOTE_SAP_COLUMN);
    let mut in_subitem_block = false;
    let mut last_valid: Option<Vec<Cell>> = None;

    for i in 0..table.rows.len() {
        let marker_text = normalize_marker_text(
            table.rows[i]
                .cells
                .get(MARKER_COLUMN)
                .unwrap_or(&Cell::Empty),
        );

        if marker_text.contains("subitem") {
            in_subitem_block = true;
            table.rows[i].disposition = Disposition::Delete;
            if i > 0 {
                table.rows[i - 1].highlight = Highlight::Marker;
            }
            continue;
        }

        if in_subitem_block && marker_text.is_empty() {
            if let Some(reference) = &last_valid {
                fill_continuation(table, i, reference, quote_sap);
            }
            table.rows[i].highlight = Highlight::Filled;
            continue;
        }

        in_subitem_block = false;
        last_valid = Some(table.rows[i].cells.clone());
    }
}

/// Fills one continuation row. Rule precedence per column:
/// 1. `"Quote - SAP"` pulls from this row's second column, never from the
///    reference row, and only when currently empty.
/// 2. The overwrite columns always take the reference value.
/// 3. Everything else takes the reference value only when empty.
fn fill_continuation(table: &mut Table, i: usize, reference: &[Cell], quote_sap: Option<usize>) {
    let fallback = table.rows[i]
        .cells
        .get(QUOTE_FALLBACK_COLUMN)
        .cloned()
        .unwrap_or(Cell::Empty);
    let row = &mut table.rows[i];

    for col in 0..row.cells.len() {
        if Some(col) == quote_sap {
            if row.cells[col].is_empty() && !fallback.is_empty() {
                row.cells[col] = fallback.clone();
            }
        } else if OVERWRITE_COLUMNS.contains(&col) {
            if let Some(value) = reference.get(col) {
                row.cells[col] = value.clone();
            }
        } else if row.cells[col].is_empty() {
            if let Some(value) = reference.get(col) {
                row.cells[col] = value.clone();
            }
        }
    }
}

/// Normalizes first-column text for marker detection: non-ASCII stripped,
/// trimmed, lower-cased, with spaces, tabs, and non-breaking spaces removed.
fn normalize_marker_text(cell: &Cell) -> String {
    let text = match cell {
        Cell::Empty => return String::new(),
        Cell::Text(s) => s.clone(),
        other => other.as_trimmed_str(),
    };
    text.chars()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .trim()
        .to_lowercase()
        .replace([' ', '\t'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CANONICAL_HEADER;
    use crate::table::Row;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn row(first: &str, rest: &[&str]) -> Row {
        let mut cells = vec![if first.is_empty() { Cell::Empty } else { text(first) }];
        cells.extend(rest.iter().map(|s| {
            if s.is_empty() {
                Cell::Empty
            } else {
                text(s)
            }
        }));
        Row::new(cells)
    }

    fn table(rows: Vec<Row>) -> Table {
        let columns = CANONICAL_HEADER.iter().map(|s| s.to_string()).collect();
        Table::new(columns, rows)
    }

    #[test]
    fn normalization_handles_variants() {
        assert_eq!(normalize_marker_text(&text(" Sub Items ")), "subitems");
        assert_eq!(normalize_marker_text(&text("SUBITEMS\u{a0}")), "subitems");
        assert_eq!(normalize_marker_text(&text("Sub\titem 2")), "subitem2");
        assert_eq!(normalize_marker_text(&Cell::Empty), "");
    }

    #[test]
    fn substring_rule_matches_decorated_markers() {
        let mut t = table(vec![
            row("Alpha", &["q1", "c", "d", "e"]),
            row("Subitems Summary", &["", "", "", ""]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[1].disposition, Disposition::Delete);
        assert_eq!(t.rows[0].highlight, Highlight::Marker);
    }

    #[test]
    fn example_sequence_from_the_export() {
        // Normal(A), Marker, EmptyContinuation, Normal(B)
        let mut t = table(vec![
            row("Alpha", &["q1", "c1", "d1", "e1"]),
            row("Subitems", &["", "", "", ""]),
            row("", &["", "", "", ""]),
            row("Beta", &["q2", "c2", "d2", "e2"]),
        ]);
        classify_and_fill(&mut t);

        assert_eq!(t.rows[0].highlight, Highlight::Marker);
        assert_eq!(t.rows[0].disposition, Disposition::Keep);
        assert_eq!(t.rows[1].disposition, Disposition::Delete);
        assert_eq!(t.rows[2].highlight, Highlight::Filled);
        assert_eq!(t.rows[2].disposition, Disposition::Keep);
        assert_eq!(t.rows[2].cells[0], text("Alpha"));
        assert_eq!(t.rows[3].highlight, Highlight::None);
    }

    #[test]
    fn quote_sap_fills_from_second_column_not_reference() {
        let mut t = table(vec![
            row("Alpha", &["ref-quote", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("", &["own-quote", "", "", ""]),
        ]);
        classify_and_fill(&mut t);
        // Quote - SAP is column index 3 in the canonical header.
        assert_eq!(t.rows[2].cells[3], text("own-quote"));
    }

    #[test]
    fn quote_sap_keeps_existing_value() {
        let mut t = table(vec![
            row("Alpha", &["ref-quote", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("", &["fallback", "", "kept", ""]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[2].cells[3], text("kept"));
    }

    #[test]
    fn overwrite_columns_always_take_reference_values() {
        let mut t = table(vec![
            row("Alpha", &["b1", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("", &["", "stale-c", "", "stale-e"]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[2].cells[2], text("c1"));
        assert_eq!(t.rows[2].cells[4], text("e1"));
    }

    #[test]
    fn other_columns_fill_only_when_empty() {
        let mut t = table(vec![
            row("Alpha", &["b1", "c1", "d1", "e1", "f1"]),
            row("Subitems", &[]),
            row("", &["", "", "", "", "own-f"]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[2].cells[0], text("Alpha"));
        assert_eq!(t.rows[2].cells[5], text("own-f"));
    }

    #[test]
    fn consecutive_continuations_share_one_reference() {
        let mut t = table(vec![
            row("Alpha", &["b1", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("", &["", "", "", ""]),
            row("", &["", "", "", ""]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[2].cells[0], text("Alpha"));
        assert_eq!(t.rows[3].cells[0], text("Alpha"));
        assert_eq!(t.rows[3].highlight, Highlight::Filled);
    }

    #[test]
    fn reference_resets_on_next_normal_row() {
        let mut t = table(vec![
            row("Alpha", &["b1", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("", &["", "", "", ""]),
            row("Beta", &["b2", "c2", "d2", "e2"]),
            row("Subitems", &[]),
            row("", &["", "", "", ""]),
        ]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[2].cells[0], text("Alpha"));
        assert_eq!(t.rows[5].cells[0], text("Beta"));
    }

    #[test]
    fn continuation_without_reference_is_tagged_but_untouched() {
        let mut t = table(vec![row("Subitems", &[]), row("", &["b", "", "", ""])]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[1].highlight, Highlight::Filled);
        assert_eq!(t.rows[1].cells[0], Cell::Empty);
        assert_eq!(t.rows[1].cells[2], Cell::Empty);
    }

    #[test]
    fn marker_on_first_row_highlights_nothing() {
        let mut t = table(vec![row("Subitems", &[]), row("Alpha", &["b", "c", "d", "e"])]);
        classify_and_fill(&mut t);
        assert_eq!(t.rows[0].disposition, Disposition::Delete);
        assert!(t.rows.iter().all(|r| r.highlight != Highlight::Marker));
    }

    #[test]
    fn non_empty_row_inside_block_ends_the_block() {
        let mut t = table(vec![
            row("Alpha", &["b1", "c1", "d1", "e1"]),
            row("Subitems", &[]),
            row("Beta", &["b2", "c2", "d2", "e2"]),
            row("", &["", "", "", ""]),
        ]);
        classify_and_fill(&mut t);
        // Beta closed the block, so the trailing empty row is not a
        // continuation and keeps its cells.
        assert_eq!(t.rows[3].highlight, Highlight::None);
        assert_eq!(t.rows[3].cells[0], Cell::Empty);
    }
}
