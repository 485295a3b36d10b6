use chrono::NaiveDateTime;

/// A single loaded cell value. Dates arrive from calamine already converted
/// to chrono so the rest of the pipeline never sees Excel serial numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Trimmed string rendering used by the scrub comparisons
    /// (empty-for-missing, numbers without a trailing `.0`).
    pub fn as_trimmed_str(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.to_string(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Whether a row survives into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Delete,
}

/// Visual tag applied to the output cell in column A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// Last original row before a sub-item block (light blue).
    Marker,
    /// Continuation row completed from the reference row (light yellow).
    Filled,
}

/// One data row plus its processing annotations. The annotations are row
/// metadata, never extra data columns.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub disposition: Disposition,
    pub highlight: Highlight,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row {
            cells,
            disposition: Disposition::Keep,
            highlight: Highlight::None,
        }
    }
}

/// An ordered table with a fixed column schema, built once per run and
/// mutated in place by the classifier and scrubber.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Drops every row marked for deletion, preserving the relative order of
    /// the survivors and their highlight tags.
    pub fn retain_kept(&mut self) {
        self.rows.retain(|row| row.disposition == Disposition::Keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::Text(String::new()).is_empty());
        assert!(!Cell::Text(" ".to_string()).is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn trimmed_rendering() {
        assert_eq!(Cell::Text("  Name ".to_string()).as_trimmed_str(), "Name");
        assert_eq!(Cell::Number(42.0).as_trimmed_str(), "42");
        assert_eq!(Cell::Number(1.5).as_trimmed_str(), "1.5");
        assert_eq!(Cell::Empty.as_trimmed_str(), "");
    }

    #[test]
    fn retain_kept_preserves_order_and_tags() {
        let mut table = Table::new(
            vec!["A".to_string()],
            vec![
                Row::new(vec![Cell::Text("first".into())]),
                Row::new(vec![Cell::Text("dropped".into())]),
                Row::new(vec![Cell::Text("second".into())]),
            ],
        );
        table.rows[1].disposition = Disposition::Delete;
        table.rows[2].highlight = Highlight::Filled;
        table.retain_kept();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0], Cell::Text("first".into()));
        assert_eq!(table.rows[1].highlight, Highlight::Filled);
    }
}
