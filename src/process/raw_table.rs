/// A fetched sheet, split into its header row and data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names, from the first row of the sheet.
    pub headers: Vec<String>,
    /// Every row after the header, as a Vec of Strings (one per cell).
    /// Rows may be shorter than `headers` when trailing cells are empty.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from the full grid of values, treating row 0 as the header.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let rows = values.split_off(1);
        let headers = values.pop().unwrap_or_default();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
