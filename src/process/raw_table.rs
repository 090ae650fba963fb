/// A table exactly as the loader read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names from the header row. Untrusted: may repeat, carry
    /// byte-order-mark remnants or use any spelling.
    pub headers: Vec<String>,
    /// Each data row, one string per field. Rows may be shorter or longer
    /// than `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (`row`, `col`), if the row is long enough.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}
