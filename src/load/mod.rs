// src/load/mod.rs

pub mod delimited;
pub mod spreadsheet;

use std::path::Path;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::process::RawTable;

/// Upload formats the dashboard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Txt,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(FileKind::Csv),
            "txt" => Ok(FileKind::Txt),
            "xlsx" => Ok(FileKind::Xlsx),
            "xls" => Ok(FileKind::Xls),
            other => Err(DashboardError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| DashboardError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileKind::Xlsx | FileKind::Xls)
    }
}

/// Parse uploaded bytes into a `RawTable`.
#[tracing::instrument(level = "info", skip(bytes), fields(size = bytes.len()))]
pub fn load(bytes: &[u8], kind: FileKind) -> Result<RawTable> {
    let table = if kind.is_spreadsheet() {
        spreadsheet::read_first_sheet(bytes)?
    } else {
        delimited::read_delimited(bytes)?
    };
    info!(
        columns = table.headers.len(),
        rows = table.num_rows(),
        "loaded table"
    );
    Ok(table)
}

/// Read `path` and parse it according to its extension.
pub fn load_path(path: &Path) -> Result<RawTable> {
    let kind = FileKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    load(&bytes, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn extensions_are_case_insensitive() -> anyhow::Result<()> {
        assert_eq!(FileKind::from_extension("CSV")?, FileKind::Csv);
        assert_eq!(FileKind::from_extension(".xlsx")?, FileKind::Xlsx);
        assert_eq!(FileKind::from_path(Path::new("sales.TXT"))?, FileKind::Txt);
        Ok(())
    }

    #[test]
    fn unknown_formats_are_rejected() {
        let err = FileKind::from_extension("pdf").unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedFormat(ref e) if e == "pdf"));
        assert!(FileKind::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn load_path_reads_csv_from_disk() -> anyhow::Result<()> {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(tmp, "Order Date,Region,Sales")?;
        writeln!(tmp, "1/2/2016,East,10.5")?;
        let table = load_path(tmp.path())?;
        assert_eq!(table.headers, vec!["Order Date", "Region", "Sales"]);
        assert_eq!(table.rows, vec![vec!["1/2/2016", "East", "10.5"]]);

        let other = NamedTempFile::new()?;
        assert!(load_path(other.path()).is_err());
        Ok(())
    }
}
