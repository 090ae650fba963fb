//! Writes derived tables to disk, one file per dashboard download button.

use arrow::csv::WriterBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ExportFormat;
use crate::error::Result;
use crate::pipeline::Snapshot;
use crate::table::CanonicalTable;

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Serialize `rows` to a CSV file with a header line. Returns the row count.
pub fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<u64> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote csv rows");
    Ok(rows.len() as u64)
}

/// Write the whole table as CSV or Snappy-compressed Parquet.
pub fn write_table(table: &CanonicalTable, path: &Path, format: ExportFormat) -> Result<u64> {
    let batch = table.batch();
    match format {
        ExportFormat::Csv => {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .build(BufWriter::new(File::create(path)?));
            writer.write(batch)?;
        }
        ExportFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let file = BufWriter::new(File::create(path)?);
            let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
            writer.write(batch)?;
            writer.close()?;
        }
    }
    debug!(path = %path.display(), rows = table.num_rows(), ?format, "wrote table");
    Ok(table.num_rows() as u64)
}

/// Write every derived table of `snapshot` into `dir`. The complete dataset
/// is the upload clipped to the snapshot's date range, before the category
/// levels. Returns the paths written.
#[tracing::instrument(level = "info", skip(snapshot), fields(dir = %dir.display()))]
pub fn export_snapshot(
    snapshot: &Snapshot,
    dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let views = &snapshot.views;
    let mut written = Vec::new();

    let mut rows = |name: &str, f: &dyn Fn(&Path) -> Result<u64>| -> Result<()> {
        let path = dir.join(name);
        f(&path)?;
        written.push(path);
        Ok(())
    };
    rows("Category_ViewData.csv", &|p| write_rows(&views.category_totals, p))?;
    rows("Region.csv", &|p| write_rows(&views.region_totals, p))?;
    rows("Time_Series_ViewData.csv", &|p| write_rows(&views.monthly_series, p))?;
    rows("Hierarchy_ViewData.csv", &|p| write_rows(&views.hierarchy, p))?;
    rows("Segment_ViewData.csv", &|p| write_rows(&views.segment_totals, p))?;
    rows("SubCategory_Month_Pivot.csv", &|p| {
        write_rows(&views.subcategory_month_pivot, p)
    })?;

    let ext = format.extension();
    for (stem, table) in [
        ("Filtered_data", &snapshot.filtered),
        ("Complete_Superstore_data", &snapshot.in_range),
    ] {
        let path = dir.join(format!("{}.{}", stem, ext));
        write_table(table, &path, format)?;
        written.push(path);
    }

    info!(files = written.len(), "exported snapshot");
    Ok(written)
}
