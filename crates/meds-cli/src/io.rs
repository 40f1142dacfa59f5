//! Table file input and output.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::prelude::{
    CsvParseOptions, CsvReadOptions, CsvWriter, DataFrame, ParquetReader, ParquetWriter,
    SerReader, SerWriter,
};
use tracing::info;

/// Supported table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet" | "pq") => Ok(TableFormat::Parquet),
            _ => bail!(
                "unsupported table file {}: expected a .csv or .parquet extension",
                path.display()
            ),
        }
    }
}

/// Read a CSV or Parquet file into a `DataFrame`.
///
/// CSV datetime columns are parsed into timestamps when every value parses.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let df = match TableFormat::from_path(path)? {
        TableFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("open {}", path.display()))?
            .finish()
            .with_context(|| format!("read {}", path.display()))?,
        TableFormat::Parquet => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            ParquetReader::new(file)
                .finish()
                .with_context(|| format!("read {}", path.display()))?
        }
    };
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Write `df` to a CSV or Parquet file, chosen by extension.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    match format {
        TableFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("write {}", path.display()))?,
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("write {}", path.display()))?;
        }
    }
    info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}
