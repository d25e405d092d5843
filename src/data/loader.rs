//! Table Loader Module
//! Loads CSV files with Polars and spreadsheets with calamine, memoized by path.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
    #[error("Failed to load spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("No data in {0}")]
    Empty(PathBuf),
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Delimited,
    Spreadsheet,
}

impl FileFormat {
    fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(FileFormat::Delimited),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(FileFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// Loads tables and keeps each parsed file for the rest of the process.
///
/// Shared between the UI and render threads; the cache is only ever added to.
#[derive(Default)]
pub struct DataLoader {
    cache: RwLock<HashMap<PathBuf, DataFrame>>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table, serving repeated paths from the cache.
    pub fn load(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        if let Some(df) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
        {
            debug!(path = %path.display(), "table cache hit");
            return Ok(df.clone());
        }

        let df = Self::read_file(path)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded table"
        );

        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), df.clone());
        Ok(df)
    }

    /// Paths currently held in the cache.
    pub fn cached_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Drop every cached table so the next load re-reads from disk.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn read_file(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        let df = match FileFormat::detect(path) {
            Some(FileFormat::Delimited) => Self::read_csv(path)?,
            Some(FileFormat::Spreadsheet) => Self::read_spreadsheet(path)?,
            None => return Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        };
        if df.width() == 0 {
            return Err(LoaderError::Empty(path.to_path_buf()));
        }
        Ok(df)
    }

    /// Load a CSV file using Polars.
    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let csv_err = |source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .map_err(csv_err)?
            .collect()
            .map_err(csv_err)
    }

    /// Load the first sheet of a workbook; the first row holds column names.
    fn read_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
        let sheet_err = |source| LoaderError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        };
        let mut workbook = open_workbook_auto(path).map_err(sheet_err)?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(sheet_err)?,
            None => return Err(LoaderError::Empty(path.to_path_buf())),
        };

        let rows: Vec<&[Data]> = range.rows().collect();
        let Some((header, body)) = rows.split_first() else {
            return Err(LoaderError::Empty(path.to_path_buf()));
        };

        let mut columns = Vec::with_capacity(header.len());
        let mut seen: Vec<String> = Vec::with_capacity(header.len());
        for (idx, cell) in header.iter().enumerate() {
            let mut name = cell_text(cell).unwrap_or_else(|| format!("column_{}", idx + 1));
            if seen.contains(&name) {
                name = format!("{}_{}", name, idx + 1);
            }
            seen.push(name.clone());
            let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(idx)).collect();
            columns.push(sheet_column(&name, &cells));
        }

        DataFrame::new(columns).map_err(|source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

/// Numeric when every non-empty cell is numeric; integral numbers become Int64.
fn sheet_column(name: &str, cells: &[Option<&Data>]) -> Column {
    let present: Vec<&Data> = cells
        .iter()
        .flatten()
        .copied()
        .filter(|c| !matches!(c, Data::Empty))
        .collect();
    let numeric = !present.is_empty() && present.iter().all(|c| cell_number(c).is_some());

    if numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(cell_number)).collect();
        if values.iter().flatten().all(|v| v.fract() == 0.0) {
            let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i64)).collect();
            return Column::new(name.into(), ints);
        }
        return Column::new(name.into(), values);
    }

    let texts: Vec<Option<String>> = cells.iter().map(|c| c.and_then(cell_text)).collect();
    Column::new(name.into(), texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "floordistrict.csv",
            "DistrictName,Total\nKitutu,45%\nBobasi,12%\n",
        );

        let loader = DataLoader::new();
        let df = loader.load(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert!(df.column("DistrictName").is_ok());
    }

    #[test]
    fn repeated_loads_hit_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "wall location.csv", "LocationName,Match\nA,1\n");

        let loader = DataLoader::new();
        loader.load(&path).unwrap();
        // Removing the file proves the second load never touches disk.
        std::fs::remove_file(&path).unwrap();
        let df = loader.load(&path).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(loader.cached_paths(), vec![path.clone()]);

        loader.clear();
        assert!(matches!(loader.load(&path), Err(LoaderError::NotFound(_))));
    }

    #[test]
    fn missing_file_names_the_path() {
        let loader = DataLoader::new();
        let err = loader.load(Path::new("/no/such/roofdistrict.csv")).unwrap_err();
        assert!(matches!(
            &err,
            LoaderError::NotFound(path) if path == Path::new("/no/such/roofdistrict.csv")
        ));
        assert!(err.to_string().contains("roofdistrict.csv"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "notes.json", "{}");
        let loader = DataLoader::new();
        assert!(matches!(
            loader.load(&path),
            Err(LoaderError::UnsupportedFormat(_))
        ));
        assert!(loader.cached_paths().is_empty());
    }

    #[test]
    fn sheet_columns_infer_types() {
        let ints = [Data::Float(1.0), Data::Int(3), Data::Empty];
        let cells: Vec<Option<&Data>> = ints.iter().map(Some).collect();
        assert_eq!(sheet_column("n", &cells).dtype(), &DataType::Int64);

        let floats = [Data::Float(0.5), Data::Int(3)];
        let cells: Vec<Option<&Data>> = floats.iter().map(Some).collect();
        assert_eq!(sheet_column("f", &cells).dtype(), &DataType::Float64);

        let mixed = [Data::String("Refused".into()), Data::Int(3)];
        let cells: Vec<Option<&Data>> = mixed.iter().map(Some).collect();
        let column = sheet_column("reason", &cells);
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 0);
    }
}
