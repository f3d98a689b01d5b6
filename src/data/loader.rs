//! CSV Data Loader Module
//! Handles CSV file loading, previews and column inspection using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Loads the raw weather table with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file. The schema is inferred over the whole file so a
    /// late decimal value does not turn an integer column into nulls.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        debug!("Schema: {:?}", df.schema());

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// First `n` rows of the raw table.
    pub fn preview(&self, n: usize) -> Result<DataFrame, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        Ok(df.head(Some(n)))
    }

    /// Per-column overview: name, non-null count and dtype.
    pub fn column_info(&self) -> Result<DataFrame, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;

        let mut names: Vec<String> = Vec::with_capacity(df.width());
        let mut non_null: Vec<u64> = Vec::with_capacity(df.width());
        let mut dtypes: Vec<String> = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            names.push(col.name().to_string());
            non_null.push((col.len() - col.null_count()) as u64);
            dtypes.push(col.dtype().to_string());
        }

        let info = DataFrame::new(vec![
            Column::new("column".into(), names),
            Column::new("non_null".into(), non_null),
            Column::new("dtype".into(), dtypes),
        ])?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("raw.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_and_inspect() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "Date,Temperature,Rainfall,Humidity,Station\n\
             2023-01-15,10,0,50,A\n\
             2023-01-16,11.5,,55,A\n",
        );

        let mut loader = DataLoader::new();
        let df = loader.load_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_columns().len(), 5);

        let numeric = loader.get_numeric_columns();
        assert!(numeric.contains(&"Temperature".to_string()));
        assert!(!numeric.contains(&"Station".to_string()));

        let info = loader.column_info().unwrap();
        assert_eq!(info.height(), 5);
        let non_null = info.column("non_null").unwrap();
        assert_eq!(non_null.u64().unwrap().get(2), Some(1));

        assert_eq!(loader.preview(1).unwrap().height(), 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(Path::new("does/not/exist.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert!(loader.preview(5).is_err());
    }
}
