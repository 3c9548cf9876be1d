//! CSV Data Loader Module
//! Loads a measurement table with Polars and splits it into key and numeric fields.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::model::{Dataset, GroupKey};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: missing key column '{column}'", .path.display())]
    MissingKeyColumn { path: PathBuf, column: String },
    #[error("{}: column '{column}' is not numeric ({dtype})", .path.display())]
    NonNumericColumn {
        path: PathBuf,
        column: String,
        dtype: String,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and split it into the `key_column` and its numeric fields.
    pub fn load_csv(path: &Path, key_column: &str) -> Result<Dataset, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        // Whole-table inference so late rows cannot change a column's type
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        debug!(
            "Loaded {} ({} rows x {} columns)",
            path.display(),
            df.height(),
            df.width()
        );

        let keys = Self::extract_keys(&df, path, key_column)?;

        let mut fields = Vec::new();
        let mut columns = Vec::new();
        for name in df.get_column_names().iter().map(|s| s.to_string()) {
            if name == key_column {
                continue;
            }
            columns.push(Self::extract_field(&df, path, &name)?);
            fields.push(name);
        }

        Ok(Dataset::new(key_column, fields, keys, columns))
    }

    /// Read the key column in its natural type. Null and NaN keys become `None`.
    fn extract_keys(
        df: &DataFrame,
        path: &Path,
        key_column: &str,
    ) -> Result<Vec<Option<GroupKey>>, LoaderError> {
        let column = df
            .column(key_column)
            .map_err(|_| LoaderError::MissingKeyColumn {
                path: path.to_path_buf(),
                column: key_column.to_string(),
            })?;

        let keys: Vec<Option<GroupKey>> = if column.dtype() == &DataType::Boolean {
            column
                .bool()?
                .into_iter()
                .map(|v| v.map(GroupKey::Bool))
                .collect()
        } else if is_integer(column.dtype()) {
            let cast = column.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(GroupKey::Int))
                .collect()
        } else if is_float(column.dtype()) {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()).map(GroupKey::float))
                .collect()
        } else {
            let cast = column.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| GroupKey::Text(s.to_string())))
                .collect()
        };

        Ok(keys)
    }

    /// Read one measurement column as `f64`. NaN cells are treated as missing.
    fn extract_field(
        df: &DataFrame,
        path: &Path,
        name: &str,
    ) -> Result<Vec<Option<f64>>, LoaderError> {
        let column = df.column(name)?;

        // A header-only table or an all-empty column infers as String
        let all_missing = column.null_count() == column.len();
        if !is_numeric(column.dtype()) && !all_missing {
            return Err(LoaderError::NonNumericColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
                dtype: column.dtype().to_string(),
            });
        }

        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        Ok(value_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }
}

fn is_integer(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn is_numeric(dtype: &DataType) -> bool {
    *dtype == DataType::Boolean || is_integer(dtype) || is_float(dtype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_integer_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,time,bytes\n1,10,100\n2,5,50\n1,20,200\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert_eq!(ds.key_column(), "key");
        assert_eq!(ds.fields(), &["time".to_string(), "bytes".to_string()]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.key(2), Some(&GroupKey::Int(1)));
        assert_eq!(ds.value(2, 0), Some(20.0));
        assert_eq!(ds.value(1, 1), Some(50.0));
    }

    #[test]
    fn test_key_column_need_not_be_first() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "val,key\n1.5,a\n2.5,b\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert_eq!(ds.fields(), &["val".to_string()]);
        assert_eq!(ds.key(1), Some(&GroupKey::Text("b".into())));
        assert_eq!(ds.value(0, 0), Some(1.5));
    }

    #[test]
    fn test_float_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,val\n1.5,2\n0.5,4\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert_eq!(ds.key(0), Some(&GroupKey::Float(1.5)));
        assert_eq!(ds.key(1), Some(&GroupKey::Float(0.5)));
    }

    #[test]
    fn test_bool_keys_keep_their_type() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,val\ntrue,1\nfalse,2\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert_eq!(ds.key(0), Some(&GroupKey::Bool(true)));
        assert_eq!(ds.key(1), Some(&GroupKey::Bool(false)));
        assert_eq!(ds.key(1).unwrap().to_string(), "False");
    }

    #[test]
    fn test_missing_cells_are_none() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,val\n1,10\n,20\n2,\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.key(0), Some(&GroupKey::Int(1)));
        assert_eq!(ds.key(1), None);
        assert_eq!(ds.value(1, 0), Some(20.0));
        assert_eq!(ds.value(2, 0), None);
    }

    #[test]
    fn test_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,val\n");

        let ds = DataLoader::load_csv(&path, "key").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.fields(), &["val".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::load_csv(&dir.path().join("nope.csv"), "key").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_missing_key_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "id,val\n1,10\n");

        let err = DataLoader::load_csv(&path, "key").unwrap_err();
        match err {
            LoaderError::MissingKeyColumn { column, .. } => assert_eq!(column, "key"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", "key,val,label\n1,10,abc\n");

        let err = DataLoader::load_csv(&path, "key").unwrap_err();
        match err {
            LoaderError::NonNumericColumn { column, .. } => assert_eq!(column, "label"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
