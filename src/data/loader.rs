//! CSV Data Loader Module
//! Reads the page-view CSV with Polars and coerces it into a date-indexed series.

use crate::data::{Record, Series};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATE_COLUMN: &str = "date";
pub const DEFAULT_VALUE_COLUMN: &str = "value";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded from {}", .0.display())]
    NoData(PathBuf),
}

/// A row dropped while building the series. Lines are 1-based file lines,
/// the header being line 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("line {line}: unparseable date {raw:?}")]
    InvalidDate { line: usize, raw: String },
    #[error("line {line}: non-numeric value {raw:?}")]
    InvalidValue { line: usize, raw: String },
    #[error("line {line}: missing value")]
    MissingValue { line: usize },
    #[error("line {line}: duplicate date {date}")]
    DuplicateDate { line: usize, date: NaiveDate },
}

impl ParseWarning {
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::InvalidDate { line, .. }
            | ParseWarning::InvalidValue { line, .. }
            | ParseWarning::MissingValue { line }
            | ParseWarning::DuplicateDate { line, .. } => *line,
        }
    }
}

/// Parse an ISO-like date, or the date part of an ISO-like date-time.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    date_column: String,
    value_column: String,
    warnings: Vec<ParseWarning>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self::with_columns(DEFAULT_DATE_COLUMN, DEFAULT_VALUE_COLUMN)
    }

    pub fn with_columns(date_column: &str, value_column: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
            value_column: value_column.to_string(),
            warnings: Vec::new(),
        }
    }

    /// Load a CSV file using Polars. Every column is read as text so that a
    /// few malformed rows cannot change the inferred column types.
    pub fn load_csv(&self, file_path: &Path) -> Result<DataFrame, DataLoadError> {
        let metadata = std::fs::metadata(file_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DataLoadError::NotFound(file_path.to_path_buf())
            } else {
                DataLoadError::Unreadable {
                    path: file_path.to_path_buf(),
                    source,
                }
            }
        })?;
        if metadata.len() == 0 {
            return Err(DataLoadError::NoData(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Load a CSV file and build the series. Dropped rows are kept as warnings.
    pub fn load_series(&mut self, file_path: &Path) -> Result<Series, DataLoadError> {
        let df = self.load_csv(file_path)?;
        let series = self.series_from_dataframe(&df)?;
        if series.is_empty() {
            return Err(DataLoadError::NoData(file_path.to_path_buf()));
        }
        Ok(series)
    }

    /// Convert a frame with a date and a value column into a series.
    pub fn series_from_dataframe(&mut self, df: &DataFrame) -> Result<Series, DataLoadError> {
        self.warnings.clear();

        let date_col = self.require_column(df, &self.date_column)?;
        let value_col = self.require_column(df, &self.value_column)?;

        let dates = date_col.cast(&DataType::String)?;
        let dates = dates.str()?;
        let values = value_col.cast(&DataType::String)?;
        let values = values.str()?;

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for i in 0..df.height() {
            let line = i + 2;
            let raw_value = values.get(i).map(str::trim).filter(|raw| !raw.is_empty());

            // blank line
            if raw_value.is_none() && dates.get(i).map_or(true, |d| d.trim().is_empty()) {
                continue;
            }

            let Some(raw_date) = dates.get(i) else {
                self.warnings.push(ParseWarning::InvalidDate {
                    line,
                    raw: String::new(),
                });
                continue;
            };
            let Some(date) = parse_date(raw_date) else {
                self.warnings.push(ParseWarning::InvalidDate {
                    line,
                    raw: raw_date.to_string(),
                });
                continue;
            };

            let Some(raw) = raw_value else {
                self.warnings.push(ParseWarning::MissingValue { line });
                continue;
            };
            let value = match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    self.warnings.push(ParseWarning::InvalidValue {
                        line,
                        raw: raw.to_string(),
                    });
                    continue;
                }
            };

            if by_date.contains_key(&date) {
                self.warnings
                    .push(ParseWarning::DuplicateDate { line, date });
                continue;
            }
            by_date.insert(date, value);
        }

        Ok(Series::from_records(
            by_date
                .into_iter()
                .map(|(date, value)| Record::new(date, value)),
        ))
    }

    /// Rows dropped by the last load.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    fn require_column<'a>(&self, df: &'a DataFrame, name: &str) -> Result<&'a Column, DataLoadError> {
        df.column(name)
            .map_err(|_| DataLoadError::MissingColumn(name.to_string()))
    }
}
