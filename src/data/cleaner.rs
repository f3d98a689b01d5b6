//! Data Cleaner Module
//! Parses dates, drops incomplete rows, restricts to the four weather
//! columns and persists the cleaned table.

use crate::config::{DATE_COL, HUMIDITY_COL, RAINFALL_COL, TEMPERATURE_COL};
use crate::data::{WeatherRecord, WeatherTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing expected column: {0}")]
    MissingColumn(&'static str),
    #[error("Failed to write cleaned table: {0}")]
    Io(#[from] std::io::Error),
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Outcome of a cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub table: WeatherTable,
    pub raw_rows: usize,
    pub unparsed_dates: usize,
}

impl CleanedData {
    pub fn dropped_rows(&self) -> usize {
        self.raw_rows - self.table.len()
    }
}

/// Handles date coercion, missing-value removal and persistence.
pub struct DataCleaner;

impl DataCleaner {
    /// Parse a date cell. Date-times keep only their calendar date;
    /// anything unrecognised is `None`.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
                return Some(date);
            }
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(dt.date());
            }
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Clean the raw table into date-ordered complete records.
    ///
    /// Missing values are nulls, `NaN`s and cells that do not parse as
    /// numbers (or dates, for the `Date` column).
    pub fn clean(df: &DataFrame) -> Result<CleanedData, CleanerError> {
        let date_col = Self::required(df, DATE_COL)?.cast(&DataType::String)?;
        let temp_col = Self::required(df, TEMPERATURE_COL)?.cast(&DataType::Float64)?;
        let rain_col = Self::required(df, RAINFALL_COL)?.cast(&DataType::Float64)?;
        let hum_col = Self::required(df, HUMIDITY_COL)?.cast(&DataType::Float64)?;

        let dates = date_col.str()?;
        let temps = temp_col.f64()?;
        let rains = rain_col.f64()?;
        let hums = hum_col.f64()?;

        let mut unparsed_dates = 0usize;
        let mut records: Vec<WeatherRecord> = Vec::with_capacity(df.height());

        for (((d, t), r), h) in dates
            .into_iter()
            .zip(temps.into_iter())
            .zip(rains.into_iter())
            .zip(hums.into_iter())
        {
            let date = d.and_then(Self::parse_date);
            if d.is_some() && date.is_none() {
                unparsed_dates += 1;
            }

            if let (Some(date), Some(temperature), Some(rainfall), Some(humidity)) =
                (date, t, r, h)
            {
                if !temperature.is_nan() && !rainfall.is_nan() && !humidity.is_nan() {
                    records.push(WeatherRecord {
                        date,
                        temperature,
                        rainfall,
                        humidity,
                    });
                }
            }
        }

        if unparsed_dates > 0 {
            warn!("{} date values could not be parsed", unparsed_dates);
        }

        let cleaned = CleanedData {
            table: WeatherTable::from_records(records),
            raw_rows: df.height(),
            unparsed_dates,
        };
        info!(
            "Cleaned table has {} rows (dropped {})",
            cleaned.table.len(),
            cleaned.dropped_rows()
        );
        Ok(cleaned)
    }

    /// Write the cleaned table as CSV, replacing any existing file.
    /// The parent directory must already exist.
    pub fn write_csv(table: &WeatherTable, path: &Path) -> Result<(), CleanerError> {
        let mut df = table.to_dataframe()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        info!("Wrote cleaned table to {}", path.display());
        Ok(())
    }

    fn required<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, CleanerError> {
        df.column(name).map_err(|_| CleanerError::MissingColumn(name))
    }
}
