//! Weather Table Module
//! The cleaned, date-ordered table and its calendar fields.

use crate::config::{
    DATE_COL, HUMIDITY_COL, MONTH_COL, RAINFALL_COL, SEASON_COL, TEMPERATURE_COL, YEAR_COL,
};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::fmt;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One complete observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

/// Three-month season bucket. Variant order is alphabetical, matching
/// the order grouped output is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Autumn,
    Spring,
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Autumn, Season::Spring, Season::Summer, Season::Winter];

    /// Map a calendar month to its season. Anything outside Dec-Aug is Autumn.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Autumn => "Autumn",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaned table: every row complete, rows ordered by date ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    records: Vec<WeatherRecord>,
}

impl WeatherTable {
    /// Build from complete records. The sort is stable, so equal dates keep
    /// their input order.
    pub fn from_records(mut records: Vec<WeatherRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.temperature).collect()
    }

    pub fn rainfall(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.rainfall).collect()
    }

    pub fn humidity(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.humidity).collect()
    }

    /// Values of a measurement column by name.
    pub fn column_values(&self, column: &str) -> Option<Vec<f64>> {
        match column {
            TEMPERATURE_COL => Some(self.temperatures()),
            RAINFALL_COL => Some(self.rainfall()),
            HUMIDITY_COL => Some(self.humidity()),
            _ => None,
        }
    }

    /// Four-column frame: Date, Temperature, Rainfall, Humidity.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let days: Vec<i32> = self
            .records
            .iter()
            .map(|r| r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();

        DataFrame::new(vec![
            Column::new(DATE_COL.into(), days).cast(&DataType::Date)?,
            Column::new(TEMPERATURE_COL.into(), self.temperatures()),
            Column::new(RAINFALL_COL.into(), self.rainfall()),
            Column::new(HUMIDITY_COL.into(), self.humidity()),
        ])
    }

    /// Frame with the derived month, year and season columns appended.
    pub fn with_calendar_fields(&self) -> PolarsResult<DataFrame> {
        let months: Vec<u32> = self.records.iter().map(|r| r.date.month()).collect();
        let years: Vec<i32> = self.records.iter().map(|r| r.date.year()).collect();
        let seasons: Vec<&str> = months
            .iter()
            .map(|&m| Season::from_month(m).as_str())
            .collect();

        let mut df = self.to_dataframe()?;
        df.with_column(Column::new(MONTH_COL.into(), months))?;
        df.with_column(Column::new(YEAR_COL.into(), years))?;
        df.with_column(Column::new(SEASON_COL.into(), seasons))?;
        Ok(df)
    }
}
