//! Grouping Module
//! Month-number and season summaries of the cleaned table.
//!
//! Only keys present in the data appear; output is sorted by key.

use crate::config::{HUMIDITY_COL, MONTH_COL, RAINFALL_COL, SEASON_COL, TEMPERATURE_COL};
use crate::data::WeatherTable;
use polars::prelude::*;
use tracing::debug;

/// Grouped summary tables.
#[derive(Debug, Clone)]
pub struct GroupedSummaries {
    pub by_month: DataFrame,
    pub by_season: DataFrame,
}

/// Handles the calendar group-by aggregations.
pub struct Aggregator;

impl Aggregator {
    /// Derive calendar fields and compute both grouped tables.
    pub fn summarize(table: &WeatherTable) -> PolarsResult<GroupedSummaries> {
        let frame = table.with_calendar_fields()?;
        let summaries = GroupedSummaries {
            by_month: Self::by_month(&frame)?,
            by_season: Self::by_season(&frame)?,
        };
        debug!(
            "Grouped into {} months and {} seasons",
            summaries.by_month.height(),
            summaries.by_season.height()
        );
        Ok(summaries)
    }

    /// Temperature mean/min/max, rainfall sum and humidity mean per month number.
    pub fn by_month(frame: &DataFrame) -> PolarsResult<DataFrame> {
        frame
            .clone()
            .lazy()
            .group_by([col(MONTH_COL)])
            .agg([
                col(TEMPERATURE_COL).mean().alias("Temperature_mean"),
                col(TEMPERATURE_COL).min().alias("Temperature_min"),
                col(TEMPERATURE_COL).max().alias("Temperature_max"),
                col(RAINFALL_COL).sum().alias("Rainfall_sum"),
                col(HUMIDITY_COL).mean().alias("Humidity_mean"),
            ])
            .sort([MONTH_COL], SortMultipleOptions::default())
            .collect()
    }

    /// Temperature mean, rainfall sum and humidity mean per season label.
    pub fn by_season(frame: &DataFrame) -> PolarsResult<DataFrame> {
        frame
            .clone()
            .lazy()
            .group_by([col(SEASON_COL)])
            .agg([
                col(TEMPERATURE_COL).mean().alias("Temperature_mean"),
                col(RAINFALL_COL).sum().alias("Rainfall_sum"),
                col(HUMIDITY_COL).mean().alias("Humidity_mean"),
            ])
            .sort([SEASON_COL], SortMultipleOptions::default())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherRecord;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, t: f64, r: f64) -> WeatherRecord {
        WeatherRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            temperature: t,
            rainfall: r,
            humidity: 70.0,
        }
    }

    fn f64_at(df: &DataFrame, name: &str, row: usize) -> Option<f64> {
        df.column(name).unwrap().f64().unwrap().get(row)
    }

    #[test]
    fn test_by_month_merges_years() {
        let table = WeatherTable::from_records(vec![
            record(2022, 3, 1, 10.0, 1.0),
            record(2023, 3, 1, 20.0, 2.0),
            record(2023, 1, 5, -2.0, 0.5),
        ]);
        let grouped = Aggregator::summarize(&table).unwrap();
        let by_month = &grouped.by_month;

        assert_eq!(by_month.height(), 2);
        let months = by_month.column(MONTH_COL).unwrap();
        assert_eq!(months.u32().unwrap().get(0), Some(1));
        assert_eq!(months.u32().unwrap().get(1), Some(3));
        assert_eq!(f64_at(by_month, "Temperature_mean", 1), Some(15.0));
        assert_eq!(f64_at(by_month, "Temperature_min", 1), Some(10.0));
        assert_eq!(f64_at(by_month, "Temperature_max", 1), Some(20.0));
        assert_eq!(f64_at(by_month, "Rainfall_sum", 1), Some(3.0));
    }

    #[test]
    fn test_by_season_sorted_alphabetically() {
        let table = WeatherTable::from_records(vec![
            record(2023, 12, 1, 1.0, 1.0),
            record(2023, 10, 1, 12.0, 2.0),
            record(2023, 4, 1, 14.0, 3.0),
            record(2023, 2, 1, 3.0, 4.0),
        ]);
        let grouped = Aggregator::summarize(&table).unwrap();
        let by_season = &grouped.by_season;

        let seasons = by_season.column(SEASON_COL).unwrap();
        let seasons: Vec<Option<&str>> = seasons.str().unwrap().into_iter().collect();
        assert_eq!(seasons, vec![Some("Autumn"), Some("Spring"), Some("Winter")]);
        assert_eq!(f64_at(by_season, "Temperature_mean", 2), Some(2.0));
        assert_eq!(f64_at(by_season, "Rainfall_sum", 2), Some(5.0));
    }
}
