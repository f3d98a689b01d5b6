//! Statistics Calculator Module
//! Descriptive statistics over the raw and cleaned weather tables.
//!
//! Standard deviation is the sample convention (n - 1) throughout; fewer
//! than two values give NaN.

use crate::config::MEASUREMENT_COLS;
use crate::data::WeatherTable;
use polars::prelude::*;
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Row labels of the four-function summary, in print order.
pub const SUMMARY_LABELS: [&str; 4] = ["mean", "min", "max", "std"];

/// Row labels of the raw-table description, in print order.
pub const DESCRIBE_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Mean, min, max and std of one sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            std: f64::NAN,
        }
    }
}

impl Summary {
    /// Values in `SUMMARY_LABELS` order.
    pub fn values(&self) -> [f64; 4] {
        [self.mean, self.min, self.max, self.std]
    }

    /// Whether every statistic matches `other` within `tol` (NaN matches NaN).
    pub fn approx_eq(&self, other: &Summary, tol: f64) -> bool {
        self.count == other.count
            && self
                .values()
                .iter()
                .zip(other.values().iter())
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || (a - b).abs() <= tol)
    }
}

/// Summaries of the three measurement columns for one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummaries {
    pub label: String,
    pub columns: [Summary; 3],
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the summary by a single pass over the values.
    pub fn summarize(values: &[f64]) -> Summary {
        let n = values.len();
        if n == 0 {
            return Summary::default();
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Summary {
            count: n,
            mean,
            min,
            max,
            std,
        }
    }

    /// Compute the summary with the statrs routines over the raw sequence.
    pub fn direct_summary(values: &[f64]) -> Summary {
        Summary {
            count: values.len(),
            mean: Statistics::mean(values.iter()),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            std: Statistics::std_dev(values.iter()),
        }
    }

    /// Compute the summary of one frame column with Polars aggregations.
    pub fn frame_summary(df: &DataFrame, column: &str) -> Result<Summary, StatsError> {
        let out = df
            .clone()
            .lazy()
            .select([
                col(column).count().alias("count"),
                col(column).mean().alias("mean"),
                col(column).min().alias("min"),
                col(column).max().alias("max"),
                col(column).std(1).alias("std"),
            ])
            .collect()?;

        let scalar = |name: &str| -> Result<f64, StatsError> {
            let value = out.column(name)?.cast(&DataType::Float64)?;
            Ok(value.f64()?.get(0).unwrap_or(f64::NAN))
        };

        Ok(Summary {
            count: scalar("count")? as usize,
            mean: scalar("mean")?,
            min: scalar("min")?,
            max: scalar("max")?,
            std: scalar("std")?,
        })
    }

    /// Whole-table statistics of every measurement column.
    pub fn daily_stats(table: &WeatherTable) -> Result<ColumnSummaries, StatsError> {
        let df = table.to_dataframe()?;
        let mut columns = [Summary::default(); 3];
        for (slot, name) in columns.iter_mut().zip(MEASUREMENT_COLS) {
            *slot = Self::frame_summary(&df, name)?;
        }
        Ok(ColumnSummaries {
            label: "all".to_string(),
            columns,
        })
    }

    /// Daily stats as a frame: one row per statistic, one column per measurement.
    pub fn daily_stats_frame(stats: &ColumnSummaries) -> Result<DataFrame, StatsError> {
        let mut frame_cols = vec![Column::new("statistic".into(), SUMMARY_LABELS.to_vec())];
        for (name, summary) in MEASUREMENT_COLS.iter().zip(stats.columns.iter()) {
            frame_cols.push(Column::new((*name).into(), summary.values().to_vec()));
        }
        Ok(DataFrame::new(frame_cols)?)
    }

    /// Count, mean, std, min, quartiles and max of every numeric column,
    /// nulls and NaNs skipped.
    pub fn describe(df: &DataFrame, numeric_columns: &[String]) -> Result<DataFrame, StatsError> {
        let mut frame_cols = vec![Column::new("statistic".into(), DESCRIBE_LABELS.to_vec())];

        for name in numeric_columns {
            let values = df.column(name)?.cast(&DataType::Float64)?;
            let mut values: Vec<f64> = values
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            let summary = Self::summarize(&values);
            values.sort_by(f64::total_cmp);

            frame_cols.push(Column::new(
                name.as_str().into(),
                vec![
                    summary.count as f64,
                    summary.mean,
                    summary.std,
                    summary.min,
                    Self::percentile(&values, 25.0),
                    Self::percentile(&values, 50.0),
                    Self::percentile(&values, 75.0),
                    summary.max,
                ],
            ));
        }

        Ok(DataFrame::new(frame_cols)?)
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
