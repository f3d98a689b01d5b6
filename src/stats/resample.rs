//! Calendar Resampling Module
//! Regroups date-ordered rows into monthly or yearly buckets.
//!
//! Buckets span every calendar period between the first and last date, so
//! periods without rows still appear (with NaN statistics and a zero total).

use crate::config::MEASUREMENT_COLS;
use crate::data::WeatherTable;
use crate::stats::{ColumnSummaries, StatsCalculator, StatsError, Summary, SUMMARY_LABELS};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

/// Calendar bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Monthly,
    Yearly,
}

impl Frequency {
    /// Sequential period number, so consecutive periods differ by one.
    fn ordinal(self, date: NaiveDate) -> i64 {
        match self {
            Frequency::Monthly => date.year() as i64 * 12 + date.month0() as i64,
            Frequency::Yearly => date.year() as i64,
        }
    }

    fn label(self, ordinal: i64) -> String {
        match self {
            Frequency::Monthly => {
                format!("{:04}-{:02}", ordinal.div_euclid(12), ordinal.rem_euclid(12) + 1)
            }
            Frequency::Yearly => format!("{:04}", ordinal),
        }
    }
}

/// One calendar period and the row indices that fall in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub rows: Vec<usize>,
}

/// Rainfall summed per calendar month. Both rainfall charts draw from a
/// single instance of this series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyRainfall {
    labels: Vec<String>,
    totals: Vec<f64>,
    row_counts: Vec<usize>,
}

impl MonthlyRainfall {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn max_total(&self) -> f64 {
        self.totals.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest total, or 0 when every total is non-negative.
    pub fn min_total(&self) -> f64 {
        self.totals.iter().copied().fold(0.0, f64::min)
    }

    /// Label of the first total that is infinite or NaN.
    pub fn first_non_finite(&self) -> Option<&str> {
        self.totals
            .iter()
            .position(|t| !t.is_finite())
            .map(|i| self.labels[i].as_str())
    }

    pub fn non_zero_buckets(&self) -> usize {
        self.totals.iter().filter(|&&t| t != 0.0).count()
    }

    /// Months holding at least one observation.
    pub fn populated_buckets(&self) -> usize {
        self.row_counts.iter().filter(|&&n| n > 0).count()
    }

    /// Total for a `YYYY-MM` label.
    pub fn total_for(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.totals[i])
    }
}

/// Handles calendar bucketing of the cleaned table.
pub struct Resampler;

impl Resampler {
    /// Assign rows to contiguous calendar buckets.
    pub fn buckets(dates: &[NaiveDate], freq: Frequency) -> Vec<Bucket> {
        let ordinals: Vec<i64> = dates.iter().map(|&d| freq.ordinal(d)).collect();
        let (Some(&first), Some(&last)) = (ordinals.iter().min(), ordinals.iter().max()) else {
            return Vec::new();
        };

        let mut buckets: Vec<Bucket> = (first..=last)
            .map(|ordinal| Bucket {
                label: freq.label(ordinal),
                rows: Vec::new(),
            })
            .collect();

        for (row, ordinal) in ordinals.iter().enumerate() {
            buckets[(ordinal - first) as usize].rows.push(row);
        }

        debug!("Resampled {} rows into {} {:?} buckets", dates.len(), buckets.len(), freq);
        buckets
    }

    /// Per-bucket summaries of every measurement column.
    pub fn resample_stats(table: &WeatherTable, freq: Frequency) -> Vec<ColumnSummaries> {
        let columns: Vec<Vec<f64>> = MEASUREMENT_COLS
            .iter()
            .map(|name| table.column_values(name).unwrap_or_default())
            .collect();

        Self::buckets(&table.dates(), freq)
            .into_iter()
            .map(|bucket| {
                let mut summaries = [Summary::default(); 3];
                for (slot, values) in summaries.iter_mut().zip(columns.iter()) {
                    let picked: Vec<f64> = bucket.rows.iter().map(|&i| values[i]).collect();
                    *slot = StatsCalculator::summarize(&picked);
                }
                ColumnSummaries {
                    label: bucket.label,
                    columns: summaries,
                }
            })
            .collect()
    }

    /// Rainfall total per calendar month, empty months included as zero.
    pub fn monthly_rainfall(table: &WeatherTable) -> MonthlyRainfall {
        let rainfall = table.rainfall();
        let mut series = MonthlyRainfall::default();
        for bucket in Self::buckets(&table.dates(), Frequency::Monthly) {
            series
                .totals
                .push(bucket.rows.iter().map(|&i| rainfall[i]).sum::<f64>());
            series.row_counts.push(bucket.rows.len());
            series.labels.push(bucket.label);
        }
        series
    }

    /// Resampled stats as a frame: a period column followed by
    /// `<column>_<stat>` columns. At most `limit` rows when given.
    pub fn stats_frame(
        stats: &[ColumnSummaries],
        period_name: &str,
        limit: Option<usize>,
    ) -> Result<DataFrame, StatsError> {
        let rows = &stats[..limit.map_or(stats.len(), |n| n.min(stats.len()))];

        let mut frame_cols = vec![Column::new(
            period_name.into(),
            rows.iter().map(|s| s.label.clone()).collect::<Vec<_>>(),
        )];

        for (col_idx, name) in MEASUREMENT_COLS.iter().enumerate() {
            for (stat_idx, stat) in SUMMARY_LABELS.iter().enumerate() {
                let values: Vec<f64> = rows
                    .iter()
                    .map(|s| s.columns[col_idx].values()[stat_idx])
                    .collect();
                frame_cols.push(Column::new(format!("{name}_{stat}").into(), values));
            }
        }

        Ok(DataFrame::new(frame_cols)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(rows: &[(NaiveDate, f64, f64)]) -> WeatherTable {
        WeatherTable::from_records(
            rows.iter()
                .map(|&(date, temperature, rainfall)| WeatherRecord {
                    date,
                    temperature,
                    rainfall,
                    humidity: 60.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_monthly_buckets_fill_gaps() {
        let dates = [date(2022, 11, 3), date(2022, 11, 20), date(2023, 2, 1)];
        let buckets = Resampler::buckets(&dates, Frequency::Monthly);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2022-11", "2022-12", "2023-01", "2023-02"]);
        assert_eq!(buckets[0].rows, vec![0, 1]);
        assert!(buckets[1].rows.is_empty());
        assert_eq!(buckets[3].rows, vec![2]);
    }

    #[test]
    fn test_yearly_buckets() {
        let dates = [date(2020, 5, 1), date(2022, 1, 1)];
        let buckets = Resampler::buckets(&dates, Frequency::Yearly);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2020", "2021", "2022"]);
        assert!(Resampler::buckets(&[], Frequency::Yearly).is_empty());
    }

    #[test]
    fn test_monthly_rainfall_sums_each_month() {
        let t = table(&[
            (date(2023, 1, 2), 5.0, 1.5),
            (date(2023, 1, 30), 6.0, 2.5),
            (date(2023, 3, 1), 7.0, 4.0),
        ]);
        let rain = Resampler::monthly_rainfall(&t);
        assert_eq!(rain.labels(), &["2023-01", "2023-02", "2023-03"]);
        assert_eq!(rain.totals(), &[4.0, 0.0, 4.0]);
        assert_eq!(rain.non_zero_buckets(), 2);
        assert_eq!(rain.populated_buckets(), 2);
        assert_eq!(rain.total_for("2023-02"), Some(0.0));
        assert_eq!(rain.max_total(), 4.0);
        assert_eq!(rain.min_total(), 0.0);
        assert_eq!(rain.first_non_finite(), None);
    }

    #[test]
    fn test_resample_stats_empty_bucket_is_nan() {
        let t = table(&[(date(2023, 1, 2), 5.0, 1.0), (date(2023, 3, 1), 7.0, 1.0)]);
        let stats = Resampler::resample_stats(&t, Frequency::Monthly);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].columns[0].mean, 5.0);
        assert!(stats[0].columns[0].std.is_nan());
        assert!(stats[1].columns[0].mean.is_nan());
        assert_eq!(stats[1].columns[0].count, 0);

        let df = Resampler::stats_frame(&stats, "month", Some(2)).unwrap();
        assert_eq!(df.shape(), (2, 13));
        assert!(df.column("Temperature_mean").is_ok());
    }
}
