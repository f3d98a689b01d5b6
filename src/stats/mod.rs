//! Statistics module - Descriptive statistics and calendar resampling

mod calculator;
mod resample;

pub use calculator::{
    ColumnSummaries, StatsCalculator, StatsError, Summary, DESCRIBE_LABELS, SUMMARY_LABELS,
};
pub use resample::{Bucket, Frequency, MonthlyRainfall, Resampler};
