//! Pipeline Configuration
//! Fixed column names, input/output paths and chart file names.

use clap::Parser;
use std::path::{Path, PathBuf};

pub const DATE_COL: &str = "Date";
pub const TEMPERATURE_COL: &str = "Temperature";
pub const RAINFALL_COL: &str = "Rainfall";
pub const HUMIDITY_COL: &str = "Humidity";

/// Derived calendar columns.
pub const MONTH_COL: &str = "month";
pub const YEAR_COL: &str = "year";
pub const SEASON_COL: &str = "season";

/// Measurement columns kept after cleaning, in output order.
pub const MEASUREMENT_COLS: [&str; 3] = [TEMPERATURE_COL, RAINFALL_COL, HUMIDITY_COL];

pub const DEFAULT_INPUT: &str = "data/raw_weather.csv";
pub const DEFAULT_CLEANED_OUTPUT: &str = "data/cleaned_weather.csv";
pub const DEFAULT_PLOTS_DIR: &str = "plots";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

pub const DAILY_TEMPERATURE_PNG: &str = "daily_temperature_trend.png";
pub const MONTHLY_RAINFALL_PNG: &str = "monthly_rainfall_bar.png";
pub const HUMIDITY_SCATTER_PNG: &str = "humidity_vs_temperature_scatter.png";
pub const COMBINED_PNG: &str = "combined_plots.png";

#[derive(Parser, Debug)]
#[command(name = "weather-report")]
#[command(about = "Clean a weather CSV, print descriptive statistics and render charts")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_INPUT, help = "Raw weather CSV file")]
    pub input: PathBuf,

    #[arg(short, long, default_value = DEFAULT_CLEANED_OUTPUT, help = "Cleaned CSV output path")]
    pub cleaned_output: PathBuf,

    #[arg(short, long, default_value = DEFAULT_PLOTS_DIR, help = "Directory for chart images")]
    pub plots_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

/// Paths and limits for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub cleaned_output: PathBuf,
    pub plots_dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            cleaned_output: PathBuf::from(DEFAULT_CLEANED_OUTPUT),
            plots_dir: PathBuf::from(DEFAULT_PLOTS_DIR),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl From<&Cli> for PipelineConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone(),
            cleaned_output: cli.cleaned_output.clone(),
            plots_dir: cli.plots_dir.clone(),
            preview_rows: cli.preview_rows,
        }
    }
}

impl PipelineConfig {
    pub fn chart_paths(&self) -> ChartPaths {
        ChartPaths::in_dir(&self.plots_dir)
    }
}

/// Output locations of the four chart images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    pub temperature_line: PathBuf,
    pub rainfall_bar: PathBuf,
    pub humidity_scatter: PathBuf,
    pub combined: PathBuf,
}

impl ChartPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            temperature_line: dir.join(DAILY_TEMPERATURE_PNG),
            rainfall_bar: dir.join(MONTHLY_RAINFALL_PNG),
            humidity_scatter: dir.join(HUMIDITY_SCATTER_PNG),
            combined: dir.join(COMBINED_PNG),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            &self.temperature_line,
            &self.rainfall_bar,
            &self.humidity_scatter,
            &self.combined,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_fixed_paths() {
        let cli = Cli::parse_from(["weather-report"]);
        assert_eq!(PipelineConfig::from(&cli), PipelineConfig::default());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "weather-report",
            "--input",
            "in.csv",
            "--plots-dir",
            "out",
            "--preview-rows",
            "3",
        ]);
        let config = PipelineConfig::from(&cli);
        assert_eq!(config.input, PathBuf::from("in.csv"));
        assert_eq!(config.preview_rows, 3);
        assert_eq!(
            config.chart_paths().combined,
            PathBuf::from("out").join(COMBINED_PNG)
        );
    }
}
