//! Report Pipeline
//! Load, clean, summarise, plot and group, printing each stage's tables
//! in a fixed order.

use crate::aggregate::{Aggregator, GroupedSummaries};
use crate::charts::ChartRenderer;
use crate::config::{PipelineConfig, TEMPERATURE_COL};
use crate::data::{DataCleaner, DataLoader, WeatherTable};
use crate::stats::{Frequency, MonthlyRainfall, Resampler, StatsCalculator, Summary};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Rows shown of the monthly and yearly stats tables.
const RESAMPLED_PREVIEW_ROWS: usize = 5;

/// Polars display limits, read each time a frame is formatted.
const FMT_MAX_ROWS: &str = "POLARS_FMT_MAX_ROWS";
const FMT_MAX_COLS: &str = "POLARS_FMT_MAX_COLS";

/// Everything a run produced, for callers that want more than the console text.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub raw_rows: usize,
    pub table: WeatherTable,
    pub temperature: Summary,
    pub monthly_rainfall: MonthlyRainfall,
    pub charts: Vec<PathBuf>,
    pub grouped: GroupedSummaries,
}

/// Run the whole report, writing the console text to `out`.
pub fn run<W: Write>(config: &PipelineConfig, out: &mut W) -> Result<PipelineReport> {
    show_full_tables();

    // Load
    let mut loader = DataLoader::new();
    loader
        .load_csv(&config.input)
        .with_context(|| format!("loading {}", config.input.display()))?;

    writeln!(out, "Head:")?;
    writeln!(out, "{}", loader.preview(config.preview_rows)?)?;
    writeln!(out, "\nInfo:")?;
    writeln!(
        out,
        "{} entries, {} columns",
        loader.get_row_count(),
        loader.get_columns().len()
    )?;
    writeln!(out, "{}", loader.column_info()?)?;

    let raw = loader
        .get_dataframe()
        .context("raw table missing after load")?;
    writeln!(out, "\nDescribe:")?;
    writeln!(
        out,
        "{}",
        StatsCalculator::describe(raw, &loader.get_numeric_columns())?
    )?;

    // Clean
    let cleaned = DataCleaner::clean(raw).context("cleaning raw table")?;
    DataCleaner::write_csv(&cleaned.table, &config.cleaned_output)
        .with_context(|| format!("writing {}", config.cleaned_output.display()))?;
    let table = cleaned.table;

    // Statistics
    let daily = StatsCalculator::daily_stats(&table).context("computing daily stats")?;
    writeln!(out, "\nDaily stats:")?;
    writeln!(out, "{}", StatsCalculator::daily_stats_frame(&daily)?)?;

    let monthly = Resampler::resample_stats(&table, Frequency::Monthly);
    writeln!(out, "\nMonthly stats (head):")?;
    writeln!(
        out,
        "{}",
        Resampler::stats_frame(&monthly, "month", Some(RESAMPLED_PREVIEW_ROWS))?
    )?;

    let yearly = Resampler::resample_stats(&table, Frequency::Yearly);
    writeln!(out, "\nYearly stats (head):")?;
    writeln!(
        out,
        "{}",
        Resampler::stats_frame(&yearly, "year", Some(RESAMPLED_PREVIEW_ROWS))?
    )?;

    let temperature = StatsCalculator::direct_summary(&table.temperatures());
    writeln!(out, "\nDirect stats for {}:", TEMPERATURE_COL)?;
    writeln!(out, "Mean: {}", temperature.mean)?;
    writeln!(out, "Min: {}", temperature.min)?;
    writeln!(out, "Max: {}", temperature.max)?;
    writeln!(out, "Std: {}", temperature.std)?;

    // Charts
    let monthly_rainfall = Resampler::monthly_rainfall(&table);
    let charts = ChartRenderer::render_all(&table, &monthly_rainfall, &config.chart_paths())
        .with_context(|| format!("rendering charts into {}", config.plots_dir.display()))?;

    // Grouping
    let grouped = Aggregator::summarize(&table).context("grouping by month and season")?;
    writeln!(out, "\nGrouped by month:")?;
    writeln!(out, "{}", grouped.by_month)?;
    writeln!(out, "\nSeasonal stats:")?;
    writeln!(out, "{}", grouped.by_season)?;

    info!("Report complete: {} rows, {} charts", table.len(), charts.len());

    Ok(PipelineReport {
        raw_rows: cleaned.raw_rows,
        table,
        temperature,
        monthly_rainfall,
        charts,
        grouped,
    })
}

/// Printed tables are never elided: every row and column is shown.
fn show_full_tables() {
    for key in [FMT_MAX_ROWS, FMT_MAX_COLS] {
        std::env::set_var(key, "-1");
    }
}
