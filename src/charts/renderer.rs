//! Static Chart Renderer
//! Renders the four report charts with plotters into in-memory bitmaps and
//! writes them as PNG files.
//!
//! Charts:
//! 1. Daily temperature line over the full date range
//! 2. Monthly rainfall totals as bars
//! 3. Humidity against temperature scatter
//! 4. Combined figure: chart 1 on top, chart 2 below with 45 degree labels

use crate::charts::labels;
use crate::config::ChartPaths;
use crate::data::WeatherTable;
use crate::stats::MonthlyRainfall;
use chrono::NaiveDate;
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Single chart size in pixels.
pub const CHART_SIZE: (u32, u32) = (800, 600);
/// Two-panel figure size in pixels.
pub const COMBINED_SIZE: (u32, u32) = (800, 800);

pub const TEMPERATURE_TITLE: &str = "Daily Temperature Trend";
pub const RAINFALL_TITLE: &str = "Monthly Rainfall Totals";
pub const SCATTER_TITLE: &str = "Humidity vs. Temperature";

const LABEL_ROTATION_DEG: f64 = 45.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const CAPTION_FONT: (&str, f64) = ("sans-serif", 22.0);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to plot: cleaned table is empty")]
    NoData,
    #[error("Drawing error: {0}")]
    Drawing(String),
    #[error("Rainfall total for {0} is not a finite number")]
    NonFiniteRainfall(String),
    #[error("Bitmap buffer has the wrong size")]
    Buffer,
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub(crate) fn draw_err(err: impl std::fmt::Display) -> ChartError {
    ChartError::Drawing(err.to_string())
}

/// How the bar chart draws its month labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickLabels {
    Horizontal,
    /// Left blank by plotters; pixel anchors are returned for manual drawing.
    Rotated,
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render and write all four charts. `rainfall` feeds both the bar chart
    /// and the combined figure's lower panel.
    pub fn render_all(
        table: &WeatherTable,
        rainfall: &MonthlyRainfall,
        paths: &ChartPaths,
    ) -> Result<Vec<PathBuf>, ChartError> {
        Self::save_png(&Self::temperature_line(table)?, &paths.temperature_line)?;
        Self::save_png(&Self::rainfall_bar(rainfall)?, &paths.rainfall_bar)?;
        Self::save_png(&Self::humidity_scatter(table)?, &paths.humidity_scatter)?;
        Self::save_png(&Self::combined(table, rainfall)?, &paths.combined)?;

        Ok(paths.all().iter().map(|p| p.to_path_buf()).collect())
    }

    /// Chart 1: temperature against date.
    pub fn temperature_line(table: &WeatherTable) -> Result<RgbImage, ChartError> {
        let (img, ()) = Self::render(CHART_SIZE, |root| Self::draw_temperature(root, table))?;
        Ok(img)
    }

    /// Chart 2: rainfall total per calendar month.
    pub fn rainfall_bar(rainfall: &MonthlyRainfall) -> Result<RgbImage, ChartError> {
        let (img, _) = Self::render(CHART_SIZE, |root| {
            Self::draw_rainfall(root, rainfall, TickLabels::Horizontal)
        })?;
        Ok(img)
    }

    /// Chart 3: one point per row, temperature on x, humidity on y.
    pub fn humidity_scatter(table: &WeatherTable) -> Result<RgbImage, ChartError> {
        let (img, ()) = Self::render(CHART_SIZE, |root| Self::draw_scatter(root, table))?;
        Ok(img)
    }

    /// Chart 4: temperature line above rainfall bars.
    pub fn combined(
        table: &WeatherTable,
        rainfall: &MonthlyRainfall,
    ) -> Result<RgbImage, ChartError> {
        let (mut img, anchors) = Self::combined_panels(table, rainfall)?;
        for (label, anchor) in rainfall.labels().iter().zip(anchors) {
            labels::draw_rotated_label(
                &mut img,
                label,
                anchor,
                LABEL_ROTATION_DEG,
                LABEL_FONT_SIZE,
                6,
            )?;
        }
        Ok(img)
    }

    /// Both panels of chart 4 without the month labels, plus the pixel
    /// anchor of each bar on the lower panel's bottom edge.
    fn combined_panels(
        table: &WeatherTable,
        rainfall: &MonthlyRainfall,
    ) -> Result<(RgbImage, Vec<(i32, i32)>), ChartError> {
        Self::render(COMBINED_SIZE, |root| {
            let panels = root.split_evenly((2, 1));
            Self::draw_temperature(&panels[0], table)?;
            Self::draw_rainfall(&panels[1], rainfall, TickLabels::Rotated)
        })
    }

    /// Encode as PNG, replacing any existing file.
    pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), ChartError> {
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| ChartError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Saved chart {}", path.display());
        Ok(())
    }

    /// Run `draw` on a fresh white surface of `size` and return the pixels.
    fn render<T, F>(size: (u32, u32), draw: F) -> Result<(RgbImage, T), ChartError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<T, ChartError>,
    {
        let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
        let extra = {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let extra = draw(&root)?;
            root.present().map_err(draw_err)?;
            extra
        };
        let img = RgbImage::from_raw(size.0, size.1, buffer).ok_or(ChartError::Buffer)?;
        Ok((img, extra))
    }

    fn draw_temperature<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        table: &WeatherTable,
    ) -> Result<(), ChartError> {
        let (first, last) = Self::date_span(table)?;
        let (y_min, y_max) = Self::padded_range(&table.temperatures());

        let mut chart = ChartBuilder::on(area)
            .caption(TEMPERATURE_TITLE, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first..last, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_desc("Date")
            .y_desc("Temperature")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                table.records().iter().map(|r| (r.date, r.temperature)),
                &BLUE,
            ))
            .map_err(draw_err)?;
        Ok(())
    }

    /// Returns the backend pixel below each bar's centre on the plot's bottom edge.
    fn draw_rainfall<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        rainfall: &MonthlyRainfall,
        ticks: TickLabels,
    ) -> Result<Vec<(i32, i32)>, ChartError> {
        if rainfall.is_empty() {
            return Err(ChartError::NoData);
        }
        if let Some(label) = rainfall.first_non_finite() {
            return Err(ChartError::NonFiniteRainfall(label.to_string()));
        }
        let n = rainfall.len() as u32;
        let (bottom, top) = Self::rainfall_range(rainfall);
        let x_area = match ticks {
            TickLabels::Horizontal => 40,
            TickLabels::Rotated => 80,
        };

        let mut chart = ChartBuilder::on(area)
            .caption(RAINFALL_TITLE, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(x_area)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), bottom..top)
            .map_err(draw_err)?;

        let month_labels = rainfall.labels();
        let formatter = |v: &SegmentValue<u32>| match (ticks, v) {
            (TickLabels::Horizontal, SegmentValue::CenterOf(i)) => {
                month_labels.get(*i as usize).cloned().unwrap_or_default()
            }
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n as usize)
            .x_label_formatter(&formatter)
            .x_desc("Month")
            .y_desc("Rainfall")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.filled())
                    .margin(4)
                    .data(
                        rainfall
                            .totals()
                            .iter()
                            .enumerate()
                            .map(|(i, &total)| (i as u32, total)),
                    ),
            )
            .map_err(draw_err)?;

        Ok((0..n)
            .map(|i| chart.backend_coord(&(SegmentValue::CenterOf(i), bottom)))
            .collect())
    }

    fn draw_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        table: &WeatherTable,
    ) -> Result<(), ChartError> {
        if table.is_empty() {
            return Err(ChartError::NoData);
        }
        let (x_min, x_max) = Self::padded_range(&table.temperatures());
        let (y_min, y_max) = Self::padded_range(&table.humidity());

        let mut chart = ChartBuilder::on(area)
            .caption(SCATTER_TITLE, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Temperature")
            .y_desc("Humidity")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                table
                    .records()
                    .iter()
                    .map(|r| Circle::new((r.temperature, r.humidity), 3, BLUE.filled())),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    /// Value range holding zero and every total, padded by 10%.
    fn rainfall_range(rainfall: &MonthlyRainfall) -> (f64, f64) {
        let (lo, hi) = (rainfall.min_total(), rainfall.max_total());
        if lo == hi {
            return (0.0, 1.0);
        }
        (lo * 1.1, hi * 1.1)
    }

    /// First and last date, widened by a day when they coincide.
    fn date_span(table: &WeatherTable) -> Result<(NaiveDate, NaiveDate), ChartError> {
        let (Some(first), Some(last)) = (table.first_date(), table.last_date()) else {
            return Err(ChartError::NoData);
        };
        if first < last {
            Ok((first, last))
        } else {
            Ok((first, first.succ_opt().unwrap_or(first)))
        }
    }

    /// Axis range covering `values` with 5% padding; unit range when flat.
    fn padded_range(values: &[f64]) -> (f64, f64) {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherRecord;
    use crate::stats::Resampler;

    fn table(rows: &[(u32, f64)]) -> WeatherTable {
        WeatherTable::from_records(
            rows.iter()
                .map(|&(month, rainfall)| WeatherRecord {
                    date: NaiveDate::from_ymd_opt(2023, month, 10).unwrap(),
                    temperature: 10.0 + month as f64,
                    rainfall,
                    humidity: 60.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(ChartRenderer::padded_range(&[]), (0.0, 1.0));
        assert_eq!(ChartRenderer::padded_range(&[5.0, 5.0]), (4.0, 6.0));
        let (lo, hi) = ChartRenderer::padded_range(&[0.0, 10.0]);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs_are_no_data() {
        let table = WeatherTable::default();
        assert!(matches!(
            ChartRenderer::temperature_line(&table),
            Err(ChartError::NoData)
        ));
        assert!(matches!(
            ChartRenderer::rainfall_bar(&MonthlyRainfall::default()),
            Err(ChartError::NoData)
        ));
        assert!(matches!(
            ChartRenderer::humidity_scatter(&table),
            Err(ChartError::NoData)
        ));
    }

    #[test]
    fn test_rainfall_range_covers_negative_totals() {
        let rain = Resampler::monthly_rainfall(&table(&[(1, -2.0), (2, 4.0)]));
        let (lo, hi) = ChartRenderer::rainfall_range(&rain);
        assert!(lo < -2.0 && hi > 4.0);
        assert!(ChartRenderer::rainfall_bar(&rain).is_ok());

        let dry = Resampler::monthly_rainfall(&table(&[(1, 0.0), (2, 0.0)]));
        assert_eq!(ChartRenderer::rainfall_range(&dry), (0.0, 1.0));
    }

    #[test]
    fn test_non_finite_rainfall_is_rejected() {
        let rain = Resampler::monthly_rainfall(&table(&[(1, 1.0), (3, f64::INFINITY)]));
        match ChartRenderer::rainfall_bar(&rain) {
            Err(ChartError::NonFiniteRainfall(label)) => assert_eq!(label, "2023-03"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_month_labels_darken_below_lower_axis() {
        let t = table(&[(1, 1.0), (2, 3.0), (3, 2.0), (4, 5.0)]);
        let rain = Resampler::monthly_rainfall(&t);

        let (plain, anchors) = ChartRenderer::combined_panels(&t, &rain).unwrap();
        let labelled = ChartRenderer::combined(&t, &rain).unwrap();
        assert_eq!(anchors.len(), 4);

        let darker = |x: u32, y: u32| {
            let (a, b) = (plain.get_pixel(x, y), labelled.get_pixel(x, y));
            (0..3).any(|c| b[c] < a[c])
        };

        let mut changed = Vec::new();
        for (x, y) in plain.enumerate_pixels().map(|(x, y, _)| (x, y)) {
            if darker(x, y) {
                changed.push((x, y));
            }
        }
        assert!(!changed.is_empty());
        // Every label pixel sits below the axis of the lower panel.
        let axis_y = anchors[0].1 as u32;
        assert!(changed.iter().all(|&(_, y)| y > axis_y));

        // Each bar has its own label near its anchor.
        for &(ax, ay) in &anchors {
            let near = changed.iter().any(|&(x, y)| {
                (x as i32 - ax).abs() <= 40 && y as i32 > ay && (y as i32 - ay) <= 80
            });
            assert!(near, "no label pixels near anchor ({ax}, {ay})");
        }
    }
}
