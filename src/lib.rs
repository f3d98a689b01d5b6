//! Weather Report - CSV weather data cleaning, statistics and charts
//!
//! A single linear pipeline: load a raw weather CSV, clean it, print
//! descriptive statistics at daily, monthly and yearly resolution, render
//! four charts and print month and season summaries.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use config::{Cli, PipelineConfig};
pub use pipeline::{run, PipelineReport};
