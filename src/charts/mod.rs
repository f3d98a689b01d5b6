//! Charts module - Static chart rendering

mod labels;
mod renderer;

pub use renderer::{
    ChartError, ChartRenderer, CHART_SIZE, COMBINED_SIZE, RAINFALL_TITLE, SCATTER_TITLE,
    TEMPERATURE_TITLE,
};

pub(crate) use renderer::draw_err;
