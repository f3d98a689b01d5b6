//! Data module - CSV loading, cleaning and the cleaned weather table

mod cleaner;
mod loader;
mod table;

pub use cleaner::{CleanedData, CleanerError, DataCleaner};
pub use loader::{DataLoader, LoaderError};
pub use table::{Season, WeatherRecord, WeatherTable};
