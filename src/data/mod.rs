//! Data module - CSV loading, cleaning and grouping

mod calendar;
mod loader;
mod processor;
mod series;

pub use calendar::CalendarMonth;
pub use loader::{
    parse_date, DataLoadError, DataLoader, ParseWarning, DEFAULT_DATE_COLUMN,
    DEFAULT_VALUE_COLUMN,
};
pub use processor::{
    DataProcessor, MonthlyAverageTable, DEFAULT_LOWER_QUANTILE, DEFAULT_UPPER_QUANTILE,
};
pub use series::{CleanedSeries, Record, Series};
