//! Pageview Charts - Daily page-view cleaning & static chart generation
//!
//! Loads a `date,value` CSV, drops values outside the central 95% of the
//! data, and draws a line plot, a monthly-average bar plot and year/month
//! box plots as PNG files.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use charts::{BarChart, BoxChart, LineChart, RenderError};
pub use config::{ConfigError, VisualizerConfig};
pub use data::{CleanedSeries, DataLoadError, ParseWarning, Record, Series};
pub use pipeline::{draw_bar_plot, draw_box_plot, draw_line_plot, Pipeline, PipelineError};
