//! Stats module - Percentiles and box-plot summaries

mod calculator;

pub use calculator::{
    BoxStats, QuantileBounds, StatsCalculator, ValueGroup, WHISKER_IQR_FACTOR,
};
