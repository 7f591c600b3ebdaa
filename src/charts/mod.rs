//! Charts module - Chart handles and static rendering

mod plotter;
mod renderer;

pub use plotter::{
    BarChart, BarGroup, BoxCategory, BoxChart, BoxPanel, ChartLabels, ChartPlotter, LegendEntry,
    LineChart, BAR_TITLE, LINE_TITLE, MONTH_BOX_TITLE, PALETTE, TICK_INTERVAL_MONTHS,
    YEAR_BOX_TITLE,
};
pub use renderer::{RenderError, StaticChartRenderer};
