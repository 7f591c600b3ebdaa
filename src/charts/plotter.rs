//! Chart Plotter Module
//! Builds chart handles from the cleaned series: everything a static image
//! needs (titles, categories, statistics, ticks) without touching a backend.

use crate::data::{CalendarMonth, CleanedSeries, DataProcessor};
use crate::stats::{BoxStats, StatsCalculator};
use chrono::{Datelike, NaiveDate};
use plotters::style::RGBColor;
use std::ops::Range;

pub const LINE_TITLE: &str = "Daily freeCodeCamp Forum Page Views 5/2016-12/2019";
pub const BAR_TITLE: &str = "Average Page Views per Month";
pub const YEAR_BOX_TITLE: &str = "Year-wise Box Plot (Trend)";
pub const MONTH_BOX_TITLE: &str = "Month-wise Box Plot (Seasonality)";

/// Months between two date ticks on the line chart.
pub const TICK_INTERVAL_MONTHS: u32 = 6;

/// One distinct color per month, January first.
pub const PALETTE: [RGBColor; 12] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
    RGBColor(26, 85, 153),   // Navy
    RGBColor(255, 187, 120), // Peach
];

/// Title and axis descriptions of a chart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

/// Daily values against time.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub labels: ChartLabels,
    pub points: Vec<(NaiveDate, f64)>,
    /// First day of every January and July inside the date range.
    pub x_ticks: Vec<NaiveDate>,
    pub value_range: Range<f64>,
}

impl LineChart {
    pub const FILE_NAME: &'static str = "line_plot.png";

    /// Tick labels as drawn, "%Y-%m".
    pub fn tick_labels(&self) -> Vec<String> {
        self.x_ticks
            .iter()
            .map(|d| d.format("%Y-%m").to_string())
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
}

/// One year's bars, indexed by month. `None` means no bar, not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub year: i32,
    pub heights: [Option<f64>; 12],
}

/// Monthly averages as grouped bars, one group per year.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub labels: ChartLabels,
    pub legend_title: String,
    /// January..December.
    pub legend: Vec<LegendEntry>,
    pub groups: Vec<BarGroup>,
    pub value_range: Range<f64>,
}

impl BarChart {
    pub const FILE_NAME: &'static str = "bar_plot.png";

    pub fn years(&self) -> Vec<i32> {
        self.groups.iter().map(|g| g.year).collect()
    }
}

/// One box position on a box panel. Empty categories keep their slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCategory {
    pub label: String,
    pub stats: Option<BoxStats>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanel {
    pub labels: ChartLabels,
    pub categories: Vec<BoxCategory>,
    pub value_range: Range<f64>,
}

impl BoxPanel {
    pub fn category_labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Year-wise and month-wise box plots side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    pub year_panel: BoxPanel,
    pub month_panel: BoxPanel,
}

impl BoxChart {
    pub const FILE_NAME: &'static str = "box_plot.png";
}

/// Creates chart handles from the cleaned dataset.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a category by position.
    pub fn get_color(index: usize) -> RGBColor {
        PALETTE[index % PALETTE.len()]
    }

    pub fn line_chart(data: &CleanedSeries) -> LineChart {
        let points: Vec<(NaiveDate, f64)> =
            data.records().iter().map(|r| (r.date, r.value)).collect();
        let values: Vec<f64> = points.iter().map(|p| p.1).collect();

        let x_ticks = match (data.series().first_date(), data.series().last_date()) {
            (Some(start), Some(end)) => Self::half_year_ticks(start, end),
            _ => Vec::new(),
        };

        LineChart {
            labels: ChartLabels::new(LINE_TITLE, "Date", "Page Views"),
            points,
            x_ticks,
            value_range: Self::value_axis_range(values),
        }
    }

    pub fn bar_chart(data: &CleanedSeries) -> BarChart {
        let table = DataProcessor::monthly_averages(data);

        let legend = table
            .months()
            .iter()
            .map(|month| LegendEntry {
                label: month.name().to_string(),
                color: Self::get_color(month.index()),
            })
            .collect();
        let groups = table
            .years()
            .iter()
            .map(|&year| BarGroup {
                year,
                heights: table.row(year),
            })
            .collect();

        BarChart {
            labels: ChartLabels::new(BAR_TITLE, "Years", "Average Page Views"),
            legend_title: "Months".to_string(),
            legend,
            groups,
            value_range: Self::value_axis_range(table.max_value()),
        }
    }

    pub fn box_chart(data: &CleanedSeries) -> BoxChart {
        let values = data.series().values();
        let value_range = Self::value_axis_range(values);

        let year_groups = DataProcessor::year_groups(data);
        let month_groups = DataProcessor::month_groups(data);
        debug_assert_eq!(month_groups.len(), CalendarMonth::ALL.len());

        let year_panel = BoxPanel {
            labels: ChartLabels::new(YEAR_BOX_TITLE, "Year", "Page Views"),
            categories: Self::box_categories(
                year_groups.iter().map(|g| g.label.clone()),
                StatsCalculator::compute_group_box_stats_parallel(&year_groups),
            ),
            value_range: value_range.clone(),
        };
        let month_panel = BoxPanel {
            labels: ChartLabels::new(MONTH_BOX_TITLE, "Month", "Page Views"),
            categories: Self::box_categories(
                month_groups.iter().map(|g| g.label.clone()),
                StatsCalculator::compute_group_box_stats_parallel(&month_groups),
            ),
            value_range,
        };

        BoxChart {
            year_panel,
            month_panel,
        }
    }

    /// First day of every January and July from `start` to `end` inclusive.
    pub fn half_year_ticks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut ticks = Vec::new();
        let mut year = start.year();
        let mut month = 1;
        loop {
            let Some(tick) = NaiveDate::from_ymd_opt(year, month, 1) else {
                break;
            };
            if tick > end {
                break;
            }
            if tick >= start {
                ticks.push(tick);
            }
            month += TICK_INTERVAL_MONTHS;
            if month > 12 {
                month -= 12;
                year += 1;
            }
        }
        ticks
    }

    /// Value axis from zero (or the lowest negative value) to the highest
    /// value plus 5% of the span.
    pub fn value_axis_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !max.is_finite() || max <= min {
            return min..min + 1.0;
        }
        min..max + (max - min) * 0.05
    }

    fn box_categories(
        labels: impl Iterator<Item = String>,
        stats: Vec<Option<BoxStats>>,
    ) -> Vec<BoxCategory> {
        labels
            .zip(stats)
            .enumerate()
            .map(|(i, (label, stats))| BoxCategory {
                label,
                stats,
                color: Self::get_color(i),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Series};
    use approx::assert_relative_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cleaned(records: Vec<Record>) -> CleanedSeries {
        DataProcessor::clean_outliers(&Series::from_records(records), 0.0, 1.0)
    }

    fn sample() -> CleanedSeries {
        cleaned(vec![
            Record::new(day(2016, 5, 9), 1201.0),
            Record::new(day(2016, 5, 10), 2329.0),
            Record::new(day(2016, 12, 1), 3000.0),
            Record::new(day(2017, 1, 3), 100.0),
            Record::new(day(2017, 1, 20), 200.0),
            Record::new(day(2017, 7, 4), 4000.0),
        ])
    }

    #[test]
    fn ticks_every_six_months() {
        let ticks = ChartPlotter::half_year_ticks(day(2016, 5, 9), day(2017, 12, 3));
        assert_eq!(
            ticks,
            vec![day(2016, 7, 1), day(2017, 1, 1), day(2017, 7, 1)]
        );
        let exact = ChartPlotter::half_year_ticks(day(2016, 1, 1), day(2016, 7, 1));
        assert_eq!(exact, vec![day(2016, 1, 1), day(2016, 7, 1)]);
        assert!(ChartPlotter::half_year_ticks(day(2016, 2, 1), day(2016, 6, 30)).is_empty());
    }

    #[test]
    fn line_chart_follows_date_order() {
        let chart = ChartPlotter::line_chart(&sample());
        assert_eq!(chart.labels.x_label, "Date");
        assert_eq!(chart.labels.y_label, "Page Views");
        assert_eq!(chart.points.len(), 6);
        assert!(chart.points.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(chart.tick_labels(), vec!["2016-07", "2017-01", "2017-07"]);
        assert_eq!(chart.date_range(), Some((day(2016, 5, 9), day(2017, 7, 4))));
        assert_relative_eq!(chart.value_range.start, 0.0);
        assert_relative_eq!(chart.value_range.end, 4200.0);
    }

    #[test]
    fn bar_chart_months_in_calendar_order() {
        let chart = ChartPlotter::bar_chart(&sample());
        assert_eq!(chart.labels.title, BAR_TITLE);
        assert_eq!(chart.labels.x_label, "Years");
        assert_eq!(chart.labels.y_label, "Average Page Views");
        assert_eq!(chart.legend_title, "Months");

        let legend: Vec<&str> = chart.legend.iter().map(|e| e.label.as_str()).collect();
        let expected: Vec<&str> = CalendarMonth::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(legend, expected);
        assert_eq!(chart.years(), vec![2016, 2017]);

        let jan_2017 = chart.groups[1].heights[CalendarMonth::January.index()];
        assert_relative_eq!(jan_2017.unwrap(), 150.0);
        // no data for January 2016: no bar
        assert_eq!(chart.groups[0].heights[CalendarMonth::January.index()], None);
    }

    #[test]
    fn bar_colors_are_distinct() {
        let chart = ChartPlotter::bar_chart(&sample());
        for (i, a) in chart.legend.iter().enumerate() {
            for b in &chart.legend[i + 1..] {
                assert_ne!(a.color, b.color);
            }
        }
    }

    #[test]
    fn box_chart_categories() {
        let chart = ChartPlotter::box_chart(&sample());
        assert_eq!(chart.year_panel.category_labels(), vec!["2016", "2017"]);
        assert_eq!(chart.year_panel.labels.title, YEAR_BOX_TITLE);
        assert_eq!(chart.month_panel.labels.title, MONTH_BOX_TITLE);
        assert_eq!(chart.month_panel.labels.x_label, "Month");

        let months = chart.month_panel.category_labels();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "Jan");
        assert_eq!(months[11], "Dec");
        assert!(chart.month_panel.categories[1].stats.is_none());
        assert_eq!(
            chart.month_panel.categories[0].stats.as_ref().unwrap().count,
            2
        );
    }

    #[test]
    fn value_axis_range_edges() {
        assert_eq!(ChartPlotter::value_axis_range(Vec::<f64>::new()), 0.0..1.0);
        assert_eq!(ChartPlotter::value_axis_range(vec![0.0]), 0.0..1.0);
        let range = ChartPlotter::value_axis_range(vec![-10.0, 100.0]);
        assert_relative_eq!(range.start, -10.0);
        assert_relative_eq!(range.end, 105.5);
    }

    #[test]
    fn value_axis_keeps_negative_maximum_in_view() {
        let range = ChartPlotter::value_axis_range(vec![-10.0, -5.0]);
        assert_relative_eq!(range.start, -10.0);
        assert_relative_eq!(range.end, -4.75);
        assert!(range.contains(&-5.0));
    }
}
