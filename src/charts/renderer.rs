//! Static Chart Renderer
//! Rasterises chart handles into RGB images with plotters, and writes PNGs.
//!
//! Layouts:
//! 1. Line: one panel, dates on X with half-yearly ticks rotated 90 degrees
//! 2. Bar: grouped bars per year, legend panel on the right of the plot
//! 3. Box: year-wise panel on the left, month-wise panel on the right
//!
//! Drawing happens into an in-memory buffer; `save_png` is the only file write.

use crate::charts::{BarChart, BoxChart, BoxPanel, LegendEntry, LineChart, ChartPlotter};
use chrono::{Datelike, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
/// Share of a year slot covered by its twelve bars.
const BAR_GROUP_WIDTH: f64 = 0.8;
/// Box width in category units.
const BOX_WIDTH: f64 = 0.6;
const LEGEND_PANEL_WIDTH: u32 = 150;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("No usable font: {0}")]
    Font(String),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot prepare output directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Nothing to draw: the series is empty")]
    EmptySeries,
    #[error("Invalid image size {0}x{1}")]
    Buffer(u32, u32),
}

/// Marker in the text of a font failure. The backend error kind that would
/// tell it apart is not re-exported by plotters.
const FONT_ERROR_MARKER: &str = "Font loading error";

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        let message = err.to_string();
        if message.contains(FONT_ERROR_MARKER) {
            RenderError::Font(message)
        } else {
            RenderError::Drawing(message)
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_line_chart(chart: &LineChart, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        let (start, end) = chart.date_range().ok_or(RenderError::EmptySeries)?;
        let x_start = start.num_days_from_ce();
        let x_end = end.num_days_from_ce().max(x_start + 1);
        let ticks: Vec<i32> = chart.x_ticks.iter().map(|d| d.num_days_from_ce()).collect();
        let line_color = ChartPlotter::get_color(0);

        Self::render_to_image(size, |root| {
            let mut ctx = ChartBuilder::on(root)
                .caption(&chart.labels.title, (FONT, 22))
                .margin(15)
                .x_label_area_size(80)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    (x_start..x_end).with_key_points(ticks),
                    chart.value_range.clone(),
                )?;

            ctx.configure_mesh()
                .x_desc(chart.labels.x_label.as_str())
                .y_desc(chart.labels.y_label.as_str())
                .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
                .x_label_formatter(&Self::format_day)
                .y_label_formatter(&|v: &f64| format!("{v:.0}"))
                .draw()?;

            ctx.draw_series(LineSeries::new(
                chart
                    .points
                    .iter()
                    .map(|(date, value)| (date.num_days_from_ce(), *value)),
                line_color.stroke_width(1),
            ))?;
            Ok(())
        })
    }

    pub fn render_bar_chart(chart: &BarChart, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        if chart.groups.is_empty() {
            return Err(RenderError::EmptySeries);
        }
        let n_years = chart.groups.len();
        let years: Vec<String> = chart.years().iter().map(|y| y.to_string()).collect();
        let bar_width = BAR_GROUP_WIDTH / chart.legend.len().max(1) as f64;

        Self::render_to_image(size, |root| {
            let (plot_area, legend_area) =
                root.split_horizontally(size.0.saturating_sub(LEGEND_PANEL_WIDTH));

            let mut ctx = ChartBuilder::on(&plot_area)
                .caption(&chart.labels.title, (FONT, 22))
                .margin(15)
                .x_label_area_size(70)
                .y_label_area_size(80)
                .build_cartesian_2d(Self::category_axis(n_years), chart.value_range.clone())?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .x_labels(n_years)
                .x_desc(chart.labels.x_label.as_str())
                .y_desc(chart.labels.y_label.as_str())
                .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
                .x_label_formatter(&|x: &f64| Self::category_label(&years, *x))
                .y_label_formatter(&|v: &f64| format!("{v:.0}"))
                .draw()?;

            for (m, entry) in chart.legend.iter().enumerate() {
                let style = entry.color.filled();
                ctx.draw_series(chart.groups.iter().enumerate().filter_map(|(i, group)| {
                    let height = (*group.heights.get(m)?)?;
                    let x0 = i as f64 - BAR_GROUP_WIDTH / 2.0 + m as f64 * bar_width;
                    Some(Rectangle::new([(x0, 0.0), (x0 + bar_width, height)], style))
                }))?;
            }

            Self::draw_legend(&legend_area, &chart.legend_title, &chart.legend)
        })
    }

    pub fn render_box_chart(chart: &BoxChart, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        if chart.year_panel.categories.is_empty() {
            return Err(RenderError::EmptySeries);
        }

        Self::render_to_image(size, |root| {
            let panels = root.split_evenly((1, 2));
            Self::draw_box_panel(&panels[0], &chart.year_panel)?;
            Self::draw_box_panel(&panels[1], &chart.month_panel)
        })
    }

    /// Write an image as PNG, creating the parent directory if needed.
    /// Overwrites an existing file.
    pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn render_to_image<F>(size: (u32, u32), draw: F) -> Result<RgbImage, RenderError>
    where
        F: FnOnce(&Canvas<'_>) -> Result<(), RenderError>,
    {
        let (w, h) = size;
        if w == 0 || h == 0 {
            return Err(RenderError::Buffer(w, h));
        }

        let mut buffer = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            root.fill(&WHITE)?;
            draw(&root)?;
            root.present()?;
        }

        RgbImage::from_raw(w, h, buffer).ok_or(RenderError::Buffer(w, h))
    }

    fn draw_box_panel(area: &Canvas<'_>, panel: &BoxPanel) -> Result<(), RenderError> {
        let n = panel.categories.len();
        let labels = panel.category_labels();

        let mut ctx = ChartBuilder::on(area)
            .caption(&panel.labels.title, (FONT, 18))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(Self::category_axis(n), panel.value_range.clone())?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_desc(panel.labels.x_label.as_str())
            .y_desc(panel.labels.y_label.as_str())
            .x_label_formatter(&|x: &f64| Self::category_label(&labels, *x))
            .y_label_formatter(&|v: &f64| format!("{v:.0}"))
            .draw()?;

        let plot = ctx.plotting_area();
        let half = BOX_WIDTH / 2.0;
        let cap = half / 2.0;
        let line = BLACK.stroke_width(1);

        for (i, category) in panel.categories.iter().enumerate() {
            let Some(stats) = &category.stats else {
                continue;
            };
            let x = i as f64;

            // Box (filled, outlined)
            plot.draw(&Rectangle::new(
                [(x - half, stats.q1), (x + half, stats.q3)],
                category.color.mix(0.8).filled(),
            ))?;
            plot.draw(&Rectangle::new(
                [(x - half, stats.q1), (x + half, stats.q3)],
                line,
            ))?;

            // Median
            plot.draw(&PathElement::new(
                vec![(x - half, stats.median), (x + half, stats.median)],
                line,
            ))?;

            // Whiskers and caps
            for (from, to) in [(stats.whisker_low, stats.q1), (stats.q3, stats.whisker_high)] {
                plot.draw(&PathElement::new(vec![(x, from), (x, to)], line))?;
            }
            for end in [stats.whisker_low, stats.whisker_high] {
                plot.draw(&PathElement::new(vec![(x - cap, end), (x + cap, end)], line))?;
            }

            for &value in &stats.outliers {
                plot.draw(&Circle::new((x, value), 3, line))?;
            }
        }

        Ok(())
    }

    fn draw_legend(area: &Canvas<'_>, title: &str, entries: &[LegendEntry]) -> Result<(), RenderError> {
        let title_style = (FONT, 16).into_font().color(&BLACK);
        let label_style = (FONT, 13).into_font().color(&BLACK);
        let box_size = 14;
        let x = 10;
        let mut y = 60;

        area.draw_text(title, &title_style, (x, y))?;
        y += 26;

        for entry in entries {
            area.draw(&Rectangle::new(
                [(x, y), (x + box_size, y + box_size)],
                entry.color.filled(),
            ))?;
            area.draw_text(&entry.label, &label_style, (x + box_size + 8, y))?;
            y += 22;
        }

        Ok(())
    }

    /// `n` category slots centred on 0, 1, .., n - 1.
    fn category_axis(n: usize) -> Range<f64> {
        -0.5..n.max(1) as f64 - 0.5
    }

    /// Label of the category centred at `x`, blank between categories.
    fn category_label<S: AsRef<str>>(labels: &[S], x: f64) -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        labels
            .get(idx as usize)
            .map(|label| label.as_ref().to_string())
            .unwrap_or_default()
    }

    fn format_day(day: &i32) -> String {
        NaiveDate::from_num_days_from_ce_opt(*day)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    }
}
