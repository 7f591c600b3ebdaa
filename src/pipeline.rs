//! Pipeline Module
//! Loads and cleans the dataset once, then hands it to the three chart
//! entry points by shared reference.

use crate::charts::{BarChart, BoxChart, ChartPlotter, LineChart, RenderError, StaticChartRenderer};
use crate::config::{ConfigError, VisualizerConfig};
use crate::data::{CleanedSeries, DataLoadError, DataLoader, DataProcessor, ParseWarning, Series};
use std::path::Path;
use thiserror::Error;

/// Individual row warnings printed before they are summarised.
const MAX_REPORTED_WARNINGS: usize = 10;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] DataLoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Draw the cleaned series against time and write `line_plot.png`.
pub fn draw_line_plot(
    data: &CleanedSeries,
    output_dir: &Path,
    size: (u32, u32),
) -> Result<LineChart, RenderError> {
    let chart = ChartPlotter::line_chart(data);
    let image = StaticChartRenderer::render_line_chart(&chart, size)?;
    write_chart(&image, output_dir, LineChart::FILE_NAME)?;
    Ok(chart)
}

/// Draw monthly averages grouped by year and write `bar_plot.png`.
pub fn draw_bar_plot(
    data: &CleanedSeries,
    output_dir: &Path,
    size: (u32, u32),
) -> Result<BarChart, RenderError> {
    let chart = ChartPlotter::bar_chart(data);
    let image = StaticChartRenderer::render_bar_chart(&chart, size)?;
    write_chart(&image, output_dir, BarChart::FILE_NAME)?;
    Ok(chart)
}

/// Draw the year-wise and month-wise box plots and write `box_plot.png`.
pub fn draw_box_plot(
    data: &CleanedSeries,
    output_dir: &Path,
    size: (u32, u32),
) -> Result<BoxChart, RenderError> {
    let chart = ChartPlotter::box_chart(data);
    let image = StaticChartRenderer::render_box_chart(&chart, size)?;
    write_chart(&image, output_dir, BoxChart::FILE_NAME)?;
    Ok(chart)
}

fn write_chart(image: &image::RgbImage, output_dir: &Path, file_name: &str) -> Result<(), RenderError> {
    let path = output_dir.join(file_name);
    StaticChartRenderer::save_png(image, &path)?;
    println!("Chart written: {}", path.display());
    Ok(())
}

/// The cleaned dataset plus the settings used to draw it.
pub struct Pipeline {
    config: VisualizerConfig,
    data: CleanedSeries,
    warnings: Vec<ParseWarning>,
}

impl Pipeline {
    /// Load the configured CSV and remove outliers.
    pub fn new(config: VisualizerConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let mut loader = DataLoader::with_columns(&config.date_column, &config.value_column);
        let series = loader.load_series(&config.input_path)?;
        let warnings = loader.warnings().to_vec();

        println!(
            "Loaded {} records from {} ({} rows dropped)",
            series.len(),
            config.input_path.display(),
            warnings.len()
        );
        Self::report_warnings(&warnings);

        let mut pipeline = Self::from_series(config, &series);
        pipeline.warnings = warnings;
        Ok(pipeline)
    }

    /// Build from an already loaded series.
    pub fn from_series(config: VisualizerConfig, series: &Series) -> Self {
        let data =
            DataProcessor::clean_outliers(series, config.lower_quantile, config.upper_quantile);

        if let Some(bounds) = data.bounds() {
            println!(
                "Cleaned series: kept {} of {} records within [{:.1}, {:.1}]",
                data.len(),
                series.len(),
                bounds.lower,
                bounds.upper
            );
        }

        Self {
            config,
            data,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn data(&self) -> &CleanedSeries {
        &self.data
    }

    /// Rows dropped while loading.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn draw_line_plot(&self) -> Result<LineChart, RenderError> {
        draw_line_plot(&self.data, &self.config.output_dir, self.config.line_size)
    }

    pub fn draw_bar_plot(&self) -> Result<BarChart, RenderError> {
        draw_bar_plot(&self.data, &self.config.output_dir, self.config.bar_size)
    }

    pub fn draw_box_plot(&self) -> Result<BoxChart, RenderError> {
        draw_box_plot(&self.data, &self.config.output_dir, self.config.box_size)
    }

    /// Draw all three charts in order, stopping at the first failure.
    pub fn draw_all(&self) -> Result<(LineChart, BarChart, BoxChart), RenderError> {
        Ok((
            self.draw_line_plot()?,
            self.draw_bar_plot()?,
            self.draw_box_plot()?,
        ))
    }

    fn report_warnings(warnings: &[ParseWarning]) {
        for warning in warnings.iter().take(MAX_REPORTED_WARNINGS) {
            eprintln!("Skipped row, {}", warning);
        }
        if warnings.len() > MAX_REPORTED_WARNINGS {
            eprintln!(
                "... and {} more skipped rows",
                warnings.len() - MAX_REPORTED_WARNINGS
            );
        }
    }
}
