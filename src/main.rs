//! Pageview Charts - renders line_plot.png, bar_plot.png and box_plot.png
//! from the page-view CSV in the working directory.

use anyhow::{Context, Result};
use pageview_charts::config::CONFIG_FILE_NAME;
use pageview_charts::{Pipeline, VisualizerConfig};
use std::path::Path;

fn main() -> Result<()> {
    let config = VisualizerConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
        .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME))?;

    let pipeline = Pipeline::new(config).context("Failed to prepare the dataset")?;

    pipeline.draw_line_plot().context("Failed to draw the line plot")?;
    pipeline.draw_bar_plot().context("Failed to draw the bar plot")?;
    pipeline.draw_box_plot().context("Failed to draw the box plot")?;

    Ok(())
}
