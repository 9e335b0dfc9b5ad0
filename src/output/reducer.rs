//! MapReduce reducer-count benchmark chart
//!
//! A fixed dataset of execution times measured for four MapReduce jobs at
//! 2, 4, 8 and 16 reducers, drawn as one series per job.

use super::plot::{ensure_fonts, ensure_parent, plot_err, FONT_FAMILY};
use crate::error::Result;
use plotters::prelude::*;
use std::path::Path;

pub const DEFAULT_OUTPUT: &str = "reducers_vs_time_all.jpeg";
pub const CHART_TITLE: &str = "Reducer Count vs Execution Time for All MapReduce Tasks";
pub const CHART_SIZE: (u32, u32) = (800, 600);

/// Reducer counts shared by every series
pub const REDUCERS: [u32; 4] = [2, 4, 8, 16];

/// One job's execution times, aligned with [`REDUCERS`]
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSeries {
    pub label: &'static str,
    pub seconds: [u32; 4],
}

pub const TASKS: [TaskSeries; 4] = [
    TaskSeries { label: "Task 1: Popular Routes", seconds: [1080, 610, 440, 335] },
    TaskSeries { label: "Task 2: Expensive Routes", seconds: [1025, 585, 405, 312] },
    TaskSeries { label: "Task 3: Visited Locations", seconds: [970, 535, 365, 290] },
    TaskSeries { label: "Task 4: Nightlife", seconds: [915, 392, 302, 298] },
];

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

impl TaskSeries {
    pub fn points(&self) -> Vec<(u32, u32)> {
        REDUCERS.iter().copied().zip(self.seconds.iter().copied()).collect()
    }
}

/// Highest execution time in the dataset
pub fn max_seconds() -> u32 {
    TASKS.iter().flat_map(|task| task.seconds).max().unwrap_or(0)
}

/// Render the reducer chart to `path`; the image format follows the
/// extension (JPEG by default, PNG and BMP also work)
pub fn render_reducer_chart(path: &Path) -> Result<()> {
    ensure_fonts()?;
    ensure_parent(path)?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let y_max = max_seconds() + max_seconds() / 10;
    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, (FONT_FAMILY, 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..18u32, 0u32..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Number of Reducers")
        .y_desc("Execution Time (seconds)")
        .light_line_style(WHITE.mix(0.0))
        .draw()
        .map_err(plot_err)?;

    for (index, task) in TASKS.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        let points = task.points();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(task.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        // Distinct markers per series so the chart reads in grayscale
        match index {
            0 => chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled()))),
            1 => chart.draw_series(points.iter().map(|&p| Cross::new(p, 5, color.stroke_width(2)))),
            2 => chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, color.stroke_width(2)))),
            _ => chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, 5, color.filled()))),
        }
        .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dataset() {
        assert_eq!(TASKS.len(), 4);
        assert_eq!(max_seconds(), 1080);
        assert_eq!(TASKS[3].points(), vec![(2, 915), (4, 392), (8, 302), (16, 298)]);
    }

    #[test]
    fn test_times_fall_as_reducers_grow() {
        for task in &TASKS {
            assert!(task.seconds.windows(2).all(|w| w[0] >= w[1]), "{}", task.label);
        }
    }

    #[test]
    fn test_render_reducer_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);

        render_reducer_chart(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));

        let png = dir.path().join("reducers.png");
        render_reducer_chart(&png).unwrap();
        assert!(std::fs::read(&png).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
