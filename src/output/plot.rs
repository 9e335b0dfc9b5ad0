//! Response-time charts
//!
//! Rendered with plotters' bitmap backend. Captions and axis labels use a
//! bundled DejaVu Sans registered as the `sans-serif` family, so charts
//! look the same on hosts without any system fonts.

use crate::{
    error::{AppError, Result},
    types::Target,
};
use plotters::prelude::*;
use plotters::style::register_font;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Chart size in pixels
pub const CHART_SIZE: (u32, u32) = (800, 500);

/// Point markers are drawn only up to this many samples
pub const MARKER_THRESHOLD: usize = 200;

/// Family every chart element is drawn with
pub const FONT_FAMILY: &str = "sans-serif";

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT_REGISTRATION: OnceLock<std::result::Result<(), String>> = OnceLock::new();

pub(crate) fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::plot(e.to_string())
}

/// Register the bundled font with plotters, once per process
pub fn ensure_fonts() -> Result<()> {
    FONT_REGISTRATION
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "bundled chart font is not a valid TrueType file".to_string())
        })
        .clone()
        .map_err(AppError::plot)
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create {}: {}", parent.display(), e))),
        _ => Ok(()),
    }
}

pub fn chart_title(target: Target, n: usize) -> String {
    format!("Response Times ({}, {} requests)", target.label(), n)
}

/// Upper bound of the y axis: 10% headroom over the slowest sample
fn y_ceiling(max_secs: f64) -> f64 {
    if max_secs > 0.0 {
        max_secs * 1.1
    } else {
        0.001
    }
}

/// Draw latency against request number (completion order).
///
/// Returns `Ok(false)` without touching the filesystem when there are no
/// latencies to draw.
pub fn render_latency_chart(path: &Path, latencies: &[Duration], target: Target, n: usize) -> Result<bool> {
    if latencies.is_empty() {
        return Ok(false);
    }

    ensure_fonts()?;
    ensure_parent(path)?;

    let points: Vec<(f64, f64)> = latencies
        .iter()
        .enumerate()
        .map(|(i, latency)| ((i + 1) as f64, latency.as_secs_f64()))
        .collect();
    let max_secs = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(target, n), (FONT_FAMILY, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..(points.len() as f64 + 1.0), 0.0..y_ceiling(max_secs))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Request #")
        .y_desc("Response Time (s)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(plot_err)?;

    if points.len() <= MARKER_THRESHOLD {
        chart
            .draw_series(points.iter().map(|&point| Circle::new(point, 3, BLUE.filled())))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_bundled_font_registers() {
        ensure_fonts().unwrap();
        // Registration is idempotent
        ensure_fonts().unwrap();
    }

    #[test]
    fn test_chart_title() {
        assert_eq!(chart_title(Target::Swarm, 10), "Response Times (swarm, 10 requests)");
        assert_eq!(chart_title(Target::K8s, 10000), "Response Times (k8s, 10000 requests)");
    }

    #[test]
    fn test_y_ceiling() {
        assert!((y_ceiling(2.0) - 2.2).abs() < 1e-9);
        assert_eq!(y_ceiling(0.0), 0.001);
    }

    #[test]
    fn test_no_latencies_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("X_swarm_10_plot.png");

        assert!(!render_latency_chart(&path, &[], Target::Swarm, 10).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_small_chart_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("charts").join("X_swarm_10_plot.png");

        let written = render_latency_chart(&path, &ms(&[12, 8, 15, 9, 11]), Target::Swarm, 10).unwrap();
        assert!(written);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_caption_text_is_rasterized() {
        ensure_fonts().unwrap();

        // Text-only drawing: any dark pixel must come from glyphs
        let mut buffer = vec![0u8; 200 * 60 * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (200, 60)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            root.draw(&Text::new("Response Times", (10, 20), (FONT_FAMILY, 20).into_font()))
                .unwrap();
            root.present().unwrap();
        }
        assert!(buffer.iter().any(|&channel| channel < 128));
    }

    #[test]
    fn test_large_chart_without_markers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("X_k8s_500_plot.png");
        let latencies: Vec<Duration> = (0..500).map(|i| Duration::from_micros(500 + (i % 37) * 40)).collect();

        assert!(render_latency_chart(&path, &latencies, Target::K8s, 500).unwrap());
        assert!(path.metadata().unwrap().len() > 0);
    }
}
