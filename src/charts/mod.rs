//! Per-exchange PNG latency charts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::ReportError;
use crate::stats::LatencyStatistics;
use crate::store::LatencySeries;

pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_CHART_WIDTH: u32 = 1200;
pub const DEFAULT_CHART_HEIGHT: u32 = 600;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

const SECONDS_PER_HOUR: i32 = 3600;

#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub reports_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Offset used for the generation timestamp and time-axis labels.
    pub utc_offset: FixedOffset,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            utc_offset: utc_offset_from_hours(DEFAULT_UTC_OFFSET_HOURS)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl ChartSettings {
    #[must_use]
    pub fn chart_path(&self, exchange: &str) -> PathBuf {
        self.reports_dir
            .join(format!("{}_latency_report.png", exchange))
    }
}

/// `None` when the offset is outside what a fixed offset can hold.
#[must_use]
pub fn utc_offset_from_hours(hours: i32) -> Option<FixedOffset> {
    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(FixedOffset::east_opt)
}

/// Renders the latency chart of one exchange and returns its path.
///
/// The file is overwritten on every call.
///
/// # Errors
///
/// Returns `EmptySeries` (no file is created) for an empty series, `Io` when
/// the reports directory cannot be created and `Plot` when drawing fails.
pub fn render_chart(
    exchange: &str,
    series: &LatencySeries,
    stats: &LatencyStatistics,
    settings: &ChartSettings,
) -> Result<PathBuf, ReportError> {
    if series.is_empty() {
        return Err(ReportError::EmptySeries {
            exchange: exchange.to_owned(),
        });
    }

    fs::create_dir_all(&settings.reports_dir).map_err(|source| ReportError::Io {
        path: settings.reports_dir.clone(),
        source,
    })?;

    let path = settings.chart_path(exchange);
    let generated_at = Utc::now().with_timezone(&settings.utc_offset);
    draw_latency_chart(&path, exchange, series, stats, settings, generated_at).map_err(
        |err| ReportError::Plot {
            path: path.clone(),
            message: err.to_string(),
        },
    )?;

    info!("Chart for {} written to {}", exchange, path.display());
    Ok(path)
}

fn draw_latency_chart(
    path: &Path,
    exchange: &str,
    series: &LatencySeries,
    stats: &LatencyStatistics,
    settings: &ChartSettings,
    generated_at: DateTime<FixedOffset>,
) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(i64, f64)> = series
        .iter()
        .map(|sample| (sample.timestamp, sample.latency_ms))
        .collect();

    let x_min = points.first().map_or(0, |(x, _)| *x);
    let mut x_max = points.last().map_or(0, |(x, _)| *x);
    if x_max <= x_min {
        x_max = x_min.saturating_add(60);
    }
    let y_top = stats.max.max(stats.tail.value_ms).max(1.0) * 1.15;

    let root = BitMapBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!(
        "{} API Latency Report (Generated at {})",
        exchange.to_uppercase(),
        generated_at.format("%Y-%m-%d %H:%M:%S %:z")
    );
    let offset = settings.utc_offset;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_top)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Latency (ms)")
        .x_labels(8)
        .y_labels(10)
        .x_label_formatter(&|ts| axis_time_label(*ts, offset))
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("Latency")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], &BLUE));
    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(
            vec![(x_min, stats.mean), (x_max, stats.mean)],
            RED.stroke_width(2),
        ))?
        .label(format!("Mean: {:.2} ms", stats.mean))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], &RED));

    chart
        .draw_series(LineSeries::new(
            vec![(x_min, stats.tail.value_ms), (x_max, stats.tail.value_ms)],
            GREEN.stroke_width(2),
        ))?
        .label(format!(
            "P{}: {:.2} ms",
            stats.tail.percentile, stats.tail.value_ms
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], &GREEN));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(&BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    draw_stats_box(&root, stats, settings.width)?;

    root.present()?;
    Ok(())
}

fn draw_stats_box(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    stats: &LatencyStatistics,
    width: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let lines = [
        format!("Samples: {}", stats.count),
        format!("Mean: {:.2} ms", stats.mean),
        format!("P{}: {:.2} ms", stats.tail.percentile, stats.tail.value_ms),
        format!("Min/Max: {:.2} / {:.2} ms", stats.min, stats.max),
    ];

    let right = i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(30);
    let left = right.saturating_sub(230);
    let top = 60i32;
    let mut bottom = top.saturating_add(10);
    for _ in &lines {
        bottom = bottom.saturating_add(22);
    }

    root.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        WHITE.mix(0.85).filled(),
    ))?;
    root.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    let mut y = top.saturating_add(8);
    for line in lines {
        root.draw(&Text::new(
            line,
            (left.saturating_add(10), y),
            ("sans-serif", 16).into_font(),
        ))?;
        y = y.saturating_add(22);
    }
    Ok(())
}

fn axis_time_label(timestamp: i64, offset: FixedOffset) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|datetime| {
            datetime
                .with_timezone(&offset)
                .format("%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default()
}
