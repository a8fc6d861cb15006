use std::ops::Range;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::models::{Candle, ChartRequest, TrendLine};
use crate::utils::{format_price_label, log_axis_ticks, price_range, St13Error};

const X_LABEL_AREA: u32 = 60;
const Y_LABEL_AREA: u32 = 70;
const MARGIN: u32 = 15;
const MAX_BODY_WIDTH: u32 = 15;
const TREND_LINE_WIDTH: u32 = 2;

fn render_err<E: std::fmt::Display>(what: &str, e: E) -> St13Error {
    St13Error::Render(format!("{}: {}", what, e))
}

/// Candle body width in pixels for `count` candles on a `width` pixel image
pub fn candle_body_width(count: usize, width: u32) -> u32 {
    let plot_width = width.saturating_sub(Y_LABEL_AREA + 2 * MARGIN) as f64;
    let slot = plot_width / count.max(1) as f64;
    ((slot * 0.7) as u32).clamp(1, MAX_BODY_WIDTH)
}

/// Date range with one candle spacing of padding on each side
pub fn date_range(candles: &[Candle]) -> Option<Range<NaiveDate>> {
    let first = candles.first()?.date;
    let last = candles.last()?.date;

    let span = (last - first).num_days();
    let spacing = if candles.len() > 1 {
        (span / (candles.len() as i64 - 1)).max(1)
    } else {
        1
    };

    Some(first - Duration::days(spacing)..last + Duration::days(spacing))
}

/// Endpoints of a trend line clipped to the visible dates
pub fn trend_line_segment(
    line: &TrendLine,
    dates: &Range<NaiveDate>,
) -> Option<[(NaiveDate, f64); 2]> {
    let (from, to) = match *line {
        TrendLine::Horizontal { .. } => (dates.start, dates.end),
        TrendLine::Sloped { start, end, .. } => (start.max(dates.start), end.min(dates.end)),
    };

    if from >= to {
        return None;
    }

    Some([(from, line.price_at(from)), (to, line.price_at(to))])
}

/// Price range covering the candles and every visible trend line
fn visible_price_range(
    candles: &[Candle],
    segments: &[[(NaiveDate, f64); 2]],
) -> Option<(f64, f64)> {
    let (mut y_min, mut y_max) = price_range(candles)?;
    for (_, price) in segments.iter().flatten() {
        y_min = y_min.min(price * 0.9);
        y_max = y_max.max(price * 1.1);
    }
    Some((y_min, y_max))
}

/// Render a candlestick chart with a logarithmic price axis to a PNG file
pub fn render_chart(
    candles: &[Candle],
    request: &ChartRequest,
    path: &Path,
) -> Result<(), St13Error> {
    let dates = date_range(candles).ok_or(St13Error::NoValidData)?;

    if candles.iter().any(|c| c.low <= 0.0) {
        return Err(St13Error::Render(
            "Prices must be positive on a logarithmic axis".to_string(),
        ));
    }

    let segments: Vec<[(NaiveDate, f64); 2]> = request
        .trend_lines
        .iter()
        .filter_map(|line| trend_line_segment(line, &dates))
        .collect();
    if segments.len() < request.trend_lines.len() {
        info!(
            "{} trend line(s) fall outside the charted dates",
            request.trend_lines.len() - segments.len()
        );
    }

    let (y_min, y_max) = visible_price_range(candles, &segments).ok_or(St13Error::NoValidData)?;

    let mut ticks = log_axis_ticks(y_min, y_max);
    if ticks.is_empty() {
        // range narrower than any round level
        ticks.push((y_min * y_max).sqrt());
    }
    debug!("Price axis {:.4}..{:.4} with ticks {:?}", y_min, y_max, ticks);

    let body_width = candle_body_width(candles.len(), request.width);

    {
        let backend = BitMapBackend::new(path, (request.width, request.height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| render_err("Failed to fill canvas", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(request.caption(), ("sans-serif", 32.0).into_font())
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(dates, (y_min..y_max).log_scale().with_key_points(ticks))
            .map_err(|e| render_err("Failed to build chart", e))?;

        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y %b").to_string())
            .y_label_formatter(&|p: &f64| format_price_label(*p))
            .light_line_style(WHITE)
            .draw()
            .map_err(|e| render_err("Failed to draw mesh", e))?;

        chart
            .draw_series(candles.iter().map(|c| {
                CandleStick::new(
                    c.date,
                    c.open,
                    c.high,
                    c.low,
                    c.close,
                    GREEN.filled(),
                    RED.filled(),
                    body_width,
                )
            }))
            .map_err(|e| render_err("Failed to draw candles", e))?;

        for segment in &segments {
            chart
                .draw_series(LineSeries::new(
                    segment.iter().copied(),
                    RED.stroke_width(TREND_LINE_WIDTH),
                ))
                .map_err(|e| render_err("Failed to draw trend line", e))?;
        }

        root.present()
            .map_err(|e| render_err("Failed to render chart", e))?;
    }

    info!(
        "Rendered {} candles and {} trend line(s) to {}",
        candles.len(),
        segments.len(),
        path.display()
    );
    Ok(())
}
