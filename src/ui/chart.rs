//! Draws a [`ChartModel`] with ratatui's line chart.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::chart::ChartModel;
use crate::error::FundviewError;

/// Smallest area a chart is drawn into, borders included.
pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 8;

const Y_TICKS: usize = 5;

/// Render `model` into `area`, with a vertical marker at `cursor`.
///
/// Returns [`FundviewError::MissingDrawArea`] without drawing anything when
/// the area is too small to hold a chart.
pub fn render_chart(
    f: &mut Frame,
    area: Rect,
    model: &ChartModel,
    cursor: Option<usize>,
) -> Result<(), FundviewError> {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        return Err(FundviewError::MissingDrawArea(format!(
            "chart needs at least {}x{}, got {}x{}",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Financial Chart ");

    if model.is_empty() {
        let empty = Paragraph::new("  No data for the selected metrics")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return Ok(());
    }

    let scale = model.scale;
    let points: Vec<Vec<(f64, f64)>> = model
        .datasets
        .iter()
        .map(|dataset| {
            dataset
                .data
                .iter()
                .enumerate()
                .filter_map(|(idx, value)| value.map(|v| (idx as f64, scale.apply(v))))
                .collect()
        })
        .collect();

    let (y_min, y_max) = model.y_bounds();
    let (y_min, y_max) = (scale.apply(y_min), scale.apply(y_max));
    let x_max = model.labels.len().saturating_sub(1).max(1) as f64;

    let marker: Vec<(f64, f64)> = cursor
        .filter(|idx| *idx < model.labels.len())
        .map(|idx| vec![(idx as f64, y_min), (idx as f64, y_max)])
        .unwrap_or_default();

    let mut datasets: Vec<Dataset> = model
        .datasets
        .iter()
        .zip(points.iter())
        .map(|(dataset, data)| {
            let (r, g, b) = dataset.color;
            Dataset::default()
                .name(dataset.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
                .data(data)
        })
        .collect();

    if !marker.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(&marker),
        );
    }

    let y_labels: Vec<Span> = model
        .y_ticks(Y_TICKS)
        .into_iter()
        .map(|tick| Span::raw(model.tick_label(tick)))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(model.x_title())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels(model)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    model.y_title(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
    Ok(())
}

/// First, middle and last date labels.
fn x_labels(model: &ChartModel) -> Vec<Span<'static>> {
    let len = model.labels.len();
    let mut picks = vec![0, len / 2, len.saturating_sub(1)];
    picks.dedup();
    picks
        .into_iter()
        .filter_map(|idx| model.x_label(idx))
        .map(Span::raw)
        .collect()
}
