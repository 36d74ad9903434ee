use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use crate::app::App;
use crate::series::OTHER_LABEL;

/// Draw the stacked chart for the active metric and window.
///
/// Layers are cumulative, so each one is drawn as filled bars up to its
/// running total, tallest first; lower layers paint over the taller ones
/// and every band keeps its own color.
pub fn draw_chart(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let title = format!(" {}% stacked ", app.active_metric.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(cs.axis));

    let view = match app.stacked_view() {
        Ok(v) => v,
        Err(e) => {
            f.render_widget(Paragraph::new(e.to_string()).block(block), area);
            return;
        }
    };
    if view.is_empty() {
        f.render_widget(Paragraph::new(" no samples").block(block), area);
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = view
        .layers
        .iter()
        .map(|layer| view.time.iter().cloned().zip(layer.upper.iter().cloned()).collect())
        .collect();

    let color_of = |idx: usize, label: &str| -> Color {
        if idx == 0 && label == OTHER_LABEL {
            cs.other_series
        } else {
            cs.series_color(idx.saturating_sub(1))
        }
    };

    let datasets: Vec<Dataset> = view
        .layers
        .iter()
        .enumerate()
        .rev()
        .map(|(idx, layer)| {
            Dataset::default()
                .name(layer.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(color_of(idx, &layer.label)))
                .data(&points[idx])
        })
        .collect();

    let x_min = view.time.first().cloned().unwrap_or(0.0);
    let x_max = view
        .time
        .last()
        .cloned()
        .unwrap_or(0.0)
        .max(x_min + app.effective_interval());
    let y_max = (view.peak() * 1.1).max(1.0);

    let axis_style = Style::default().fg(cs.axis);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("time (s)")
                .style(axis_style)
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{:.1}", x_min)),
                    Span::raw(format!("{:.1}", (x_min + x_max) / 2.0)),
                    Span::raw(format!("{:.1}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_max / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}
