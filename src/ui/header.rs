use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Rows used by the info header
pub const HEADER_HEIGHT: u16 = 3;

/// Capture summary, htop-meter style `Label: value` pairs:
///
///   Source: Input/top.txt
///   Rows: 1200  Interval: 0.1s  Span: 0.0s-119.9s  Clock: 10:00:00-10:02:00
///   Window: 12.0s-24.0s (rows 120..240)  Highlighted: 2
pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let label = Style::default().fg(cs.info_label).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(cs.info_value);

    let time = app.table().time_axis();
    let span = match (time.first(), time.last()) {
        (Some(a), Some(b)) => format!("{:.1}s-{:.1}s", a, b),
        _ => "empty".to_string(),
    };

    let mut second = vec![
        Span::styled("Rows: ", label),
        Span::styled(format!("{}  ", app.rows()), value),
        Span::styled("Interval: ", label),
        Span::styled(format!("{}s  ", app.effective_interval()), value),
        Span::styled("Span: ", label),
        Span::styled(format!("{}  ", span), value),
    ];
    if let (Some(first), Some(last)) = (app.banner_clocks.first(), app.banner_clocks.last()) {
        second.push(Span::styled("Clock: ", label));
        second.push(Span::styled(
            format!("{}-{}", first.format("%H:%M:%S"), last.format("%H:%M:%S")),
            value,
        ));
    }

    let window = app.window();
    let last = window.end.checked_sub(1).and_then(|i| time.get(i));
    let window_text = match (time.get(window.start), last) {
        (Some(a), Some(b)) if !window.is_empty() => {
            format!("{:.1}s-{:.1}s (rows {}..{})  ", a, b, window.start, window.end)
        }
        _ => "none  ".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Source: ", label),
            Span::styled(app.source_label.clone(), value),
        ]),
        Line::from(second),
        Line::from(vec![
            Span::styled("Window: ", label),
            Span::styled(window_text, value),
            Span::styled("Highlighted: ", label),
            Span::styled(app.active_highlights().len().to_string(), value),
        ]),
    ];

    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    f.render_widget(Paragraph::new(lines), inner);
}
