use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::series::Metric;

/// Draw the metric tab bar ("CPU" and "MEM")
/// Active tab uses the scheme's active colors, inactive is dimmed
pub fn draw_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let bar_bg = Style::default().bg(cs.tab_inactive_bg);

    // Background fill
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(Paragraph::new(bg_fill).style(bar_bg), area);

    let active_style = Style::default()
        .fg(cs.tab_active_fg)
        .bg(cs.tab_active_bg)
        .add_modifier(Modifier::BOLD);
    let inactive_style = Style::default().fg(cs.tab_inactive_fg).bg(cs.tab_inactive_bg);

    let mut spans = vec![Span::styled(" ", bar_bg)];
    for metric in Metric::all() {
        let style = if *metric == app.active_metric { active_style } else { inactive_style };
        let count = match metric {
            Metric::Cpu => app.cpu.columns().len(),
            Metric::Mem => app.mem.columns().len(),
        };
        spans.push(Span::styled(format!(" {} ({}) ", metric.label(), count), style));
        spans.push(Span::styled(" ", bar_bg));
    }
    spans.push(Span::styled(" (Tab to switch)", inactive_style));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
