use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, AppMode};

/// Key definitions: (key_label, description)
const FKEYS_NORMAL: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("Tab", "Metric"),
    ("Spc", "Mark  "),
    ("←→", "Pan   "),
    ("+-", "Zoom  "),
    ("c", "Colors"),
    ("w", "Save  "),
    ("F10", "Quit "),
];

const FKEYS_HELP: &[(&str, &str)] = &[
    ("Esc", "Close "),
    ("F10", "Quit "),
];

/// Draw the bottom key bar (htop styling: key on cyan, label on dark)
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;

    // Full-width background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(cs.footer_label_bg)),
        area,
    );

    let fkeys = match app.mode {
        AppMode::Help => FKEYS_HELP,
        AppMode::Normal => FKEYS_NORMAL,
    };

    let mut spans: Vec<Span> = Vec::new();
    for (key, desc) in fkeys {
        spans.push(Span::styled(key.to_string(), cs.footer_key_style()));
        spans.push(Span::styled(desc.to_string(), cs.footer_label_style()));
    }

    // Transient status message, right after the key bar
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  {}", status), cs.footer_label_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
