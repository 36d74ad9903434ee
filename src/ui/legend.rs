use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;

/// Width of the legend panel including borders
pub const LEGEND_WIDTH: u16 = 34;

/// Column list for the active metric: highlight marker, display name,
/// and mean over the current window.
pub fn draw_legend(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Processes ")
        .border_style(Style::default().fg(cs.axis));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let table = app.table();
    let window = app.window();
    let highlights = app.active_highlights();
    let name_width = (inner.width as usize).saturating_sub(4 + 8);

    let start = app.scroll_offset;
    let end = (start + inner.height as usize).min(table.columns().len());

    let mut lines = Vec::with_capacity(end.saturating_sub(start));
    for idx in start..end {
        let name = &table.columns()[idx];
        let col = table.column(name).unwrap_or(&[]);
        let slice = col.get(window.clone()).unwrap_or(&[]);
        let mean = if slice.is_empty() {
            0.0
        } else {
            slice.iter().sum::<f64>() / slice.len() as f64
        };

        let layer = highlights.iter().position(|h| h == name);
        let marker_style = match layer {
            Some(pos) => Style::default().fg(cs.series_color(pos)).add_modifier(Modifier::BOLD),
            None => Style::default().fg(cs.legend_fg),
        };
        let row_style = if idx == app.selected_index {
            Style::default().fg(cs.legend_selected_fg).bg(cs.legend_selected_bg)
        } else {
            Style::default().fg(cs.legend_fg)
        };

        lines.push(Line::from(vec![
            Span::styled(if layer.is_some() { "[*] " } else { "[ ] " }, marker_style),
            Span::styled(pad_to_width(name, name_width), row_style),
            Span::styled(format!("{:>8.2}", mean), row_style),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " (no active processes)",
            Style::default().fg(cs.axis),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

/// Truncate or pad `s` to exactly `width` terminal cells
pub fn pad_to_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return format!("{}{}", s, " ".repeat(width - s.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    if width > 0 {
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_truncates_by_cell_width() {
        assert_eq!(pad_to_width("bash", 6), "bash  ");
        assert_eq!(pad_to_width("kworker/0:1", 6), "kwork…");
        assert_eq!(pad_to_width("日本語", 5), "日本…");
        assert_eq!(pad_to_width("日本語", 5).width(), 5);
        assert_eq!(pad_to_width("abc", 0), "");
    }
}
