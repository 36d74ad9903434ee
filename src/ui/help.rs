use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame, app: &App) {
    let cs = &app.color_scheme;
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let section = Style::default().add_modifier(Modifier::BOLD).fg(cs.popup_title);
    let help_text = vec![
        Line::from(Span::styled(
            " topseries - stacked CPU/MEM history of a top capture ",
            Style::default().fg(cs.popup_title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Processes ", section)),
        Line::from("  ↑/↓/k/j     Move selection up/down"),
        Line::from("  PgUp/PgDn   Page up/down"),
        Line::from("  Home/End    Jump to first/last process"),
        Line::from("  Space       Draw selected process as its own layer"),
        Line::from("  U           Clear all highlighted processes"),
        Line::from(""),
        Line::from(Span::styled(" Chart ", section)),
        Line::from("  Tab         Switch between CPU and MEM"),
        Line::from("  ←/→/h/l     Pan the row window"),
        Line::from("  +/=  -      Zoom in / out"),
        Line::from("  0           Show every row"),
        Line::from(""),
        Line::from(Span::styled(" Other ", section)),
        Line::from("  c           Cycle color scheme"),
        Line::from("  w           Save highlights and window to topseriesrc"),
        Line::from("  F1/?        Show this help"),
        Line::from("  F10/q       Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Everything not highlighted is summed into \"Other\" ",
            Style::default().fg(cs.axis),
        )),
        Line::from(Span::styled(
            " Press Esc or F1 to close ",
            Style::default().fg(cs.axis),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(cs.popup_border)),
        )
        .style(Style::default().fg(cs.popup_text).bg(cs.popup_bg))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
