pub mod chart;
pub mod footer;
pub mod header;
pub mod help;
pub mod legend;
pub mod tab_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, AppMode};

/// Legend rows available for a terminal of `height` rows
pub fn legend_rows(height: u16) -> usize {
    // header + tab bar + footer + legend borders
    height.saturating_sub(header::HEADER_HEIGHT + 1 + 1 + 2).max(1) as usize
}

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEADER_HEIGHT), // capture summary
            Constraint::Length(1),                     // CPU / MEM tabs
            Constraint::Min(5),                        // chart + legend
            Constraint::Length(1),                     // footer (key bar)
        ])
        .split(size);

    header::draw_header(f, app, chunks[0]);
    tab_bar::draw_tab_bar(f, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(legend::LEGEND_WIDTH)])
        .split(chunks[2]);
    chart::draw_chart(f, app, body[0]);
    legend::draw_legend(f, app, body[1]);

    footer::draw_footer(f, app, chunks[3]);

    // Overlay popups
    if app.mode == AppMode::Help {
        help::draw_help(f, app);
    }
}
