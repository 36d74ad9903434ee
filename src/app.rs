use std::ops::Range;

use chrono::NaiveTime;

use crate::color_scheme::{ColorScheme, ColorSchemeId};
use crate::config::TopSeriesConfig;
use crate::error::Result;
use crate::series::{Metric, MetricTable, StackedView};

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Viewer state over one consolidated capture
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    /// Set by `w`; the main loop persists the config and clears it
    pub save_requested: bool,
    pub status: Option<String>,

    // Data
    pub cpu: MetricTable,
    pub mem: MetricTable,
    pub source_label: String,
    pub interval: f64,
    pub banner_clocks: Vec<NaiveTime>,

    pub active_metric: Metric,

    // Legend list state
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,

    // Display names drawn as their own layer; everything else is "Other"
    pub highlighted: Vec<String>,

    // Row window
    pub window_start: usize,
    pub window_len: usize, // 0 = all rows

    // Color scheme
    pub color_scheme_id: ColorSchemeId,
    pub color_scheme: ColorScheme,
}

impl App {
    pub fn new(cpu: MetricTable, mem: MetricTable, interval: f64) -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,
            save_requested: false,
            status: None,

            cpu,
            mem,
            source_label: String::new(),
            interval,
            banner_clocks: Vec::new(),

            active_metric: Metric::Cpu,

            selected_index: 0,
            scroll_offset: 0,
            visible_rows: 20,

            highlighted: Vec::new(),

            window_start: 0,
            window_len: 0,

            color_scheme_id: ColorSchemeId::Default,
            color_scheme: ColorScheme::from_id(ColorSchemeId::Default),
        }
    }

    /// Apply loaded config to App state
    pub fn apply_config(&mut self, cfg: &TopSeriesConfig) {
        self.highlighted = cfg.highlight.clone();
        self.window_start = cfg.window_start;
        self.window_len = cfg.window_len;
        self.set_color_scheme(cfg.color_scheme_id);
        self.clamp_window();
    }

    pub fn table(&self) -> &MetricTable {
        match self.active_metric {
            Metric::Cpu => &self.cpu,
            Metric::Mem => &self.mem,
        }
    }

    /// Spacing of the loaded time axis. A reloaded table carries its own
    /// axis, which need not match the configured interval.
    pub fn effective_interval(&self) -> f64 {
        match self.table().time_axis() {
            [a, b, ..] => b - a,
            _ => self.interval,
        }
    }

    pub fn rows(&self) -> usize {
        self.table().rows()
    }

    pub fn columns(&self) -> &[String] {
        self.table().columns()
    }

    pub fn selected_column(&self) -> Option<&str> {
        self.columns().get(self.selected_index).map(String::as_str)
    }

    pub fn is_highlighted(&self, name: &str) -> bool {
        self.highlighted.iter().any(|h| h == name)
    }

    /// Highlighted names present in the active table, in highlight order.
    /// A name can exist in one metric and have been filtered out of the other.
    pub fn active_highlights(&self) -> Vec<String> {
        let table = self.table();
        self.highlighted
            .iter()
            .filter(|h| table.column(h).is_some())
            .cloned()
            .collect()
    }

    pub fn switch_metric(&mut self) {
        self.active_metric = match self.active_metric {
            Metric::Cpu => Metric::Mem,
            Metric::Mem => Metric::Cpu,
        };
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn toggle_highlight(&mut self) {
        let Some(name) = self.selected_column().map(String::from) else {
            return;
        };
        if let Some(pos) = self.highlighted.iter().position(|h| *h == name) {
            self.highlighted.remove(pos);
        } else {
            self.highlighted.push(name);
        }
    }

    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    pub fn set_color_scheme(&mut self, id: ColorSchemeId) {
        self.color_scheme_id = id;
        self.color_scheme = ColorScheme::from_id(id);
    }

    pub fn cycle_color_scheme(&mut self) {
        self.set_color_scheme(self.color_scheme_id.next());
    }

    // ── Row window ──────────────────────────────────────────────────────

    pub fn window(&self) -> Range<usize> {
        let rows = self.rows();
        let start = self.window_start.min(rows);
        let end = if self.window_len == 0 {
            rows
        } else {
            (start + self.window_len).min(rows)
        };
        start..end
    }

    fn effective_len(&self) -> usize {
        let w = self.window();
        w.end - w.start
    }

    fn pan_step(&self) -> usize {
        (self.effective_len() / 10).max(1)
    }

    fn clamp_window(&mut self) {
        let rows = self.rows();
        if self.window_len >= rows {
            self.window_len = 0;
        }
        let len = if self.window_len == 0 { rows } else { self.window_len };
        self.window_start = self.window_start.min(rows.saturating_sub(len));
    }

    pub fn pan_left(&mut self) {
        self.window_start = self.window_start.saturating_sub(self.pan_step());
    }

    pub fn pan_right(&mut self) {
        let step = self.pan_step();
        self.window_start += step;
        self.clamp_window();
    }

    /// Halve the window around its start
    pub fn zoom_in(&mut self) {
        let len = self.effective_len();
        if len > 2 {
            self.window_len = len / 2;
        }
        self.clamp_window();
    }

    pub fn zoom_out(&mut self) {
        if self.window_len != 0 {
            self.window_len *= 2;
        }
        self.clamp_window();
    }

    pub fn reset_window(&mut self) {
        self.window_start = 0;
        self.window_len = 0;
    }

    pub fn stacked_view(&self) -> Result<StackedView> {
        StackedView::build(self.table(), &self.active_highlights(), self.window())
    }

    // ── Legend navigation ───────────────────────────────────────────────

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.ensure_visible();
        }
    }

    pub fn select_next(&mut self) {
        let len = self.columns().len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
            self.ensure_visible();
        }
    }

    pub fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(self.visible_rows);
        self.ensure_visible();
    }

    pub fn page_down(&mut self) {
        let len = self.columns().len();
        if len > 0 {
            self.selected_index = (self.selected_index + self.visible_rows).min(len - 1);
            self.ensure_visible();
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.columns().len();
        if len > 0 {
            self.selected_index = len - 1;
            self.ensure_visible();
        }
    }

    /// Keep the selection inside the scrolled legend
    pub fn ensure_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.visible_rows > 0
            && self.selected_index >= self.scroll_offset + self.visible_rows
        {
            self.scroll_offset = self.selected_index + 1 - self.visible_rows;
        }
    }
}
