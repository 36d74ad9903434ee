use ratatui::style::{Color, Modifier, Style};

/// Viewer color scheme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSchemeId {
    Default = 0,
    Monochrome = 1,
    LightTerminal = 2,
}

impl ColorSchemeId {
    pub fn all() -> &'static [ColorSchemeId] {
        &[
            ColorSchemeId::Default,
            ColorSchemeId::Monochrome,
            ColorSchemeId::LightTerminal,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorSchemeId::Default => "Default",
            ColorSchemeId::Monochrome => "Monochrome",
            ColorSchemeId::LightTerminal => "Light Terminal",
        }
    }

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => ColorSchemeId::Default,
            1 => ColorSchemeId::Monochrome,
            2 => ColorSchemeId::LightTerminal,
            _ => ColorSchemeId::Default,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index((*self as usize + 1) % Self::all().len())
    }
}

/// Area fill colors for highlighted series, in legend order
const SERIES_PALETTE: &[Color] = &[
    Color::Rgb(0x7b, 0xb2, 0x74),
    Color::Rgb(0xfe, 0xb3, 0x08),
    Color::Rgb(0x37, 0x78, 0xbf),
    Color::Rgb(0x82, 0x5f, 0x87),
    Color::Rgb(0xd9, 0x54, 0x4d),
    Color::Rgb(0xff, 0xff, 0x7e),
    Color::Rgb(0x3b, 0x5b, 0x92),
];

/// All configurable color slots used across the viewer
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub bg: Color,

    // Header info text
    pub info_label: Color,
    pub info_value: Color,

    // Metric tabs
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_fg: Color,
    pub tab_inactive_bg: Color,

    // Chart
    pub axis: Color,
    pub other_series: Color,
    pub palette: Vec<Color>,

    // Legend
    pub legend_fg: Color,
    pub legend_selected_bg: Color,
    pub legend_selected_fg: Color,
    pub legend_marker: Color,

    // Footer
    pub footer_key_fg: Color,
    pub footer_key_bg: Color,
    pub footer_label_fg: Color,
    pub footer_label_bg: Color,

    // Popups
    pub popup_border: Color,
    pub popup_bg: Color,
    pub popup_title: Color,
    pub popup_text: Color,
}

impl ColorScheme {
    pub fn from_id(id: ColorSchemeId) -> Self {
        match id {
            ColorSchemeId::Default => Self::default_scheme(),
            ColorSchemeId::Monochrome => Self::monochrome(),
            ColorSchemeId::LightTerminal => Self::light_terminal(),
        }
    }

    /// Color of the n-th highlighted series (wraps around)
    pub fn series_color(&self, idx: usize) -> Color {
        if self.palette.is_empty() {
            return self.legend_fg;
        }
        self.palette[idx % self.palette.len()]
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default()
            .fg(self.footer_key_fg)
            .bg(self.footer_key_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_label_style(&self) -> Style {
        Style::default().fg(self.footer_label_fg).bg(self.footer_label_bg)
    }

    fn default_scheme() -> Self {
        Self {
            bg: Color::Reset,

            info_label: Color::White,
            info_value: Color::Cyan,

            tab_active_bg: Color::Cyan,
            tab_active_fg: Color::Black,
            tab_inactive_fg: Color::Indexed(252),
            tab_inactive_bg: Color::Indexed(236),

            axis: Color::DarkGray,
            other_series: Color::Rgb(0xa8, 0xa4, 0x95),
            palette: SERIES_PALETTE.to_vec(),

            legend_fg: Color::White,
            legend_selected_bg: Color::Indexed(236),
            legend_selected_fg: Color::White,
            legend_marker: Color::Green,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::Cyan,
            footer_label_fg: Color::Indexed(252),
            footer_label_bg: Color::Indexed(234),

            popup_border: Color::Cyan,
            popup_bg: Color::Black,
            popup_title: Color::Cyan,
            popup_text: Color::White,
        }
    }

    fn monochrome() -> Self {
        Self {
            bg: Color::Reset,

            info_label: Color::White,
            info_value: Color::White,

            tab_active_bg: Color::White,
            tab_active_fg: Color::Black,
            tab_inactive_fg: Color::White,
            tab_inactive_bg: Color::Reset,

            axis: Color::Gray,
            other_series: Color::DarkGray,
            palette: vec![Color::White, Color::Gray],

            legend_fg: Color::White,
            legend_selected_bg: Color::White,
            legend_selected_fg: Color::Black,
            legend_marker: Color::White,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::White,
            footer_label_fg: Color::White,
            footer_label_bg: Color::Reset,

            popup_border: Color::White,
            popup_bg: Color::Reset,
            popup_title: Color::White,
            popup_text: Color::White,
        }
    }

    fn light_terminal() -> Self {
        Self {
            bg: Color::Reset,

            info_label: Color::Black,
            info_value: Color::Blue,

            tab_active_bg: Color::Blue,
            tab_active_fg: Color::White,
            tab_inactive_fg: Color::Black,
            tab_inactive_bg: Color::Indexed(252),

            axis: Color::Gray,
            other_series: Color::Indexed(245),
            palette: SERIES_PALETTE.to_vec(),

            legend_fg: Color::Black,
            legend_selected_bg: Color::Indexed(153),
            legend_selected_fg: Color::Black,
            legend_marker: Color::Blue,

            footer_key_fg: Color::White,
            footer_key_bg: Color::Blue,
            footer_label_fg: Color::Black,
            footer_label_bg: Color::Indexed(252),

            popup_border: Color::Blue,
            popup_bg: Color::White,
            popup_title: Color::Blue,
            popup_text: Color::Black,
        }
    }
}
