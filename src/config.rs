//! topseries configuration persistence (htoprc-style key=value format)
//!
//! Saves/loads settings to `$XDG_CONFIG_HOME/topseries/topseriesrc`
//! (or `~/.config/topseries/topseriesrc`).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::color_scheme::ColorSchemeId;
use crate::error::{Result, TopSeriesError};
use crate::series::{SkipRules, DEFAULT_SAMPLING_INTERVAL};

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("topseries").join("topseriesrc"))
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq)]
pub struct TopSeriesConfig {
    // Inputs
    pub sampling_interval: f64,
    pub input_dir: PathBuf,
    pub raw_file: String,
    pub table_file: String,
    pub skip_prefixes: Vec<String>,

    // Viewer
    pub highlight: Vec<String>,
    pub window_start: usize,
    pub window_len: usize, // 0 = all rows
    pub color_scheme_id: ColorSchemeId,
}

impl Default for TopSeriesConfig {
    fn default() -> Self {
        Self {
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            input_dir: PathBuf::from("Input"),
            raw_file: "top.txt".to_string(),
            table_file: "top.csv".to_string(),
            skip_prefixes: Vec::new(),
            highlight: Vec::new(),
            window_start: 0,
            window_len: 0,
            color_scheme_id: ColorSchemeId::Default,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl TopSeriesConfig {
    /// Load config from file, returning defaults if file doesn't exist
    pub fn load() -> Self {
        match config_path() {
            Some(p) => Self::load_from(&p),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "sampling_interval" => match value.parse::<f64>() {
                        Ok(v) if v.is_finite() && v > 0.0 => cfg.sampling_interval = v,
                        _ => warn!(value, "ignoring invalid sampling_interval"),
                    },
                    "input_dir" => cfg.input_dir = PathBuf::from(value),
                    "raw_file" => cfg.raw_file = value.to_string(),
                    "table_file" => cfg.table_file = value.to_string(),
                    "skip_prefixes" => cfg.skip_prefixes = split_list(value),
                    "highlight" => cfg.highlight = split_list(value),
                    "window_start" => match value.parse::<usize>() {
                        Ok(v) => cfg.window_start = v,
                        Err(_) => warn!(value, "ignoring invalid window_start"),
                    },
                    "window_len" => match value.parse::<usize>() {
                        Ok(v) => cfg.window_len = v,
                        Err(_) => warn!(value, "ignoring invalid window_len"),
                    },
                    "color_scheme" => match value.parse::<usize>() {
                        Ok(idx) if idx < ColorSchemeId::all().len() => {
                            cfg.color_scheme_id = ColorSchemeId::from_index(idx)
                        }
                        _ => warn!(value, "ignoring invalid color_scheme"),
                    },
                    _ => {} // Ignore unknown keys
                }
            }
        }

        cfg
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# topseries configuration file".to_string());
        lines.push(String::new());
        lines.push(format!("sampling_interval={}", self.sampling_interval));
        lines.push(format!("input_dir={}", self.input_dir.display()));
        lines.push(format!("raw_file={}", self.raw_file));
        lines.push(format!("table_file={}", self.table_file));
        lines.push(format!("skip_prefixes={}", self.skip_prefixes.join(",")));
        lines.push(format!("highlight={}", self.highlight.join(",")));
        lines.push(format!("window_start={}", self.window_start));
        lines.push(format!("window_len={}", self.window_len));
        lines.push(format!("color_scheme={}", self.color_scheme_id as usize));
        lines.join("\n") + "\n"
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path().ok_or_else(|| {
            TopSeriesError::MissingDirectory(PathBuf::from("$XDG_CONFIG_HOME or $HOME"))
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TopSeriesError::io(parent, e))?;
        }
        let mut file = fs::File::create(path).map_err(|e| TopSeriesError::io(path, e))?;
        file.write_all(self.render().as_bytes())
            .map_err(|e| TopSeriesError::io(path, e))?;
        Ok(())
    }

    pub fn raw_path(&self) -> PathBuf {
        self.input_dir.join(&self.raw_file)
    }

    pub fn table_path(&self) -> PathBuf {
        self.input_dir.join(&self.table_file)
    }

    pub fn skip_rules(&self) -> SkipRules {
        SkipRules::new(self.skip_prefixes.iter().cloned())
    }

    /// Viewer settings from current App state
    pub fn capture_view(&mut self, app: &crate::app::App) {
        self.highlight = app.highlighted.clone();
        self.window_start = app.window_start;
        self.window_len = app.window_len;
        self.color_scheme_id = app.color_scheme_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_keys() {
        let cfg = TopSeriesConfig::parse(
            "# comment\n\
             sampling_interval = 0.5\n\
             input_dir=/data/runs\n\
             highlight=worker, bash,,\n\
             skip_prefixes=MiB Mem,MiB Swap\n\
             window_start=10\n\
             window_len=40\n\
             color_scheme=1\n\
             mystery=1\n",
        );
        assert_eq!(cfg.sampling_interval, 0.5);
        assert_eq!(cfg.input_dir, PathBuf::from("/data/runs"));
        assert_eq!(cfg.highlight, vec!["worker".to_string(), "bash".to_string()]);
        assert_eq!(cfg.skip_prefixes.len(), 2);
        assert_eq!(cfg.window_start, 10);
        assert_eq!(cfg.window_len, 40);
        assert_eq!(cfg.color_scheme_id, ColorSchemeId::Monochrome);
        assert_eq!(cfg.raw_path(), PathBuf::from("/data/runs/top.txt"));
    }

    #[test]
    fn invalid_interval_keeps_default() {
        let cfg = TopSeriesConfig::parse("sampling_interval=-2\n");
        assert_eq!(cfg.sampling_interval, DEFAULT_SAMPLING_INTERVAL);
        let cfg = TopSeriesConfig::parse("sampling_interval=abc\n");
        assert_eq!(cfg.sampling_interval, DEFAULT_SAMPLING_INTERVAL);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("topseriesrc");
        let mut cfg = TopSeriesConfig::default();
        cfg.highlight = vec!["worker".into()];
        cfg.window_len = 25;
        cfg.save_to(&path).unwrap();
        assert_eq!(TopSeriesConfig::load_from(&path), cfg);
    }

    #[test]
    fn invalid_view_values_keep_defaults() {
        let cfg = TopSeriesConfig::parse(
            "window_start=-1\n\
             window_len=lots\n\
             color_scheme=7\n",
        );
        let defaults = TopSeriesConfig::default();
        assert_eq!(cfg.window_start, defaults.window_start);
        assert_eq!(cfg.window_len, defaults.window_len);
        assert_eq!(cfg.color_scheme_id, defaults.color_scheme_id);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            TopSeriesConfig::load_from(&dir.path().join("absent")),
            TopSeriesConfig::default()
        );
    }
}
