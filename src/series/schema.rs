/// Fields pulled out of a `top -b` process line.
///
/// top's default batch columns are
/// `PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND`;
/// only four of them feed the time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotField {
    Identity,
    Cpu,
    Mem,
    Name,
}

impl SnapshotField {
    /// Column label as printed in top's header row
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identity => "PID",
            Self::Cpu => "%CPU",
            Self::Mem => "%MEM",
            Self::Name => "COMMAND",
        }
    }

    pub fn all() -> &'static [SnapshotField] {
        &[Self::Identity, Self::Cpu, Self::Mem, Self::Name]
    }
}

/// Token position of each extracted field after whitespace splitting.
const TOP_BATCH_FIELDS: &[(SnapshotField, usize)] = &[
    (SnapshotField::Identity, 0),
    (SnapshotField::Cpu, 8),
    (SnapshotField::Mem, 9),
    (SnapshotField::Name, 11),
];

/// Lines starting with any of these belong to the per-round summary block.
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["top", "Tasks", "%Cpu(s)", "KiB Mem", "KiB Swap"];

/// Fixed-position layout of a process line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<(SnapshotField, usize)>,
}

impl FieldSchema {
    pub fn top_batch() -> Self {
        Self {
            fields: TOP_BATCH_FIELDS.to_vec(),
        }
    }

    pub fn index_of(&self, field: SnapshotField) -> usize {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
            .unwrap_or(0)
    }

    /// A line needs at least this many tokens to carry every field.
    pub fn min_tokens(&self) -> usize {
        self.fields.iter().map(|(_, idx)| idx + 1).max().unwrap_or(0)
    }

    /// True for the repeated column-header row (`PID USER ...`).
    pub fn is_header_row(&self, tokens: &[&str]) -> bool {
        let idx = self.index_of(SnapshotField::Identity);
        tokens.get(idx) == Some(&SnapshotField::Identity.label())
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::top_batch()
    }
}

/// Decides which raw lines carry no process data.
#[derive(Debug, Clone)]
pub struct SkipRules {
    prefixes: Vec<String>,
}

impl SkipRules {
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut prefixes: Vec<String> =
            DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect();
        for p in extra {
            let p = p.into();
            if !p.is_empty() && !prefixes.contains(&p) {
                prefixes.push(p);
            }
        }
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Summary-block lines and blank lines. Prefixes match the raw line, before
    /// any whitespace is stripped, so indented process rows never collide with them.
    pub fn skips(&self, line: &str) -> bool {
        line.trim().is_empty() || self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_batch_positions() {
        let schema = FieldSchema::top_batch();
        assert_eq!(schema.index_of(SnapshotField::Identity), 0);
        assert_eq!(schema.index_of(SnapshotField::Cpu), 8);
        assert_eq!(schema.index_of(SnapshotField::Mem), 9);
        assert_eq!(schema.index_of(SnapshotField::Name), 11);
        assert_eq!(schema.min_tokens(), 12);
    }

    #[test]
    fn header_row_detected_by_identity_label() {
        let schema = FieldSchema::top_batch();
        let header: Vec<&str> = "PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND"
            .split_whitespace()
            .collect();
        assert!(schema.is_header_row(&header));
        assert!(!schema.is_header_row(&["100", "root"]));
    }

    #[test]
    fn summary_lines_and_blanks_are_skipped() {
        let rules = SkipRules::default();
        assert!(rules.skips("top - 10:00:01 up 3 days,  2 users,  load average: 0.00"));
        assert!(rules.skips("Tasks: 200 total,   1 running"));
        assert!(rules.skips("%Cpu(s):  1.0 us,  0.5 sy"));
        assert!(rules.skips("KiB Mem :  8000000 total"));
        assert!(rules.skips("KiB Swap:  2000000 total"));
        assert!(rules.skips("   \t"));
        assert!(rules.skips(""));
        assert!(!rules.skips("  100 root  20 0 1 1 1 S 1.5 3.0 0:00.01 worker"));
    }

    #[test]
    fn extra_prefixes_extend_defaults() {
        let rules = SkipRules::new(["MiB Mem", "top"]);
        assert_eq!(rules.prefixes().len(), DEFAULT_SKIP_PREFIXES.len() + 1);
        assert!(rules.skips("MiB Mem :  7822.1 total"));
    }
}
