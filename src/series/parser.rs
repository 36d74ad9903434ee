use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveTime;
use tracing::{debug, info};

use crate::error::{Result, TopSeriesError};
use crate::series::schema::{FieldSchema, SkipRules, SnapshotField};

/// Identity -> samples, in round order
pub type SeriesMap = BTreeMap<String, Vec<f64>>;

/// One process row of one sampling round.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLine<'a> {
    pub identity: &'a str,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub display_name: &'a str,
}

/// Everything the parser recovers from a capture.
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshots {
    pub cpu: SeriesMap,
    pub mem: SeriesMap,
    /// First display name seen for each identity
    pub names: HashMap<String, String>,
    /// Wall clock of every `top - HH:MM:SS` banner that parsed
    pub banner_clocks: Vec<NaiveTime>,
    pub data_lines: usize,
}

impl ParsedSnapshots {
    pub fn identity_count(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    fn record(&mut self, line: SnapshotLine<'_>) {
        // Both maps grow together; an identity is new to both or to neither.
        match self.cpu.get_mut(line.identity) {
            Some(cpu) => {
                cpu.push(line.cpu_percent);
                self.mem
                    .entry(line.identity.to_string())
                    .or_default()
                    .push(line.mem_percent);
            }
            None => {
                self.cpu.insert(line.identity.to_string(), vec![line.cpu_percent]);
                self.mem.insert(line.identity.to_string(), vec![line.mem_percent]);
                self.names
                    .entry(line.identity.to_string())
                    .or_insert_with(|| line.display_name.to_string());
            }
        }
        self.data_lines += 1;
    }
}

/// Streams `top -b` output into per-identity CPU and MEM series.
#[derive(Debug, Clone, Default)]
pub struct SnapshotParser {
    schema: FieldSchema,
    skip: SkipRules,
}

impl SnapshotParser {
    pub fn new(schema: FieldSchema, skip: SkipRules) -> Self {
        Self { schema, skip }
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedSnapshots> {
        let file = File::open(path).map_err(|e| TopSeriesError::io(path, e))?;
        info!(path = %path.display(), "parsing top capture");
        self.parse_reader(BufReader::new(file))
            .map_err(|e| match e {
                TopSeriesError::Io { source, .. } => TopSeriesError::io(path, source),
                other => other,
            })
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParsedSnapshots> {
        let mut parsed = ParsedSnapshots::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| TopSeriesError::io("<input>", e))?;
            self.feed(&mut parsed, idx + 1, &line)?;
        }
        self.finish(parsed)
    }

    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ParsedSnapshots>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = ParsedSnapshots::default();
        for (idx, line) in lines.into_iter().enumerate() {
            self.feed(&mut parsed, idx + 1, line.as_ref())?;
        }
        self.finish(parsed)
    }

    pub fn parse_str(&self, text: &str) -> Result<ParsedSnapshots> {
        self.parse_lines(text.lines())
    }

    fn finish(&self, parsed: ParsedSnapshots) -> Result<ParsedSnapshots> {
        debug!(
            identities = parsed.identity_count(),
            data_lines = parsed.data_lines,
            rounds_with_banner = parsed.banner_clocks.len(),
            "capture parsed"
        );
        Ok(parsed)
    }

    fn feed(&self, parsed: &mut ParsedSnapshots, line_no: usize, line: &str) -> Result<()> {
        if self.skip.skips(line) {
            if let Some(clock) = banner_clock(line) {
                parsed.banner_clocks.push(clock);
            }
            return Ok(());
        }
        if let Some(row) = self.extract(line_no, line)? {
            parsed.record(row);
        }
        Ok(())
    }

    /// Pull the schema fields out of one line. `None` for the column-header row.
    pub fn extract<'a>(&self, line_no: usize, line: &'a str) -> Result<Option<SnapshotLine<'a>>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if self.schema.is_header_row(&tokens) {
            return Ok(None);
        }
        if tokens.len() < self.schema.min_tokens() {
            return Err(malformed(
                line_no,
                line,
                format!(
                    "expected at least {} fields, found {}",
                    self.schema.min_tokens(),
                    tokens.len()
                ),
            ));
        }

        let field = |f: SnapshotField| tokens[self.schema.index_of(f)];
        let percent = |f: SnapshotField| -> Result<f64> {
            let raw = field(f);
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
                _ => Err(malformed(
                    line_no,
                    line,
                    format!("{} is not a non-negative number: {:?}", f.label(), raw),
                )),
            }
        };

        Ok(Some(SnapshotLine {
            identity: field(SnapshotField::Identity),
            cpu_percent: percent(SnapshotField::Cpu)?,
            mem_percent: percent(SnapshotField::Mem)?,
            display_name: field(SnapshotField::Name),
        }))
    }
}

fn malformed(line: usize, text: &str, reason: String) -> TopSeriesError {
    TopSeriesError::MalformedLine {
        line,
        reason,
        text: text.to_string(),
    }
}

/// `top - 10:00:01 up 3 days, ...` -> 10:00:01
fn banner_clock(line: &str) -> Option<NaiveTime> {
    let rest = line.strip_prefix("top - ")?;
    let clock = rest.split_whitespace().next()?;
    NaiveTime::parse_from_str(clock, "%H:%M:%S").ok()
}
