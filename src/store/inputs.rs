use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use tracing::info;

use crate::error::{Result, TopSeriesError, WriteOutcome};
use crate::series::{Consolidator, MetricTable, SkipRules, SnapshotParser};
use crate::store::table_file;
use crate::store::write_new::write_new;

/// Where a pair of tables came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Raw(PathBuf),
    Table(PathBuf),
}

impl InputSource {
    pub fn path(&self) -> &Path {
        match self {
            InputSource::Raw(p) | InputSource::Table(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub source: InputSource,
    pub cpu: MetricTable,
    pub mem: MetricTable,
    /// Empty when reloaded from a table file
    pub banner_clocks: Vec<NaiveTime>,
}

/// Files directly inside `dir`, sorted by path.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TopSeriesError::MissingDirectory(dir.to_path_buf()));
    }
    let mut files = fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<Vec<PathBuf>>>()
        })
        .map_err(|e| TopSeriesError::io(dir, e))?;
    files.sort();
    Ok(files)
}

/// Prefer the raw capture, fall back to a persisted table.
pub fn load_tables(
    raw: &Path,
    table: &Path,
    parser: &SnapshotParser,
    consolidator: &Consolidator,
) -> Result<LoadedTables> {
    if raw.is_file() {
        let parsed = parser.parse_file(raw)?;
        let (cpu, mem) = consolidator.consolidate_parsed(&parsed)?;
        return Ok(LoadedTables {
            source: InputSource::Raw(raw.to_path_buf()),
            cpu,
            mem,
            banner_clocks: parsed.banner_clocks,
        });
    }
    if table.is_file() {
        info!(path = %table.display(), "no raw capture, reloading table");
        let (cpu, mem) = table_file::reload(table)?.split()?;
        return Ok(LoadedTables {
            source: InputSource::Table(table.to_path_buf()),
            cpu,
            mem,
            banner_clocks: Vec::new(),
        });
    }
    Err(TopSeriesError::MissingInput {
        raw: raw.to_path_buf(),
        table: table.to_path_buf(),
    })
}

/// Copy `src` to `dst` without summary blocks, blank lines or leading
/// indentation, leaving only column headers and process rows.
pub fn strip_headers(src: &Path, dst: &Path, rules: &SkipRules) -> Result<WriteOutcome> {
    rewrite_lines(src, dst, |line| {
        if rules.skips(line) {
            None
        } else {
            Some(line.trim_start_matches(' '))
        }
    })
}

/// Copy only the lines of `src` mentioning `process`.
pub fn filter_process(src: &Path, dst: &Path, process: &str) -> Result<WriteOutcome> {
    rewrite_lines(src, dst, |line| line.contains(process).then_some(line))
}

fn rewrite_lines<F>(src: &Path, dst: &Path, mut keep: F) -> Result<WriteOutcome>
where
    F: FnMut(&str) -> Option<&str>,
{
    let input = File::open(src).map_err(|e| TopSeriesError::io(src, e))?;
    let mut kept = 0usize;
    let outcome = write_new(dst, |staged| {
        let mut writer = BufWriter::new(staged);
        for line in BufReader::new(input).lines() {
            let line = line.map_err(|e| TopSeriesError::io(src, e))?;
            if let Some(out) = keep(&line) {
                writeln!(writer, "{}", out).map_err(|e| TopSeriesError::io(dst, e))?;
                kept += 1;
            }
        }
        writer.flush().map_err(|e| TopSeriesError::io(dst, e))
    })?;

    if outcome.was_written() {
        info!(src = %src.display(), dst = %dst.display(), kept, "lines rewritten");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = "top - 10:00:00 up 1 day\n\
                           Tasks: 2 total\n\
                           \n\
                           \x20 PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND\n\
                           \x20 100 root 20 0 1 1 1 S 1.5 3.0 0:00.01 worker\n\
                           \x20 200 root 20 0 1 1 1 S 0.0 0.5 0:00.01 sshd\n";

    #[test]
    fn strip_keeps_rows_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("top.txt");
        let dst = dir.path().join("clean.txt");
        fs::write(&src, CAPTURE).unwrap();

        let outcome = strip_headers(&src, &dst, &SkipRules::default()).unwrap();
        assert!(outcome.was_written());
        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND\n\
             100 root 20 0 1 1 1 S 1.5 3.0 0:00.01 worker\n\
             200 root 20 0 1 1 1 S 0.0 0.5 0:00.01 sshd\n"
        );

        // No clobbering on a second run.
        fs::write(&src, "changed").unwrap();
        let again = strip_headers(&src, &dst, &SkipRules::default()).unwrap();
        assert_eq!(again, WriteOutcome::AlreadyExists(dst.clone()));
    }

    #[test]
    fn failed_strip_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("top.txt");
        let dst = dir.path().join("clean.txt");
        let mut bytes = b"  100 root 20 0 1 1 1 S 1.5 3.0 0:00.01 worker\n".to_vec();
        bytes.extend_from_slice(b"  200 root 20 0 1 1 1 S 0.0 0.5 0:00.01 \xff\n");
        fs::write(&src, &bytes).unwrap();

        let err = strip_headers(&src, &dst, &SkipRules::default()).unwrap_err();
        assert!(matches!(err, TopSeriesError::Io { .. }));
        assert!(!dst.exists());

        fs::write(&src, CAPTURE).unwrap();
        let outcome = strip_headers(&src, &dst, &SkipRules::default()).unwrap();
        assert_eq!(outcome, WriteOutcome::Written(dst.clone()));
        assert!(fs::read_to_string(&dst).unwrap().ends_with("sshd\n"));
    }

    #[test]
    fn filter_keeps_matching_lines() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("top.txt");
        let dst = dir.path().join("worker.txt");
        fs::write(&src, CAPTURE).unwrap();

        filter_process(&src, &dst, "worker").unwrap();
        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "  100 root 20 0 1 1 1 S 1.5 3.0 0:00.01 worker\n"
        );
    }

    #[test]
    fn list_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.zip"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.zip", "b.txt", "c"]);
    }

    #[test]
    fn list_files_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_files(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TopSeriesError::MissingDirectory(_)));
    }

    #[test]
    fn load_prefers_raw_then_table_then_fails() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("top.txt");
        let table = dir.path().join("top.csv");
        let parser = SnapshotParser::default();
        let consolidator = Consolidator::default();

        let err = load_tables(&raw, &table, &parser, &consolidator).unwrap_err();
        assert!(matches!(err, TopSeriesError::MissingInput { .. }));

        fs::write(&raw, CAPTURE).unwrap();
        let loaded = load_tables(&raw, &table, &parser, &consolidator).unwrap();
        assert_eq!(loaded.source, InputSource::Raw(raw.clone()));
        assert_eq!(loaded.cpu.columns(), &["worker".to_string()]);
        assert_eq!(loaded.mem.columns().len(), 2);
        assert_eq!(loaded.banner_clocks.len(), 1);
    }
}
