use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, TopSeriesError};
use crate::series::parser::{ParsedSnapshots, SeriesMap};
use crate::series::table::{Metric, MetricTable};

/// Seconds between two top rounds when nothing else is configured
pub const DEFAULT_SAMPLING_INTERVAL: f64 = 0.1;

/// Turns per-identity series into name-keyed, time-aligned tables.
#[derive(Debug, Clone, Copy)]
pub struct Consolidator {
    interval: f64,
}

impl Consolidator {
    pub fn new(interval: f64) -> Result<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(TopSeriesError::InvalidInterval(interval));
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// `t_i = i * interval` for `i` in `[0, rows)`
    pub fn time_axis(&self, rows: usize) -> Vec<f64> {
        (0..rows).map(|i| i as f64 * self.interval).collect()
    }

    pub fn consolidate_parsed(
        &self,
        parsed: &ParsedSnapshots,
    ) -> Result<(MetricTable, MetricTable)> {
        self.consolidate(&parsed.cpu, &parsed.mem, &parsed.names)
    }

    pub fn consolidate(
        &self,
        cpu: &SeriesMap,
        mem: &SeriesMap,
        names: &HashMap<String, String>,
    ) -> Result<(MetricTable, MetricTable)> {
        check_consistent(cpu, mem, names)?;

        // Series that stop early are zero-padded up to the longest one.
        let rows = cpu.values().map(Vec::len).max().unwrap_or(0);
        let time = self.time_axis(rows);

        let cpu_table = build_table(Metric::Cpu, cpu, names, &time)?;
        let mem_table = build_table(Metric::Mem, mem, names, &time)?;
        debug!(
            rows,
            cpu_columns = cpu_table.columns().len(),
            mem_columns = mem_table.columns().len(),
            "consolidated"
        );
        Ok((cpu_table, mem_table))
    }
}

impl Default for Consolidator {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SAMPLING_INTERVAL,
        }
    }
}

fn check_consistent(
    cpu: &SeriesMap,
    mem: &SeriesMap,
    names: &HashMap<String, String>,
) -> Result<()> {
    let only_in = |a: &SeriesMap, b: &SeriesMap| -> Vec<String> {
        a.keys().filter(|k| !b.contains_key(*k)).cloned().collect()
    };
    let only_cpu = only_in(cpu, mem);
    let only_mem = only_in(mem, cpu);
    if !only_cpu.is_empty() || !only_mem.is_empty() {
        return Err(TopSeriesError::Consistency(format!(
            "identities only in CPU: {:?}, only in MEM: {:?}",
            only_cpu, only_mem
        )));
    }
    for (id, series) in cpu {
        let mem_len = mem.get(id).map(Vec::len).unwrap_or(0);
        if series.len() != mem_len {
            return Err(TopSeriesError::Consistency(format!(
                "identity {} has {} CPU samples and {} MEM samples",
                id,
                series.len(),
                mem_len
            )));
        }
        if !names.contains_key(id) {
            return Err(TopSeriesError::Consistency(format!("identity {} has no display name", id)));
        }
    }
    Ok(())
}

fn build_table(
    metric: Metric,
    series: &SeriesMap,
    names: &HashMap<String, String>,
    time: &[f64],
) -> Result<MetricTable> {
    let rows = time.len();
    let mut merged: Vec<(String, Vec<f64>)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut dropped = 0usize;
    let mut collisions = 0usize;

    for (id, samples) in series {
        let mut padded = samples.clone();
        padded.resize(rows, 0.0);
        if mean(&padded) == 0.0 {
            dropped += 1;
            continue;
        }

        let name = names[id].as_str();
        match position.get(name) {
            Some(&idx) => {
                for (acc, v) in merged[idx].1.iter_mut().zip(&padded) {
                    *acc += v;
                }
                collisions += 1;
            }
            None => {
                position.insert(name, merged.len());
                merged.push((name.to_string(), padded));
            }
        }
    }

    if dropped > 0 || collisions > 0 {
        debug!(%metric, dropped, collisions, "filtered idle identities and merged shared names");
    }
    MetricTable::new(metric, time.to_vec(), merged)
}

/// Arithmetic mean; an empty column counts as idle.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: Vec<(&str, Vec<f64>)>) -> SeriesMap {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn names(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(matches!(Consolidator::new(0.0), Err(TopSeriesError::InvalidInterval(_))));
        assert!(Consolidator::new(-1.0).is_err());
        assert!(Consolidator::new(f64::NAN).is_err());
        assert_eq!(Consolidator::new(0.5).unwrap().interval(), 0.5);
    }

    #[test]
    fn shorter_series_padded_with_zero() {
        let cpu = series(vec![("1", vec![1.0, 2.0, 3.0]), ("2", vec![4.0])]);
        let mem = series(vec![("1", vec![1.0, 1.0, 1.0]), ("2", vec![2.0])]);
        let n = names(&[("1", "a"), ("2", "b")]);
        let (c, m) = Consolidator::new(1.0).unwrap().consolidate(&cpu, &mem, &n).unwrap();
        assert_eq!(c.rows(), 3);
        assert_eq!(c.column("b").unwrap(), &[4.0, 0.0, 0.0]);
        assert_eq!(m.column("b").unwrap(), &[2.0, 0.0, 0.0]);
        assert_eq!(c.time_axis(), m.time_axis());
        assert_eq!(c.time_axis(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn diverging_keys_are_inconsistent() {
        let cpu = series(vec![("1", vec![1.0])]);
        let mem = series(vec![("2", vec![1.0])]);
        let n = names(&[("1", "a"), ("2", "b")]);
        let err = Consolidator::default().consolidate(&cpu, &mem, &n).unwrap_err();
        assert!(matches!(err, TopSeriesError::Consistency(_)));
    }

    #[test]
    fn mismatched_lengths_are_inconsistent() {
        let cpu = series(vec![("1", vec![1.0, 2.0])]);
        let mem = series(vec![("1", vec![1.0])]);
        let n = names(&[("1", "a")]);
        assert!(Consolidator::default().consolidate(&cpu, &mem, &n).is_err());
    }

    #[test]
    fn missing_name_is_inconsistent() {
        let cpu = series(vec![("1", vec![1.0])]);
        let mem = series(vec![("1", vec![1.0])]);
        assert!(Consolidator::default()
            .consolidate(&cpu, &mem, &HashMap::new())
            .is_err());
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let (c, m) = Consolidator::default()
            .consolidate(&SeriesMap::new(), &SeriesMap::new(), &HashMap::new())
            .unwrap();
        assert!(c.is_empty());
        assert!(m.is_empty());
        assert_eq!(c.rows(), 0);
    }

    #[test]
    fn merge_is_order_independent() {
        let cpu = series(vec![
            ("7", vec![1.0, 0.5]),
            ("8", vec![2.0, 0.25]),
            ("9", vec![4.0, 0.125]),
        ]);
        let mem = series(vec![("7", vec![1.0, 1.0]), ("8", vec![1.0, 1.0]), ("9", vec![1.0, 1.0])]);
        let forward = names(&[("7", "w"), ("8", "w"), ("9", "w")]);
        let (c, m) = Consolidator::default().consolidate(&cpu, &mem, &forward).unwrap();
        assert_eq!(c.columns(), &["w".to_string()]);
        assert_eq!(c.column("w").unwrap(), &[7.0, 0.875]);
        assert_eq!(m.column("w").unwrap(), &[3.0, 3.0]);

        // Same identities under reversed keys: the sum does not depend on visit order.
        let reversed = series(vec![
            ("9", vec![1.0, 0.5]),
            ("8", vec![2.0, 0.25]),
            ("7", vec![4.0, 0.125]),
        ]);
        let (c2, _) = Consolidator::default()
            .consolidate(&reversed, &mem, &forward)
            .unwrap();
        assert_eq!(c.column("w"), c2.column("w"));
    }

    #[test]
    fn merged_column_order_follows_first_identity() {
        let cpu = series(vec![("1", vec![1.0]), ("2", vec![1.0]), ("3", vec![1.0])]);
        let mem = cpu.clone();
        let n = names(&[("1", "z"), ("2", "a"), ("3", "z")]);
        let (c, _) = Consolidator::default().consolidate(&cpu, &mem, &n).unwrap();
        assert_eq!(c.columns(), &["z".to_string(), "a".to_string()]);
        assert_eq!(c.column("z").unwrap(), &[2.0]);
    }
}
