use std::fmt;

use crate::error::{Result, TopSeriesError};

/// Which measurement a table holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Mem,
}

impl Metric {
    /// Inner header label in the persisted two-level table
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Mem => "MEM",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "CPU" => Some(Self::Cpu),
            "MEM" => Some(Self::Mem),
            _ => None,
        }
    }

    pub fn all() -> &'static [Metric] {
        &[Self::Cpu, Self::Mem]
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rectangular, time-indexed matrix of one metric. One column per display name.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    metric: Metric,
    time: Vec<f64>,
    columns: Vec<String>,
    /// Column-major: `values[c][r]`
    values: Vec<Vec<f64>>,
}

impl MetricTable {
    pub fn empty(metric: Metric) -> Self {
        Self {
            metric,
            time: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Every column must have exactly `time.len()` rows.
    pub fn new(metric: Metric, time: Vec<f64>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let rows = time.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, col) in columns {
            if col.len() != rows {
                return Err(TopSeriesError::Consistency(format!(
                    "{} column {:?} has {} rows, time axis has {}",
                    metric,
                    name,
                    col.len(),
                    rows
                )));
            }
            if names.contains(&name) {
                return Err(TopSeriesError::Consistency(format!(
                    "{} column {:?} appears twice",
                    metric, name
                )));
            }
            names.push(name);
            values.push(col);
        }
        Ok(Self {
            metric,
            time,
            columns: names,
            values,
        })
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn rows(&self) -> usize {
        self.time.len()
    }

    pub fn time_axis(&self) -> &[f64] {
        &self.time
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.values[idx].as_slice())
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.time.is_empty()
    }

    /// Same metric, time axis, and columns (in order), with values within `tol`.
    pub fn approx_eq(&self, other: &MetricTable, tol: f64) -> bool {
        let close = |a: &[f64], b: &[f64]| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tol)
        };
        self.metric == other.metric
            && self.columns == other.columns
            && close(&self.time, &other.time)
            && self.values.iter().zip(&other.values).all(|(a, b)| close(a, b))
    }
}

/// CPU and MEM tables sharing one time axis, addressed by a two-level
/// column header (display name, metric). This is the persisted shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    time: Vec<f64>,
    columns: Vec<(String, Metric)>,
    values: Vec<Vec<f64>>,
}

impl CombinedTable {
    /// CPU columns first, in table order, then MEM columns.
    pub fn join(cpu: &MetricTable, mem: &MetricTable) -> Result<Self> {
        if cpu.metric != Metric::Cpu || mem.metric != Metric::Mem {
            return Err(TopSeriesError::Consistency(
                "join expects a CPU table and a MEM table".to_string(),
            ));
        }
        if cpu.time != mem.time {
            return Err(TopSeriesError::Consistency(format!(
                "CPU has {} rows, MEM has {}",
                cpu.rows(),
                mem.rows()
            )));
        }
        let mut columns = Vec::with_capacity(cpu.columns.len() + mem.columns.len());
        let mut values = Vec::with_capacity(columns.capacity());
        for table in [cpu, mem] {
            for (name, col) in table.iter_columns() {
                columns.push((name.to_string(), table.metric));
                values.push(col.to_vec());
            }
        }
        Ok(Self {
            time: cpu.time.clone(),
            columns,
            values,
        })
    }

    pub fn from_parts(time: Vec<f64>, columns: Vec<((String, Metric), Vec<f64>)>) -> Result<Self> {
        let mut keys = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (key, col) in columns {
            if col.len() != time.len() {
                return Err(TopSeriesError::Consistency(format!(
                    "column ({}, {}) has {} rows, time axis has {}",
                    key.0,
                    key.1,
                    col.len(),
                    time.len()
                )));
            }
            keys.push(key);
            values.push(col);
        }
        Ok(Self {
            time,
            columns: keys,
            values,
        })
    }

    pub fn time_axis(&self) -> &[f64] {
        &self.time
    }

    pub fn rows(&self) -> usize {
        self.time.len()
    }

    pub fn columns(&self) -> &[(String, Metric)] {
        &self.columns
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Select one metric and drop the inner header level.
    pub fn select(&self, metric: Metric) -> Result<MetricTable> {
        let columns = self
            .columns
            .iter()
            .zip(&self.values)
            .filter(|((_, m), _)| *m == metric)
            .map(|((name, _), col)| (name.clone(), col.clone()))
            .collect();
        MetricTable::new(metric, self.time.clone(), columns)
    }

    pub fn split(&self) -> Result<(MetricTable, MetricTable)> {
        Ok((self.select(Metric::Cpu)?, self.select(Metric::Mem)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu() -> MetricTable {
        MetricTable::new(
            Metric::Cpu,
            vec![0.0, 0.5],
            vec![("worker".into(), vec![1.5, 2.0]), ("bash".into(), vec![0.1, 0.0])],
        )
        .unwrap()
    }

    fn mem() -> MetricTable {
        MetricTable::new(
            Metric::Mem,
            vec![0.0, 0.5],
            vec![("sshd".into(), vec![5.0, 5.0]), ("worker".into(), vec![3.0, 3.0])],
        )
        .unwrap()
    }

    #[test]
    fn ragged_column_rejected() {
        let err = MetricTable::new(Metric::Cpu, vec![0.0], vec![("a".into(), vec![1.0, 2.0])]);
        assert!(matches!(err, Err(TopSeriesError::Consistency(_))));
    }

    #[test]
    fn duplicate_column_rejected() {
        let err = MetricTable::new(
            Metric::Cpu,
            vec![0.0],
            vec![("a".into(), vec![1.0]), ("a".into(), vec![2.0])],
        );
        assert!(err.is_err());
    }

    #[test]
    fn join_then_split_is_identity() {
        let combined = CombinedTable::join(&cpu(), &mem()).unwrap();
        assert_eq!(combined.columns().len(), 4);
        assert_eq!(combined.columns()[2], ("sshd".to_string(), Metric::Mem));

        let (c, m) = combined.split().unwrap();
        assert_eq!(c, cpu());
        assert_eq!(m, mem());
    }

    #[test]
    fn join_rejects_mismatched_axes() {
        let short = MetricTable::new(Metric::Mem, vec![0.0], vec![]).unwrap();
        assert!(CombinedTable::join(&cpu(), &short).is_err());
        assert!(CombinedTable::join(&mem(), &cpu()).is_err());
    }

    #[test]
    fn approx_eq_tolerates_rounding() {
        let a = cpu();
        let b = MetricTable::new(
            Metric::Cpu,
            vec![0.0, 0.5 + 1e-12],
            vec![("worker".into(), vec![1.5, 2.0]), ("bash".into(), vec![0.1 + 1e-12, 0.0])],
        )
        .unwrap();
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&mem(), 1e-9));
    }
}
