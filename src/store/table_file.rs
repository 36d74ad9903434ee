//! Two-level-header CSV persistence for consolidated tables.
//!
//! ```text
//! time,worker,bash,worker
//! ,CPU,CPU,MEM
//! 0,1.5,0.3,3
//! 0.1,2,0,3
//! ```

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::{Result, TopSeriesError, WriteOutcome};
use crate::series::table::{CombinedTable, Metric};
use crate::store::write_new::write_new;

const TIME_LABEL: &str = "time";

/// Write `table` to `path` unless something already lives there.
pub fn persist(table: &CombinedTable, path: &Path) -> Result<WriteOutcome> {
    let outcome = write_new(path, |staged| {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(staged);

        let mut outer = vec![TIME_LABEL.to_string()];
        let mut inner = vec![String::new()];
        for (name, metric) in table.columns() {
            outer.push(name.clone());
            inner.push(metric.label().to_string());
        }
        writer.write_record(&outer)?;
        writer.write_record(&inner)?;

        for (row, t) in table.time_axis().iter().enumerate() {
            let mut record = Vec::with_capacity(outer.len());
            record.push(t.to_string());
            record.extend(table.values().iter().map(|col| col[row].to_string()));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|e| TopSeriesError::io(path, e))
    })?;

    if outcome.was_written() {
        info!(
            path = %path.display(),
            rows = table.rows(),
            columns = table.columns().len(),
            "table written"
        );
    }
    Ok(outcome)
}

/// Read a table written by [`persist`].
pub fn reload(path: &Path) -> Result<CombinedTable> {
    let file = File::open(path).map_err(|e| TopSeriesError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut records = reader.records();

    let bad = |reason: String| TopSeriesError::MalformedTable {
        path: path.to_path_buf(),
        reason,
    };

    let outer = records.next().ok_or_else(|| bad("missing name header row".into()))??;
    let inner = records.next().ok_or_else(|| bad("missing metric header row".into()))??;
    if outer.get(0) != Some(TIME_LABEL) {
        return Err(bad(format!("first header cell must be {:?}", TIME_LABEL)));
    }
    if outer.len() != inner.len() && !(outer.len() == 1 && inner.len() <= 1) {
        return Err(bad(format!(
            "header rows differ in width: {} vs {}",
            outer.len(),
            inner.len()
        )));
    }

    let mut keys = Vec::with_capacity(outer.len().saturating_sub(1));
    for (idx, name) in outer.iter().enumerate().skip(1) {
        let label = inner.get(idx).unwrap_or("");
        let metric = Metric::from_label(label)
            .ok_or_else(|| bad(format!("column {} has unknown metric {:?}", idx, label)))?;
        keys.push((name.to_string(), metric));
    }

    let mut time = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); keys.len()];
    for (row, record) in records.enumerate() {
        let record = record?;
        if record.len() != keys.len() + 1 {
            return Err(bad(format!(
                "data row {} has {} cells, expected {}",
                row,
                record.len(),
                keys.len() + 1
            )));
        }
        for (idx, cell) in record.iter().enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                bad(format!("data row {} cell {} is not a number: {:?}", row, idx, cell))
            })?;
            if idx == 0 {
                time.push(value);
            } else {
                columns[idx - 1].push(value);
            }
        }
    }

    info!(path = %path.display(), rows = time.len(), columns = keys.len(), "table reloaded");
    CombinedTable::from_parts(time, keys.into_iter().zip(columns).collect())
}
