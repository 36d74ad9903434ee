use std::ops::Range;

use crate::error::{Result, TopSeriesError};
use crate::series::table::MetricTable;

/// Label of the layer that sums every column not highlighted
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq)]
pub struct StackLayer {
    pub label: String,
    /// Raw per-row values inside the window
    pub values: Vec<f64>,
    /// Running total up to and including this layer, for stacked-area drawing
    pub upper: Vec<f64>,
}

/// A row window of one table, reduced to "Other" plus the highlighted columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedView {
    pub time: Vec<f64>,
    pub window: Range<usize>,
    /// `layers[0]` is always "Other"; highlighted columns follow in request order.
    pub layers: Vec<StackLayer>,
}

impl StackedView {
    pub fn build(
        table: &MetricTable,
        highlighted: &[String],
        window: Range<usize>,
    ) -> Result<Self> {
        for label in highlighted {
            if table.column(label).is_none() {
                return Err(TopSeriesError::UnknownColumn(label.clone()));
            }
        }

        let rows = table.rows();
        let end = window.end.min(rows);
        let start = window.start.min(end);
        let window = start..end;
        let len = end - start;

        let mut other = vec![0.0; len];
        for (name, col) in table.iter_columns() {
            if highlighted.iter().any(|h| h == name) {
                continue;
            }
            for (acc, v) in other.iter_mut().zip(&col[window.clone()]) {
                *acc += v;
            }
        }

        let mut raw: Vec<(String, Vec<f64>)> = vec![(OTHER_LABEL.to_string(), other)];
        for label in highlighted {
            if raw.iter().any(|(l, _)| l == label) {
                continue;
            }
            if let Some(col) = table.column(label) {
                raw.push((label.clone(), col[window.clone()].to_vec()));
            }
        }

        let mut running = vec![0.0; len];
        let layers = raw
            .into_iter()
            .map(|(label, values)| {
                for (acc, v) in running.iter_mut().zip(&values) {
                    *acc += v;
                }
                StackLayer {
                    label,
                    values,
                    upper: running.clone(),
                }
            })
            .collect();

        Ok(Self {
            time: table.time_axis()[window.clone()].to_vec(),
            window,
            layers,
        })
    }

    /// Height of the full stack at its tallest row
    pub fn peak(&self) -> f64 {
        self.layers
            .last()
            .map(|l| l.upper.iter().cloned().fold(0.0, f64::max))
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
