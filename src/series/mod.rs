pub mod consolidate;
pub mod parser;
pub mod schema;
pub mod stack;
pub mod table;

pub use consolidate::{Consolidator, DEFAULT_SAMPLING_INTERVAL};
pub use parser::{ParsedSnapshots, SeriesMap, SnapshotLine, SnapshotParser};
pub use schema::{FieldSchema, SkipRules, SnapshotField};
pub use stack::{StackLayer, StackedView, OTHER_LABEL};
pub use table::{CombinedTable, Metric, MetricTable};
