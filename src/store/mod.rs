pub mod archive;
pub mod inputs;
pub mod table_file;
mod write_new;

pub use archive::extract_archives;
pub use inputs::{
    filter_process, list_files, load_tables, strip_headers, InputSource, LoadedTables,
};
pub use table_file::{persist, reload};
