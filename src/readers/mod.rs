pub mod column_resolver;
pub mod table_loader;

pub use column_resolver::{
    detect_utm_columns, find_by_patterns, index_to_letter, letter_to_index, ColumnSelector,
    DetectedColumns,
};
pub use table_loader::{LoadedTable, Separator, SourceEncoding, TableLoader};
