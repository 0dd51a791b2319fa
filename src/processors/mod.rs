pub mod batch_converter;
pub mod row_converter;

pub use batch_converter::{convert_directory, BatchConverter, BatchRequest, FileTask};
pub use row_converter::{build_output_table, RowConverter};
