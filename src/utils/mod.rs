pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{
    dms_to_decimal, format_brazilian, format_decimal, format_international, parse_planar_value,
    to_dms,
};
pub use filename::{has_extension, output_path_for};
pub use progress::ProgressReporter;
