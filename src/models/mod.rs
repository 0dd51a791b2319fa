pub mod coordinates;
pub mod dms;
pub mod ellipsoid;
pub mod outcome;
pub mod report;
pub mod table;

pub use coordinates::{GeographicPoint, Hemisphere, PlanarPoint, ProjectionConfig};
pub use dms::{Axis, DmsValue};
pub use ellipsoid::GeodeticEllipsoid;
pub use outcome::{ConvertedRow, OutputMode, RowOutcome};
pub use report::{BatchReport, FileReport, RowFailure};
pub use table::Table;
