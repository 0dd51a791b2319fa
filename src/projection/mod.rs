pub mod utm;

pub use utm::UtmProjector;
