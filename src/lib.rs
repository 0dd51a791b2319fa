pub mod cli;
pub mod error;
pub mod models;
pub mod preferences;
pub mod processors;
pub mod projection;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ConversionError, Result};
