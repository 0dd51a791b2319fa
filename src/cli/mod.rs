pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ProjectionArgs};
pub use commands::run;
