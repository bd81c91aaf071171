//! Configuration: folder pairs and log verbosity

mod pairs;
mod verbosity;

pub use pairs::*;
pub use verbosity::*;
