pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
