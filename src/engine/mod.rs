//! Cut execution engine

pub mod driver;

pub use driver::{CutDriver, CutJob, DriverSettings};
