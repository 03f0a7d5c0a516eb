//! Pipeline orchestration
//!
//! - `builder`: turns a stage into a submission request
//! - `executor`: submits the four stages in order, threading job IDs forward
//! - `report`: prints what was submitted

pub mod builder;
pub mod executor;
pub mod report;

pub use builder::*;
pub use executor::*;
pub use report::*;
