//! Run identifier resolution
//!
//! Turns `L1000N1800/HYDRO_FIDUCIAL` into a [`RunDescriptor`](crate::models::RunDescriptor).

pub mod parser;

pub use parser::*;
