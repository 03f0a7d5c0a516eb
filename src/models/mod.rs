// Core data models for the halo pipeline
// These structs describe a run and the jobs submitted for it

pub mod run;
pub mod stage;
pub mod submission;

pub use run::*;
pub use stage::*;
pub use submission::*;
