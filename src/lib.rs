//! halo-pipeline - submit the halo catalogue pipeline as chained Slurm array jobs
//!
//! Given a run identifier such as `L1000N1800/HYDRO_FIDUCIAL` and a snapshot
//! range, this crate queues four array jobs:
//!
//! 1. group membership
//! 2. halo properties
//! 3. compress group membership
//! 4. compress halo properties
//!
//! Each stage carries a correlated dependency on the stage before it, so
//! array element `i` of a stage starts as soon as element `i` of the previous
//! stage has succeeded.
//!
//! The library provides:
//! - Run identifier parsing
//! - Template location for each box size
//! - Submission request construction and the stage executor
//! - A `JobScheduler` trait with Slurm and dry-run backends
//! - Text and JSON reporting of the submitted job IDs
//!
//! # Example
//!
//! ```no_run
//! use halo_pipeline::config::PipelineConfig;
//! use halo_pipeline::pipeline::run_pipeline;
//! use halo_pipeline::scheduler::SlurmScheduler;
//!
//! let config = PipelineConfig::load("/cosma8/data/soap", None).unwrap();
//! let mut scheduler = SlurmScheduler::from_config(&config);
//! let report = run_pipeline(&config, "L1000N1800/HYDRO_FIDUCIAL", "0-77", &mut scheduler);
//! for job in &report.submitted {
//!     println!("{} {}", job.stage, job.job_id);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod templates;
