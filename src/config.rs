//! Pipeline configuration
//!
//! Everything the orchestrator would otherwise pick up from the process
//! environment (working directory, template location, scheduler setup) lives in
//! [`PipelineConfig`] and is passed in explicitly.
//!
//! Values come from built-in defaults, then an optional `rc` file, then CLI flags.
//! The rc file uses one `key=value` per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! templates.root=scripts/FLAMINGO
//! logs.dir=logs
//! marker.file=compute_halo_properties.py
//! scheduler.program=sbatch
//! scheduler.args=--account=dp004 --partition=cosma8
//! env.OMPI_MCA_btl=^openib
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use log::{debug, warn};
use crate::error::PipelineError;

pub const DEFAULT_MARKER_FILE: &str = "compute_halo_properties.py";
pub const DEFAULT_TEMPLATES_ROOT: &str = "scripts/FLAMINGO";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_SCHEDULER_PROGRAM: &str = "sbatch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory the pipeline is run from
    pub work_dir: PathBuf,
    /// File whose presence marks `work_dir` as a pipeline checkout
    pub marker_file: PathBuf,
    /// Directory holding one template directory per box size
    pub templates_root: PathBuf,
    pub log_dir: PathBuf,
    pub scheduler_program: String,
    /// Extra arguments passed to every scheduler invocation
    pub scheduler_args: Vec<String>,
    /// Environment set on the scheduler process
    pub scheduler_env: BTreeMap<String, String>,
    pub dry_run: bool,
}

impl PipelineConfig {
    /// Built-in defaults, with paths resolved under `work_dir`
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        PipelineConfig {
            marker_file: work_dir.join(DEFAULT_MARKER_FILE),
            templates_root: work_dir.join(DEFAULT_TEMPLATES_ROOT),
            log_dir: work_dir.join(DEFAULT_LOG_DIR),
            scheduler_program: DEFAULT_SCHEDULER_PROGRAM.to_string(),
            scheduler_args: Vec::new(),
            scheduler_env: BTreeMap::new(),
            dry_run: false,
            work_dir,
        }
    }

    /// Location of the rc file when none is given explicitly
    pub fn default_rc_path(work_dir: &Path) -> PathBuf {
        work_dir.join(".halo-pipeline").join("rc")
    }

    /// Defaults plus the rc file.
    ///
    /// An explicitly named rc file must exist; the default one is optional.
    pub fn load(work_dir: impl Into<PathBuf>, rc_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::new(work_dir);

        let rc_path = match rc_path {
            Some(path) => Some(config.resolve(path)),
            None => {
                let path = Self::default_rc_path(&config.work_dir);
                if path.exists() { Some(path) } else { None }
            }
        };

        if let Some(path) = rc_path {
            debug!("Reading configuration from {}", path.display());
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| config.work_dir.clone());
            config.apply_rc(&contents, &base_dir)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        }

        Ok(config)
    }

    /// Apply rc file contents. Relative paths resolve against `base_dir`.
    pub fn apply_rc(&mut self, contents: &str, base_dir: &Path) -> Result<()> {
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("line {}: expected key=value, got '{}'", lineno + 1, line);
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "templates.root" => self.templates_root = base_dir.join(value),
                "logs.dir" => self.log_dir = base_dir.join(value),
                "marker.file" => self.marker_file = base_dir.join(value),
                "scheduler.program" => {
                    if value.is_empty() {
                        bail!("line {}: scheduler.program cannot be empty", lineno + 1);
                    }
                    self.scheduler_program = value.to_string();
                }
                "scheduler.args" => {
                    self.scheduler_args = value.split_whitespace().map(str::to_string).collect();
                }
                _ => {
                    if let Some(name) = key.strip_prefix("env.") {
                        if name.is_empty() {
                            bail!("line {}: empty environment variable name", lineno + 1);
                        }
                        self.scheduler_env.insert(name.to_string(), value.to_string());
                    } else {
                        warn!("Ignoring unknown config key '{}' (line {})", key, lineno + 1);
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve a path given on the command line against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.work_dir.join(path)
    }

    /// The working directory must contain the marker file
    pub fn check_work_dir(&self) -> Result<(), PipelineError> {
        if self.marker_file.is_file() {
            Ok(())
        } else {
            Err(PipelineError::NotPipelineDirectory { marker: self.marker_file.clone() })
        }
    }

    /// Create the log directory if it doesn't exist yet
    pub fn ensure_log_dir(&self) -> Result<&Path, PipelineError> {
        std::fs::create_dir_all(&self.log_dir).map_err(|source| PipelineError::LogDirectory {
            path: self.log_dir.clone(),
            source,
        })?;
        Ok(&self.log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_defaults_resolve_under_work_dir() {
        let config = PipelineConfig::new("/data/soap");
        assert_eq!(config.marker_file, PathBuf::from("/data/soap/compute_halo_properties.py"));
        assert_eq!(config.templates_root, PathBuf::from("/data/soap/scripts/FLAMINGO"));
        assert_eq!(config.log_dir, PathBuf::from("/data/soap/logs"));
        assert_eq!(config.scheduler_program, "sbatch");
        assert!(config.scheduler_args.is_empty());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_apply_rc() {
        let mut config = PipelineConfig::new("/data/soap");
        let rc = "\
# site settings
templates.root = templates
logs.dir=/scratch/logs

scheduler.args=--account=dp004 --partition=cosma8
env.OMPI_MCA_btl=^openib
";
        config.apply_rc(rc, Path::new("/etc/soap")).unwrap();
        assert_eq!(config.templates_root, PathBuf::from("/etc/soap/templates"));
        assert_eq!(config.log_dir, PathBuf::from("/scratch/logs"));
        assert_eq!(config.scheduler_args, vec!["--account=dp004", "--partition=cosma8"]);
        assert_eq!(config.scheduler_env.get("OMPI_MCA_btl").map(String::as_str), Some("^openib"));
        // Untouched keys keep their defaults
        assert_eq!(config.scheduler_program, "sbatch");
    }

    #[test]
    fn test_apply_rc_rejects_bad_lines() {
        let mut config = PipelineConfig::new("/data/soap");
        assert!(config.apply_rc("templates.root", Path::new("/")).is_err());
        assert!(config.apply_rc("scheduler.program=", Path::new("/")).is_err());
        assert!(config.apply_rc("env.=1", Path::new("/")).is_err());
        // Unknown keys are only warned about
        assert!(config.apply_rc("colour=blue", Path::new("/")).is_ok());
    }

    #[test]
    fn test_load_default_rc_when_present() {
        let temp_dir = TempDir::new().unwrap();
        let rc_dir = temp_dir.path().join(".halo-pipeline");
        fs::create_dir_all(&rc_dir).unwrap();
        fs::write(rc_dir.join("rc"), "scheduler.program=/opt/slurm/bin/sbatch\n").unwrap();

        let config = PipelineConfig::load(temp_dir.path(), None).unwrap();
        assert_eq!(config.scheduler_program, "/opt/slurm/bin/sbatch");
    }

    #[test]
    fn test_load_without_rc() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig::load(temp_dir.path(), None).unwrap();
        assert_eq!(config, PipelineConfig::new(temp_dir.path()));
    }

    #[test]
    fn test_load_missing_explicit_rc_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = PipelineConfig::load(temp_dir.path(), Some(Path::new("missing.rc")));
        assert!(result.is_err());
    }

    #[test]
    fn test_check_work_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig::new(temp_dir.path());
        assert!(matches!(config.check_work_dir(), Err(PipelineError::NotPipelineDirectory { .. })));

        fs::write(temp_dir.path().join(DEFAULT_MARKER_FILE), "").unwrap();
        assert!(config.check_work_dir().is_ok());
    }

    #[test]
    fn test_ensure_log_dir_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = PipelineConfig::new(temp_dir.path());
        config.log_dir = temp_dir.path().join("logs").join("nested");

        let log_dir = config.ensure_log_dir().unwrap().to_path_buf();
        assert!(log_dir.is_dir());
        // Second call is a no-op
        assert!(config.ensure_log_dir().is_ok());
    }
}
