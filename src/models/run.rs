use serde::{Deserialize, Serialize};

/// Simulation run, as named by an identifier like `L1000N1800/HYDRO_FIDUCIAL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDescriptor {
    /// Box size and resolution token, e.g. `L1000N1800`
    pub box_size: String,
    /// Model name, everything after the first `/`
    pub model: String,
}

impl RunDescriptor {
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.box_size, self.model)
    }
}

impl std::fmt::Display for RunDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.box_size, self.model)
    }
}

/// Identifier segment that failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSegment {
    BoxSize,
    Model,
}

impl RunSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunSegment::BoxSize => "box size",
            RunSegment::Model => "model",
        }
    }
}

impl std::fmt::Display for RunSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
