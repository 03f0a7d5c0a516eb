use serde::{Deserialize, Serialize};

/// The four processing stages, in submission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    Membership,
    Properties,
    CompressMembership,
    CompressProperties,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Membership => "membership",
            StageKind::Properties => "properties",
            StageKind::CompressMembership => "compress-membership",
            StageKind::CompressProperties => "compress-properties",
        }
    }

    /// Stem of the template file name; the box size is appended to it
    pub fn template_stem(&self) -> &'static str {
        match self {
            StageKind::Membership => "group_membership",
            StageKind::Properties => "halo_properties",
            StageKind::CompressMembership => "compress_group_membership",
            StageKind::CompressProperties => "compress_halo_properties",
        }
    }

    /// Position in the stage table (1-based)
    pub fn ordinal(&self) -> usize {
        match self {
            StageKind::Membership => 1,
            StageKind::Properties => 2,
            StageKind::CompressMembership => 3,
            StageKind::CompressProperties => 4,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a stage waits on the stage submitted before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyMode {
    /// Starts as soon as the scheduler allows
    None,
    /// Array element `i` waits for element `i` of the previous stage
    AfterCorrelated,
}

/// One row of the stage table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub kind: StageKind,
    pub dependency: DependencyMode,
}

/// Stage table. Order is significant: each stage depends on the one before it.
pub const STAGES: [StageSpec; 4] = [
    StageSpec { kind: StageKind::Membership, dependency: DependencyMode::None },
    StageSpec { kind: StageKind::Properties, dependency: DependencyMode::AfterCorrelated },
    StageSpec { kind: StageKind::CompressMembership, dependency: DependencyMode::AfterCorrelated },
    StageSpec { kind: StageKind::CompressProperties, dependency: DependencyMode::AfterCorrelated },
];
