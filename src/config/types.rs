use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::args::Visibility;

/// On-disk configuration. Every field is optional; CLI flags win over the
/// file, the file wins over built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConfigFile {
    pub target: Option<TargetSection>,
    pub load: Option<LoadSection>,
    pub resources: Option<ResourcesSection>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TargetSection {
    pub base_url: Option<String>,
    /// Request timeout with the CLI's ms/s/m/h suffix syntax.
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LoadSection {
    pub workflows: Option<u64>,
    pub concurrency: Option<NonZeroUsize>,
    pub iterations: Option<u32>,
    pub password: Option<String>,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ResourcesSection {
    pub audio_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
}
