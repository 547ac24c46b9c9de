use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::skeleton::Skeleton;

pub const DEFAULT_IMAGE_DIR: &str = "rgba";
pub const DEFAULT_ANNOTATION_DIR: &str = "json";
pub const DEFAULT_JOINT_PREFIX: &str = "mixamorig:";
pub const CM_TO_M: f32 = 100.0;

/// Names of the two category folders that mark a directory as holding frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub image_dir: String,
    pub annotation_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            annotation_dir: DEFAULT_ANNOTATION_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub image_dir: String,
    pub annotation_dir: String,
    pub joint_prefix: String,
    pub cm_to_m: f32,
    // Falls back to the built-in skeleton when unset.
    pub skeleton: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            annotation_dir: DEFAULT_ANNOTATION_DIR.to_string(),
            joint_prefix: DEFAULT_JOINT_PREFIX.to_string(),
            cm_to_m: CM_TO_M,
            skeleton: None,
        }
    }
}

impl DatasetConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn layout(&self) -> Layout {
        Layout {
            image_dir: self.image_dir.clone(),
            annotation_dir: self.annotation_dir.clone(),
        }
    }

    pub fn load_skeleton(&self) -> Result<Skeleton> {
        match &self.skeleton {
            Some(path) => Skeleton::from_json_file(path),
            None => Ok(Skeleton::default()),
        }
    }
}
