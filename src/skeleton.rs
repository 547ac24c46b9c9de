use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Joint {
    pub fn new(name: &str, parent: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

#[derive(Deserialize)]
struct SkeletonFile {
    joints: Vec<Joint>,
}

/// Ordered set of joints that defines the row layout of every joint array
/// handed out by the dataset.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    lookup: HashMap<String, usize>,
}

// (name, parent) in output order. Legs hang off the neck because the rig has
// no pelvis joint in this subset.
const EGOPOSE_JOINTS: [(&str, Option<&str>); 16] = [
    ("Head", Some("Neck")),
    ("Neck", None),
    ("LeftArm", Some("Neck")),
    ("LeftForeArm", Some("LeftArm")),
    ("LeftHand", Some("LeftForeArm")),
    ("RightArm", Some("Neck")),
    ("RightForeArm", Some("RightArm")),
    ("RightHand", Some("RightForeArm")),
    ("LeftUpLeg", Some("Neck")),
    ("LeftLeg", Some("LeftUpLeg")),
    ("LeftFoot", Some("LeftLeg")),
    ("LeftToeBase", Some("LeftFoot")),
    ("RightUpLeg", Some("Neck")),
    ("RightLeg", Some("RightUpLeg")),
    ("RightFoot", Some("RightLeg")),
    ("RightToeBase", Some("RightFoot")),
];

impl Default for Skeleton {
    fn default() -> Self {
        let joints = EGOPOSE_JOINTS
            .iter()
            .map(|(name, parent)| Joint::new(name, *parent))
            .collect::<Vec<_>>();
        let lookup = joints
            .iter()
            .enumerate()
            .map(|(i, j)| (j.name.clone(), i))
            .collect();
        Self { joints, lookup }
    }
}

impl Skeleton {
    pub fn new(joints: Vec<Joint>) -> Result<Self> {
        if joints.is_empty() {
            bail!("skeleton must contain at least one joint");
        }

        let mut lookup = HashMap::with_capacity(joints.len());
        for (i, joint) in joints.iter().enumerate() {
            if lookup.insert(joint.name.clone(), i).is_some() {
                bail!("duplicate joint '{}' in skeleton", joint.name);
            }
        }

        for joint in &joints {
            if let Some(parent) = &joint.parent {
                if !lookup.contains_key(parent) {
                    bail!("joint '{}' has unknown parent '{}'", joint.name, parent);
                }
            }
        }

        Ok(Self { joints, lookup })
    }

    /// Skeleton without parent links, in the given order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::new(
            names
                .iter()
                .map(|n| Joint::new(n.as_ref(), None))
                .collect(),
        )
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read skeleton {}", path.display()))?;
        let file: SkeletonFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid skeleton {}", path.display()))?;
        Self::new(file.joints).with_context(|| format!("invalid skeleton {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| anyhow!("joint '{}' is not part of the skeleton", name))
    }

    /// (parent, child) index pairs for every joint that has a parent.
    pub fn bones(&self) -> Vec<(usize, usize)> {
        self.joints
            .iter()
            .enumerate()
            .filter_map(|(child, joint)| {
                joint
                    .parent
                    .as_deref()
                    .and_then(|p| self.index_of(p))
                    .map(|parent| (parent, child))
            })
            .collect()
    }
}
