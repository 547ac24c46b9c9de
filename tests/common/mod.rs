mod fixtures;
pub use fixtures::*;

pub use mocap_dataset::{DatasetConfig, MocapDataset, Skeleton};
