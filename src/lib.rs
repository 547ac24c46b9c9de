pub mod annotation;
pub mod config;
pub mod dataset;
pub mod index;
pub mod joints;
pub mod logging;
pub mod scan;
pub mod skeleton;
pub mod transform;
pub mod viz;

pub use config::{DatasetConfig, Layout};
pub use dataset::{MocapDataset, Sample};
pub use index::{index_dataset, Category, DatasetIndex, FrameCountMismatch};
pub use skeleton::{Joint, Skeleton};
pub use transform::{Field, FieldKey, Transform};
