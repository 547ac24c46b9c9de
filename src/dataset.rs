use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array2, Array3};
use std::path::Path;

use crate::annotation::Annotation;
use crate::config::DatasetConfig;
use crate::index::{index_dataset, DatasetIndex};
use crate::joints::filter_joints;
use crate::skeleton::Skeleton;
use crate::transform::{apply_checked, Field, Transform};

/// One frame, loaded fresh on every access.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Height x width x channels, values in [0, 1] before any transform.
    pub image: Array3<f32>,
    /// Joints x 2, fisheye pixel coordinates.
    pub joints_2d: Array2<f32>,
    /// Joints x 3, meters.
    pub joints_3d: Array2<f32>,
    pub action: String,
}

pub struct MocapDataset {
    config: DatasetConfig,
    skeleton: Skeleton,
    index: DatasetIndex,
    transform: Option<Box<dyn Transform>>,
}

impl MocapDataset {
    /// Index `config.root` using the skeleton named in the config, or the
    /// built-in one.
    pub fn open(config: DatasetConfig) -> Result<Self> {
        let skeleton = config.load_skeleton()?;
        Self::with_skeleton(config, skeleton)
    }

    pub fn with_skeleton(config: DatasetConfig, skeleton: Skeleton) -> Result<Self> {
        let index = index_dataset(&config.root, &config.layout())?;
        Ok(Self {
            config,
            skeleton,
            index,
            transform: None,
        })
    }

    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    /// Image and annotation paths behind frame `index`.
    pub fn frame_paths(&self, index: usize) -> Result<(&Path, &Path)> {
        self.index.frame(index).ok_or_else(|| {
            anyhow!(
                "frame {} out of range for dataset of {} frames",
                index,
                self.len()
            )
        })
    }

    pub fn get(&self, index: usize) -> Result<Sample> {
        let (img_path, ann_path) = self.frame_paths(index)?;

        let image = load_image(img_path)?;

        let annotation = Annotation::from_json_file(ann_path)?;
        let (joints_2d, joints_3d) = filter_joints(
            &annotation,
            &self.skeleton,
            &self.config.joint_prefix,
            self.config.cm_to_m,
        )
        .with_context(|| format!("failed to read joints from {}", ann_path.display()))?;

        let sample = Sample {
            image,
            joints_2d,
            joints_3d,
            action: annotation.action,
        };

        match &self.transform {
            Some(transform) => apply_transform(transform.as_ref(), sample),
            None => Ok(sample),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Sample>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

// Image, then 3D joints, then 2D joints; each field is handed over on its own.
fn apply_transform(transform: &dyn Transform, sample: Sample) -> Result<Sample> {
    let Field::Image(image) = apply_checked(transform, Field::Image(sample.image))? else {
        bail!("transform returned a non-image field");
    };
    let Field::Joints3D(joints_3d) = apply_checked(transform, Field::Joints3D(sample.joints_3d))?
    else {
        bail!("transform returned a non-joints3D field");
    };
    let Field::Joints2D(joints_2d) = apply_checked(transform, Field::Joints2D(sample.joints_2d))?
    else {
        bail!("transform returned a non-joints2D field");
    };

    Ok(Sample {
        image,
        joints_2d,
        joints_3d,
        action: sample.action,
    })
}

/// Decode an image into a height x width x channels array in [0, 1].
/// Sources with alpha keep four channels, everything else becomes RGB.
pub fn load_image(path: &Path) -> Result<Array3<f32>> {
    let img = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);

    let (channels, pixels) = if img.color().has_alpha() {
        (4, img.to_rgba32f().into_raw())
    } else {
        (3, img.to_rgb32f().into_raw())
    };

    Ok(Array3::from_shape_vec((height, width, channels), pixels)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgba_image_is_normalized() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frame.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([255, 0, 51, 255]));
        img.save(&path).unwrap();

        let arr = load_image(&path).unwrap();
        assert_eq!(arr.dim(), (2, 3, 4));
        assert_eq!(arr[[1, 2, 0]], 1.0);
        assert_eq!(arr[[1, 2, 1]], 0.0);
        assert!((arr[[1, 2, 2]] - 0.2).abs() < 1e-6);
        assert_eq!(arr[[1, 2, 3]], 1.0);
        assert!(arr.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_rgb_image_keeps_three_channels() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frame.png");
        RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let arr = load_image(&path).unwrap();
        assert_eq!(arr.dim(), (4, 4, 3));
        assert!(arr.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_corrupt_image_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frame.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to load image"));
    }
}
