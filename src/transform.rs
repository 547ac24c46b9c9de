use anyhow::{bail, Result};
use ndarray::{s, Array2, Array3};

use crate::skeleton::Skeleton;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Image,
    Joints3D,
    Joints2D,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Image => "image",
            FieldKey::Joints3D => "joints3D",
            FieldKey::Joints2D => "joints2D",
        }
    }
}

/// One keyed piece of a sample, as seen by a transform hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Image(Array3<f32>),
    Joints3D(Array2<f32>),
    Joints2D(Array2<f32>),
}

impl Field {
    pub fn key(&self) -> FieldKey {
        match self {
            Field::Image(_) => FieldKey::Image,
            Field::Joints3D(_) => FieldKey::Joints3D,
            Field::Joints2D(_) => FieldKey::Joints2D,
        }
    }
}

/// Post-processing hook run on every field of a loaded sample.
///
/// Implementations must hand back a field with the same key they received;
/// fields a hook does not care about should be returned untouched.
pub trait Transform {
    fn name(&self) -> &'static str;
    fn apply(&self, field: Field) -> Result<Field>;
}

impl<F> Transform for F
where
    F: Fn(Field) -> Result<Field>,
{
    fn name(&self) -> &'static str {
        "closure"
    }

    fn apply(&self, field: Field) -> Result<Field> {
        self(field)
    }
}

/// Run `transform` on `field`, rejecting a result whose key changed.
pub fn apply_checked(transform: &dyn Transform, field: Field) -> Result<Field> {
    let key = field.key();
    let out = transform.apply(field)?;
    if out.key() != key {
        bail!(
            "transform '{}' turned {} into {}",
            transform.name(),
            key.as_str(),
            out.key().as_str()
        );
    }
    Ok(out)
}

pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for Compose {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn apply(&self, field: Field) -> Result<Field> {
        self.transforms
            .iter()
            .try_fold(field, |f, t| apply_checked(t.as_ref(), f))
    }
}

/// Drops any alpha channel and maps pixels to `(x - mean) / std`.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeImage {
    pub mean: f32,
    pub std: f32,
}

impl Default for NormalizeImage {
    fn default() -> Self {
        Self {
            mean: 0.5,
            std: 0.5,
        }
    }
}

impl Transform for NormalizeImage {
    fn name(&self) -> &'static str {
        "normalize_image"
    }

    fn apply(&self, field: Field) -> Result<Field> {
        match field {
            Field::Image(img) => {
                let channels = img.dim().2.min(3);
                let (mean, std) = (self.mean, self.std);
                let out = img
                    .slice(s![.., .., ..channels])
                    .mapv(|v| (v - mean) / std);
                Ok(Field::Image(out))
            }
            other => Ok(other),
        }
    }
}

/// Reorders an image from height x width x channels to channels x height x width.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelsFirst;

impl Transform for ChannelsFirst {
    fn name(&self) -> &'static str {
        "channels_first"
    }

    fn apply(&self, field: Field) -> Result<Field> {
        match field {
            Field::Image(img) => {
                let permuted = img.permuted_axes([2, 0, 1]);
                Ok(Field::Image(permuted.as_standard_layout().to_owned()))
            }
            other => Ok(other),
        }
    }
}

/// Expresses every 3D joint relative to one root joint.
#[derive(Debug, Clone, Copy)]
pub struct CenterJoints3D {
    pub root: usize,
}

impl CenterJoints3D {
    pub fn on_joint(skeleton: &Skeleton, name: &str) -> Result<Self> {
        Ok(Self {
            root: skeleton.require(name)?,
        })
    }

    pub fn on_neck(skeleton: &Skeleton) -> Result<Self> {
        Self::on_joint(skeleton, "Neck")
    }
}

impl Transform for CenterJoints3D {
    fn name(&self) -> &'static str {
        "center_joints3d"
    }

    fn apply(&self, field: Field) -> Result<Field> {
        match field {
            Field::Joints3D(mut p3d) => {
                if self.root >= p3d.nrows() {
                    bail!(
                        "root joint {} out of range for {} joints",
                        self.root,
                        p3d.nrows()
                    );
                }
                let root = p3d.row(self.root).to_owned();
                p3d -= &root;
                Ok(Field::Joints3D(p3d))
            }
            other => Ok(other),
        }
    }
}
