use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct JointRecord {
    pub name: String,
}

/// Per-frame annotation as written by the capture rig. Fields not listed
/// here (camera, bounding boxes, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    pub action: String,
    pub joints: Vec<JointRecord>,
    // Stored coordinate-major: 2 rows of J values.
    pub pts2d_fisheye: Vec<Vec<f32>>,
    // 3 rows of J values, centimeters.
    pub pts3d_fisheye: Vec<Vec<f32>>,
}

impl Annotation {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open annotation {}", path.display()))?;
        let annotation = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid annotation {}", path.display()))?;
        Ok(annotation)
    }

    /// Raw 2D points transposed to one row per joint (J x 2).
    pub fn points_2d(&self) -> Result<Array2<f32>> {
        transposed(&self.pts2d_fisheye, 2).context("bad pts2d_fisheye")
    }

    /// Raw 3D points transposed to one row per joint (J x 3).
    pub fn points_3d(&self) -> Result<Array2<f32>> {
        transposed(&self.pts3d_fisheye, 3).context("bad pts3d_fisheye")
    }
}

fn transposed(rows: &[Vec<f32>], dims: usize) -> Result<Array2<f32>> {
    if rows.len() != dims {
        bail!("expected {} coordinate rows, found {}", dims, rows.len());
    }
    let n = rows[0].len();
    if let Some(row) = rows.iter().find(|r| r.len() != n) {
        bail!("ragged coordinate rows: {} vs {} values", n, row.len());
    }

    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    let coord_major = Array2::from_shape_vec((dims, n), flat)?;
    Ok(coord_major.reversed_axes())
}
