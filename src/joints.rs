use anyhow::{anyhow, Result};
use ndarray::Array2;
use std::collections::HashMap;

use crate::annotation::Annotation;
use crate::skeleton::Skeleton;

/// Select the skeleton joints out of a raw annotation, in skeleton order.
///
/// Raw joint names have `prefix` stripped before lookup. When a stripped
/// name occurs twice the later entry wins. The 3D points are divided by
/// `cm_to_m`, turning the rig's centimeters into meters.
///
/// Returns `(p2d, p3d)` shaped `(J, 2)` and `(J, 3)` with `J = skeleton.len()`.
pub fn filter_joints(
    annotation: &Annotation,
    skeleton: &Skeleton,
    prefix: &str,
    cm_to_m: f32,
) -> Result<(Array2<f32>, Array2<f32>)> {
    let p2d_orig = annotation.points_2d()?;
    let p3d_orig = annotation.points_3d()?;

    let raw_ids: HashMap<String, usize> = annotation
        .joints
        .iter()
        .enumerate()
        .map(|(jid, j)| (j.name.replace(prefix, ""), jid))
        .collect();

    let mut p2d = Array2::<f32>::zeros((skeleton.len(), 2));
    let mut p3d = Array2::<f32>::zeros((skeleton.len(), 3));

    for (jid, name) in skeleton.names().enumerate() {
        let raw = *raw_ids
            .get(name)
            .ok_or_else(|| anyhow!("joint '{}' missing from annotation", name))?;
        if raw >= p2d_orig.nrows() || raw >= p3d_orig.nrows() {
            return Err(anyhow!(
                "joint '{}' has index {} but annotation only holds {} points",
                name,
                raw,
                p2d_orig.nrows().min(p3d_orig.nrows())
            ));
        }
        p2d.row_mut(jid).assign(&p2d_orig.row(raw));
        p3d.row_mut(jid).assign(&p3d_orig.row(raw));
    }

    p3d /= cm_to_m;

    Ok((p2d, p3d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::JointRecord;
    use crate::config::{CM_TO_M, DEFAULT_JOINT_PREFIX};

    fn annotation(names: &[&str], p2d: Vec<Vec<f32>>, p3d: Vec<Vec<f32>>) -> Annotation {
        Annotation {
            action: "idle".to_string(),
            joints: names
                .iter()
                .map(|n| JointRecord {
                    name: n.to_string(),
                })
                .collect(),
            pts2d_fisheye: p2d,
            pts3d_fisheye: p3d,
        }
    }

    #[test]
    fn test_reorders_to_skeleton_and_strips_prefix() {
        // Raw order: Hips, LeftHand, Head, Neck. Only some are prefixed.
        let ann = annotation(
            &["mixamorig:Hips", "LeftHand", "mixamorig:Head", "mixamorig:Neck"],
            vec![vec![0.0, 1.0, 2.0, 3.0], vec![10.0, 11.0, 12.0, 13.0]],
            vec![
                vec![100.0, 110.0, 120.0, 130.0],
                vec![200.0, 210.0, 220.0, 230.0],
                vec![300.0, 310.0, 320.0, 330.0],
            ],
        );
        let skel = Skeleton::from_names(&["Head", "Neck", "LeftHand"]).unwrap();

        let (p2d, p3d) = filter_joints(&ann, &skel, DEFAULT_JOINT_PREFIX, CM_TO_M).unwrap();
        assert_eq!(p2d.shape(), &[3, 2]);
        assert_eq!(p3d.shape(), &[3, 3]);

        assert_eq!(p2d.row(0).to_vec(), vec![2.0, 12.0]);
        assert_eq!(p2d.row(1).to_vec(), vec![3.0, 13.0]);
        assert_eq!(p2d.row(2).to_vec(), vec![1.0, 11.0]);

        assert_eq!(p3d.row(0).to_vec(), vec![1.2, 2.2, 3.2]);
        assert_eq!(p3d.row(2).to_vec(), vec![1.1, 2.1, 3.1]);
    }

    #[test]
    fn test_centimeters_become_meters() {
        let ann = annotation(
            &["Head"],
            vec![vec![150.0], vec![150.0]],
            vec![vec![150.0], vec![-150.0], vec![0.0]],
        );
        let skel = Skeleton::from_names(&["Head"]).unwrap();

        let (p2d, p3d) = filter_joints(&ann, &skel, DEFAULT_JOINT_PREFIX, CM_TO_M).unwrap();
        assert_eq!(p3d.row(0).to_vec(), vec![1.5, -1.5, 0.0]);
        // 2D pixel coordinates are left alone.
        assert_eq!(p2d.row(0).to_vec(), vec![150.0, 150.0]);
    }

    #[test]
    fn test_missing_joint_is_an_error() {
        let ann = annotation(
            &["mixamorig:Head"],
            vec![vec![0.0], vec![0.0]],
            vec![vec![0.0], vec![0.0], vec![0.0]],
        );
        let skel = Skeleton::from_names(&["Head", "Neck"]).unwrap();

        let err = filter_joints(&ann, &skel, DEFAULT_JOINT_PREFIX, CM_TO_M).unwrap_err();
        assert_eq!(err.to_string(), "joint 'Neck' missing from annotation");
    }

    #[test]
    fn test_joint_list_longer_than_points_is_an_error() {
        let ann = annotation(
            &["Neck", "Head"],
            vec![vec![0.0], vec![0.0]],
            vec![vec![0.0], vec![0.0], vec![0.0]],
        );
        let skel = Skeleton::from_names(&["Head"]).unwrap();
        assert!(filter_joints(&ann, &skel, DEFAULT_JOINT_PREFIX, CM_TO_M).is_err());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let ann = annotation(
            &["mixamorig:Head", "Head"],
            vec![vec![1.0, 2.0], vec![1.0, 2.0]],
            vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]],
        );
        let skel = Skeleton::from_names(&["Head"]).unwrap();
        let (p2d, _) = filter_joints(&ann, &skel, DEFAULT_JOINT_PREFIX, CM_TO_M).unwrap();
        assert_eq!(p2d[[0, 0]], 2.0);
    }
}
