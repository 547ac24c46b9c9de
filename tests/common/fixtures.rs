use image::{ImageBuffer, Rgba};
use mocap_dataset::Skeleton;
use serde_json::json;
use std::fs;
use std::path::Path;

/// Raw joint order written into every test annotation. Deliberately not the
/// skeleton order, and with one extra joint the skeleton drops.
pub const RAW_JOINTS: [&str; 4] = [
    "mixamorig:Hips",
    "mixamorig:LeftHand",
    "mixamorig:Head",
    "mixamorig:Neck",
];

pub fn test_skeleton() -> Skeleton {
    Skeleton::from_names(&["Head", "Neck", "LeftHand"]).expect("valid test skeleton")
}

/// Writes `rgba/<name>.png` and `json/<name>.json` under `dir`.
/// Raw joint `j` sits at pixel `(seed + j, seed + 10 * j)` and at
/// `(100 * (j + 1), 150, -50 * seed)` centimeters.
pub fn write_frame(dir: &Path, name: &str, action: &str, seed: f32) {
    write_image(dir, name);
    write_annotation(dir, name, action, seed);
}

pub fn write_image(dir: &Path, name: &str) {
    let img_dir = dir.join("rgba");
    fs::create_dir_all(&img_dir).expect("Failed to create image dir");
    let img = ImageBuffer::from_fn(4, 3, |x, _| Rgba([(x * 85) as u8, 0u8, 255u8, 255u8]));
    img.save_with_format(img_dir.join(format!("{name}.png")), image::ImageFormat::Png)
        .expect("Failed to save test image");
}

pub fn write_annotation(dir: &Path, name: &str, action: &str, seed: f32) {
    let ann_dir = dir.join("json");
    fs::create_dir_all(&ann_dir).expect("Failed to create annotation dir");

    let n = RAW_JOINTS.len();
    let xs: Vec<f32> = (0..n).map(|j| seed + j as f32).collect();
    let ys: Vec<f32> = (0..n).map(|j| seed + 10.0 * j as f32).collect();
    let p3x: Vec<f32> = (0..n).map(|j| 100.0 * (j + 1) as f32).collect();
    let p3y: Vec<f32> = vec![150.0; n];
    let p3z: Vec<f32> = vec![-50.0 * seed; n];

    let annotation = json!({
        "action": action,
        "camera": {"trans": [0.0, 0.0, 0.0], "rot": [0.0, 0.0, 0.0]},
        "joints": RAW_JOINTS.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
        "pts2d_fisheye": [xs, ys],
        "pts3d_fisheye": [p3x, p3y, p3z],
    });
    fs::write(
        ann_dir.join(format!("{name}.json")),
        serde_json::to_vec_pretty(&annotation).expect("Failed to encode annotation"),
    )
    .expect("Failed to write annotation");
}

/// Three frame folders at different depths: 2 + 1 + 2 frames.
pub fn create_test_dataset() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let root = dir.path();

    write_frame(&root.join("female_001/walk"), "000000", "walking", 1.0);
    write_frame(&root.join("female_001/walk"), "000001", "walking", 2.0);
    write_frame(&root.join("female_001/sub/deeper/wave"), "000000", "waving", 3.0);
    write_frame(&root.join("male_008"), "000000", "sitting", 4.0);
    write_frame(&root.join("male_008"), "000001", "sitting", 5.0);

    dir
}
