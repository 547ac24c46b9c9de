use crate::scan::STATUS_OK;
use crate::skeleton::Skeleton;
use anyhow::{bail, Result};
use ndarray::Array2;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

#[derive(serde::Deserialize)]
struct Record {
    // frame: usize,
    // image_path: String,
    // annotation_path: String,
    action: String,
    // joints: usize,
    status: String,
    duration_us: u64,
    // error: String,
}

/// Read a scan CSV and write `action_counts.png` and `load_times.png` into `out_dir`.
pub fn generate_plots(csv_path: &str, out_dir: &Path) -> Result<()> {
    let file = File::open(csv_path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut durations: BTreeMap<String, Vec<u64>> = BTreeMap::new(); // Action -> load times of Ok frames

    for result in rdr.deserialize() {
        let record: Record = result?;
        if record.status != STATUS_OK {
            continue;
        }
        *counts.entry(record.action.clone()).or_insert(0) += 1;
        durations
            .entry(record.action)
            .or_default()
            .push(record.duration_us);
    }

    if counts.is_empty() {
        bail!("no successfully loaded frames in {}", csv_path);
    }

    let actions: Vec<String> = counts.keys().cloned().collect();

    let values: Vec<u64> = actions.iter().map(|a| counts[a]).collect();
    draw_bars(
        &out_dir.join("action_counts.png"),
        "Loaded Frames per Action",
        "Frames",
        &actions,
        &values,
    )?;

    let medians: Vec<u64> = actions
        .iter()
        .map(|a| {
            let mut sorted = durations[a].clone();
            sorted.sort();
            sorted[sorted.len() / 2]
        })
        .collect();
    draw_bars(
        &out_dir.join("load_times.png"),
        "Median Load Time per Action",
        "Microseconds",
        &actions,
        &medians,
    )?;

    Ok(())
}

fn draw_bars(
    out: &Path,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    values: &[u64],
) -> Result<()> {
    let root = BitMapBackend::new(out, (1280, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = values.iter().copied().max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..labels.len()).into_segmented(),
            0u64..(y_max + y_max / 10 + 1),
        )?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|i| match i {
            SegmentValue::Exact(val) | SegmentValue::CenterOf(val) => {
                labels.get(*val).cloned().unwrap_or_default()
            }
            _ => "".to_string(),
        })
        .y_desc(y_desc)
        .draw()?;

    for (idx, value) in values.iter().enumerate() {
        let color = Palette99::pick(idx);
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (SegmentValue::Exact(idx), 0),
                (SegmentValue::Exact(idx + 1), *value),
            ],
            color.filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Draw 2D joints (J x 2, image coordinates) and the skeleton's bones,
/// scaled to fit a `size` canvas.
pub fn draw_pose(
    out: &Path,
    joints_2d: &Array2<f32>,
    skeleton: &Skeleton,
    size: (u32, u32),
) -> Result<()> {
    if joints_2d.nrows() != skeleton.len() || joints_2d.ncols() != 2 {
        bail!(
            "expected {} x 2 joints, got {:?}",
            skeleton.len(),
            joints_2d.shape()
        );
    }

    let root = BitMapBackend::new(out, size).into_drawing_area();
    root.fill(&WHITE)?;

    let margin = 20.0;
    let (w, h) = (size.0 as f32, size.1 as f32);
    let xs = joints_2d.column(0);
    let ys = joints_2d.column(1);
    let x_min = xs.iter().copied().fold(f32::INFINITY, f32::min);
    let x_max = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let y_min = ys.iter().copied().fold(f32::INFINITY, f32::min);
    let y_max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let scale = ((w - 2.0 * margin) / (x_max - x_min).max(1.0))
        .min((h - 2.0 * margin) / (y_max - y_min).max(1.0));

    // Image y already points down, same as the bitmap.
    let to_px = |j: usize| -> (i32, i32) {
        (
            (margin + (joints_2d[[j, 0]] - x_min) * scale) as i32,
            (margin + (joints_2d[[j, 1]] - y_min) * scale) as i32,
        )
    };

    for (parent, child) in skeleton.bones() {
        root.draw(&PathElement::new(
            vec![to_px(parent), to_px(child)],
            BLUE.stroke_width(2),
        ))?;
    }
    for j in 0..skeleton.len() {
        root.draw(&Circle::new(to_px(j), 4, RED.filled()))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_pose_writes_png() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("pose.png");
        let skel = Skeleton::from_names(&["Neck", "Head"]).unwrap();
        let joints = ndarray::array![[100.0f32, 200.0], [110.0, 150.0]];

        draw_pose(&out, &joints, &skel, (200, 200)).unwrap();

        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (200, 200));
    }

    #[test]
    fn test_draw_pose_rejects_wrong_joint_count() {
        let tmp = tempfile::tempdir().unwrap();
        let skel = Skeleton::default();
        let joints = Array2::<f32>::zeros((3, 2));
        assert!(draw_pose(&tmp.path().join("pose.png"), &joints, &skel, (100, 100)).is_err());
    }
}
