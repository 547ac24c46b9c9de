use anyhow::Result;
use mocap_dataset::transform::{CenterJoints3D, ChannelsFirst, Compose, NormalizeImage};
use mocap_dataset::{logging, DatasetConfig, Field, MocapDataset, Skeleton, Transform};
use std::path::Path;

// Example hook: mirror the 2D joints horizontally inside a 1024 px wide fisheye frame.
fn mirror_2d(field: Field) -> Result<Field> {
    match field {
        Field::Joints2D(mut p2d) => {
            p2d.column_mut(0).mapv_inplace(|x| 1024.0 - x);
            Ok(Field::Joints2D(p2d))
        }
        other => Ok(other),
    }
}

fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);

    // Note: point this at an extracted copy of the dataset.
    let root = Path::new("./data/TrainSet");
    if !root.exists() {
        eprintln!("Error: dataset not found at {}.", root.display());
        return Ok(());
    }

    let skeleton = Skeleton::default();
    let transforms: Vec<Box<dyn Transform>> = vec![
        Box::new(NormalizeImage::default()),
        Box::new(ChannelsFirst),
        Box::new(CenterJoints3D::on_neck(&skeleton)?),
        Box::new(mirror_2d),
    ];

    let dataset = MocapDataset::with_skeleton(DatasetConfig::new(root), skeleton)?
        .with_transform(Compose::new(transforms));
    println!("Found {} frames.", dataset.len());

    for (i, sample) in dataset.iter().take(3).enumerate() {
        let sample = sample?;
        println!(
            "frame {}: action={} image={:?} neck={:?}",
            i,
            sample.action,
            sample.image.shape(),
            sample.joints_3d.row(1).to_vec()
        );
    }

    Ok(())
}
