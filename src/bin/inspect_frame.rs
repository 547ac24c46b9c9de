use anyhow::Result;
use clap::Parser;
use mocap_dataset::{logging, viz, DatasetConfig, MocapDataset};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

/// Load one frame and dump what the training loop would see.
#[derive(Parser, Debug)]
struct Args {
    /// Dataset root.
    root: PathBuf,

    /// Frame index.
    frame: usize,

    /// JSON skeleton file.
    #[arg(short, long)]
    skeleton: Option<PathBuf>,

    /// Where to write the JSON dump; the pose plot lands next to it.
    #[arg(short, long, default_value = "frame_dump.json")]
    output: PathBuf,
}

#[derive(Serialize)]
struct JointDump {
    name: String,
    xy: [f32; 2],
    xyz: [f32; 3],
}

#[derive(Serialize)]
struct FrameDump {
    frame: usize,
    image_path: String,
    annotation_path: String,
    image_shape: Vec<usize>,
    action: String,
    joints: Vec<JointDump>,
}

fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);
    let args = Args::parse();

    let mut config = DatasetConfig::new(&args.root);
    config.skeleton = args.skeleton;
    let dataset = MocapDataset::open(config)?;

    let (image_path, annotation_path) = dataset.frame_paths(args.frame)?;
    println!("Processing frame {}: {}", args.frame, image_path.display());

    let sample = dataset.get(args.frame)?;
    println!("Image shape: {:?}", sample.image.shape());

    let joints = dataset
        .skeleton()
        .names()
        .enumerate()
        .map(|(j, name)| JointDump {
            name: name.to_string(),
            xy: [sample.joints_2d[[j, 0]], sample.joints_2d[[j, 1]]],
            xyz: [
                sample.joints_3d[[j, 0]],
                sample.joints_3d[[j, 1]],
                sample.joints_3d[[j, 2]],
            ],
        })
        .collect();

    let output = FrameDump {
        frame: args.frame,
        image_path: image_path.to_string_lossy().to_string(),
        annotation_path: annotation_path.to_string_lossy().to_string(),
        image_shape: sample.image.shape().to_vec(),
        action: sample.action.clone(),
        joints,
    };

    let file = File::create(&args.output)?;
    serde_json::to_writer_pretty(file, &output)?;
    println!("Wrote {}", args.output.display());

    let plot_path = args.output.with_extension("png");
    viz::draw_pose(&plot_path, &sample.joints_2d, dataset.skeleton(), (640, 640))?;
    println!("Wrote {}", plot_path.display());

    Ok(())
}
