use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use mocap_dataset::{logging, scan, DatasetConfig, MocapDataset};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Index a motion-capture dataset and load every frame once, writing a per-frame report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dataset root. Overrides `root` from --config.
    root: Option<PathBuf>,

    /// JSON dataset config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON skeleton file. Overrides `skeleton` from --config.
    #[arg(short, long)]
    skeleton: Option<PathBuf>,

    /// Output CSV.
    #[arg(short, long, default_value = "frame_report.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DatasetConfig::from_json_file(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(root) = args.root {
        config.root = root;
    }
    if let Some(skeleton) = args.skeleton {
        config.skeleton = Some(skeleton);
    }

    // 1. Indexing
    println!("Indexing {}...", config.root.display());
    let dataset = MocapDataset::open(config)?;
    println!(
        "Found {} frames ({} folders with mismatched counts).",
        dataset.len(),
        dataset.index().mismatches().len()
    );

    // 2. Prepare CSV Writer
    let file = File::create(&args.output)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    // 3. Load every frame
    println!("Loading frames...");
    let pb = ProgressBar::new(dataset.len() as u64);
    let summary = scan::run_scan(&dataset, &mut writer, &pb)?;
    pb.finish_with_message("Scan complete");
    writer.flush()?;

    println!(
        "Loaded {}/{} frames across {} actions. Report saved to {}.",
        summary.ok,
        summary.total,
        summary.actions.len(),
        args.output.display()
    );
    println!("To generate charts, run: cargo run --bin analyze");

    Ok(())
}
