use anyhow::Result;
use mocap_dataset::{logging, viz};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);

    // Check if a CSV file was passed as argument, otherwise use default
    let args: Vec<String> = env::args().collect();
    let report_csv = if args.len() > 1 {
        &args[1]
    } else {
        "frame_report.csv"
    };
    let out_dir = Path::new(args.get(2).map(String::as_str).unwrap_or("."));

    println!("Generating charts from {}...", report_csv);
    viz::generate_plots(report_csv, out_dir)?;
    println!("Done! Check action_counts.png and load_times.png in {}.", out_dir.display());

    Ok(())
}
