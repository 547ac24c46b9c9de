use crate::dataset::MocapDataset;
use anyhow::Result;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};

pub const STATUS_OK: &str = "Ok";
pub const STATUS_FAILED: &str = "Failed";

/// One CSV row per frame.
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub image_path: String,
    pub annotation_path: String,
    pub action: String,
    pub joints: usize,
    pub status: String,
    pub duration_us: u128,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub actions: BTreeMap<String, usize>,
}

/// Load every frame of `dataset` once, recording the outcome of each.
/// Frames that fail to load are written with their error and the scan moves on.
pub fn run_scan<W: std::io::Write>(
    dataset: &MocapDataset,
    writer: &mut csv::Writer<W>,
    progress: &ProgressBar,
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();

    for frame in 0..dataset.len() {
        let (image_path, annotation_path) = dataset.frame_paths(frame)?;

        let start = Instant::now();
        let result = dataset.get(frame);
        let duration = start.elapsed().as_micros();

        let (status, action, joints, error) = match result {
            Ok(sample) => {
                summary.ok += 1;
                *summary.actions.entry(sample.action.clone()).or_insert(0) += 1;
                (
                    STATUS_OK,
                    sample.action,
                    sample.joints_3d.nrows(),
                    String::new(),
                )
            }
            Err(e) => {
                summary.failed += 1;
                let error = format!("{e:#}");
                warn!(frame, %error, "frame failed to load");
                (STATUS_FAILED, String::new(), 0, error)
            }
        };
        summary.total += 1;

        let record = FrameRecord {
            frame,
            image_path: image_path.to_string_lossy().to_string(),
            annotation_path: annotation_path.to_string_lossy().to_string(),
            action,
            joints,
            status: status.to_string(),
            duration_us: duration,
            error,
        };

        writer.serialize(record)?;
        progress.inc(1);
    }

    info!(
        total = summary.total,
        ok = summary.ok,
        failed = summary.failed,
        actions = summary.actions.len(),
        "scan finished"
    );
    Ok(summary)
}
