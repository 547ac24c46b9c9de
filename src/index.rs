use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Image,
    Annotation,
}

/// A folder whose two category subfolders held a different number of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCountMismatch {
    pub dir: PathBuf,
    pub images: usize,
    pub annotations: usize,
}

/// Positionally aligned image and annotation paths for every frame found
/// under a dataset root.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    images: Vec<PathBuf>,
    annotations: Vec<PathBuf>,
    mismatches: Vec<FrameCountMismatch>,
}

impl DatasetIndex {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn paths(&self, category: Category) -> &[PathBuf] {
        match category {
            Category::Image => &self.images,
            Category::Annotation => &self.annotations,
        }
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn annotations(&self) -> &[PathBuf] {
        &self.annotations
    }

    pub fn frame(&self, index: usize) -> Option<(&Path, &Path)> {
        let image = self.images.get(index)?;
        let annotation = self.annotations.get(index)?;
        Some((image.as_path(), annotation.as_path()))
    }

    pub fn mismatches(&self) -> &[FrameCountMismatch] {
        &self.mismatches
    }
}

/// Recursively index `root`. A folder holding both category subfolders is
/// indexed directly and not descended further; any other folder contributes
/// the concatenation of its child folders, visited in name order.
pub fn index_dataset(root: impl AsRef<Path>, layout: &Layout) -> Result<DatasetIndex> {
    let root = root.as_ref();
    let mut index = DatasetIndex::default();
    index_dir(root, layout, &mut index)
        .with_context(|| format!("failed to index dataset at {}", root.display()))?;

    info!(
        root = %root.display(),
        frames = index.len(),
        mismatched_dirs = index.mismatches.len(),
        "indexed dataset"
    );
    Ok(index)
}

fn index_dir(path: &Path, layout: &Layout, index: &mut DatasetIndex) -> Result<()> {
    let (sub_dirs, _) = list_dir(path)?;

    let has_dir = |name: &str| {
        sub_dirs
            .iter()
            .any(|d| d.file_name() == Some(OsStr::new(name)))
    };

    if has_dir(&layout.image_dir) && has_dir(&layout.annotation_dir) {
        let (_, mut images) = list_dir(&path.join(&layout.image_dir))?;
        let (_, mut annotations) = list_dir(&path.join(&layout.annotation_dir))?;

        if images.len() != annotations.len() {
            error!(
                dir = %path.display(),
                images = images.len(),
                annotations = annotations.len(),
                "frame counts in {} and {} do not match",
                layout.image_dir,
                layout.annotation_dir
            );
            index.mismatches.push(FrameCountMismatch {
                dir: path.to_path_buf(),
                images: images.len(),
                annotations: annotations.len(),
            });
            // Keep the two lists aligned.
            let n = images.len().min(annotations.len());
            images.truncate(n);
            annotations.truncate(n);
        }

        debug!(dir = %path.display(), frames = images.len(), "indexed frame folder");
        index.images.extend(images);
        index.annotations.extend(annotations);
        return Ok(());
    }

    for sub_dir in &sub_dirs {
        index_dir(sub_dir, layout, index)?;
    }
    Ok(())
}

/// Immediate children of `path`, split into folders and files, sorted by name.
fn list_dir(path: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            dirs.push(entry.into_path());
        } else if file_type.is_file() {
            files.push(entry.into_path());
        }
    }

    Ok((dirs, files))
}
