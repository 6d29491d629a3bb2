// src/utils/placement.rs

use std::fs;
use std::path::{Path, PathBuf};
use log::{info, debug, warn};

use crate::config::subsystems::PlacementMode;
use crate::error::{Error, Result};
use crate::types::Assignment;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    pub placed: usize,
    pub directories: Vec<PathBuf>,
}

/// Directory name for a zero-based label, e.g. `K_03` for label 2 of k=12.
/// Numbers are one-based and padded to the digit count of `k`.
pub fn cluster_dir_name(label: usize, k: usize) -> String {
    let width = k.max(1).to_string().len();
    format!("K_{:0width$}", label + 1, width = width)
}

/// Creates one directory per cluster under `root`, reusing existing ones.
pub fn prepare_cluster_dirs(root: &Path, k: usize) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::with_capacity(k);
    for label in 0..k {
        let dir = root.join(cluster_dir_name(label, k));
        if dir.is_dir() {
            info!("Folder already exists: {:?}", dir);
        } else {
            fs::create_dir_all(&dir)?;
            debug!("Created {:?}", dir);
        }
        dirs.push(dir);
    }
    Ok(dirs)
}

/// Copies or moves every assigned file into its cluster directory.
pub fn place_files(
    assignments: &[Assignment],
    root: &Path,
    k: usize,
    mode: PlacementMode,
) -> Result<PlacementSummary> {
    let directories = prepare_cluster_dirs(root, k)?;
    let mut placed = 0;

    for assignment in assignments {
        let dir = directories.get(assignment.label).ok_or_else(|| {
            Error::placement(format!("label {} out of range for k={}", assignment.label, k))
        })?;
        let file_name = assignment.path.file_name().ok_or_else(|| {
            Error::placement(format!("{:?} has no file name", assignment.path))
        })?;
        let target = dir.join(file_name);

        match mode {
            PlacementMode::Copy => {
                fs::copy(&assignment.path, &target)?;
            }
            PlacementMode::Move => move_file(&assignment.path, &target)?,
        }
        placed += 1;
    }

    info!("{} {} files into {} cluster folders under {:?}",
        match mode {
            PlacementMode::Copy => "Copied",
            PlacementMode::Move => "Moved",
        },
        placed, k, root);

    Ok(PlacementSummary { placed, directories })
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = fs::rename(from, to) {
        // Rename fails across filesystems; fall back to copy + remove.
        warn!("Rename {:?} -> {:?} failed ({}), copying instead", from, to, e);
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
