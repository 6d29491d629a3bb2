// src/utils/discovery.rs

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::error::Result;

/// Lists image files directly inside `folder`. Files are grouped by
/// extension in the order given and sorted by name within each group.
/// Extensions match case-sensitively; subdirectories are not entered.
pub fn discover_images(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    // One bucket per extension, each still sorted by name.
    let mut by_extension: HashMap<&str, Vec<&PathBuf>> = HashMap::new();
    for path in &files {
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            by_extension.entry(ext).or_default().push(path);
        }
    }

    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for ext in extensions {
        if !seen.insert(ext.as_str()) {
            continue;
        }
        let bucket = by_extension.get(ext.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        images.extend(bucket.iter().map(|p| (*p).clone()));
        debug!("Found {} *.{} files", bucket.len(), ext);
    }

    info!("Found {} images to process in {:?}", images.len(), folder);
    Ok(images)
}
