//! Zip extraction for the export archive.

use std::fs;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{DifferError, Result};

/// Extract `archive_path` into `dest`. Entry paths go through
/// `enclosed_name`, so a crafted archive cannot write outside `dest`.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| DifferError::BadArchive(e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| DifferError::BadArchive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
    }
    Ok(())
}
