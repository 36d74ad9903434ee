use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, TopSeriesError};
use crate::store::inputs::list_files;

/// Extract every `*.zip` in `dir` into `dir`, skipping archives whose
/// stem (`capture.zip` -> `capture`) is already present. Returns the archives
/// that were extracted.
pub fn extract_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_files(dir)?;
    let mut extracted = Vec::new();

    for path in &files {
        let Some(stem) = zip_stem(path) else { continue };
        let target = dir.join(stem);
        if files.iter().any(|f| *f == target) {
            debug!(archive = %path.display(), "already extracted");
            continue;
        }

        let file = File::open(path).map_err(|e| TopSeriesError::io(path, e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| TopSeriesError::Archive {
            path: path.clone(),
            source,
        })?;
        unpack(&mut archive, path, dir)?;
        info!(archive = %path.display(), entries = archive.len(), "extracted");
        extracted.push(path.clone());
    }

    Ok(extracted)
}

/// Entries whose names escape `dir` (absolute, `..`) are skipped.
fn unpack(archive: &mut zip::ZipArchive<File>, path: &Path, dir: &Path) -> Result<()> {
    let archive_err = |source| TopSeriesError::Archive {
        path: path.to_path_buf(),
        source,
    };
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        let Some(name) = entry.enclosed_name() else {
            warn!(archive = %path.display(), entry = entry.name(), "unsafe entry path, skipped");
            continue;
        };
        let out = dir.join(name);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| TopSeriesError::io(&out, e))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| TopSeriesError::io(parent, e))?;
        }
        let mut file = File::create(&out).map_err(|e| TopSeriesError::io(&out, e))?;
        io::copy(&mut entry, &mut file).map_err(|e| TopSeriesError::io(&out, e))?;
    }
    Ok(())
}

fn zip_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(".zip").filter(|stem| !stem.is_empty())
}
