use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

#[derive(thiserror::Error, Debug)]
pub enum MxlError {
    #[error("io error: {0}")]
    Io(String),
    #[error("archive error: {0}")]
    Archive(String),
}

/// Unpack a compressed MusicXML container into `dest_dir`.
///
/// Existing files are overwritten, so repeated extraction of the same
/// archive converges on the same directory contents. Entries whose names
/// would escape `dest_dir` are ignored.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, MxlError> {
    let file = fs::File::open(archive_path).map_err(|e| MxlError::Io(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| MxlError::Archive(e.to_string()))?;

    let mut written = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| MxlError::Archive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| MxlError::Io(e.to_string()))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| MxlError::Io(e.to_string()))?;
        }
        let mut out = fs::File::create(&target).map_err(|e| MxlError::Io(e.to_string()))?;
        io::copy(&mut entry, &mut out).map_err(|e| MxlError::Io(e.to_string()))?;
        written.push(target);
    }

    Ok(written)
}
