// Write-to-temp then rename replacement of a file.
use crate::error::EngineError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::Builder;

/// Replaces `target` with whatever `write` produces, all or nothing.
///
/// The temporary file lives next to `target` so the final rename stays on one
/// filesystem. If `write` fails, or flushing/syncing/renaming fails, the
/// temporary file is removed and `target` keeps its previous content.
pub fn replace_atomically<F>(target: &Path, write: F) -> Result<(), EngineError>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<(), EngineError>,
{
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");

    let temp = Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| EngineError::StorageWriteError(format!("Failed to create temp file in '{}': {}", dir.display(), e)))?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer)?;
        writer
            .flush()
            .map_err(|e| EngineError::StorageWriteError(format!("Failed to flush temp file: {}", e)))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| EngineError::StorageWriteError(format!("Failed to sync temp file: {}", e)))?;

    // `persist` renames over the target; on error the temp file is dropped and removed.
    temp.persist(target).map_err(|e| {
        EngineError::StorageWriteError(format!("Failed to replace '{}': {}", target.display(), e.error))
    })?;
    Ok(())
}

/// Deletes temp files that `replace_atomically` left behind in `dir` when a
/// process died before the rename. Returns how many were removed.
///
/// Only call this while no writer is active in `dir`.
pub fn remove_stale_temp_files(dir: &Path) -> Result<usize, EngineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };
    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') && name.ends_with(".tmp") && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
