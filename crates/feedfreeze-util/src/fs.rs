use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::errors::FreezeError;

/// Express `target` relative to the directory `base`.
///
/// Both paths are expected to be absolute. Returns `.` when they are equal.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for comp in &target[common..] {
        result.push(comp.as_os_str());
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Write `data` to `path` atomically.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `path`, so readers never observe a partial file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), FreezeError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| FreezeError::Io(e.error))?;
    tracing::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
