//! Atomic file replacement
//!
//! Snapshot files are written to `<target>.tmp` and renamed over the target,
//! so readers see either the previous snapshot or the new one, never a torn
//! write.

use crate::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temp file used while replacing `target`
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Replace `target` with `contents` via temp file + rename
pub fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path_for(target);
    let written = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp, target));

    // No partial temp file survives a failed write or rename
    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }

    Ok(())
}
