//! Atomic file replacement
//!
//! Receipts are written to a sibling temp file, flushed to disk and renamed
//! over the target, so a reader never observes a half-written receipt.

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// Write `content` to `target`, replacing any previous file
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_receipt_dir", e))?;
        }
    }

    let temp = temp_path_for(target);
    let written = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp, target));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(io_error("write_receipt", e));
    }
    Ok(())
}
