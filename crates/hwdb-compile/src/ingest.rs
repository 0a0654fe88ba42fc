//! Source directory enumeration
//!
//! Directories are scanned non-recursively for `.hwdb` files. When the
//! same file name appears in more than one directory, the last directory
//! wins; the surviving files are visited in file-name order, so a build
//! over a fixed directory list is deterministic.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{CompileError, Result};

const SOURCE_SUFFIX: &str = "hwdb";

/// Collect the ordered list of source files for a build.
pub fn enumerate_sources(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut by_name: BTreeMap<OsString, PathBuf> = BTreeMap::new();

    for dir in dirs {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "source directory missing, skipped");
            continue;
        }

        for entry in walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|source| CompileError::Enumerate {
                source,
                path: dir.clone(),
            })?;

            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|s| s.to_str()) != Some(SOURCE_SUFFIX)
            {
                continue;
            }

            by_name.insert(entry.file_name().to_os_string(), entry.path().to_path_buf());
        }
    }

    Ok(by_name.into_values().collect())
}
