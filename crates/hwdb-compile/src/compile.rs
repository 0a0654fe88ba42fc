//! The build pipeline
//!
//! Enumerate sources, parse them into the trie, serialize the database.
//! A file that cannot be read is skipped with a warning; anything that
//! threatens the integrity of the output aborts the build and leaves a
//! preexisting database in place.

use std::path::{Path, PathBuf};

use hwdb_trie::{Trie, write_db};

use crate::error::{CompileError, Result};
use crate::ingest::enumerate_sources;
use crate::parse::import_file;

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildSummary {
    /// Source files parsed.
    pub files: usize,
    /// Properties inserted, duplicates included.
    pub properties: usize,
    /// Nodes in the trie.
    pub nodes: u64,
    /// Child table entries.
    pub children: u64,
    /// Value table entries after overwrites.
    pub values: u64,
    /// Strings handed to the pool, duplicates included.
    pub strings: u64,
    /// Bytes saved by string deduplication.
    pub dedup_bytes: u64,
    /// Byte size of the written database.
    pub file_size: u64,
}

/// Compile every source file found under `dirs` into a database at
/// `output`.
pub fn compile(dirs: &[PathBuf], output: &Path) -> Result<BuildSummary> {
    let sources = enumerate_sources(dirs)?;
    let mut trie = Trie::new();
    let mut summary = BuildSummary::default();

    for path in &sources {
        match import_file(&mut trie, path) {
            Ok(count) => {
                tracing::debug!(file = %path.display(), properties = count, "imported");
                summary.files += 1;
                summary.properties += count;
            }
            Err(CompileError::Io(err)) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %err,
                    "failed to read source file, skipped"
                );
            }
            Err(err) => return Err(err),
        }
    }

    let counts = trie.counts();
    summary.nodes = counts.nodes;
    summary.children = counts.children;
    summary.values = counts.values;

    summary.file_size = write_db(&mut trie, output).map_err(|source| CompileError::Write {
        source,
        path: output.to_path_buf(),
    })?;

    let pool = trie.pool().stats();
    summary.strings = pool.in_count;
    summary.dedup_bytes = pool.dedup_len;

    tracing::info!(
        path = %output.display(),
        files = summary.files,
        properties = summary.properties,
        nodes = summary.nodes,
        children = summary.children,
        values = summary.values,
        strings = summary.strings,
        dedup_bytes = summary.dedup_bytes,
        file_size = summary.file_size,
        "database written"
    );

    Ok(summary)
}
