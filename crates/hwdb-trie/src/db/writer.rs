//! Two-pass database serialization
//!
//! Pass one sizes the node region so string offsets are known up front.
//! Pass two emits every subtree before the node referencing it, so child
//! records carry the absolute offsets their subtrees were written at.
//! The header goes in last, and the finished file atomically replaces
//! the target path.

use std::fs;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, TrieError};
use crate::pool::StringPool;
use crate::trie::{Trie, TrieNode};

use super::{CHILD_ENTRY_SIZE, HEADER_SIZE, Header, NODE_SIZE, TOOL_VERSION, VALUE_ENTRY_SIZE};

/// Serialize `trie` and atomically replace `path` with the result.
///
/// Finalizes the trie's string pool. The database is written to a
/// sibling `<name>.tmp-XXXXXX` file, made read-only, synced, and renamed
/// over `path`; on any failure the temporary file is removed and a
/// preexisting database stays in place.
///
/// Returns the byte size of the finished file.
pub fn write_db(trie: &mut Trie, path: &Path) -> Result<u64> {
    trie.finalize();

    let file_name = path
        .file_name()
        .ok_or_else(|| TrieError::invalid_input("output path has no file name"))?;
    let dir = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("{}.tmp-", file_name.to_string_lossy()))
        .tempfile_in(dir)
        .map_err(TrieError::commit)?;

    let file_size = emit(trie, tmp.as_file_mut())
        .map_err(|err| TrieError::io_path(err, path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o444))
            .map_err(|err| TrieError::io_path(err, path))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|err| TrieError::io_path(err, path))?;
    tmp.persist(path).map_err(|err| TrieError::commit(err.error))?;

    tracing::debug!(path = %path.display(), size = file_size, "database committed");
    Ok(file_size)
}

/// Byte size of the node region for the subtree rooted at `node`.
fn region_size(node: &TrieNode) -> u64 {
    let mut size = NODE_SIZE
        + node.children.len() as u64 * CHILD_ENTRY_SIZE
        + node.values.len() as u64 * VALUE_ENTRY_SIZE;
    for child in &node.children {
        size += region_size(&child.node);
    }
    size
}

fn emit(trie: &Trie, file: &mut fs::File) -> io::Result<u64> {
    let pool = trie.pool();
    let nodes_len = region_size(trie.root());
    let strings_off = HEADER_SIZE + nodes_len;

    let mut w = BufWriter::new(file);
    w.seek(SeekFrom::Start(HEADER_SIZE))?;

    let mut emitter = Emitter {
        w: &mut w,
        pool,
        strings_off,
        pos: HEADER_SIZE,
    };
    let nodes_root_off = emitter.node(trie.root())?;
    debug_assert_eq!(emitter.pos, strings_off);

    w.write_all(pool.buffer())?;

    let header = Header {
        tool_version: TOOL_VERSION,
        file_size: strings_off + pool.len(),
        nodes_len,
        strings_len: pool.len(),
        nodes_root_off,
    };
    w.seek(SeekFrom::Start(0))?;
    w.write_all(&header.encode())?;
    w.flush()?;

    Ok(header.file_size)
}

struct Emitter<'a, W: Write> {
    w: &'a mut W,
    pool: &'a StringPool,
    strings_off: u64,
    pos: u64,
}

impl<W: Write> Emitter<'_, W> {
    /// Post-order emission: children first, then this node's record
    /// followed by its child and value tables. Returns the offset the
    /// node record was written at.
    fn node(&mut self, node: &TrieNode) -> io::Result<u64> {
        if node.children.len() > u8::MAX as usize {
            return Err(io::Error::other("node has more than 255 children"));
        }

        let mut child_offs = Vec::with_capacity(node.children.len());
        for child in &node.children {
            child_offs.push(self.node(&child.node)?);
        }

        let off = self.pos;
        self.put_u64(self.strings_off + self.pool.offset(node.prefix))?;
        self.put_u64(node.values.len() as u64)?;
        self.put_u8(node.children.len() as u8)?;

        for (entry, child_off) in node.children.iter().zip(child_offs) {
            self.put_u8(entry.c)?;
            self.put_bytes(&[0u8; 7])?;
            self.put_u64(child_off)?;
        }
        for entry in &node.values {
            self.put_u64(self.strings_off + self.pool.offset(entry.key))?;
            self.put_u64(self.strings_off + self.pool.offset(entry.value))?;
        }

        Ok(off)
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.w.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    fn put_u64(&mut self, value: u64) -> io::Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    fn put_u8(&mut self, value: u8) -> io::Result<()> {
        self.put_bytes(&[value])
    }
}
