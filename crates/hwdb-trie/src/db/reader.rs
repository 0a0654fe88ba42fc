//! Memory-mapped database reader
//!
//! Validates the header and serves queries straight from the mapped
//! file. Patterns are stored literally by the build side; this is the
//! side that interprets them as shell-style globs: the search string is
//! followed byte for byte through the trie, and wherever a `*`, `?`, or
//! `[` appears in the stored patterns the affected subtree is matched
//! against the remaining search text as a glob. Matches found deeper in
//! the literal walk override earlier glob matches, per property key.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Result, TrieError};

use super::{CHILD_ENTRY_SIZE, HEADER_SIZE, Header, NODE_SIZE, VALUE_ENTRY_SIZE};

/// An open, validated database.
#[derive(Debug)]
pub struct Hwdb {
    map: Mmap,
    header: Header,
}

/// Parsed node record, bounds-checked against the node region.
#[derive(Debug, Clone, Copy)]
struct NodeRef {
    off: u64,
    prefix_off: u64,
    values_count: u64,
    children_count: u8,
}

impl Hwdb {
    /// Memory-map and validate the database at `path`.
    #[allow(unsafe_code)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| TrieError::io_path(err, path))?;
        // Mapping stays valid because the database is only ever replaced
        // by atomic rename, never truncated or rewritten in place.
        let map = unsafe { Mmap::map(&file) }.map_err(|err| TrieError::io_path(err, path))?;

        let header = Header::decode(&map)?;
        if header.file_size != map.len() as u64 {
            return Err(TrieError::format(format!(
                "file is {} bytes, header claims {}",
                map.len(),
                header.file_size
            )));
        }
        if HEADER_SIZE + header.nodes_len + header.strings_len != header.file_size {
            return Err(TrieError::format("region sizes do not add up"));
        }

        let db = Self { map, header };
        db.node(db.header.nodes_root_off)?;
        Ok(db)
    }

    /// The decoded file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Look up every property whose pattern matches `modalias`.
    ///
    /// Returns the matched properties keyed by property name; when
    /// several patterns match, the most literal match wins per key.
    pub fn query(&self, modalias: &str) -> Result<BTreeMap<String, String>> {
        let mut props = BTreeMap::new();
        let search = modalias.as_bytes();
        let mut node = self.node(self.header.nodes_root_off)?;
        let mut i = 0;
        loop {
            let prefix = self.string(node.prefix_off)?;
            for (p, &b) in prefix.iter().enumerate() {
                if b == b'*' || b == b'?' || b == b'[' {
                    let mut buf = Vec::new();
                    self.match_glob(&node, p, &mut buf, &search[i + p..], &mut props)?;
                    return Ok(props);
                }
                if i + p >= search.len() || b != search[i + p] {
                    return Ok(props);
                }
            }
            i += prefix.len();

            for glob in [b'*', b'?', b'['] {
                if let Some(child_off) = self.lookup_child(&node, glob)? {
                    let mut buf = vec![glob];
                    self.match_glob(
                        &self.node(child_off)?,
                        0,
                        &mut buf,
                        &search[i..],
                        &mut props,
                    )?;
                }
            }

            if i == search.len() {
                self.collect_values(&node, &mut props)?;
                return Ok(props);
            }

            match self.lookup_child(&node, search[i])? {
                Some(child_off) => {
                    node = self.node(child_off)?;
                    i += 1;
                }
                None => return Ok(props),
            }
        }
    }

    /// Every `(pattern, key, value)` triple stored in the database, in
    /// depth-first pattern order.
    pub fn entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>, Vec<u8>)>> {
        let mut out = Vec::new();
        let mut pattern = Vec::new();
        let root = self.node(self.header.nodes_root_off)?;
        self.walk(&root, &mut pattern, &mut out)?;
        Ok(out)
    }

    /// Reconstruct the stored pattern tail below `node` and collect the
    /// values of every subtree whose full pattern glob-matches the
    /// remaining search text.
    fn match_glob(
        &self,
        node: &NodeRef,
        skip: usize,
        buf: &mut Vec<u8>,
        search: &[u8],
        props: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        let prefix = self.string(node.prefix_off)?;
        let tail_len = prefix.len() - skip;
        buf.extend_from_slice(&prefix[skip..]);

        for idx in 0..node.children_count {
            let (c, child_off) = self.child_entry(node, idx)?;
            buf.push(c);
            self.match_glob(&self.node(child_off)?, 0, buf, search, props)?;
            buf.pop();
        }

        if node.values_count > 0 && glob_match(buf, search) {
            self.collect_values(node, props)?;
        }

        buf.truncate(buf.len() - tail_len);
        Ok(())
    }

    fn walk(
        &self,
        node: &NodeRef,
        pattern: &mut Vec<u8>,
        out: &mut Vec<(Vec<u8>, Vec<u8>, Vec<u8>)>,
    ) -> Result<()> {
        let prefix_len = {
            let prefix = self.string(node.prefix_off)?;
            pattern.extend_from_slice(prefix);
            prefix.len()
        };

        for idx in 0..node.values_count {
            let (key_off, value_off) = self.value_entry(node, idx)?;
            out.push((
                pattern.clone(),
                self.string(key_off)?.to_vec(),
                self.string(value_off)?.to_vec(),
            ));
        }
        for idx in 0..node.children_count {
            let (c, child_off) = self.child_entry(node, idx)?;
            pattern.push(c);
            self.walk(&self.node(child_off)?, pattern, out)?;
            pattern.pop();
        }

        pattern.truncate(pattern.len() - prefix_len);
        Ok(())
    }

    fn collect_values(&self, node: &NodeRef, props: &mut BTreeMap<String, String>) -> Result<()> {
        for idx in 0..node.values_count {
            let (key_off, value_off) = self.value_entry(node, idx)?;
            let key = String::from_utf8_lossy(self.string(key_off)?).into_owned();
            let value = String::from_utf8_lossy(self.string(value_off)?).into_owned();
            props.insert(key, value);
        }
        Ok(())
    }

    fn node(&self, off: u64) -> Result<NodeRef> {
        let strings_off = self.header.strings_off();
        if off < HEADER_SIZE || off + NODE_SIZE > strings_off {
            return Err(TrieError::format("node offset out of bounds"));
        }

        let node = NodeRef {
            off,
            prefix_off: self.read_u64(off)?,
            values_count: self.read_u64(off + 8)?,
            children_count: self.read_u8(off + 16)?,
        };

        let end = node
            .values_count
            .checked_mul(VALUE_ENTRY_SIZE)
            .and_then(|v| v.checked_add(node.children_count as u64 * CHILD_ENTRY_SIZE))
            .and_then(|tables| tables.checked_add(off + NODE_SIZE));
        match end {
            Some(end) if end <= strings_off => Ok(node),
            _ => Err(TrieError::format("node tables out of bounds")),
        }
    }

    fn child_entry(&self, node: &NodeRef, idx: u8) -> Result<(u8, u64)> {
        let base = node.off + NODE_SIZE + idx as u64 * CHILD_ENTRY_SIZE;
        Ok((self.read_u8(base)?, self.read_u64(base + 8)?))
    }

    fn value_entry(&self, node: &NodeRef, idx: u64) -> Result<(u64, u64)> {
        let base = node.off
            + NODE_SIZE
            + node.children_count as u64 * CHILD_ENTRY_SIZE
            + idx * VALUE_ENTRY_SIZE;
        Ok((self.read_u64(base)?, self.read_u64(base + 8)?))
    }

    /// Binary search the node's child table for `c`.
    fn lookup_child(&self, node: &NodeRef, c: u8) -> Result<Option<u64>> {
        let (mut lo, mut hi) = (0u64, node.children_count as u64);
        while lo < hi {
            let mid = (lo + hi) / 2;
            let (b, child_off) = self.child_entry(node, mid as u8)?;
            match b.cmp(&c) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Ok(Some(child_off)),
            }
        }
        Ok(None)
    }

    fn read_u8(&self, off: u64) -> Result<u8> {
        self.map
            .get(off as usize)
            .copied()
            .ok_or_else(|| TrieError::format("offset out of bounds"))
    }

    fn read_u64(&self, off: u64) -> Result<u64> {
        let off = off as usize;
        let raw = self
            .map
            .get(off..off + 8)
            .ok_or_else(|| TrieError::format("offset out of bounds"))?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(raw);
        Ok(u64::from_le_bytes(arr))
    }

    /// NUL-terminated string at the absolute offset `off`.
    fn string(&self, off: u64) -> Result<&[u8]> {
        if off < self.header.strings_off() || off >= self.header.file_size {
            return Err(TrieError::format("string offset out of bounds"));
        }
        let tail = &self.map[off as usize..];
        let end = tail
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| TrieError::format("unterminated string"))?;
        Ok(&tail[..end])
    }
}

/// Shell-style match of a reconstructed pattern against the remaining
/// search text. An unparseable pattern never matches, the same outcome
/// fnmatch gives it.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let pattern = String::from_utf8_lossy(pattern);
    let text = String::from_utf8_lossy(text);
    glob::Pattern::new(&pattern)
        .map(|p| p.matches(&text))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match(b"*", b""));
        assert!(glob_match(b"*", b"anything"));
        assert!(glob_match(b"?0001", b"d0001"));
        assert!(glob_match(b"[0-9]x", b"7x"));
        assert!(!glob_match(b"[0-9]x", b"ax"));
        assert!(!glob_match(b"abc", b"abd"));
        // unclosed class never matches
        assert!(!glob_match(b"[0-9", b"0"));
    }
}
