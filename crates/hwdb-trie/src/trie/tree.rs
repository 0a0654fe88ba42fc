//! Radix trie construction
//!
//! The trie is keyed on match patterns; every literal byte goes through
//! the owned string pool. Insertion walks the compressed edges,
//! splitting a node whenever a new pattern diverges inside its prefix.

use super::node::{ChildEntry, TrieNode};
use crate::error::{Result, TrieError};
use crate::pool::StringPool;

/// Per-kind entry counts, gathered for the build summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrieCounts {
    /// Nodes in the trie, root included.
    pub nodes: u64,
    /// Child table entries across all nodes.
    pub children: u64,
    /// Value table entries across all nodes.
    pub values: u64,
}

/// In-memory radix trie keyed on match patterns.
///
/// The trie owns its nodes and the string pool for its whole lifetime;
/// dropping the trie releases both.
#[derive(Debug)]
pub struct Trie {
    pool: StringPool,
    root: Box<TrieNode>,
}

impl Trie {
    /// Empty trie: a root node with an empty prefix.
    pub fn new() -> Self {
        let mut pool = StringPool::new();
        let root = Box::new(TrieNode::new(pool.intern(b"")));
        Self { pool, root }
    }

    /// Record `key=value` under `pattern`.
    ///
    /// Patterns are literal byte sequences; nothing is expanded at build
    /// time. Re-inserting an existing `(pattern, key)` replaces the
    /// value.
    pub fn insert(&mut self, pattern: &[u8], key: &[u8], value: &[u8]) -> Result<()> {
        if pattern.is_empty() {
            return Err(TrieError::invalid_input("empty match pattern"));
        }

        let Self { pool, root } = self;
        let key = pool.intern(key);
        let value = pool.intern(value);

        let mut node: &mut TrieNode = root;
        let mut i = 0;
        loop {
            let prefix = pool.bytes(node.prefix).to_vec();
            let p = common_prefix(&prefix, &pattern[i..]);

            if p < prefix.len() {
                // Diverged inside the edge: the tail of the old prefix
                // moves onto a new child that adopts this node's
                // children and values wholesale.
                let tail = pool.intern(&prefix[p + 1..]);
                let head = pool.intern(&prefix[..p]);
                let mut split = TrieNode::new(tail);
                split.children = std::mem::take(&mut node.children);
                split.values = std::mem::take(&mut node.values);
                node.prefix = head;
                node.children.push(ChildEntry {
                    c: prefix[p],
                    node: Box::new(split),
                });
            }

            i += p;
            if i == pattern.len() {
                node.put_value(pool, key, value);
                return Ok(());
            }

            let c = pattern[i];
            match node.child_index(c) {
                Ok(idx) => {
                    node = &mut node.children[idx].node;
                    i += 1;
                }
                Err(slot) => {
                    let prefix = pool.intern(&pattern[i + 1..]);
                    let mut child = TrieNode::new(prefix);
                    child.put_value(pool, key, value);
                    node.children.insert(
                        slot,
                        ChildEntry {
                            c,
                            node: Box::new(child),
                        },
                    );
                    return Ok(());
                }
            }
        }
    }

    /// Value recorded for `(pattern, key)`, if any.
    ///
    /// Exact lookup over the literal pattern bytes, no glob
    /// interpretation.
    pub fn get(&self, pattern: &[u8], key: &[u8]) -> Option<&[u8]> {
        let mut node = &*self.root;
        let mut i = 0;
        loop {
            let prefix = self.pool.bytes(node.prefix);
            if !pattern[i..].starts_with(prefix) {
                return None;
            }
            i += prefix.len();

            if i == pattern.len() {
                return node
                    .values
                    .iter()
                    .find(|entry| self.pool.bytes(entry.key) == key)
                    .map(|entry| self.pool.bytes(entry.value));
            }

            let idx = node.child_index(pattern[i]).ok()?;
            node = &node.children[idx].node;
            i += 1;
        }
    }

    /// Finalize the owned pool; offsets are stable afterwards.
    pub fn finalize(&mut self) {
        self.pool.finalize();
    }

    /// The owned string pool.
    pub fn pool(&self) -> &StringPool {
        &self.pool
    }

    /// The root node. Its prefix is always the empty string.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Count nodes and table entries across the whole trie.
    pub fn counts(&self) -> TrieCounts {
        fn walk(node: &TrieNode, counts: &mut TrieCounts) {
            counts.nodes += 1;
            counts.children += node.children.len() as u64;
            counts.values += node.values.len() as u64;
            for child in &node.children {
                walk(&child.node, counts);
            }
        }

        let mut counts = TrieCounts::default();
        walk(&self.root, &mut counts);
        counts
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
