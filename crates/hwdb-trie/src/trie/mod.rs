//! Radix trie implementation

pub mod node;
pub mod tree;

pub use node::{ChildEntry, TrieNode, ValueEntry};
pub use tree::{Trie, TrieCounts};
