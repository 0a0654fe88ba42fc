//! Hardware database primitives
//!
//! This crate provides the building blocks for the binary hardware
//! description database:
//!
//! - **String pool**: deduplicating byte arena whose entries resolve to
//!   stable offsets in the finished file
//! - **Radix trie**: compressed-edge trie over match patterns, with the
//!   node-splitting insertion algorithm
//! - **Database I/O**: two-pass post-order serializer with atomic file
//!   replacement, and a memory-mapped reader with glob-aware queries
//!
//! # Design Philosophy
//!
//! - The trie owns its nodes and its string pool for the whole build
//! - Patterns are stored literally; glob interpretation happens only on
//!   the reader side
//! - The file format is self-describing: the header carries every record
//!   size, and readers reject anything they did not write
//! - A build either commits atomically or leaves the previous database
//!   untouched
//!
//! # Example
//!
//! ```rust,ignore
//! use hwdb_trie::{Trie, write_db, Hwdb};
//!
//! # fn example() -> hwdb_trie::Result<()> {
//! let mut trie = Trie::new();
//! trie.insert(b"usb:v046DpC077*", b"ID_VENDOR", b"Logitech")?;
//! write_db(&mut trie, "hwdb.bin".as_ref())?;
//!
//! let db = Hwdb::open("hwdb.bin")?;
//! for (key, value) in db.query("usb:v046DpC077d0100")? {
//!     println!("{key}={value}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

/// On-disk database format, writer, and reader
pub mod db;
pub mod error;
/// Deduplicating string pool
pub mod pool;
/// Radix trie implementation
pub mod trie;

pub use db::reader::Hwdb;
pub use db::writer::write_db;
pub use error::{Result, TrieError, TrieErrorKind};
pub use pool::{Handle, PoolStats, StringPool};
pub use trie::{Trie, TrieCounts, TrieNode};
