//! On-disk trie database format
//!
//! A database file is three regions back to back:
//!
//! ```text
//! [Header]       fixed 80 bytes, written last
//! [Node region]  node records in post-order, each followed by its
//!                child table then its value table
//! [String region] the packed string pool
//! ```
//!
//! All multi-byte integers are little-endian. String and node offsets in
//! the records are absolute file offsets, so a mapped file can be walked
//! without any relocation.

pub mod reader;
pub mod writer;

use crate::error::{Result, TrieError};

/// File signature, the first eight bytes of every database.
pub const SIGNATURE: [u8; 8] = *b"KSLPHHRH";

/// Format revision written into the header.
pub const TOOL_VERSION: u64 = 1;

/// Byte size of the fixed file header.
pub const HEADER_SIZE: u64 = 8 + 9 * 8;

/// Byte size of one node record: prefix offset, value count, child count.
pub const NODE_SIZE: u64 = 8 + 8 + 1;

/// Byte size of one child table entry: byte, padding, child offset.
pub const CHILD_ENTRY_SIZE: u64 = 1 + 7 + 8;

/// Byte size of one value table entry: key offset, value offset.
pub const VALUE_ENTRY_SIZE: u64 = 8 + 8;

/// Decoded file header.
///
/// The size fields carried in the wire form (`header_size`, `node_size`,
/// `child_entry_size`, `value_entry_size`) must match this module's
/// constants; [`Header::decode`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format revision of the writing tool.
    pub tool_version: u64,
    /// Total size of the file.
    pub file_size: u64,
    /// Byte size of the node region.
    pub nodes_len: u64,
    /// Byte size of the string region.
    pub strings_len: u64,
    /// Absolute offset of the root node record.
    pub nodes_root_off: u64,
}

impl Header {
    /// Encode to the fixed wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE as usize] {
        let mut out = [0u8; HEADER_SIZE as usize];
        out[..8].copy_from_slice(&SIGNATURE);
        let fields = [
            self.tool_version,
            self.file_size,
            HEADER_SIZE,
            NODE_SIZE,
            CHILD_ENTRY_SIZE,
            VALUE_ENTRY_SIZE,
            self.nodes_len,
            self.strings_len,
            self.nodes_root_off,
        ];
        for (i, field) in fields.iter().enumerate() {
            out[8 + i * 8..16 + i * 8].copy_from_slice(&field.to_le_bytes());
        }
        out
    }

    /// Decode and validate a header read from the start of a file.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE as usize {
            return Err(TrieError::format("file shorter than the header"));
        }
        if bytes[..8] != SIGNATURE {
            return Err(TrieError::format("bad signature"));
        }

        let field = |i: usize| -> u64 {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[8 + i * 8..16 + i * 8]);
            u64::from_le_bytes(raw)
        };

        if field(2) != HEADER_SIZE
            || field(3) != NODE_SIZE
            || field(4) != CHILD_ENTRY_SIZE
            || field(5) != VALUE_ENTRY_SIZE
        {
            return Err(TrieError::format("record layout mismatch"));
        }

        Ok(Self {
            tool_version: field(0),
            file_size: field(1),
            nodes_len: field(6),
            strings_len: field(7),
            nodes_root_off: field(8),
        })
    }

    /// Absolute offset of the string region.
    pub fn strings_off(&self) -> u64 {
        HEADER_SIZE + self.nodes_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = Header {
            tool_version: TOOL_VERSION,
            file_size: 4096,
            nodes_len: 1000,
            strings_len: 3016,
            nodes_root_off: 900,
        };
        let decoded = Header::decode(&header.encode()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_decode_rejects_bad_signature() {
        let mut raw = Header {
            tool_version: TOOL_VERSION,
            file_size: 80,
            nodes_len: 0,
            strings_len: 0,
            nodes_root_off: 80,
        }
        .encode();
        raw[0] ^= 0xff;
        assert!(Header::decode(&raw).is_err());
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert!(Header::decode(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_decode_rejects_layout_mismatch() {
        let mut raw = Header {
            tool_version: TOOL_VERSION,
            file_size: 80,
            nodes_len: 0,
            strings_len: 0,
            nodes_root_off: 80,
        }
        .encode();
        // corrupt node_size
        raw[8 + 3 * 8] = 0x55;
        assert!(Header::decode(&raw).is_err());
    }
}
