//! # Hardware description database compilation
//!
//! This crate turns directories of record-oriented `.hwdb` source files
//! into the binary match database served by `hwdb-trie`.
//!
//! ## Usage
//!
//! The `hwdb-compile` binary runs the whole pipeline:
//!
//! ```bash
//! hwdb-compile --update -d ./hwdb.d -d /etc/hwdb.d -o hwdb.bin
//! ```
//!
//! Later directories override earlier ones when the same file name
//! appears in both.
//!
//! ## Modules
//!
//! - [`parse`] - Record parser for the textual source format
//! - [`ingest`] - Ordered source directory enumeration
//! - [`compile`] - The build pipeline
//! - [`cli`] - Command line argument definitions

pub mod cli;
pub mod compile;
pub mod error;
pub mod ingest;
pub mod parse;
