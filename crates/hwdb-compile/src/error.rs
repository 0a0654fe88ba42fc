use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compiling hardware database sources
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// IO error reading a source file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source directory cannot be enumerated
    #[error("Failed to enumerate {}", path.display())]
    #[diagnostic(
        code(hwdb::enumerate),
        help("Check that the directory exists and is readable")
    )]
    Enumerate {
        #[source]
        source: walkdir::Error,
        /// Directory that failed to enumerate
        path: PathBuf,
    },

    /// Serializing the database failed
    #[error("Failed to write database to {}", path.display())]
    #[diagnostic(
        code(hwdb::write),
        help("The previous database, if any, is left in place")
    )]
    Write {
        #[source]
        source: hwdb_trie::TrieError,
        /// Target database path
        path: PathBuf,
    },

    /// The trie builder rejected a record
    #[error(transparent)]
    #[diagnostic(code(hwdb::trie))]
    Trie(#[from] hwdb_trie::TrieError),
}

/// Result type for compilation operations
pub type Result<T> = std::result::Result<T, CompileError>;
