//! Error types for database operations

use std::error::Error;
use std::fmt;
use std::path::Path;

/// Boxed error type for error sources
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, TrieError>;

/// Database operation error with rich diagnostics
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub struct TrieError {
    kind: TrieErrorKind,
    #[source]
    source: Option<BoxError>,
    #[help]
    help: Option<String>,
    context: Option<String>,
}

/// Error categories for database operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieErrorKind {
    /// Caller handed the builder unusable input
    InvalidInput,
    /// On-disk database malformed or built with an incompatible layout
    Format,
    /// I/O error
    Io,
    /// Atomic replacement of the database failed
    Commit,
}

impl TrieError {
    /// Create a new error with the given kind and optional source
    pub fn new(kind: TrieErrorKind, source: Option<BoxError>) -> Self {
        Self {
            kind,
            source,
            help: None,
            context: None,
        }
    }

    /// Add a help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add context information to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &TrieErrorKind {
        &self.kind
    }

    // Constructors for different error kinds

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(TrieErrorKind::InvalidInput, Some(msg.into().into()))
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::new(TrieErrorKind::Format, Some(msg.into().into()))
            .with_help("The file is not a hardware database or was written by an incompatible tool version")
    }

    /// Create an I/O error
    pub fn io(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(TrieErrorKind::Io, Some(Box::new(source)))
    }

    /// Create an I/O error carrying the affected path
    pub fn io_path(source: impl Error + Send + Sync + 'static, path: &Path) -> Self {
        Self::io(source).with_context(format!("path: {}", path.display()))
    }

    /// Create a commit error
    pub fn commit(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(TrieErrorKind::Commit, Some(Box::new(source)))
            .with_help("The previous database, if any, is left in place")
    }
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;

        if let Some(ctx) = &self.context {
            write!(f, ": {}", ctx)?;
        }

        if let Some(src) = &self.source {
            write!(f, ": {}", src)?;
        }

        Ok(())
    }
}
