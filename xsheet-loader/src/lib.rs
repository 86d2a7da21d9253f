//! Xsheet Loader Library
//!
//! Reads STS, TDTS and XDTS timesheet files into the canonical
//! [`xsheet_core::Timesheet`] model.

pub mod config;
mod digits;
pub mod loader;
pub mod tdts;
pub mod xdts;

pub use config::{LoaderConfig, UnparsedCell};
pub use loader::{load, load_with, strip_metadata_line};
pub use xsheet_core::{Diagnostic, DiagnosticKind, Frame, Layer, SourceFormat, Timesheet};

use std::path::PathBuf;

/// Result type for xsheet-loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for xsheet-loader operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Sts {
        path: PathBuf,
        #[source]
        source: xsheet_core::Error,
    },

    #[error("{}: file is not valid UTF-8", .path.display())]
    NotUtf8 { path: PathBuf },

    #[error("{}: malformed JSON document: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TimesheetFileTypeError: {}", .0.display())]
    UnsupportedFileType(PathBuf),
}

impl Error {
    /// Path of the file that failed to load
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Read { path, .. }
            | Error::Sts { path, .. }
            | Error::NotUtf8 { path }
            | Error::Json { path, .. }
            | Error::UnsupportedFileType(path) => path,
        }
    }

    /// True for failures caused by the file contents rather than by I/O
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Error::Read { .. })
    }
}
