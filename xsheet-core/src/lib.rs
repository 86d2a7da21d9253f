//! Xsheet Core Library
//!
//! Canonical in-memory model for animation timesheets (layers of
//! run-length-compressed cell change points) and the reader for the binary
//! STS container.

pub mod diagnostic;
pub mod frame;
pub mod layer;
pub mod sts;
pub mod timesheet;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use frame::Frame;
pub use layer::{normalize, Layer};
pub use sts::StsHeader;
pub use timesheet::{file_name_of, SourceFormat, Timesheet};

/// Result type for xsheet-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for xsheet-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NotSTSFileFormatError: expected 'ShiraheiTimeSheet', found {found:?}")]
    InvalidMagic { found: String },

    #[error("Truncated STS stream while reading {section}")]
    Truncated { section: &'static str },
}
