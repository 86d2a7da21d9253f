//! Timesheet data structures

use crate::{Diagnostic, Layer};
use std::path::{Path, PathBuf};

/// On-disk format a timesheet was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceFormat {
    /// Binary "ShiraheiTimeSheet" container
    Sts,
    /// JSON document with sheets of tables
    Tdts,
    /// JSON document with a flat list of tables
    Xdts,
}

/// One logical table of layers read from a source file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timesheet {
    source_path: PathBuf,
    format: SourceFormat,
    name: String,
    frame_count: u32,
    layers: Vec<Layer>,
    diagnostics: Vec<Diagnostic>,
}

impl Timesheet {
    /// Creates a new timesheet
    pub fn new(
        source_path: impl Into<PathBuf>,
        format: SourceFormat,
        name: impl Into<String>,
        frame_count: u32,
        layers: Vec<Layer>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            format,
            name: name.into(),
            frame_count,
            layers,
            diagnostics: Vec::new(),
        }
    }

    /// Attaches the recoverable issues found while building this timesheet
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Path of the file this timesheet was read from
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Format of the source file
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Display name, derived from the file name and embedded sheet/table names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared duration in frames
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Layers in source order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Finds the first layer with the given name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Recoverable issues found while reading
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when no entry had to be dropped or repaired
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Returns the final path component as text, as used in display names
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
