//! Recoverable problems found while reading a timesheet

use std::fmt;

/// What went wrong with a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A cell value that could not be turned into a number
    NotNumber { value: String },
    /// A frame entry without any value string
    MissingValue,
    /// A track number with no matching name in the table header
    UnknownTrack { track_no: usize },
    /// Layer name bytes that are not valid Shift-JIS
    UndecodableName,
}

/// A recoverable issue, located by layer and frame where known
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Name of the affected layer
    pub layer: Option<String>,
    /// Frame index of the affected entry
    pub frame: Option<u32>,
    /// What went wrong
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Creates a new diagnostic
    pub fn new(layer: Option<String>, frame: Option<u32>, kind: DiagnosticKind) -> Self {
        Self { layer, frame, kind }
    }

    /// Emits the diagnostic as a `warn` event and returns it
    pub fn logged(self) -> Self {
        tracing::warn!("{}", self);
        self
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::NotNumber { value } => write!(f, "NotNumberError: {value:?}"),
            DiagnosticKind::MissingValue => write!(f, "frame entry has no value"),
            DiagnosticKind::UnknownTrack { track_no } => {
                write!(f, "no layer name for track {track_no}")
            }
            DiagnosticKind::UndecodableName => write!(f, "layer name is not valid Shift-JIS"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(layer) = &self.layer {
            write!(f, "layer {layer:?}: ")?;
        }
        if let Some(frame) = self.frame {
            write!(f, "frame {frame}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}
