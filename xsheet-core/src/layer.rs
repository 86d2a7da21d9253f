//! Layer data structures and change-point normalization

use crate::Frame;

/// One independently animated channel of a timesheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    name: String,
    frames: Vec<Frame>,
}

impl Layer {
    /// Creates a layer from raw change points in any frame order.
    ///
    /// The stored sequence is sorted by frame and starts at frame 0 (a
    /// `(0, 0)` entry is inserted when the source has none). It never holds
    /// two consecutive entries with the same cell.
    pub fn new(name: impl Into<String>, raw: Vec<Frame>) -> Self {
        Self {
            name: name.into(),
            frames: normalize(raw),
        }
    }

    /// Returns the layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the normalized change points
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the cell displayed at `frame`
    pub fn cell_at(&self, frame: u32) -> u32 {
        let idx = self.frames.partition_point(|f| f.frame <= frame);
        idx.checked_sub(1)
            .map(|i| self.frames[i].cell)
            .unwrap_or(0)
    }

    /// Number of change points
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// A constructed layer always holds at least the frame-0 entry
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Sorts by frame, anchors the sequence at frame 0 and drops entries that
/// repeat the previous cell.
pub fn normalize(mut frames: Vec<Frame>) -> Vec<Frame> {
    // Stable, so entries sharing a frame keep their source order.
    frames.sort_by_key(|f| f.frame);

    if frames.first().map_or(true, |f| f.frame != 0) {
        frames.insert(0, Frame::new(0, 0));
    }

    // Keeps the first entry of every run of equal cells.
    frames.dedup_by_key(|f| f.cell);
    frames
}
