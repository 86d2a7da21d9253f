//! Change points of a layer's cell track

/// A change point: from `frame` onward the layer shows `cell`
/// until the next change point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Frame index where the change happens
    pub frame: u32,
    /// Cell displayed from this frame on (0 = empty)
    pub cell: u32,
}

impl Frame {
    /// Creates a new change point
    pub fn new(frame: u32, cell: u32) -> Self {
        Self { frame, cell }
    }
}

impl From<(u32, u32)> for Frame {
    fn from((frame, cell): (u32, u32)) -> Self {
        Self::new(frame, cell)
    }
}
