//! Loader configuration

/// What the XDTS reader does with a value that has no trailing digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnparsedCell {
    /// Drop the frame entry
    #[default]
    Drop,
    /// Reuse the cell computed most recently in the same table
    ReusePrevious,
}

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Field id of the cell tracks in TDTS tables
    pub tdts_field_id: u32,
    /// XDTS policy for values without a trailing digit run
    pub unparsed_cell: UnparsedCell,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            tdts_field_id: 4,
            unparsed_cell: UnparsedCell::Drop,
        }
    }
}
