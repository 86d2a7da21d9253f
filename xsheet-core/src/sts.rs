//! STS binary timesheet reader
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! u8        reserved
//! [u8; 17]  magic "ShiraheiTimeSheet"
//! u8        layer count
//! u16       frame count
//! [u8; 2]   reserved
//! per layer: [u16; frame count] cell of every frame
//! per layer: u8 name length, then the name in Shift-JIS
//! ```

use crate::timesheet::file_name_of;
use crate::{Diagnostic, DiagnosticKind, Error, Frame, Layer, Result, SourceFormat, Timesheet};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::SHIFT_JIS;
use std::io::{self, Read};
use std::path::Path;

/// Magic string following the leading reserved byte
pub const MAGIC: &[u8; 17] = b"ShiraheiTimeSheet";

/// STS file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StsHeader {
    /// Number of layers
    pub layer_count: u8,
    /// Number of frames per layer
    pub frame_count: u16,
}

impl StsHeader {
    /// Reads a header from a reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let eof = short_read("header");

        reader.read_u8().map_err(&eof)?;

        let mut magic = [0u8; 17];
        reader.read_exact(&mut magic).map_err(&eof)?;
        if &magic != MAGIC {
            return Err(Error::InvalidMagic {
                found: String::from_utf8_lossy(&magic).into_owned(),
            });
        }

        let layer_count = reader.read_u8().map_err(&eof)?;
        let frame_count = reader.read_u16::<LittleEndian>().map_err(&eof)?;

        let mut reserved = [0u8; 2];
        reader.read_exact(&mut reserved).map_err(&eof)?;

        Ok(Self {
            layer_count,
            frame_count,
        })
    }
}

/// Reads a complete STS timesheet. `path` is recorded as the source and
/// its file name becomes the display name.
pub fn read<R: Read>(mut reader: R, path: &Path) -> Result<Timesheet> {
    let header = StsHeader::read(&mut reader)?;
    tracing::debug!(
        layers = header.layer_count,
        frames = header.frame_count,
        "read STS header"
    );

    // Cell grids
    let mut grid = vec![0u16; header.frame_count as usize];
    let mut tracks = Vec::with_capacity(header.layer_count as usize);
    for _ in 0..header.layer_count {
        reader
            .read_u16_into::<LittleEndian>(&mut grid)
            .map_err(short_read("cell grid"))?;
        tracks.push(change_points(&grid));
    }

    // Layer names
    let mut layers = Vec::with_capacity(tracks.len());
    let mut diagnostics = Vec::new();
    for raw in tracks {
        let len = reader.read_u8().map_err(short_read("layer name"))?;
        let mut bytes = vec![0u8; len as usize];
        reader
            .read_exact(&mut bytes)
            .map_err(short_read("layer name"))?;

        let (name, had_errors) = SHIFT_JIS.decode_without_bom_handling(&bytes);
        if had_errors {
            diagnostics.push(
                Diagnostic::new(Some(name.to_string()), None, DiagnosticKind::UndecodableName)
                    .logged(),
            );
        }
        layers.push(Layer::new(name, raw));
    }

    Ok(Timesheet::new(
        path,
        SourceFormat::Sts,
        file_name_of(path),
        header.frame_count as u32,
        layers,
    )
    .with_diagnostics(diagnostics))
}

/// Keeps the frames of a dense grid where the cell changes
fn change_points(grid: &[u16]) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for (j, &cell) in grid.iter().enumerate() {
        let cell = cell as u32;
        if frames.last().map_or(true, |f| f.cell != cell) {
            frames.push(Frame::new(j as u32, cell));
        }
    }
    frames
}

/// Maps an early end of stream to `Truncated`, anything else to `Io`
fn short_read(section: &'static str) -> impl Fn(io::Error) -> Error {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated { section }
        } else {
            Error::Io(err)
        }
    }
}
