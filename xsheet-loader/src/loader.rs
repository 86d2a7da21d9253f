//! File-extension dispatch to the format readers

use crate::{tdts, xdts, Error, LoaderConfig, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use xsheet_core::{sts, Timesheet};

/// Loads every timesheet in the file at `path` with the default configuration.
///
/// The reader is chosen by extension (case-insensitive): `.sts` yields
/// exactly one timesheet, `.tdts` one per table with cell fields, `.xdts`
/// one per table.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Timesheet>> {
    load_with(path, &LoaderConfig::default())
}

/// Loads every timesheet in the file at `path`
pub fn load_with(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Vec<Timesheet>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    tracing::debug!(path = %path.display(), ext = ?ext, "loading timesheet file");

    match ext.as_deref() {
        Some("sts") => load_sts(path).map(|sheet| vec![sheet]),
        Some("tdts") => tdts::parse_str(strip_metadata_line(&read_text(path)?), path, config),
        Some("xdts") => xdts::parse_str(strip_metadata_line(&read_text(path)?), path, config),
        _ => Err(Error::UnsupportedFileType(path.to_path_buf())),
    }
}

/// Drops the leading non-JSON metadata line of a TDTS/XDTS file
pub fn strip_metadata_line(text: &str) -> &str {
    text.split_once('\n').map_or("", |(_, rest)| rest)
}

fn load_sts(path: &Path) -> Result<Timesheet> {
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    sts::read(BufReader::new(file), path).map_err(|err| match err {
        xsheet_core::Error::Io(source) => Error::Read {
            path: path.to_path_buf(),
            source,
        },
        source => Error::Sts {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| Error::NotUtf8 {
        path: path.to_path_buf(),
    })
}
