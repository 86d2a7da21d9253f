//! TDTS timesheet reader
//!
//! A TDTS document lists sheets (cuts), each holding several tables. Only
//! tables with a `fields` key carry cell tracks; each of those becomes one
//! [`Timesheet`].

use crate::digits::parse_decimal;
use crate::{Error, LoaderConfig, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use xsheet_core::{file_name_of, Diagnostic, DiagnosticKind, Frame, Layer, SourceFormat, Timesheet};

/// Value meaning "no cell shown"
const NULL_CELL: &str = "SYMBOL_NULL_CELL";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    time_sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sheet {
    header: SheetHeader,
    // Kept untyped until the `fields` check so skipped tables are never validated.
    time_tables: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SheetHeader {
    cut: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    name: String,
    duration: u32,
    fields: Vec<Field>,
    #[serde(default)]
    time_table_headers: Vec<TableHeader>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Field {
    field_id: u32,
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Track {
    track_no: usize,
    #[serde(default)]
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: u32,
    #[serde(default)]
    data: Vec<FrameData>,
}

#[derive(Debug, Deserialize)]
struct FrameData {
    #[serde(default)]
    values: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableHeader {
    field_id: u32,
    #[serde(default)]
    names: Vec<String>,
}

/// Parses the JSON part of a TDTS file (metadata line already removed)
pub fn parse_str(json: &str, path: &Path, config: &LoaderConfig) -> Result<Vec<Timesheet>> {
    let json_err = |source| Error::Json {
        path: path.to_path_buf(),
        source,
    };

    let document: Document = serde_json::from_str(json).map_err(json_err)?;
    let file_name = file_name_of(path);

    let mut timesheets = Vec::new();
    for sheet in document.time_sheets {
        let cut = value_text(&sheet.header.cut);

        for raw in sheet.time_tables {
            if raw.get("fields").is_none() {
                tracing::debug!(cut = %cut, "skipping table without fields");
                continue;
            }

            let table: Table = serde_json::from_value(raw).map_err(json_err)?;
            let name = format!("{}->{}->{}", file_name, cut, table.name);
            let (layers, diagnostics) = read_layers(&table, config.tdts_field_id);
            tracing::debug!(name = %name, layers = layers.len(), "read TDTS table");

            timesheets.push(
                Timesheet::new(path, SourceFormat::Tdts, name, table.duration, layers)
                    .with_diagnostics(diagnostics),
            );
        }
    }

    Ok(timesheets)
}

fn read_layers(table: &Table, field_id: u32) -> (Vec<Layer>, Vec<Diagnostic>) {
    let mut layers = Vec::new();
    let mut diagnostics = Vec::new();

    let field = table.fields.iter().find(|f| f.field_id == field_id);
    let header = table
        .time_table_headers
        .iter()
        .find(|h| h.field_id == field_id);
    let (Some(field), Some(header)) = (field, header) else {
        return (layers, diagnostics);
    };

    for track in &field.tracks {
        let Some(name) = header.names.get(track.track_no) else {
            diagnostics.push(
                Diagnostic::new(
                    None,
                    None,
                    DiagnosticKind::UnknownTrack {
                        track_no: track.track_no,
                    },
                )
                .logged(),
            );
            continue;
        };

        let mut frames = Vec::with_capacity(track.frames.len());
        for entry in &track.frames {
            let value = entry.data.first().and_then(|d| d.values.first());
            let kind = match value.map(|v| (v, parse_cell(v))) {
                Some((_, Some(cell))) => {
                    frames.push(Frame::new(entry.frame, cell));
                    continue;
                }
                Some((v, None)) => DiagnosticKind::NotNumber {
                    value: value_text(v),
                },
                None => DiagnosticKind::MissingValue,
            };
            diagnostics.push(Diagnostic::new(Some(name.clone()), Some(entry.frame), kind).logged());
        }

        layers.push(Layer::new(name.as_str(), frames));
    }

    (layers, diagnostics)
}

/// Maps a TDTS value to a cell; `None` means the entry is dropped.
/// JSON integers are taken as cells directly.
fn parse_cell(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) if s == NULL_CELL => Some(0),
        Value::String(s) => {
            let s = s.trim();
            parse_decimal(s.strip_prefix('+').unwrap_or(s))
        }
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

/// Text of a JSON value as it appears in names and diagnostics
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
