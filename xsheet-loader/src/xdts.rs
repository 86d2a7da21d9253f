//! XDTS timesheet reader

use crate::digits::parse_decimal;
use crate::{Error, LoaderConfig, Result, UnparsedCell};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;
use xsheet_core::{file_name_of, Diagnostic, DiagnosticKind, Frame, Layer, SourceFormat, Timesheet};

/// Value meaning "no cell shown"
const NULL_CELL: &str = "SYMBOL_NULL_CELL";

/// Hold/tick marks that do not change the displayed cell
const NO_CHANGE: [&str; 3] = ["SYMBOL_TICK_1", "SYMBOL_TICK_2", "SYMBOL_HYPHEN"];

static TRAILING_DIGITS: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    time_tables: Vec<Table>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    name: String,
    duration: u32,
    #[serde(default)]
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

/// How a single XDTS value affects the layer
#[derive(Debug, PartialEq, Eq)]
enum Mark {
    Cell(u32),
    NoChange,
    NotNumber,
}

/// Parses the JSON part of an XDTS file (metadata line already removed)
pub fn parse_str(json: &str, path: &Path, config: &LoaderConfig) -> Result<Vec<Timesheet>> {
    let document: Document = serde_json::from_str(json).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = file_name_of(path);

    let timesheets = document
        .time_tables
        .into_iter()
        .map(|table| {
            let name = format!("{}->{}", file_name, table.name);
            let (layers, diagnostics) = read_layers(&table, config.unparsed_cell);
            tracing::debug!(name = %name, layers = layers.len(), "read XDTS table");

            Timesheet::new(path, SourceFormat::Xdts, name, table.duration, layers)
                .with_diagnostics(diagnostics)
        })
        .collect();

    Ok(timesheets)
}

fn read_layers(table: &Table, policy: UnparsedCell) -> (Vec<Layer>, Vec<Diagnostic>) {
    let mut layers = Vec::new();
    let mut diagnostics = Vec::new();

    let Some(field) = table.fields.first() else {
        return (layers, diagnostics);
    };
    let Some(header) = table
        .time_table_headers
        .iter()
        .find(|h| h.field_id == field.field_id)
    else {
        return (layers, diagnostics);
    };

    // Last cell computed anywhere in this table, for `UnparsedCell::ReusePrevious`
    let mut last_cell: Option<u32> = None;

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
            let Some(value) = entry.data.first().and_then(|d| d.values.first()) else {
                diagnostics.push(
                    Diagnostic::new(Some(name.clone()), Some(entry.frame), DiagnosticKind::MissingValue)
                        .logged(),
                );
                continue;
            };

            let cell = match parse_value(value) {
                Mark::Cell(cell) => cell,
                Mark::NoChange => continue,
                Mark::NotNumber => {
                    diagnostics.push(
                        Diagnostic::new(
                            Some(name.clone()),
                            Some(entry.frame),
                            DiagnosticKind::NotNumber {
                                value: value_text(value),
                            },
                        )
                        .logged(),
                    );
                    match (policy, last_cell) {
                        (UnparsedCell::ReusePrevious, Some(cell)) => cell,
                        _ => continue,
                    }
                }
            };

            last_cell = Some(cell);
            frames.push(Frame::new(entry.frame, cell));
        }

        layers.push(Layer::new(name.as_str(), frames));
    }

    (layers, diagnostics)
}

/// Maps an XDTS value to a cell. Strings use their trailing run of decimal
/// digits (full-width included); JSON integers are taken as cells directly.
fn parse_value(value: &Value) -> Mark {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Number(n) => {
            return n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map_or(Mark::NotNumber, Mark::Cell)
        }
        _ => return Mark::NotNumber,
    };

    if text == NULL_CELL {
        return Mark::Cell(0);
    }
    if NO_CHANGE.iter().any(|s| *s == text) {
        return Mark::NoChange;
    }

    let re = TRAILING_DIGITS
        .get_or_init(|| Regex::new(r"\d+$").expect("trailing digit pattern is valid"));
    re.find(text)
        .and_then(|m| parse_decimal(m.as_str()))
        .map_or(Mark::NotNumber, Mark::Cell)
}

/// Text of a JSON value as it appears in diagnostics
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(frame: u32, value: &str) -> serde_json::Value {
        json!({ "frame": frame, "data": [{ "id": 0, "values": [value] }] })
    }

    fn document(frames: serde_json::Value) -> String {
        json!({
            "header": { "cut": "1", "scene": "1" },
            "timeTables": [{
                "name": "sheet1",
                "duration": 12,
                "fields": [{ "fieldId": 0, "tracks": [{ "trackNo": 0, "frames": frames }] }],
                "timeTableHeaders": [{ "fieldId": 0, "names": ["A"] }]
            }],
            "version": 5
        })
        .to_string()
    }

    fn parse_with(frames: serde_json::Value, config: &LoaderConfig) -> Timesheet {
        let mut sheets = parse_str(&document(frames), Path::new("dir/cut.xdts"), config).unwrap();
        assert_eq!(sheets.len(), 1);
        sheets.remove(0)
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(&json!("SYMBOL_NULL_CELL")), Mark::Cell(0));
        assert_eq!(parse_value(&json!("SYMBOL_HYPHEN")), Mark::NoChange);
        assert_eq!(parse_value(&json!("SYMBOL_TICK_1")), Mark::NoChange);
        assert_eq!(parse_value(&json!("SYMBOL_TICK_2")), Mark::NoChange);
        assert_eq!(parse_value(&json!("cell_042")), Mark::Cell(42));
        assert_eq!(parse_value(&json!("7")), Mark::Cell(7));
        assert_eq!(parse_value(&json!("A3b")), Mark::NotNumber);
        assert_eq!(parse_value(&json!("99999999999999999999")), Mark::NotNumber);
    }

    #[test]
    fn test_parse_value_full_width_and_numbers() {
        assert_eq!(parse_value(&json!("セル１２")), Mark::Cell(12));
        assert_eq!(parse_value(&json!("A-０３")), Mark::Cell(3));
        assert_eq!(parse_value(&json!(9)), Mark::Cell(9));
        assert_eq!(parse_value(&json!(-2)), Mark::NotNumber);
        assert_eq!(parse_value(&json!(1.5)), Mark::NotNumber);
        assert_eq!(parse_value(&json!(null)), Mark::NotNumber);
    }

    #[test]
    fn test_hyphen_contributes_nothing() {
        let sheet = parse_with(
            json!([entry(0, "1"), entry(2, "SYMBOL_HYPHEN"), entry(4, "SYMBOL_NULL_CELL")]),
            &LoaderConfig::default(),
        );

        assert_eq!(sheet.name(), "cut.xdts->sheet1");
        assert_eq!(sheet.frame_count(), 12);
        assert_eq!(
            sheet.layers()[0].frames(),
            &[Frame::new(0, 1), Frame::new(4, 0)]
        );
        assert!(sheet.is_clean());
    }

    #[test]
    fn test_hyphen_at_first_frame_gets_anchor() {
        let sheet = parse_with(
            json!([entry(0, "SYMBOL_HYPHEN"), entry(3, "2")]),
            &LoaderConfig::default(),
        );
        assert_eq!(
            sheet.layers()[0].frames(),
            &[Frame::new(0, 0), Frame::new(3, 2)]
        );
    }

    #[test]
    fn test_not_number_is_dropped_by_default() {
        let sheet = parse_with(
            json!([entry(0, "1"), entry(2, "x"), entry(4, "3")]),
            &LoaderConfig::default(),
        );

        assert_eq!(
            sheet.layers()[0].frames(),
            &[Frame::new(0, 1), Frame::new(4, 3)]
        );
        assert_eq!(sheet.diagnostics().len(), 1);
        assert_eq!(
            sheet.diagnostics()[0].kind,
            DiagnosticKind::NotNumber { value: "x".to_string() }
        );
    }

    #[test]
    fn test_not_number_reuses_previous_cell() {
        let config = LoaderConfig {
            unparsed_cell: UnparsedCell::ReusePrevious,
            ..LoaderConfig::default()
        };
        let sheet = parse_with(
            json!([entry(0, "x"), entry(1, "2"), entry(3, "SYMBOL_NULL_CELL"), entry(5, "y")]),
            &config,
        );

        // Frame 0 has nothing to reuse and is dropped; frame 5 repeats the
        // null cell of frame 3 and is compressed away.
        assert_eq!(
            sheet.layers()[0].frames(),
            &[Frame::new(0, 0), Frame::new(1, 2), Frame::new(3, 0)]
        );
        assert_eq!(sheet.diagnostics().len(), 2);
    }

    #[test]
    fn test_first_field_selects_header() {
        let doc = json!({
            "timeTables": [
                {
                    "name": "t1",
                    "duration": 4,
                    "fields": [{ "fieldId": 2, "tracks": [{ "trackNo": 0, "frames": [entry(0, "5")] }] }],
                    "timeTableHeaders": [
                        { "fieldId": 0, "names": ["wrong"] },
                        { "fieldId": 2, "names": ["right"] }
                    ]
                },
                {
                    "name": "t2",
                    "duration": 8,
                    "fields": [{ "fieldId": 3, "tracks": [{ "trackNo": 0, "frames": [] }] }],
                    "timeTableHeaders": [{ "fieldId": 0, "names": ["A"] }]
                },
                { "name": "t3", "duration": 2 }
            ]
        });

        let sheets = parse_str(&doc.to_string(), Path::new("x.xdts"), &LoaderConfig::default()).unwrap();
        assert_eq!(sheets.len(), 3);
        assert_eq!(sheets[0].layers()[0].name(), "right");
        assert!(sheets[1].layers().is_empty());
        assert_eq!(sheets[1].frame_count(), 8);
        assert!(sheets[2].layers().is_empty());
    }

    #[test]
    fn test_out_of_order_frames_are_sorted() {
        let sheet = parse_with(json!([entry(4, "2"), entry(0, "1")]), &LoaderConfig::default());

        let frames = sheet.layers()[0].frames();
        assert_eq!(frames, &[Frame::new(0, 1), Frame::new(4, 2)]);
        assert!(frames.windows(2).all(|w| w[0].frame < w[1].frame));
    }

    #[test]
    fn test_non_string_value_is_recoverable() {
        let sheet = parse_with(
            json!([
                entry(0, "1"),
                { "frame": 2, "data": [{ "id": 0, "values": [true] }] },
                { "frame": 4, "data": [{ "id": 0, "values": [6] }] }
            ]),
            &LoaderConfig::default(),
        );

        assert_eq!(
            sheet.layers()[0].frames(),
            &[Frame::new(0, 1), Frame::new(4, 6)]
        );
        assert_eq!(
            sheet.diagnostics()[0].kind,
            DiagnosticKind::NotNumber { value: "true".to_string() }
        );
    }

    #[test]
    fn test_missing_time_tables() {
        let err = parse_str("{}", Path::new("x.xdts"), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }
}
