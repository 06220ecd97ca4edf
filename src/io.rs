//! Dataset loading and saving.
//!
//! Datasets are read from and written to CSV or JSON Lines files. The
//! format is picked from the file extension.

use crate::error::{Error, Result};
use crate::model::{ConversionResult, Dataset, Row};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Column order of dataset files.
pub const DATASET_COLUMNS: [&str; 3] = ["ID", "text", "target"];

/// Column order of conversion result files.
pub const RESULT_COLUMNS: [&str; 5] = ["ID", "original", "text", "target", "noise"];

/// Supported dataset file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Comma-separated values with a header row
    Csv,
    /// One JSON object per line
    JsonLines,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "CSV"),
            DataFormat::JsonLines => write!(f, "JSON Lines"),
        }
    }
}

/// Detect dataset format from a file extension.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<DataFormat> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => Ok(DataFormat::Csv),
        "jsonl" | "ndjson" => Ok(DataFormat::JsonLines),
        "" => Err(Error::UnsupportedFormat(format!(
            "{} has no file extension",
            path.display()
        ))),
        other => Err(Error::UnsupportedFormat(format!(".{}", other))),
    }
}

/// Loads a dataset, dispatching on the file extension.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    let file = File::open(path)?;

    let dataset = match format {
        DataFormat::Csv => read_csv(file)?,
        DataFormat::JsonLines => read_jsonl(BufReader::new(file))?,
    };
    log::info!("loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Saves a dataset, dispatching on the file extension.
pub fn save_dataset(path: impl AsRef<Path>, dataset: &Dataset) -> Result<()> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    let writer = BufWriter::new(File::create(path)?);

    match format {
        DataFormat::Csv => write_csv(writer, &dataset.rows, &DATASET_COLUMNS),
        DataFormat::JsonLines => write_jsonl(writer, &dataset.rows),
    }
}

/// Saves conversion results, dispatching on the file extension.
pub fn save_results(path: impl AsRef<Path>, results: &[ConversionResult]) -> Result<()> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    let writer = BufWriter::new(File::create(path)?);

    match format {
        DataFormat::Csv => write_csv(writer, results, &RESULT_COLUMNS),
        DataFormat::JsonLines => write_jsonl(writer, results),
    }
}

/// Reads rows from CSV with at least `ID`, `text` and `target` columns.
///
/// Extra columns are dropped, but counted in [`Dataset::field_count`].
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let field_count = reader.headers()?.len();
    let mut dataset = Dataset::new().with_field_count(field_count);

    for (i, record) in reader.deserialize::<Row>().enumerate() {
        let row = record.map_err(|e| Error::Csv(format!("row {}: {}", i + 1, e)))?;
        dataset.push(row);
    }
    Ok(dataset)
}

/// Reads rows from JSON Lines. Blank lines are skipped.
///
/// [`Dataset::field_count`] is the number of distinct keys across all
/// objects.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    let mut keys: HashSet<String> = HashSet::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let object: Map<String, Value> =
            serde_json::from_str(&line).map_err(|e| Error::Json(format!("line {}: {}", i + 1, e)))?;
        keys.extend(object.keys().cloned());

        let row: Row = serde_json::from_value(Value::Object(object))
            .map_err(|e| Error::Json(format!("line {}: {}", i + 1, e)))?;
        dataset.push(row);
    }

    if !keys.is_empty() {
        dataset.field_count = keys.len();
    }
    Ok(dataset)
}

/// Writes records as CSV.
///
/// The header is written even when there are no records.
pub fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T], columns: &[&str]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    if records.is_empty() {
        writer.write_record(columns)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes records as JSON Lines.
pub fn write_jsonl<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut writer = writer;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParsedReply;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format_from_path("train.csv").unwrap(), DataFormat::Csv);
        assert_eq!(detect_format_from_path("train.CSV").unwrap(), DataFormat::Csv);
        assert_eq!(detect_format_from_path("a/b.jsonl").unwrap(), DataFormat::JsonLines);
        assert!(matches!(
            detect_format_from_path("train.parquet"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(detect_format_from_path("train").is_err());
    }

    #[test]
    fn test_read_csv_ignores_extra_columns() {
        let data = "ID,text,target,split\nynat_0,\"정부, 대책 발표\",2,train\nynat_1,hello,3,dev\n";
        let dataset = read_csv(data.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.field_count, 4);
        assert_eq!(dataset.rows[0], Row::new("ynat_0", "정부, 대책 발표", 2));
        assert_eq!(dataset.rows[1].target, 3);
    }

    #[test]
    fn test_read_csv_missing_text_column() {
        let data = "ID,target\nynat_0,2\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_read_jsonl_skips_blank_lines() {
        let data = "{\"ID\":\"a\",\"text\":\"첫째\",\"target\":0}\n\n{\"ID\":\"b\",\"text\":\"둘째\",\"target\":6}\n";
        let dataset = read_jsonl(data.as_bytes()).unwrap();
        assert_eq!(dataset.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dataset.field_count, 3);
    }

    #[test]
    fn test_read_jsonl_counts_union_of_keys() {
        let data = "{\"ID\":\"a\",\"text\":\"첫째\",\"target\":0,\"split\":\"train\"}\n{\"ID\":\"b\",\"text\":\"둘째\",\"target\":6,\"source\":\"yna\"}\n";
        let dataset = read_jsonl(data.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.field_count, 5);
    }

    #[test]
    fn test_read_jsonl_reports_line() {
        let data = "{\"ID\":\"a\",\"text\":\"첫째\",\"target\":0}\n{\"ID\":\"b\"}\n";
        match read_jsonl(data.as_bytes()) {
            Err(Error::Json(msg)) => assert!(msg.starts_with("line 2")),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_result_csv_columns() {
        let results = vec![
            ConversionResult::from_reply(
                "a",
                "갯벌도 얼려버린^한파",
                ParsedReply {
                    text: "갯벌도 얼려버린 혹한".into(),
                    label: Some(0),
                    noise: Some(true),
                    reason: String::new(),
                },
            ),
            ConversionResult::from_reply("b", "깨진문장", ParsedReply::default()),
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &results, &RESULT_COLUMNS).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID,original,text,target,noise");
        assert_eq!(lines[1], "a,갯벌도 얼려버린^한파,갯벌도 얼려버린 혹한,0,1");
        assert_eq!(lines[2], "b,깨진문장,,,");
    }

    #[test]
    fn test_empty_results_still_have_header() {
        let mut buf = Vec::new();
        write_csv::<_, ConversionResult>(&mut buf, &[], &RESULT_COLUMNS).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ID,original,text,target,noise\n");
    }

    #[test]
    fn test_dataset_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset: Dataset = vec![
            Row::new("a", "與 대표 선출, 친박·비박 구도 격화", 2),
            Row::new("b", "따옴표 \"포함\" 문장", 1),
        ]
        .into();

        for name in ["data.csv", "data.jsonl"] {
            let path = dir.path().join(name);
            save_dataset(&path, &dataset).unwrap();
            assert_eq!(load_dataset(&path).unwrap(), dataset);
        }
    }

    #[test]
    fn test_save_results_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let results = vec![ConversionResult::from_reply("a", "원문", ParsedReply::default())];
        save_results(&path, &results).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["ID"], "a");
        assert_eq!(value["noise"], "");
    }
}
