use crate::error::{CliError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use strucflow::core::record::StructureRecord;
use tracing::{debug, info};

/// Reads one JSON structure record per line. Blank lines are skipped.
pub fn read_records(path: &Path) -> Result<Vec<StructureRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: StructureRecord =
            serde_json::from_str(&line).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: anyhow::anyhow!("line {}: {}", index + 1, e),
            })?;
        records.push(record);
    }
    info!("Read {} record(s) from {:?}", records.len(), path);
    Ok(records)
}

/// Writes serializable rows as CSV with a header row; returns the number of rows.
pub fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    debug!("Wrote {} CSV row(s) to {:?}", count, path);
    Ok(count)
}

/// Writes records back out in the input format.
pub fn write_records<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a StructureRecord>,
) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|e| CliError::Other(e.into()))?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    debug!("Wrote {} record(s) to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(id: &str) -> StructureRecord {
        StructureRecord {
            structure_id: id.to_string(),
            num_models: 1,
            resolution: Some(1.8),
            ..Default::default()
        }
    }

    #[test]
    fn records_survive_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let written = vec![record("1ABC"), record("2XYZ")];
        assert_eq!(write_records(&path, &written).unwrap(), 2);
        assert_eq!(read_records(&path).unwrap(), written);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let line = serde_json::to_string(&record("1ABC")).unwrap();
        fs::write(&path, format!("\n{line}\n   \n")).unwrap();
        assert_eq!(read_records(&path).unwrap().len(), 1);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let line = serde_json::to_string(&record("1ABC")).unwrap();
        fs::write(&path, format!("{line}\n{{not json}}\n")).unwrap();
        let err = read_records(&path).unwrap_err();
        assert!(matches!(&err, CliError::FileParsing { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn csv_rows_have_a_header() {
        #[derive(Serialize)]
        struct Row {
            key: &'static str,
            count: usize,
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let n = write_csv(&path, [Row { key: "HIS_NE2", count: 3 }, Row { key: "ZN_ZN", count: 1 }])
            .unwrap();
        assert_eq!(n, 2);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "key,count\nHIS_NE2,3\nZN_ZN,1\n");
    }
}
