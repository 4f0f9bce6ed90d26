//! Row decoder: turns delimited text (header row + records) or a sheet tab's
//! cell matrix into typed rows.
//!
//! CSV columns are matched to fields by header name (`#[serde(rename)]` on
//! the row struct), sheet columns by position.
//!
//! Records are parsed one by one from the reader, but the decoded rows are
//! collected into a `Vec`: validation has to see every row before the first
//! write, so a batch is bounded by memory.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Read};

use super::error::ImportError;
use crate::shared::sheet::Tab;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Декодированная строка вместе с номером строки исходного файла (1-based)
#[derive(Debug, Clone)]
pub struct DecodedRow<T> {
    pub line: usize,
    pub record: T,
}

pub fn decode_csv<T, R>(reader: R) -> Result<Vec<DecodedRow<T>>, ImportError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = BufReader::new(reader);
    let starts_with_bom = reader
        .fill_buf()
        .map_err(|e| ImportError::Decode {
            line: 1,
            message: e.to_string(),
        })?
        .starts_with(UTF8_BOM);
    if starts_with_bom {
        reader.consume(UTF8_BOM.len());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(e, 1))?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::Decode {
            line: 1,
            message: "missing header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<T>().enumerate() {
        // header is line 1, first record line 2
        let line = idx + 2;
        let record = result.map_err(|e| csv_error(e, line as u64))?;
        rows.push(DecodedRow { line, record });
    }
    Ok(rows)
}

/// Decodes rows 1.. of a tab positionally; row 0 is the header.
/// Blank rows are skipped; `line` is the spreadsheet row number.
pub fn decode_tab<T>(tab: &Tab, width: usize) -> Result<Vec<DecodedRow<T>>, ImportError>
where
    T: DeserializeOwned,
{
    if tab.rows.is_empty() {
        return Err(ImportError::Decode {
            line: 1,
            message: format!("tab '{}' has no header row", tab.name),
        });
    }

    let mut rows = Vec::new();
    for (idx, cells) in tab.rows.iter().enumerate().skip(1) {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let line = idx + 1;

        let mut values: Vec<&str> = cells.iter().map(|c| c.trim()).take(width).collect();
        values.resize(width, "");
        let record = StringRecord::from(values);

        let decoded = record
            .deserialize::<T>(None)
            .map_err(|e| csv_error(e, line as u64))?;
        rows.push(DecodedRow {
            line,
            record: decoded,
        });
    }
    Ok(rows)
}

fn csv_error(err: csv::Error, fallback_line: u64) -> ImportError {
    let line = err
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback_line);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} columns, found {}", expected_len, len),
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {}", err),
        _ => err.to_string(),
    };
    ImportError::Decode { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "ID")]
        id: String,
        #[serde(rename = "Qty")]
        qty: Option<i64>,
        #[serde(rename = "Born")]
        born: Option<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        id: String,
        name: String,
    }

    #[test]
    fn test_decode_maps_headers_by_name() {
        let data = "Born,ID,Qty\n1990-01-01,a,3\n,b,\n";
        let rows: Vec<DecodedRow<Row>> = decode_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(
            rows[0].record,
            Row {
                id: "a".into(),
                qty: Some(3),
                born: Some("1990-01-01".into())
            }
        );
        // empty optional cells decode to None
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].record.qty, None);
        assert_eq!(rows[1].record.born, None);
    }

    #[test]
    fn test_decode_strips_bom_and_whitespace() {
        let data = "\u{FEFF}ID, Qty ,Born\n  x , 7 ,\n";
        let rows: Vec<DecodedRow<Row>> = decode_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].record.id, "x");
        assert_eq!(rows[0].record.qty, Some(7));
    }

    #[test]
    fn test_decode_rejects_unparsable_scalar() {
        let data = "ID,Qty,Born\na,1,\nb,lots,\n";
        let err = decode_csv::<Row, _>(data.as_bytes()).unwrap_err();
        match err {
            ImportError::Decode { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_column_count_mismatch() {
        let data = "ID,Qty,Born\na,1,,extra\n";
        let err = decode_csv::<Row, _>(data.as_bytes()).unwrap_err();
        match err {
            ImportError::Decode { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("columns"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_input_is_missing_header() {
        let err = decode_csv::<Row, _>("".as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Decode { line: 1, .. }));
    }

    #[test]
    fn test_decode_header_only_yields_no_rows() {
        let rows = decode_csv::<Row, _>("ID,Qty,Born\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_decode_tab_is_positional() {
        let tab = Tab {
            name: "roles".into(),
            rows: vec![
                vec!["id".into(), "name".into()],
                vec!["".into(), "admin".into()],
                vec![],
                vec!["01ARZ3NDEKTSV4RRFFQ69G5FAV".into(), " courier ".into(), "note".into()],
                vec!["x".into()],
            ],
        };
        let rows: Vec<DecodedRow<Pair>> = decode_tab(&tab, 2).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].record.id, "");
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].record.name, "courier");
        // short rows are padded with empty cells
        assert_eq!(rows[2].line, 5);
        assert_eq!(rows[2].record.name, "");
    }

    #[test]
    fn test_decode_tab_without_header() {
        let tab = Tab {
            name: "roles".into(),
            rows: vec![],
        };
        assert!(decode_tab::<Pair>(&tab, 2).is_err());
    }
}
