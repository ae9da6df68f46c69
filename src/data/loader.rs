use crate::data::raw::RawTradeRow;
use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use std::str::Utf8Error;

//loads raw trade rows from a flex-query csv export
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawTradeRow>> {
    let path = path.as_ref();
    let file =
        std::fs::File::open(path).context(format!("Failed to open CSV file: {:?}", path))?;

    let rows = read_csv(file).context(format!("Failed to read CSV file: {:?}", path))?;
    tracing::info!(path = ?path, rows = rows.len(), "loaded raw trade rows");

    Ok(rows)
}

//reads raw rows from any csv source, keyed by the header row
//a record that cannot be decoded becomes an undecodable row, only io failures abort
pub fn read_csv<R: Read>(source: R) -> Result<Vec<RawTradeRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers().context("Failed to read CSV header row")?.clone();

    let mut rows = Vec::new();

    for (index, result) in reader.byte_records().enumerate() {
        let line = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                return Err(err).context(format!("Failed to read CSV record at line {}", line));
            }
            Err(err) => {
                tracing::warn!(line, %err, "unparseable csv record");
                rows.push(RawTradeRow::undecodable(format!("could not be parsed: {}", err)));
                continue;
            }
        };

        match decode_record(&headers, &record) {
            Ok(row) => rows.push(row),
            Err(err) => {
                tracing::warn!(line, %err, "csv record is not valid utf-8");
                rows.push(RawTradeRow::undecodable(format!("is not valid UTF-8: {}", err)));
            }
        }
    }

    Ok(rows)
}

//short rows simply lack the trailing fields
fn decode_record(headers: &StringRecord, record: &ByteRecord) -> Result<RawTradeRow, Utf8Error> {
    headers
        .iter()
        .zip(record.iter())
        .map(|(key, value)| std::str::from_utf8(value).map(|value| (key, value)))
        .collect()
}
