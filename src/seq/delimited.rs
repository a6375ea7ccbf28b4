// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::debug;

use crate::errors::LoopmapError;
use crate::seq::column_index;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

pub fn read_delimited_column<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
    column: &str,
) -> Result<SeqFile, LoopmapError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        LoopmapError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    parse_delimited_column(file, delimiter, column)
}

pub fn parse_delimited_column<R: Read>(
    reader: R,
    delimiter: u8,
    column: &str,
) -> Result<SeqFile, LoopmapError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let col = column_index(headers.iter(), column)?;

    let mut result: SeqFile = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row_num = i + 2;
        match record.get(col).map(str::trim) {
            Some(cell) if !cell.is_empty() => {
                result.push(SeqRecord::from_cell(column, row_num, cell))
            }
            _ => debug!("Skipping empty cell {}{}", column, row_num),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_csv_column() {
        let text = "id,seq,score\n1,AAC,0.5\n2,AAG,0.7\n3,ATC,0.1\n";
        let records = parse_delimited_column(Cursor::new(text), b',', "seq").unwrap();
        let seqs: Vec<&str> = records.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(seqs, vec!["AAC", "AAG", "ATC"]);
    }

    #[test]
    fn test_parse_tsv_column_skips_blank() {
        let text = "seq\tscore\nAAC\t1\n\t2\nATC\t3\n";
        let records = parse_delimited_column(Cursor::new(text), b'\t', "seq").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].header, "seq:4");
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let text = "id,sequence\n1,AAC\n";
        let res = parse_delimited_column(Cursor::new(text), b',', "seq");
        assert!(matches!(res, Err(LoopmapError::MissingColumn(_))));
    }

    #[test]
    fn test_read_csv_file() {
        let records = read_delimited_column("data/variants.csv", b',', "seq").unwrap();
        assert_eq!(records.len(), 6);
    }
}
