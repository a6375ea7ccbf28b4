// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, info};

use crate::errors::LoopmapError;
use crate::seq::column_index;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

// Reads one column of a worksheet (xlsx, xlsm, xlsb, xls or ods). The first row holds the column
// headers.
pub fn read_sheet_column<P: AsRef<Path>>(
    path: P,
    sheet: &str,
    column: &str,
) -> Result<SeqFile, LoopmapError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoopmapError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{}: no such file", path.display()),
        )));
    }
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(LoopmapError::Spreadsheet(format!(
            "no worksheet '{}' in {} (found: {})",
            sheet,
            path.display(),
            names.join(", ")
        )));
    }
    let range = workbook.worksheet_range(sheet)?;
    info!(
        "Worksheet '{}': {} rows x {} columns",
        sheet,
        range.height(),
        range.width()
    );
    column_from_range(&range, column)
}

pub fn column_from_range(range: &Range<Data>, column: &str) -> Result<SeqFile, LoopmapError> {
    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoopmapError::EmptyInput)?;
    let header_text: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
    let col = column_index(header_text.iter().map(String::as_str), column)?;

    let mut result: SeqFile = Vec::new();
    // Row numbers are 1-based and count the header, as a spreadsheet user sees them.
    for (i, row) in rows.enumerate() {
        let row_num = i + 2;
        let text = match row.get(col) {
            None | Some(Data::Empty) => String::new(),
            Some(cell) => cell.to_string(),
        };
        if text.trim().is_empty() {
            debug!("Skipping empty cell {}{}", column, row_num);
            continue;
        }
        result.push(SeqRecord::from_cell(column, row_num, &text));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[(&str, &str)]) -> Range<Data> {
        let mut range = Range::new((0, 0), (cells.len() as u32, 1));
        range.set_value((0, 0), Data::String(String::from("name")));
        range.set_value((0, 1), Data::String(String::from("seq")));
        for (i, (name, seq)) in cells.iter().enumerate() {
            let r = i as u32 + 1;
            range.set_value((r, 0), Data::String(name.to_string()));
            if !seq.is_empty() {
                range.set_value((r, 1), Data::String(seq.to_string()));
            }
        }
        range
    }

    #[test]
    fn test_column_from_range() {
        let range = sheet(&[("d1", "AAC"), ("d2", " AAG "), ("d3", "ATC")]);
        let records = column_from_range(&range, "seq").unwrap();
        let seqs: Vec<&str> = records.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(seqs, vec!["AAC", "AAG", "ATC"]);
        assert_eq!(records[0].header, "seq:2");
    }

    #[test]
    fn test_column_from_range_skips_empty_cells() {
        let range = sheet(&[("d1", "AAC"), ("d2", ""), ("d3", "ATC")]);
        let records = column_from_range(&range, "seq").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].header, "seq:4");
    }

    #[test]
    fn test_column_from_range_skips_blank_cells() {
        let range = sheet(&[("d1", "   "), ("d2", "AAC"), ("d3", "\t")]);
        let records = column_from_range(&range, "seq").unwrap();
        assert_eq!(
            records,
            vec![SeqRecord {
                header: String::from("seq:3"),
                sequence: String::from("AAC"),
            }]
        );
    }

    #[test]
    fn test_column_from_range_missing_column() {
        let range = sheet(&[("d1", "AAC")]);
        match column_from_range(&range, "sequence") {
            Err(LoopmapError::MissingColumn(name)) => assert_eq!(name, "sequence"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_read_sheet_column_missing_file() {
        let res = read_sheet_column("data/no-such-workbook.xlsx", "mpnn_results", "seq");
        assert!(matches!(res, Err(LoopmapError::Io(_))));
    }
}
