// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod delimited;
pub mod fasta;
pub mod file;
pub mod record;
pub mod spreadsheet;

use std::{fmt, path::Path};

use clap::ValueEnum;
use log::info;

use crate::errors::LoopmapError;
use crate::seq::delimited::read_delimited_column;
use crate::seq::fasta::read_fasta_file;
use crate::seq::file::SeqFile;
use crate::seq::spreadsheet::read_sheet_column;

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
pub enum InputFormat {
    #[clap(name = "xlsx")]
    #[clap(alias = "x")]
    Workbook,
    #[clap(name = "csv")]
    #[clap(alias = "c")]
    Csv,
    #[clap(name = "tsv")]
    #[clap(alias = "t")]
    Tsv,
    #[clap(name = "fasta")]
    #[clap(alias = "f")]
    FastA,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputFormat::Workbook => "xlsx",
            InputFormat::Csv => "csv",
            InputFormat::Tsv => "tsv",
            InputFormat::FastA => "fasta",
        };
        write!(f, "{}", s)
    }
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<InputFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(InputFormat::Workbook),
            "csv" => Some(InputFormat::Csv),
            "tsv" | "tab" => Some(InputFormat::Tsv),
            "fa" | "fas" | "fasta" | "faa" | "pep" => Some(InputFormat::FastA),
            _ => None,
        }
    }
}

// Where the sequences live: the sheet is only meaningful for workbooks, the column for everything
// but FastA.
pub struct SeqSource<'a> {
    pub path: &'a Path,
    pub format: InputFormat,
    pub sheet: &'a str,
    pub column: &'a str,
}

pub fn read_seq_source(source: &SeqSource) -> Result<SeqFile, LoopmapError> {
    let seq_file = match source.format {
        InputFormat::Workbook => read_sheet_column(source.path, source.sheet, source.column)?,
        InputFormat::Csv => read_delimited_column(source.path, b',', source.column)?,
        InputFormat::Tsv => read_delimited_column(source.path, b'\t', source.column)?,
        InputFormat::FastA => read_fasta_file(source.path)?,
    };
    info!(
        "Read {} sequences from {} ({})",
        seq_file.len(),
        source.path.display(),
        source.format
    );
    Ok(seq_file)
}

pub(crate) fn column_index<'h, I>(headers: I, column: &str) -> Result<usize, LoopmapError>
where
    I: IntoIterator<Item = &'h str>,
{
    headers
        .into_iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LoopmapError::MissingColumn(column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("LanM results.xlsm")),
            Some(InputFormat::Workbook)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("data/variants.CSV")),
            Some(InputFormat::Csv)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x.fas")),
            Some(InputFormat::FastA)
        );
        assert_eq!(InputFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index(["id", " seq ", "score"], "seq").unwrap(), 1);
        assert!(column_index(["id"], "seq").is_err());
    }
}
