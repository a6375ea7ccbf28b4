// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::LoopmapError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, LoopmapError> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

pub fn parse_fasta<R: BufRead>(reader: R) -> Result<SeqFile, LoopmapError> {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for line in reader.lines() {
        let l = line?;
        let trimmed = l.trim_end();
        if let Some(hdr) = trimmed.strip_prefix('>') {
            // push existing record
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord {
                header: hdr.to_string(),
                sequence: String::new(),
            });
        } else if !trimmed.is_empty() {
            match current_record.as_mut() {
                // append line to current record's sequence
                Some(rec) => rec.sequence.push_str(trimmed),
                None => {
                    return Err(LoopmapError::Format(String::from(
                        "FastA sequence data before first header",
                    )))
                }
            }
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_fasta_file_1() {
        let path = "data/variants.fas";
        let fasta: SeqFile = read_fasta_file(path).expect("Test file not found");
        assert_eq!(fasta.len(), 6);
        assert_eq!(fasta[0].header, "design_1");
        assert_eq!(fasta[0].sequence, "MKTDAYGNGEIELSKLDADGDGRVSYEEF");
    }

    #[test]
    fn test_parse_fasta_multiline() {
        let text = ">seq1\nTTGCCG\n-CGA\n\n>seq2\nTTCCCGGCGA\n";
        let fasta = parse_fasta(Cursor::new(text)).unwrap();
        assert_eq!(fasta.len(), 2);
        assert_eq!(fasta[0].sequence, "TTGCCG-CGA");
        assert_eq!(fasta[1].header, "seq2");
        assert_eq!(fasta[1].sequence, "TTCCCGGCGA");
    }

    #[test]
    fn test_parse_fasta_empty() {
        let fasta = parse_fasta(Cursor::new("")).unwrap();
        assert!(fasta.is_empty());
    }

    #[test]
    fn test_parse_fasta_headerless() {
        assert!(parse_fasta(Cursor::new("ACDE\n")).is_err());
    }
}
