// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A record for sequences, consisting of some label and a raw sequence. Meant to be
// source-agnostic: a FastA record keeps its header, a spreadsheet or CSV row gets a synthetic label
// naming the column and (1-based) row it came from.

#[derive(Debug, Clone, PartialEq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn from_cell(column: &str, row: usize, sequence: &str) -> Self {
        SeqRecord {
            header: format!("{}:{}", column, row),
            sequence: sequence.trim().to_string(),
        }
    }
}
