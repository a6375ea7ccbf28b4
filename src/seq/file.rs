// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::errors::LoopmapError;
use crate::seq::record::SeqRecord;

// For our purposes, a sequence file is just a Vec of sequence records.
//

pub type SeqFile = Vec<SeqRecord>;

// The pipeline only looks at the residues; labels are kept for logging.
pub fn sequences(seq_file: SeqFile) -> Result<Vec<String>, LoopmapError> {
    if seq_file.is_empty() {
        return Err(LoopmapError::EmptyInput);
    }
    Ok(seq_file.into_iter().map(|rec| rec.sequence).collect())
}
