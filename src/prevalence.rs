// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashMap;

use log::warn;
use serde::Serialize;

use crate::profile::{residues_at, LoopRegion};

pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Percentage of each alphabet symbol at each position of a region. Rows follow the alphabet,
/// columns the region's positions. A column where no sequence has a residue holds NaN throughout
/// (no data), not zeros.
#[derive(Debug, Clone, Serialize)]
pub struct PrevalenceMatrix {
    pub alphabet: String,
    pub region: LoopRegion,
    pub values: Vec<Vec<f64>>,
}

impl PrevalenceMatrix {
    pub fn shape(&self) -> (usize, usize) {
        (self.values.len(), self.region.len())
    }

    pub fn num_positions(&self) -> usize {
        self.region.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[col]).collect()
    }

    pub fn column_sum(&self, col: usize) -> f64 {
        self.values.iter().map(|row| row[col]).sum()
    }

    pub fn is_no_data_column(&self, col: usize) -> bool {
        self.values.iter().all(|row| row[col].is_nan())
    }

    // Most prevalent symbol at a column; ties go to the earlier symbol of the alphabet.
    pub fn dominant_residue(&self, col: usize) -> Option<(char, f64)> {
        self.alphabet
            .chars()
            .zip(self.values.iter().map(|row| row[col]))
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best, (aa, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((aa, v)),
            })
    }
}

pub fn calculate_prevalence(
    sequences: &[String],
    region: LoopRegion,
    alphabet: &str,
) -> PrevalenceMatrix {
    let n_pos = region.len();
    let mut values = vec![vec![0.0; n_pos]; alphabet.chars().count()];

    for (col, pos) in region.range().enumerate() {
        let mut counts: HashMap<char, usize> = HashMap::new();
        let mut total = 0usize;
        for residue in residues_at(sequences, pos) {
            *counts.entry(residue).or_insert(0) += 1;
            total += 1;
        }
        if total == 0 {
            warn!("No residue at position {}: column left blank", pos);
            for row in values.iter_mut() {
                row[col] = f64::NAN;
            }
            continue;
        }
        for (row, aa) in alphabet.chars().enumerate() {
            let count = counts.get(&aa).copied().unwrap_or(0);
            values[row][col] = count as f64 / total as f64 * 100.0;
        }
    }

    PrevalenceMatrix {
        alphabet: alphabet.to_string(),
        region,
        values,
    }
}
