// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt::Write, fs, path::Path};

use itertools::Itertools;
use serde::Serialize;

use crate::config::LoopmapConfig;
use crate::errors::LoopmapError;
use crate::prevalence::{calculate_prevalence, PrevalenceMatrix};
use crate::profile::{group_positions, select_loops, variable_positions, LoopRegion};

// Everything computed from the sequences, before any drawing.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub num_sequences: usize,
    pub variable_positions: Vec<usize>,
    pub groups: Vec<Vec<usize>>,
    pub loops: Vec<LoopRegion>,
    pub prevalence: Vec<PrevalenceMatrix>,
}

pub fn analyze(sequences: &[String], config: &LoopmapConfig) -> Result<Analysis, LoopmapError> {
    let variable = variable_positions(sequences)?;
    let groups = group_positions(&variable, config.gap_threshold);
    let loops = select_loops(&groups, &config.loops)?;
    let prevalence = loops
        .iter()
        .map(|region| calculate_prevalence(sequences, *region, &config.alphabet))
        .collect();
    Ok(Analysis {
        num_sequences: sequences.len(),
        variable_positions: variable,
        groups,
        loops,
        prevalence,
    })
}

impl Analysis {
    pub fn loop_summary(&self) -> String {
        self.loops
            .iter()
            .enumerate()
            .map(|(i, region)| format!("Loop {}: {}", i + 1, region))
            .join("\n")
    }

    // Longer report for --info: every group, then the dominant residue at each loop position.
    pub fn info_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "nb_sequences: {}", self.num_sequences);
        let _ = writeln!(
            out,
            "variable_positions: {}",
            self.variable_positions.iter().join(",")
        );
        for (i, group) in self.groups.iter().enumerate() {
            let _ = writeln!(out, "group {}: {}", i, group.iter().join(","));
        }
        for (i, matrix) in self.prevalence.iter().enumerate() {
            let _ = writeln!(out, "Loop {}: {}", i + 1, matrix.region);
            for col in 0..matrix.num_positions() {
                let pos = matrix.region.start + col;
                match matrix.dominant_residue(col) {
                    Some((aa, pct)) => {
                        let _ = writeln!(out, "  {:>3} {:>4}  {} {:.0}%", col + 1, pos, aa, pct);
                    }
                    None => {
                        let _ = writeln!(out, "  {:>3} {:>4}  no data", col + 1, pos);
                    }
                }
            }
        }
        out
    }

    pub fn write_json(&self, path: &Path) -> Result<(), LoopmapError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| LoopmapError::Format(format!("JSON export failed: {}", e)))?;
        fs::write(path, text)?;
        Ok(())
    }
}
