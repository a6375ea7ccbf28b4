// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt, ops::Range};

use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::errors::LoopmapError;

// Number of distinct residues seen at one column of the sequence set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionVariation {
    pub position: usize,
    pub distinct: usize,
}

impl PositionVariation {
    pub fn is_variable(&self) -> bool {
        self.distinct > 1
    }
}

// Residues found at `pos` in every sequence long enough to have one. Positions count characters,
// not bytes.
pub fn residues_at(sequences: &[String], pos: usize) -> impl Iterator<Item = char> + '_ {
    sequences.iter().filter_map(move |seq| seq.chars().nth(pos))
}

/// Computes the variation count of every column, up to the length of the first sequence.
/// Positions past the end of a shorter sequence simply get no residue from it.
pub fn position_variation(sequences: &[String]) -> Result<Vec<PositionVariation>, LoopmapError> {
    let first = sequences.first().ok_or(LoopmapError::EmptyInput)?;
    let variation: Vec<PositionVariation> = (0..first.chars().count())
        .map(|pos| PositionVariation {
            position: pos,
            distinct: residues_at(sequences, pos).unique().count(),
        })
        .collect();
    Ok(variation)
}

pub fn variable_positions(sequences: &[String]) -> Result<Vec<usize>, LoopmapError> {
    let variable: Vec<usize> = position_variation(sequences)?
        .into_iter()
        .filter(PositionVariation::is_variable)
        .map(|pv| pv.position)
        .collect();
    info!(
        "{} variable position(s) over {} sequences",
        variable.len(),
        sequences.len()
    );
    debug!("variable positions: {:?}", variable);
    Ok(variable)
}

/// Splits sorted positions into maximal runs where each member is at most `max_gap` past the
/// previous one.
pub fn group_positions(positions: &[usize], max_gap: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for &pos in positions {
        match current.last() {
            Some(&last) if pos - last <= max_gap => current.push(pos),
            Some(_) => {
                groups.push(std::mem::take(&mut current));
                current.push(pos);
            }
            None => current.push(pos),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    info!("{} group(s) of variable positions (gap <= {})", groups.len(), max_gap);
    groups
}

// A loop is the half-open span from a group's first to one past its last position; invariant
// positions inside the span are part of the loop too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LoopRegion {
    pub start: usize,
    pub end: usize,
}

impl LoopRegion {
    pub fn from_group(group: &[usize]) -> Option<LoopRegion> {
        let (start, last) = group.iter().copied().minmax().into_option()?;
        Some(LoopRegion {
            start,
            end: last + 1,
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// Inclusive, as shown to the user.
impl fmt::Display for LoopRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "positions {}-{}", self.start, self.end.saturating_sub(1))
    }
}

pub fn select_loops(
    groups: &[Vec<usize>],
    indices: &[usize],
) -> Result<Vec<LoopRegion>, LoopmapError> {
    let needed = indices.iter().max().map_or(0, |m| m + 1);
    indices
        .iter()
        .map(|&i| {
            groups
                .get(i)
                .and_then(|g| LoopRegion::from_group(g))
                .ok_or(LoopmapError::InsufficientRegions {
                    found: groups.len(),
                    needed,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variable_positions_00() {
        let s = seqs(&["AAC", "AAG", "ATC"]);
        let var = position_variation(&s).unwrap();
        assert_eq!(var[0].distinct, 1);
        assert_eq!(var[1].distinct, 2);
        assert_eq!(var[2].distinct, 2);
        assert_eq!(variable_positions(&s).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_variable_positions_matches_distinct_sets() {
        let s = seqs(&[
            "MKTDAYGNGE",
            "MKTNAEGNGE",
            "MKTEAYDNGE",
            "MRTDAYGNGQ",
        ]);
        let expected: Vec<usize> = (0..10)
            .filter(|&p| {
                let set: std::collections::HashSet<u8> =
                    s.iter().map(|q| q.as_bytes()[p]).collect();
                set.len() > 1
            })
            .collect();
        assert_eq!(variable_positions(&s).unwrap(), expected);
    }

    #[test]
    fn test_positions_count_characters() {
        // 'é' takes two bytes; the variable column is still the fourth residue
        let s = seqs(&["AéCD", "AéCE"]);
        let var = position_variation(&s).unwrap();
        assert_eq!(var.len(), 4);
        assert_eq!(variable_positions(&s).unwrap(), vec![3]);
        assert_eq!(residues_at(&s, 3).collect::<Vec<_>>(), vec!['D', 'E']);
    }

    #[test]
    fn test_variation_counts_at_least_one() {
        let s = seqs(&["ACDEF", "ACD", "GCDEW"]);
        let var = position_variation(&s).unwrap();
        assert_eq!(var.len(), 5);
        assert!(var.iter().all(|pv| pv.distinct >= 1));
        // "ACD" has no residue at 3 and 4
        assert_eq!(var[3].distinct, 1);
        assert_eq!(var[4].distinct, 2);
    }

    #[test]
    fn test_variable_positions_empty() {
        assert!(matches!(
            variable_positions(&[]),
            Err(LoopmapError::EmptyInput)
        ));
    }

    #[test]
    fn test_group_positions_00() {
        assert_eq!(
            group_positions(&[1, 2, 8, 9, 10], 3),
            vec![vec![1, 2], vec![8, 9, 10]]
        );
    }

    #[test]
    fn test_group_positions_gap_boundary() {
        // 3 apart stays together, 4 apart splits
        assert_eq!(group_positions(&[0, 3, 7], 3), vec![vec![0, 3], vec![7]]);
        assert_eq!(group_positions(&[5], 3), vec![vec![5]]);
        assert!(group_positions(&[], 3).is_empty());
    }

    #[test]
    fn test_group_positions_chains_from_last_member() {
        // each step is within the gap even though the group spans far more than 3
        assert_eq!(
            group_positions(&[0, 2, 4, 6, 8, 20], 3),
            vec![vec![0, 2, 4, 6, 8], vec![20]]
        );
    }

    #[test]
    fn test_group_invariants() {
        let positions = [0, 1, 4, 9, 10, 13, 17, 30, 31, 33];
        let gap = 3;
        let groups = group_positions(&positions, gap);
        for g in &groups {
            assert!(!g.is_empty());
            assert!(g.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] <= gap));
        }
        for pair in groups.windows(2) {
            assert!(pair[1][0] - pair[0].last().unwrap() > gap);
        }
        let flat: Vec<usize> = groups.concat();
        assert_eq!(flat, positions.to_vec());
    }

    #[test]
    fn test_loop_region_from_group() {
        let region = LoopRegion::from_group(&[8, 9, 10]).unwrap();
        assert_eq!(region, LoopRegion { start: 8, end: 11 });
        assert_eq!(region.len(), 3);
        assert_eq!(region.to_string(), "positions 8-10");
        assert!(LoopRegion::from_group(&[]).is_none());
    }

    #[test]
    fn test_select_loops() {
        let groups = vec![vec![1, 2], vec![8, 9, 10], vec![20]];
        let loops = select_loops(&groups, &[0, 1]).unwrap();
        assert_eq!(
            loops,
            vec![
                LoopRegion { start: 1, end: 3 },
                LoopRegion { start: 8, end: 11 }
            ]
        );
        let loops = select_loops(&groups, &[2, 0]).unwrap();
        assert_eq!(loops[0], LoopRegion { start: 20, end: 21 });
    }

    #[test]
    fn test_select_loops_insufficient() {
        let groups = vec![vec![1, 2]];
        match select_loops(&groups, &[0, 1]) {
            Err(LoopmapError::InsufficientRegions { found, needed }) => {
                assert_eq!(found, 1);
                assert_eq!(needed, 2);
            }
            other => panic!("expected InsufficientRegions, got {:?}", other),
        }
    }
}
