// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grouping matched words into contiguous runs.
//
// One box per matched word looks shredded and leaks word lengths; one box
// per page destroys the document. The middle ground is one box per run of
// matched words that sit together on the same visual line.

use std::collections::BTreeSet;

use schwaerz_core::{GroupingConfig, Word};

/// Partition matched word indices into visually contiguous groups.
///
/// Indices are walked in ascending order. The current group is extended
/// only when the candidate is on the same line as the previous member
/// (top edges within `same_line_ratio` of the previous word's height) AND
/// adjacent to it (consecutive word index, or horizontal gap below
/// `max_gap_px`). Failing either test starts a new group.
pub fn group_adjacent(
    matched: &BTreeSet<usize>,
    words: &[Word],
    config: &GroupingConfig,
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &idx in matched {
        let word = &words[idx];
        let extend = groups.last().is_some_and(|group| {
            let prev_idx = *group.last().unwrap_or(&idx);
            let prev = &words[prev_idx];
            let same_line = ((prev.top - word.top).abs() as f32)
                < prev.height as f32 * config.same_line_ratio;
            let adjacent =
                idx == prev_idx + 1 || word.left - prev.right() < config.max_gap_px;
            same_line && adjacent
        });
        if extend {
            if let Some(group) = groups.last_mut() {
                group.push(idx);
            }
        } else {
            groups.push(vec![idx]);
        }
    }
    groups
}
