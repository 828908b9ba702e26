// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tunable pipeline parameters.

use serde::{Deserialize, Serialize};

/// Default render resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 150;

/// Thresholds for grouping matched words into redaction boxes.
///
/// The defaults are calibrated for ~150 DPI renders of typical office
/// documents; denser layouts may need a tighter `max_gap_px`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Two words are on the same line when their top edges differ by less
    /// than this fraction of the earlier word's height.
    pub same_line_ratio: f32,
    /// Non-consecutive words on the same line merge when the horizontal
    /// gap between them is below this many pixels.
    pub max_gap_px: i32,
    /// Padding added to every side of a redaction box before clamping.
    pub pad_px: i32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            same_line_ratio: 0.5,
            max_gap_px: 50,
            pad_px: 4,
        }
    }
}
