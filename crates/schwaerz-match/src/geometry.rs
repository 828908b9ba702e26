// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redaction box geometry.

use schwaerz_core::{GroupingConfig, RedactBox, Word};

/// Compute the padded, clamped rectangle covering one group of words.
///
/// The box is the union of the member bounding boxes, grown by `pad_px`
/// on every side and clamped to the page. Padding exists because OCR
/// boxes hug glyph ink; without it, ascenders and descenders peek out of
/// the paint.
pub fn compute_box(
    words: &[Word],
    group: &[usize],
    page_size: (u32, u32),
    config: &GroupingConfig,
) -> RedactBox {
    let mut left = i32::MAX;
    let mut top = i32::MAX;
    let mut right = i32::MIN;
    let mut bottom = i32::MIN;
    for &idx in group {
        let word = &words[idx];
        left = left.min(word.left);
        top = top.min(word.top);
        right = right.max(word.right());
        bottom = bottom.max(word.bottom());
    }
    let (page_w, page_h) = (page_size.0 as i32, page_size.1 as i32);
    RedactBox {
        left: (left - config.pad_px).clamp(0, page_w),
        top: (top - config.pad_px).clamp(0, page_h),
        right: (right + config.pad_px).clamp(0, page_w),
        bottom: (bottom + config.pad_px).clamp(0, page_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GroupingConfig {
        GroupingConfig::default()
    }

    #[test]
    fn box_covers_the_union_with_padding() {
        let words = vec![
            Word::new("a", 100, 50, 40, 12),
            Word::new("b", 150, 48, 60, 14),
        ];
        let b = compute_box(&words, &[0, 1], (1000, 1000), &config());
        assert_eq!(b.left, 96);
        assert_eq!(b.top, 44);
        assert_eq!(b.right, 214);
        assert_eq!(b.bottom, 66);
    }

    #[test]
    fn padding_clamps_at_page_edges() {
        let words = vec![Word::new("edge", 2, 1, 30, 10)];
        let b = compute_box(&words, &[0], (30, 10), &config());
        assert_eq!(b.left, 0);
        assert_eq!(b.top, 0);
        assert_eq!(b.right, 30);
        assert_eq!(b.bottom, 10);
    }

    #[test]
    fn every_member_is_contained() {
        let words = vec![
            Word::new("a", 10, 10, 20, 10),
            Word::new("b", 35, 12, 25, 9),
            Word::new("c", 65, 11, 15, 11),
        ];
        let b = compute_box(&words, &[0, 1, 2], (500, 500), &config());
        for w in &words {
            assert!(b.left <= w.left && w.right() <= b.right);
            assert!(b.top <= w.top && w.bottom() <= b.bottom);
        }
    }
}
