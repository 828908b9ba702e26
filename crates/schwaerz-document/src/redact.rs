// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page redaction: OCR, match, group, paint.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use schwaerz_core::{GroupingConfig, Result, Word};
use schwaerz_match::{CompiledGrammar, build_stream, compute_box, find_matches, group_adjacent};
use tracing::debug;

use crate::ocr::WordExtractor;

const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Run OCR and matching on one page, returning the recognised words and
/// the grouped matched indices.
fn match_groups(
    extractor: &WordExtractor,
    image: &RgbImage,
    grammars: &[CompiledGrammar],
    grouping: &GroupingConfig,
) -> Result<(Vec<Word>, Vec<Vec<usize>>)> {
    let words = extractor.extract_words(image)?;
    let stream = build_stream(&words);
    let matched = find_matches(&stream, grammars);
    let groups = group_adjacent(&matched, &words, grouping);
    debug!(
        words = words.len(),
        matched = matched.len(),
        groups = groups.len(),
        "page matched"
    );
    Ok((words, groups))
}

/// Redact one rendered page.
///
/// Returns a painted copy of the page and the number of boxes drawn; the
/// input image is never modified. A page with no matches comes back as an
/// unmodified copy with count zero.
pub fn redact_page(
    extractor: &WordExtractor,
    image: &RgbImage,
    grammars: &[CompiledGrammar],
    grouping: &GroupingConfig,
) -> Result<(RgbImage, u32)> {
    let (words, groups) = match_groups(extractor, image, grammars, grouping)?;
    let mut painted = image.clone();
    for group in &groups {
        let b = compute_box(&words, group, image.dimensions(), grouping);
        if b.width() <= 0 || b.height() <= 0 {
            continue;
        }
        draw_filled_rect_mut(
            &mut painted,
            Rect::at(b.left, b.top).of_size(b.width() as u32, b.height() as u32),
            INK,
        );
    }
    Ok((painted, groups.len() as u32))
}

/// Count residual match groups on one page without painting anything.
/// This is the verification primitive.
pub fn scan_page(
    extractor: &WordExtractor,
    image: &RgbImage,
    grammars: &[CompiledGrammar],
    grouping: &GroupingConfig,
) -> Result<u32> {
    let (_, groups) = match_groups(extractor, image, grammars, grouping)?;
    Ok(groups.len() as u32)
}
