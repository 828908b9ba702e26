// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schwärz — Matching layer: OCR words in, redaction rectangles out.
//
// The pipeline through this crate is purely geometric and textual; nothing
// here touches pixels or files. Pages flow: words → normalised text stream →
// anchored PEG matches → word index set → adjacency groups → padded boxes.

pub mod geometry;
pub mod grammar;
pub mod group;
pub mod matcher;
pub mod stream;

pub use geometry::compute_box;
pub use grammar::{CompiledGrammar, PatternSpec, compile_patterns};
pub use group::group_adjacent;
pub use matcher::find_matches;
pub use stream::{TextStream, build_stream, normalize};
