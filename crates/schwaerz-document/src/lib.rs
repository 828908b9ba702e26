// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schwärz — Document layer: everything that touches pixels or PDF bytes.
//
// The per-document flow lives in `pipeline`; the other modules are the
// external collaborators wrapped at their seams: `ocr` (words out of
// pixels), `render` (pixels out of PDFs), `redact` (paint), `assemble`
// (PDFs out of pixels).

pub mod assemble;
pub mod ocr;
pub mod pipeline;
pub mod redact;
pub mod render;

pub use ocr::{OcrConfig, WordExtractor};
pub use pipeline::RedactionEngine;
pub use render::PageRenderer;
