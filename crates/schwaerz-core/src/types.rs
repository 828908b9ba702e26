// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Schwärz redaction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single OCR-recognised word with its pixel-space bounding box.
///
/// Coordinates follow image convention: origin at the top-left corner,
/// `top` increasing downward. Width and height are clamped to at least 1
/// at construction so every word owns a drawable rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Word {
    pub fn new(text: impl Into<String>, left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Rightmost pixel column (exclusive edge of the box).
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Bottommost pixel row (exclusive edge of the box).
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// An axis-aligned rectangle to be painted over, in page pixel coordinates.
///
/// Always satisfies `left <= right` and `top <= bottom`; construction clamps
/// to the page bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RedactBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The unit of work handed to a batch worker: one input document,
/// one output path, and the rendering/verification parameters to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Initial render resolution. A zero-match document is retried once at
    /// double this value before being reported as `NoMatches`.
    pub dpi: u32,
    /// Re-scan the written output and count residual matches.
    pub verify: bool,
}

/// Final disposition of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// Redactions were applied (and verified clean, if verification ran).
    Success,
    /// No pattern matched anywhere in the document, even after the retry.
    NoMatches,
    /// The verification scan still found matching text in the output.
    VerificationFailed,
    /// The document could not be processed at all.
    FileError(String),
}

/// Everything the scheduler hands back for one document. Immutable once
/// returned; the worker that produced it keeps no reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of redaction boxes painted across all pages.
    pub redactions: u32,
    /// Residual match groups found by the verification scan.
    pub leaked: u32,
    /// Whether the verification scan actually ran on the final output.
    /// False when verification was disabled or nothing was redacted.
    pub verified: bool,
    pub outcome: JobOutcome,
    /// Set when the zero-match retry ran, to the DPI actually used.
    pub retried_dpi: Option<u32>,
}

impl JobResult {
    /// Result for a document that failed before producing any output.
    pub fn file_error(spec: &JobSpec, detail: impl Into<String>) -> Self {
        Self {
            input: spec.input.clone(),
            output: spec.output.clone(),
            redactions: 0,
            leaked: 0,
            verified: false,
            outcome: JobOutcome::FileError(detail.into()),
            retried_dpi: None,
        }
    }
}

// -- Exit classification ------------------------------------------------------

/// Process exit statuses. The numeric values are part of the CLI contract
/// and scripts depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    ConfigError,
    FileError,
    NoMatches,
    VerificationFailed,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ConfigError => 1,
            Self::FileError => 2,
            Self::NoMatches => 3,
            Self::VerificationFailed => 4,
        }
    }
}

/// Collapse a batch of per-document results into one process exit status.
///
/// A verification failure anywhere outranks everything: the tool claimed to
/// redact and the output still leaks. Zero-match documents fail the batch
/// only in strict mode. Unreadable inputs rank below both but still fail
/// the batch.
pub fn classify_batch(results: &[JobResult], strict: bool) -> ExitStatus {
    let mut any_no_match = false;
    let mut any_file_error = false;
    for r in results {
        match r.outcome {
            JobOutcome::VerificationFailed => return ExitStatus::VerificationFailed,
            JobOutcome::NoMatches => any_no_match = true,
            JobOutcome::FileError(_) => any_file_error = true,
            JobOutcome::Success => {}
        }
    }
    if strict && any_no_match {
        ExitStatus::NoMatches
    } else if any_file_error {
        ExitStatus::FileError
    } else {
        ExitStatus::Success
    }
}
