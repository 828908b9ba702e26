// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Schwärz.

use thiserror::Error;

/// Top-level error type for all Schwärz operations.
#[derive(Debug, Error)]
pub enum SchwaerzError {
    // -- Configuration errors --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("pattern grammar rejected: {0}")]
    Grammar(String),

    // -- Per-document errors --
    #[error("cannot read input: {0}")]
    Input(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SchwaerzError>;
