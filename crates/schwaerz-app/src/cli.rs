// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument surface.

use std::path::PathBuf;

use clap::Parser;
use schwaerz_core::DEFAULT_DPI;

#[derive(Debug, Parser)]
#[command(
    name = "schwaerz",
    version,
    about = "Redact sensitive text from PDF documents by rendering, OCR, and painting over matches"
)]
pub struct Cli {
    /// PDF files or directories to redact (directories are walked recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only) or output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Literal text to redact, case-insensitive (repeatable)
    #[arg(short = 'm', long = "match")]
    pub matches: Vec<String>,

    /// Pattern config file (TOML); overrides the search chain
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (default: half the CPU cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Render resolution in DPI
    #[arg(short, long, default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Skip the verification re-scan of redacted output
    #[arg(long)]
    pub no_verify: bool,

    /// Do not fail the batch when a document contains no matches
    #[arg(long)]
    pub relaxed: bool,

    /// Directory containing the OCR model files
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Same-line tolerance as a fraction of word height
    #[arg(long)]
    pub same_line_ratio: Option<f32>,

    /// Maximum horizontal gap in pixels when merging matched words
    #[arg(long)]
    pub max_gap: Option<i32>,

    /// Padding in pixels around each redaction box
    #[arg(long)]
    pub pad: Option<i32>,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
