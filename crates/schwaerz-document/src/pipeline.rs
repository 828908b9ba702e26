// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-document orchestration: render, redact, reassemble, retry, verify.

use std::path::Path;

use image::RgbImage;
use schwaerz_core::{
    GroupingConfig, JobOutcome, JobResult, JobSpec, Result, SchwaerzError,
};
use schwaerz_match::{CompiledGrammar, PatternSpec, compile_patterns};
use tracing::{info, instrument, warn};

use crate::assemble::write_pdf;
use crate::ocr::{OcrConfig, WordExtractor};
use crate::redact::{redact_page, scan_page};
use crate::render::PageRenderer;

/// Everything one worker needs to process documents end to end: a loaded
/// OCR engine, a pdfium binding, and the compiled pattern set.
///
/// Engines are built per worker and never shared; pattern sources are the
/// only state that crosses the thread boundary, and each engine compiles
/// its own grammars from them.
pub struct RedactionEngine {
    extractor: WordExtractor,
    renderer: PageRenderer,
    grammars: Vec<CompiledGrammar>,
    grouping: GroupingConfig,
}

impl RedactionEngine {
    pub fn new(
        ocr: OcrConfig,
        patterns: &[PatternSpec],
        grouping: GroupingConfig,
    ) -> Result<Self> {
        let grammars = compile_patterns(patterns);
        if grammars.is_empty() {
            return Err(SchwaerzError::Config(
                "no usable patterns after compilation".into(),
            ));
        }
        Ok(Self {
            extractor: WordExtractor::new(ocr)?,
            renderer: PageRenderer::new()?,
            grammars,
            grouping,
        })
    }

    /// Process one document, never panicking and never returning `Err`:
    /// any failure becomes a `FileError` outcome in the result, because a
    /// bad document must not take down the batch.
    pub fn process(&self, job: &JobSpec) -> JobResult {
        match self.try_process(job) {
            Ok(result) => result,
            Err(err) => {
                warn!(input = %job.input.display(), error = %err, "document failed");
                JobResult::file_error(job, err.to_string())
            }
        }
    }

    #[instrument(skip_all, fields(input = %job.input.display()))]
    fn try_process(&self, job: &JobSpec) -> Result<JobResult> {
        run_attempts(
            job,
            |dpi| self.redact_document(&job.input, &job.output, dpi),
            |dpi| self.scan_document(&job.output, dpi),
        )
    }

    /// Render, redact, and rewrite one document. Returns the number of
    /// boxes painted across all pages.
    fn redact_document(&self, input: &Path, output: &Path, dpi: u32) -> Result<u32> {
        let pages = self.renderer.render_pages(input, dpi)?;
        let mut painted: Vec<RgbImage> = Vec::with_capacity(pages.len());
        let mut total = 0u32;
        for page in &pages {
            let (image, count) =
                redact_page(&self.extractor, page, &self.grammars, &self.grouping)?;
            total += count;
            painted.push(image);
        }
        let title = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "redacted".to_string());
        write_pdf(output, painted, dpi, &title)?;
        Ok(total)
    }

    /// Count residual match groups across a whole document without
    /// modifying anything. Used for the verification pass, and usable on
    /// its own as a scan-only mode.
    pub fn scan_document(&self, path: &Path, dpi: u32) -> Result<u32> {
        let pages = self.renderer.render_pages(path, dpi)?;
        let mut total = 0u32;
        for page in &pages {
            total += scan_page(&self.extractor, page, &self.grammars, &self.grouping)?;
        }
        Ok(total)
    }
}

/// Drive the redact → retry → verify sequence for one document.
///
/// `redact` renders and rewrites the output at the given DPI, returning
/// the number of boxes painted; `scan` counts residual match groups in
/// the written output. Zero matches can mean clean input or just an OCR
/// miss at this resolution, so the first attempt is retried once at
/// double DPI and the retry's output stands whether or not it finds
/// anything. The scan runs at the resolution the final output was
/// produced at, and only when verification is requested and something
/// was actually redacted; `verified` in the result records whether it
/// ran.
///
/// Generic over the two steps so the state machine is testable without
/// OCR models or a pdfium binding.
fn run_attempts<R, S>(job: &JobSpec, mut redact: R, mut scan: S) -> Result<JobResult>
where
    R: FnMut(u32) -> Result<u32>,
    S: FnMut(u32) -> Result<u32>,
{
    let mut dpi = job.dpi;
    let mut redactions = redact(dpi)?;

    let mut retried_dpi = None;
    if redactions == 0 {
        dpi = job.dpi * 2;
        retried_dpi = Some(dpi);
        info!(dpi, "no matches found, retrying at higher resolution");
        redactions = redact(dpi)?;
    }

    if redactions == 0 {
        return Ok(JobResult {
            input: job.input.clone(),
            output: job.output.clone(),
            redactions: 0,
            leaked: 0,
            verified: false,
            outcome: JobOutcome::NoMatches,
            retried_dpi,
        });
    }

    let verified = job.verify;
    let leaked = if verified { scan(dpi)? } else { 0 };
    let outcome = if leaked > 0 {
        JobOutcome::VerificationFailed
    } else {
        JobOutcome::Success
    };
    Ok(JobResult {
        input: job.input.clone(),
        output: job.output.clone(),
        redactions,
        leaked,
        verified,
        outcome,
        retried_dpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    fn job(verify: bool) -> JobSpec {
        JobSpec {
            input: PathBuf::from("in.pdf"),
            output: PathBuf::from("out.pdf"),
            dpi: 150,
            verify,
        }
    }

    #[test]
    fn first_attempt_success_does_not_retry() {
        let redact_calls = RefCell::new(Vec::new());
        let result = run_attempts(
            &job(true),
            |dpi| {
                redact_calls.borrow_mut().push(dpi);
                Ok(4)
            },
            |_dpi| Ok(0),
        )
        .expect("should succeed");
        assert_eq!(*redact_calls.borrow(), vec![150]);
        assert_eq!(result.redactions, 4);
        assert_eq!(result.retried_dpi, None);
        assert!(result.verified);
        assert_eq!(result.outcome, JobOutcome::Success);
    }

    #[test]
    fn zero_match_first_pass_retries_at_double_resolution() {
        let redact_calls = RefCell::new(Vec::new());
        let scan_calls = RefCell::new(Vec::new());
        let result = run_attempts(
            &job(true),
            |dpi| {
                redact_calls.borrow_mut().push(dpi);
                Ok(if dpi == 300 { 3 } else { 0 })
            },
            |dpi| {
                scan_calls.borrow_mut().push(dpi);
                Ok(0)
            },
        )
        .expect("should succeed");
        assert_eq!(*redact_calls.borrow(), vec![150, 300]);
        assert_eq!(result.redactions, 3);
        assert_eq!(result.retried_dpi, Some(300));
        // Verification runs at the resolution the retry produced.
        assert_eq!(*scan_calls.borrow(), vec![300]);
        assert_eq!(result.outcome, JobOutcome::Success);
    }

    #[test]
    fn empty_retry_is_no_matches_and_never_scans() {
        let scanned = RefCell::new(false);
        let result = run_attempts(
            &job(true),
            |_dpi| Ok(0),
            |_dpi| {
                *scanned.borrow_mut() = true;
                Ok(0)
            },
        )
        .expect("should succeed");
        assert_eq!(result.outcome, JobOutcome::NoMatches);
        assert_eq!(result.retried_dpi, Some(300));
        assert!(!result.verified);
        assert!(!*scanned.borrow());
    }

    #[test]
    fn residual_matches_fail_verification() {
        let result = run_attempts(&job(true), |_dpi| Ok(2), |_dpi| Ok(1))
            .expect("should succeed");
        assert_eq!(result.outcome, JobOutcome::VerificationFailed);
        assert_eq!(result.leaked, 1);
        assert!(result.verified);
    }

    #[test]
    fn disabled_verification_never_scans() {
        let scanned = RefCell::new(false);
        let result = run_attempts(
            &job(false),
            |_dpi| Ok(2),
            |_dpi| {
                *scanned.borrow_mut() = true;
                Ok(0)
            },
        )
        .expect("should succeed");
        assert!(!*scanned.borrow());
        assert!(!result.verified);
        assert_eq!(result.leaked, 0);
        assert_eq!(result.outcome, JobOutcome::Success);
    }

    #[test]
    fn redact_errors_propagate() {
        let result = run_attempts(
            &job(true),
            |_dpi| Err(SchwaerzError::Input("unreadable".into())),
            |_dpi| Ok(0),
        );
        assert!(matches!(result, Err(SchwaerzError::Input(_))));
    }
}
