// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-document reporting and the end-of-batch summary.

use schwaerz_core::{ExitStatus, JobOutcome, JobResult, classify_batch};
use tracing::{error, info, warn};

/// Render one result as its `input -> output` report line.
///
/// `VERIFY OK` appears only when the verification scan actually ran;
/// a success with verification skipped gets no verification marker at
/// all, because claiming "verified" for unscanned output would be a
/// false assurance.
fn describe(result: &JobResult) -> String {
    let retry = match result.retried_dpi {
        Some(dpi) => format!(", retried at {dpi} DPI"),
        None => String::new(),
    };
    match &result.outcome {
        JobOutcome::Success => {
            let verify = if result.verified { " VERIFY OK" } else { "" };
            format!(
                "{} -> {} ({} redactions{retry}){verify}",
                result.input.display(),
                result.output.display(),
                result.redactions,
            )
        }
        JobOutcome::NoMatches => format!(
            "{} -> {} NO MATCHES{retry}",
            result.input.display(),
            result.output.display(),
        ),
        JobOutcome::VerificationFailed => format!(
            "{} -> {} ({} redactions{retry}) VERIFY FAILED: {} residual match group(s)",
            result.input.display(),
            result.output.display(),
            result.redactions,
            result.leaked,
        ),
        JobOutcome::FileError(detail) => {
            format!("{} FAILED: {detail}", result.input.display())
        }
    }
}

/// Log one document's disposition.
pub fn report_result(result: &JobResult) {
    let line = describe(result);
    match &result.outcome {
        JobOutcome::Success => info!("{line}"),
        JobOutcome::NoMatches => warn!("{line}"),
        JobOutcome::VerificationFailed | JobOutcome::FileError(_) => error!("{line}"),
    }
}

/// Log the batch summary and fold the results into the process exit
/// status.
pub fn summarize(results: &[JobResult], strict: bool) -> ExitStatus {
    let succeeded = results
        .iter()
        .filter(|r| r.outcome == JobOutcome::Success)
        .count();
    let no_matches: Vec<_> = results
        .iter()
        .filter(|r| r.outcome == JobOutcome::NoMatches)
        .collect();
    let leaked: Vec<_> = results
        .iter()
        .filter(|r| r.outcome == JobOutcome::VerificationFailed)
        .collect();
    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, JobOutcome::FileError(_)))
        .count();

    info!(
        "{} document(s): {} redacted, {} without matches, {} leaked, {} failed",
        results.len(),
        succeeded,
        no_matches.len(),
        leaked.len(),
        failed,
    );
    for r in &leaked {
        error!("verification failed: {}", r.output.display());
    }
    if strict {
        for r in &no_matches {
            warn!("no matches: {}", r.input.display());
        }
    }

    classify_batch(results, strict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn success(verified: bool, retried_dpi: Option<u32>) -> JobResult {
        JobResult {
            input: PathBuf::from("in.pdf"),
            output: PathBuf::from("out.pdf"),
            redactions: 3,
            leaked: 0,
            verified,
            outcome: JobOutcome::Success,
            retried_dpi,
        }
    }

    #[test]
    fn verified_success_carries_the_marker() {
        let line = describe(&success(true, None));
        assert_eq!(line, "in.pdf -> out.pdf (3 redactions) VERIFY OK");
    }

    #[test]
    fn unverified_success_claims_nothing() {
        let line = describe(&success(false, None));
        assert_eq!(line, "in.pdf -> out.pdf (3 redactions)");
        assert!(!line.contains("VERIFY"));
    }

    #[test]
    fn retry_resolution_is_reported() {
        let line = describe(&success(true, Some(300)));
        assert!(line.contains("retried at 300 DPI"));
    }

    #[test]
    fn verification_failure_reports_the_leak_count() {
        let mut result = success(true, None);
        result.leaked = 2;
        result.outcome = JobOutcome::VerificationFailed;
        let line = describe(&result);
        assert!(line.contains("VERIFY FAILED: 2 residual match group(s)"));
    }

    #[test]
    fn file_error_reports_the_detail() {
        let mut result = success(false, None);
        result.outcome = JobOutcome::FileError("cannot open in.pdf".into());
        assert_eq!(describe(&result), "in.pdf FAILED: cannot open in.pdf");
    }

    #[test]
    fn unverified_successes_still_classify_as_success() {
        let results = vec![success(false, None), success(false, None)];
        assert_eq!(summarize(&results, true), ExitStatus::Success);
    }
}
