// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schwärz — OCR-based PII redaction for PDF documents.
//
// Entry point. Parses arguments, loads patterns, expands inputs, and
// dispatches the batch to the worker pool.

mod cli;
mod inputs;
mod patterns;
mod report;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use schwaerz_batch::{run_all, worker_count};
use schwaerz_core::{ExitStatus, GroupingConfig, JobResult, JobSpec, Result, SchwaerzError};
use schwaerz_document::{OcrConfig, RedactionEngine};
use schwaerz_match::{PatternSpec, compile_patterns};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match run(&cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            error!("{err}");
            let status = match err {
                SchwaerzError::Config(_) | SchwaerzError::Grammar(_) => ExitStatus::ConfigError,
                _ => ExitStatus::FileError,
            };
            ExitCode::from(status.code())
        }
    }
}

fn run(cli: &Cli) -> Result<ExitStatus> {
    // -- Patterns -------------------------------------------------------------

    let mut specs: Vec<PatternSpec> = cli
        .matches
        .iter()
        .map(|text| PatternSpec::Literal(text.clone()))
        .collect();
    let mut grouping = GroupingConfig::default();

    if let Some(path) = patterns::find_config(cli.config.as_deref())? {
        let (file_specs, file_grouping) = patterns::load_patterns(&path)?;
        info!("loaded {} pattern(s) from {}", file_specs.len(), path.display());
        specs.extend(file_specs);
        if let Some(g) = file_grouping {
            grouping = g;
        }
    }
    if specs.is_empty() {
        return Err(SchwaerzError::Config(format!(
            "no patterns given; pass -m or provide a config file (searched: {})",
            patterns::searched_locations()
        )));
    }
    if let Some(ratio) = cli.same_line_ratio {
        grouping.same_line_ratio = ratio;
    }
    if let Some(gap) = cli.max_gap {
        grouping.max_gap_px = gap;
    }
    if let Some(pad) = cli.pad {
        grouping.pad_px = pad;
    }

    // Compile once up front so a config full of typos fails the run before
    // any document is touched. Workers recompile from the sources.
    if compile_patterns(&specs).is_empty() {
        return Err(SchwaerzError::Config(
            "none of the supplied patterns compiled".into(),
        ));
    }

    // -- Inputs ---------------------------------------------------------------

    let docs = inputs::collect_inputs(&cli.inputs)?;
    if docs.is_empty() {
        // An argument list that expands to nothing is a usage mistake,
        // not a broken document; it exits like any other config error.
        return Err(SchwaerzError::Config(
            "no PDF inputs found among the arguments".into(),
        ));
    }
    let verify = !cli.no_verify;
    let jobs: Vec<JobSpec> = inputs::resolve_outputs(&docs, cli.output.as_deref())?
        .into_iter()
        .map(|(input, output)| JobSpec {
            input,
            output,
            dpi: cli.dpi,
            verify,
        })
        .collect();

    // -- Dispatch -------------------------------------------------------------

    let workers = worker_count(cli.jobs, jobs.len());
    if workers > 1 && std::env::var_os("RAYON_NUM_THREADS").is_none() {
        // rten fans page inference out over rayon's global pool; with
        // several workers that oversubscribes every core. Still
        // single-threaded at this point, so setting the variable is safe.
        unsafe { std::env::set_var("RAYON_NUM_THREADS", "1") };
    }

    let ocr = cli
        .model_dir
        .as_deref()
        .map(OcrConfig::from_dir)
        .unwrap_or_default();

    let results: Vec<JobResult> = run_all(
        &jobs,
        workers,
        |worker_id| {
            RedactionEngine::new(ocr.clone(), &specs, grouping).map_err(|err| {
                error!(worker_id, "worker init failed: {err}");
                err.to_string()
            })
        },
        |engine, job| match engine {
            Ok(engine) => engine.process(job),
            Err(detail) => JobResult::file_error(job, detail.clone()),
        },
    );

    for result in &results {
        report::report_result(result);
    }
    Ok(report::summarize(&results, !cli.relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_set_is_a_config_error() {
        // A directory with no PDFs in it expands to zero inputs; the run
        // must fail before any worker is spawned, as a config error.
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("notes.txt"), b"").expect("write");
        let cli = Cli::parse_from([
            "schwaerz",
            dir.path().to_str().expect("utf8 path"),
            "-m",
            "secret",
        ]);
        let err = run(&cli);
        assert!(matches!(err, Err(SchwaerzError::Config(_))));
    }

    #[test]
    fn no_patterns_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pdf = dir.path().join("a.pdf");
        std::fs::write(&pdf, b"").expect("write");
        let cli = Cli::parse_from([
            "schwaerz",
            pdf.to_str().expect("utf8 path"),
            "-c",
            "/nonexistent/patterns.toml",
        ]);
        let err = run(&cli);
        assert!(matches!(err, Err(SchwaerzError::Config(_))));
    }
}
