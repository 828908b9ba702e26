// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input collection and output path resolution.

use std::path::{Path, PathBuf};

use schwaerz_core::{Result, SchwaerzError};
use tracing::warn;

/// One discovered input document. `rel` is the path the document keeps
/// when the batch writes into an output directory: the bare file name for
/// file arguments, the subpath for documents found inside a directory
/// argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDoc {
    pub path: PathBuf,
    pub rel: PathBuf,
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Expand the positional arguments into a flat list of PDF documents.
///
/// Directories are walked recursively in sorted order so batches are
/// deterministic. Arguments that are missing or not PDFs are skipped with
/// a warning rather than failing the run; glob expansion is the shell's
/// job.
pub fn collect_inputs(args: &[PathBuf]) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for arg in args {
        if arg.is_dir() {
            walk_dir(arg, arg, &mut docs)?;
        } else if arg.is_file() {
            if !is_pdf(arg) {
                warn!("skipping non-PDF input {}", arg.display());
                continue;
            }
            let rel = arg
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| arg.clone());
            docs.push(InputDoc {
                path: arg.clone(),
                rel,
            });
        } else {
            warn!("skipping missing input {}", arg.display());
        }
    }
    Ok(docs)
}

fn walk_dir(dir: &Path, base: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            walk_dir(&path, base, docs)?;
        } else if is_pdf(&path) {
            let rel = path
                .strip_prefix(base)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            docs.push(InputDoc { path, rel });
        }
    }
    Ok(())
}

/// Default output path: `report.pdf` becomes `report.redacted.pdf` beside
/// the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}.redacted.pdf"))
}

/// Whether `-o` names a directory: it already is one, or it was written
/// with a trailing separator.
fn is_dir_target(output: &Path) -> bool {
    if output.is_dir() {
        return true;
    }
    output
        .to_string_lossy()
        .ends_with(std::path::MAIN_SEPARATOR)
}

/// Pair every input with its output path.
///
/// With no `-o`, each document gets a `.redacted.pdf` sibling. A directory
/// target reproduces each document's relative path beneath it. A file
/// target is only meaningful for a single input; several documents
/// funnelling into one file is a configuration mistake, not a last-writer
/// race.
pub fn resolve_outputs(
    docs: &[InputDoc],
    output: Option<&Path>,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    match output {
        None => Ok(docs
            .iter()
            .map(|doc| (doc.path.clone(), default_output(&doc.path)))
            .collect()),
        Some(target) if is_dir_target(target) => Ok(docs
            .iter()
            .map(|doc| (doc.path.clone(), target.join(&doc.rel)))
            .collect()),
        Some(target) => {
            if docs.len() > 1 {
                return Err(SchwaerzError::Config(format!(
                    "{} inputs cannot share the single output file {}; pass a directory",
                    docs.len(),
                    target.display()
                )));
            }
            Ok(docs
                .iter()
                .map(|doc| (doc.path.clone(), target.to_path_buf()))
                .collect())
        }
    }
}
