// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime compilation of redaction patterns.
//
// Patterns arrive as data (config files, -m flags), not as source code, so
// the usual pest derive macro is out. Instead the grammar text is parsed
// and optimised with `pest_meta` and evaluated with the `pest_vm`
// interpreter. The first rule defined in a grammar is its entry point.

use pest_meta::parse_and_optimize;
use pest_vm::Vm;
use schwaerz_core::{Result, SchwaerzError};
use tracing::{debug, warn};

/// An uncompiled pattern as the user supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// Case-insensitive exact text from a `-m` flag.
    Literal(String),
    /// A pest grammar from a config file.
    Grammar { name: String, source: String },
}

impl PatternSpec {
    /// Display name for log lines.
    pub fn name(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Grammar { name, .. } => name,
        }
    }
}

/// A pattern compiled to an executable grammar. One per pattern per worker;
/// compiled grammars never cross thread boundaries.
pub struct CompiledGrammar {
    name: String,
    entry: String,
    vm: Vm,
}

impl CompiledGrammar {
    /// Compile a pattern. Literals are rewritten into a single-rule grammar
    /// with a case-insensitive string match.
    pub fn compile(spec: &PatternSpec) -> Result<Self> {
        match spec {
            PatternSpec::Literal(text) => Self::from_literal(text),
            PatternSpec::Grammar { name, source } => Self::from_grammar(name, source),
        }
    }

    fn from_literal(text: &str) -> Result<Self> {
        let normalized = crate::stream::normalize(text);
        if normalized.is_empty() {
            return Err(SchwaerzError::Grammar(format!(
                "literal pattern {text:?} contains no matchable characters"
            )));
        }
        // The normalised literal is pure ASCII alphanumeric, so it can be
        // embedded in a pest string without escaping. `^"..."` matches
        // case-insensitively.
        let source = format!("lit = {{ ^\"{normalized}\" }}");
        Self::from_grammar(text, &source)
    }

    fn from_grammar(name: &str, source: &str) -> Result<Self> {
        let (_, rules) = parse_and_optimize(source).map_err(|errors| {
            let detail = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            SchwaerzError::Grammar(format!("pattern {name:?}: {detail}"))
        })?;
        let entry = rules
            .first()
            .map(|rule| rule.name.clone())
            .ok_or_else(|| {
                SchwaerzError::Grammar(format!("pattern {name:?} defines no rules"))
            })?;
        debug!(pattern = name, entry, "compiled pattern grammar");
        Ok(Self {
            name: name.to_string(),
            entry,
            vm: Vm::new(rules),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Try to match this grammar against a prefix of `input`.
    ///
    /// Returns the number of bytes consumed, or `None` when the grammar does
    /// not match here. A failed parse is an ordinary non-match, never an
    /// error; grammars are only fallible at compile time.
    pub fn match_prefix(&self, input: &str) -> Option<usize> {
        match self.vm.parse(&self.entry, input) {
            Ok(mut pairs) => pairs.next().map(|pair| pair.as_span().end()),
            Err(_) => None,
        }
    }
}

/// Compile a batch of patterns, dropping the ones that fail.
///
/// A bad grammar is logged and skipped so one typo cannot take down a batch
/// run; callers that need all-or-nothing behaviour check the returned count
/// against the input count.
pub fn compile_patterns(specs: &[PatternSpec]) -> Vec<CompiledGrammar> {
    let mut compiled = Vec::with_capacity(specs.len());
    for spec in specs {
        match CompiledGrammar::compile(spec) {
            Ok(grammar) => compiled.push(grammar),
            Err(err) => warn!(pattern = spec.name(), error = %err, "skipping pattern"),
        }
    }
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_case_insensitively() {
        let g = CompiledGrammar::compile(&PatternSpec::Literal("Confidential".into()))
            .expect("literal should compile");
        assert_eq!(g.match_prefix("CONFIDENTIALstuff"), Some(12));
        assert_eq!(g.match_prefix("confidential"), Some(12));
        assert_eq!(g.match_prefix("onfidential"), None);
    }

    #[test]
    fn literal_is_normalized_before_compilation() {
        let g = CompiledGrammar::compile(&PatternSpec::Literal("123-45-6789".into()))
            .expect("literal should compile");
        // The stream the matcher runs on is normalised the same way.
        assert_eq!(g.match_prefix("123456789"), Some(9));
        assert_eq!(g.match_prefix("123-45-6789"), None);
    }

    #[test]
    fn punctuation_only_literal_is_rejected() {
        let err = CompiledGrammar::compile(&PatternSpec::Literal("---".into()));
        assert!(err.is_err());
    }

    #[test]
    fn grammar_entry_is_the_first_rule() {
        let g = CompiledGrammar::compile(&PatternSpec::Grammar {
            name: "ssn".into(),
            source: "ssn = { area ~ ASCII_DIGIT{5} }\narea = { ASCII_DIGIT{4} }".into(),
        })
        .expect("grammar should compile");
        assert_eq!(g.match_prefix("123456789x"), Some(9));
        assert_eq!(g.match_prefix("12345678"), None);
    }

    #[test]
    fn grammar_matches_are_anchored_prefixes() {
        let g = CompiledGrammar::compile(&PatternSpec::Grammar {
            name: "digits".into(),
            source: "digits = { ASCII_DIGIT{9} }".into(),
        })
        .expect("grammar should compile");
        // Nine digits at the start consume exactly nine bytes even when
        // more digits follow.
        assert_eq!(g.match_prefix("1234567890"), Some(9));
        assert_eq!(g.match_prefix("abc123456789"), None);
    }

    #[test]
    fn syntax_errors_are_compile_errors() {
        let err = CompiledGrammar::compile(&PatternSpec::Grammar {
            name: "broken".into(),
            source: "broken = { ".into(),
        });
        assert!(matches!(err, Err(SchwaerzError::Grammar(_))));
    }

    #[test]
    fn bad_patterns_are_skipped_not_fatal() {
        let specs = vec![
            PatternSpec::Grammar {
                name: "broken".into(),
                source: "broken = {".into(),
            },
            PatternSpec::Literal("keep".into()),
        ];
        let compiled = compile_patterns(&specs);
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].name(), "keep");
    }
}
