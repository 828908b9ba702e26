// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Anchored multi-pattern matching over a page's text stream.

use std::collections::BTreeSet;

use crate::grammar::CompiledGrammar;
use crate::stream::TextStream;
use tracing::trace;

/// Find every word touched by any pattern anywhere in the stream.
///
/// Each grammar is tried anchored at every offset of the stream (PEG
/// matches are prefix matches, so this is the "find" loop). Every stream
/// position inside a successful match is mapped back through `word_map`
/// and the owning word's index is collected. Matches may span word
/// boundaries; zero-width matches contribute nothing.
///
/// The stream is pure ASCII, so byte offsets are character offsets and
/// slicing at any position is safe.
pub fn find_matches(stream: &TextStream, grammars: &[CompiledGrammar]) -> BTreeSet<usize> {
    let mut matched = BTreeSet::new();
    for grammar in grammars {
        for start in 0..stream.text.len() {
            let Some(len) = grammar.match_prefix(&stream.text[start..]) else {
                continue;
            };
            if len == 0 {
                continue;
            }
            trace!(pattern = grammar.name(), start, len, "pattern hit");
            for pos in start..start + len {
                matched.insert(stream.word_map[pos]);
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::PatternSpec;
    use crate::stream::build_stream;
    use schwaerz_core::Word;

    fn word(text: &str) -> Word {
        Word::new(text, 0, 0, 10, 10)
    }

    fn ssn_grammar() -> CompiledGrammar {
        CompiledGrammar::compile(&PatternSpec::Grammar {
            name: "ssn".into(),
            source: "ssn = { ASCII_DIGIT{9} }".into(),
        })
        .expect("grammar should compile")
    }

    #[test]
    fn ssn_split_across_label_and_number() {
        // "SSN:" and "123-45-6789" normalise to the stream "SSN123456789".
        // The nine-digit run lives entirely in the second word.
        let words = vec![word("SSN:"), word("123-45-6789")];
        let stream = build_stream(&words);
        assert_eq!(stream.text, "SSN123456789");

        let matched = find_matches(&stream, &[ssn_grammar()]);
        assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn matches_span_word_boundaries() {
        let words = vec![word("123-45-"), word("6789")];
        let stream = build_stream(&words);
        assert_eq!(stream.text, "123456789");

        let matched = find_matches(&stream, &[ssn_grammar()]);
        assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn union_over_multiple_grammars() {
        let words = vec![word("secret"), word("111223333"), word("plain")];
        let stream = build_stream(&words);
        let grammars = vec![
            ssn_grammar(),
            CompiledGrammar::compile(&PatternSpec::Literal("secret".into()))
                .expect("literal should compile"),
        ];
        let matched = find_matches(&stream, &grammars);
        assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn no_patterns_no_matches() {
        let words = vec![word("anything")];
        let stream = build_stream(&words);
        assert!(find_matches(&stream, &[]).is_empty());
    }

    #[test]
    fn empty_stream_is_harmless() {
        let stream = build_stream(&[]);
        assert!(find_matches(&stream, &[ssn_grammar()]).is_empty());
    }
}
