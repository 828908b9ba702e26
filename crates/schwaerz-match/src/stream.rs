// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalised text stream construction.
//
// OCR output is noisy: "123-45-6789" may come back as "123-45·6789" or be
// split across several words. Matching therefore runs against a single
// normalised stream per page in which every character that is not ASCII
// alphanumeric has been dropped, with a parallel map from stream position
// back to the word that contributed it.

use schwaerz_core::Word;

/// A page's worth of words collapsed into one matchable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStream {
    /// Concatenated normalised words. Pure ASCII alphanumeric, so byte
    /// offsets and character offsets coincide.
    pub text: String,
    /// `word_map[i]` is the index of the word that contributed `text[i]`.
    /// Always the same length as `text`.
    pub word_map: Vec<usize>,
}

impl TextStream {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Strip a word down to its ASCII alphanumeric characters, case preserved.
///
/// Words made entirely of punctuation normalise to the empty string and
/// own no positions in the stream.
pub fn normalize(word: &str) -> String {
    word.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Build the normalised stream for one page of words.
///
/// Word order is preserved; no separators are inserted, so patterns may
/// match across word boundaries (that is the point — see the grouper).
pub fn build_stream(words: &[Word]) -> TextStream {
    let mut text = String::new();
    let mut word_map = Vec::new();
    for (idx, word) in words.iter().enumerate() {
        let normalized = normalize(&word.text);
        word_map.extend(std::iter::repeat_n(idx, normalized.len()));
        text.push_str(&normalized);
    }
    TextStream { text, word_map }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        Word::new(text, 0, 0, 10, 10)
    }

    #[test]
    fn normalize_strips_punctuation_and_keeps_case() {
        assert_eq!(normalize("123-45-6789"), "123456789");
        assert_eq!(normalize("O'Brien,"), "OBrien");
        assert_eq!(normalize("···"), "");
        assert_eq!(normalize("naïve"), "nave");
    }

    #[test]
    fn map_length_always_equals_text_length() {
        let words = vec![word("SSN:"), word("123-45-6789"), word("---")];
        let stream = build_stream(&words);
        assert_eq!(stream.text, "SSN123456789");
        assert_eq!(stream.word_map.len(), stream.text.len());
    }

    #[test]
    fn punctuation_only_words_own_no_positions() {
        let words = vec![word("a"), word("!!"), word("b")];
        let stream = build_stream(&words);
        assert_eq!(stream.text, "ab");
        assert_eq!(stream.word_map, vec![0, 2]);
    }

    #[test]
    fn empty_page_builds_empty_stream() {
        let stream = build_stream(&[]);
        assert!(stream.is_empty());
        assert!(stream.word_map.is_empty());
    }

    #[test]
    fn positions_map_back_to_contributing_words() {
        let words = vec![word("ab"), word("cd")];
        let stream = build_stream(&words);
        assert_eq!(stream.word_map, vec![0, 0, 1, 1]);
    }
}
