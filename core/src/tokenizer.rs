use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Split text into terms on ASCII spaces, skipping the empty pieces between
/// repeated spaces. Other characters, control characters included, stay
/// inside the term so callers can validate them.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when it holds no control characters (bytes 0..=31).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Immutable set of terms excluded from indexing and from queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build from any collection of words. Empty strings are ignored.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(Error::invalid(format!("stop word {word:?} contains control characters")));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from space-separated text, e.g. `"and in at"`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Tokenize document text, dropping stop words.
///
/// Fails if any term contains a control character or is a bare `-`; the
/// whole text is checked before anything is returned.
pub fn tokenize<'t>(text: &'t str, stop_words: &StopWords) -> Result<Vec<&'t str>> {
    let mut tokens = Vec::new();
    for word in split_into_words(text) {
        if !is_valid_word(word) {
            return Err(Error::invalid(format!("word {word:?} contains control characters")));
        }
        if stop_words.contains(word) {
            continue;
        }
        if word == "-" {
            return Err(Error::invalid("word \"-\" has no content"));
        }
        tokens.push(word);
    }
    Ok(tokens)
}
