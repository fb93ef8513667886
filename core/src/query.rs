use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};

/// How the parsed word lists are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Sorted and deduplicated; used for ranking.
    Normalized,
    /// Original query order, duplicates kept; used for matching.
    PreserveOrder,
}

/// A parsed query borrowing its words from the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
}

fn parse_query_word(text: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(Error::invalid(format!("query word {text:?} is invalid")));
    }
    Ok(QueryWord { data, is_minus })
}

impl<'q> Query<'q> {
    pub fn parse(text: &'q str, stop_words: &StopWords, mode: ParseMode) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            let word = parse_query_word(word)?;
            if stop_words.contains(word.data) {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }
        if mode == ParseMode::Normalized {
            for words in [&mut query.plus_words, &mut query.minus_words] {
                words.sort_unstable();
                words.dedup();
            }
        }
        tracing::debug!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            ?mode,
            "parsed query"
        );
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> StopWords {
        StopWords::from_text("in the").unwrap()
    }

    #[test]
    fn classifies_plus_and_minus() {
        let q = Query::parse("fox -city in dog", &stop(), ParseMode::PreserveOrder).unwrap();
        assert_eq!(q.plus_words, vec!["fox", "dog"]);
        assert_eq!(q.minus_words, vec!["city"]);
    }

    #[test]
    fn normalized_sorts_and_dedups() {
        let q = Query::parse("fox dog fox -b -a -b", &stop(), ParseMode::Normalized).unwrap();
        assert_eq!(q.plus_words, vec!["dog", "fox"]);
        assert_eq!(q.minus_words, vec!["a", "b"]);
    }

    #[test]
    fn preserve_order_keeps_duplicates() {
        let q = Query::parse("fox dog fox", &stop(), ParseMode::PreserveOrder).unwrap();
        assert_eq!(q.plus_words, vec!["fox", "dog", "fox"]);
    }

    #[test]
    fn stop_minus_word_is_dropped() {
        let q = Query::parse("-the fox", &stop(), ParseMode::Normalized).unwrap();
        assert!(q.minus_words.is_empty());
    }

    #[test]
    fn malformed_words_fail() {
        for bad in ["-", "--cat", "ca\u{3}t", "fox -"] {
            assert!(
                matches!(Query::parse(bad, &stop(), ParseMode::Normalized), Err(Error::InvalidArgument(_))),
                "{bad:?} should fail"
            );
        }
    }

    #[test]
    fn inner_dash_is_fine() {
        let q = Query::parse("well-known -x-ray", &stop(), ParseMode::Normalized).unwrap();
        assert_eq!(q.plus_words, vec!["well-known"]);
        assert_eq!(q.minus_words, vec!["x-ray"]);
    }
}
