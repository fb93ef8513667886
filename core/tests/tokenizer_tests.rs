use search_core::tokenizer::{split_into_words, tokenize, StopWords};
use search_core::Error;

#[test]
fn it_keeps_case_and_punctuation() {
    let sw = StopWords::default();
    let words = tokenize("Running, runner's RUN!", &sw).unwrap();
    // No normalization: terms are matched exactly as written
    assert_eq!(words, vec!["Running,", "runner's", "RUN!"]);
}

#[test]
fn it_filters_stopwords() {
    let sw = StopWords::from_text("the and").unwrap();
    let words = tokenize("the quick brown fox and the lazy dog", &sw).unwrap();
    assert!(!words.contains(&"the"));
    assert!(!words.contains(&"and"));
    assert_eq!(words.len(), 5);
}

#[test]
fn stopwords_are_case_sensitive() {
    let sw = StopWords::from_text("the").unwrap();
    let words = tokenize("The the", &sw).unwrap();
    assert_eq!(words, vec!["The"]);
}

#[test]
fn control_characters_rejected_anywhere() {
    let sw = StopWords::from_text("skip").unwrap();
    for text in ["a\u{0}b", "tab\tinside", "line\nbreak", "\u{1f}"] {
        assert!(matches!(tokenize(text, &sw), Err(Error::InvalidArgument(_))), "{text:?}");
    }
}

#[test]
fn unicode_words_split_on_spaces() {
    assert_eq!(split_into_words("пушистый кот  café"), vec!["пушистый", "кот", "café"]);
}
