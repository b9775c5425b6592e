//! services/client/src/search/highlight.rs
//!
//! Marks occurrences of the query's terms inside a result passage so renderers
//! can emphasise them.

use regex::RegexBuilder;

/// A run of passage text, either matching one of the query terms or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_string(),
            matched,
        }
    }
}

/// Splits `text` into segments, flagging case-insensitive matches of any
/// whitespace-separated term in `query`. Terms are matched literally.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() || text.is_empty() {
        return vec![Segment::new(text, false)];
    }
    // Longest first so "walking" wins over "walk" at the same position.
    terms.sort_by_key(|term| std::cmp::Reverse(term.len()));

    let pattern = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return vec![Segment::new(text, false)];
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in re.find_iter(text) {
        if found.start() > cursor {
            segments.push(Segment::new(&text[cursor..found.start()], false));
        }
        segments.push(Segment::new(found.as_str(), true));
        cursor = found.end();
    }
    if cursor < text.len() {
        segments.push(Segment::new(&text[cursor..], false));
    }
    segments
}
