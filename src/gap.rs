use serde::Serialize;
use std::collections::HashMap;

/// Cap on how many missing keywords are reported per analysis.
pub const MAX_MISSING_KEYWORDS: usize = 10;

/// A term present in the job description but absent from the resume,
/// with its raw occurrence count in the JD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKeyword {
    pub term: String,
    pub count: usize,
}

/// Counts unigrams and bigrams in a normalized text.
///
/// Counts are raw term frequencies; a document twice as long does not get
/// its counts halved. Length weighting is out of scope for gap detection.
fn term_counts(normalized: &str) -> HashMap<String, usize> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let mut counts = HashMap::new();

    for token in &tokens {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }

    counts
}

/// Computes the keyword gap between a normalized resume and a normalized JD.
///
/// A term is missing iff its JD count is positive and its resume count is
/// zero. Results are ordered by descending JD count, ties broken by
/// ascending term so identical inputs always produce identical output, and
/// truncated to [`MAX_MISSING_KEYWORDS`].
///
/// Either side being empty is handled by the same code path: an empty
/// resume misses every JD term, an empty JD misses nothing.
pub fn missing_keywords(normalized_resume: &str, normalized_jd: &str) -> Vec<MissingKeyword> {
    let resume_counts = term_counts(normalized_resume);
    let jd_counts = term_counts(normalized_jd);

    let mut missing: Vec<MissingKeyword> = jd_counts
        .into_iter()
        .filter(|(term, count)| *count > 0 && !resume_counts.contains_key(term))
        .map(|(term, count)| MissingKeyword { term, count })
        .collect();

    missing.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    missing.truncate(MAX_MISSING_KEYWORDS);
    missing
}
