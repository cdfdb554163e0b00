use serde::Serialize;
use std::cmp::Ordering;
use tracing::error;
use unicode_segmentation::UnicodeSegmentation;

use crate::embedding::{cosine_similarity, SentenceEncoder};
use crate::TARGET_ANALYSIS;

/// How many hero sentences are reported per analysis.
pub const MAX_HERO_SENTENCES: usize = 3;

/// Sentences with fewer words than this are boilerplate ("Page 1",
/// section headers) and never rank.
pub const MIN_SENTENCE_WORDS: usize = 5;

/// A resume sentence paired with its cosine similarity to the JD.
#[derive(Debug, Clone, Serialize)]
pub struct HeroSentence {
    pub text: String,
    pub score: f32,
}

/// Splits raw text on sentence boundaries (UAX #29).
fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ranks resume sentences against an already-computed JD embedding and
/// returns the best [`MAX_HERO_SENTENCES`].
///
/// The JD embedding is reused from the overall match; the JD is never
/// re-encoded per sentence. Surviving sentences are embedded in a single
/// batch. An encoding failure here degrades to an empty list instead of
/// aborting the analysis; the match score and keyword gap stand on their
/// own.
pub fn rank_sentences(
    encoder: &dyn SentenceEncoder,
    resume_text: &str,
    jd_embedding: &[f32],
) -> Vec<HeroSentence> {
    let sentences: Vec<&str> = split_sentences(resume_text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= MIN_SENTENCE_WORDS)
        .collect();

    if sentences.is_empty() {
        return Vec::new();
    }

    let embeddings = match encoder.encode_batch(&sentences) {
        Ok(embeddings) => embeddings,
        Err(e) => {
            error!(target: TARGET_ANALYSIS, "Sentence embedding failed, skipping hero ranking: {:?}", e);
            return Vec::new();
        }
    };

    let mut scored: Vec<HeroSentence> = sentences
        .iter()
        .zip(embeddings.iter())
        .filter_map(|(sentence, embedding)| {
            cosine_similarity(embedding, jd_embedding)
                .ok()
                .map(|score| HeroSentence {
                    text: sentence.to_string(),
                    score,
                })
        })
        .collect();

    // Stable sort: equal scores keep original sentence order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(MAX_HERO_SENTENCES);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashingEncoder;

    const JD: &str = "Looking for a Python and SQL developer with AWS skills.";

    fn jd_embedding(encoder: &HashingEncoder) -> Vec<f32> {
        use crate::embedding::SentenceEncoder;
        encoder.encode(JD).unwrap()
    }

    #[test]
    fn splits_on_sentence_boundaries() {
        let sentences = split_sentences("I build APIs in Rust. I deploy them on AWS.");
        assert_eq!(
            sentences,
            vec!["I build APIs in Rust.", "I deploy them on AWS."]
        );
    }

    #[test]
    fn returns_at_most_three_sentences() {
        let encoder = HashingEncoder;
        let resume = "I am a Python developer with SQL experience. \
            I build data pipelines with Python and SQL every day. \
            I have shipped Python services to AWS for five years. \
            I mentor junior developers in Python and SQL work. \
            I also maintain internal developer tooling in Python.";
        let ranked = rank_sentences(&encoder, resume, &jd_embedding(&encoder));
        assert!(ranked.len() <= MAX_HERO_SENTENCES);
        assert!(!ranked.is_empty());
    }

    #[test]
    fn every_ranked_sentence_has_more_than_four_words() {
        let encoder = HashingEncoder;
        let resume = "Skills. Page 1. I am a Python developer with SQL experience.";
        let ranked = rank_sentences(&encoder, resume, &jd_embedding(&encoder));
        for hero in &ranked {
            assert!(hero.text.split_whitespace().count() > 4);
        }
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn scores_are_non_increasing() {
        let encoder = HashingEncoder;
        let resume = "I am a Python developer with SQL and AWS skills. \
            I enjoy hiking and photography on the weekends mostly. \
            I built Python dashboards backed by SQL warehouses.";
        let ranked = rank_sentences(&encoder, resume, &jd_embedding(&encoder));
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn best_matching_sentence_ranks_first() {
        let encoder = HashingEncoder;
        let resume = "I enjoy hiking and photography on the weekends mostly. \
            Looking for a Python and SQL developer with AWS skills.";
        let ranked = rank_sentences(&encoder, resume, &jd_embedding(&encoder));
        assert!(ranked[0].text.contains("Python"));
    }

    #[test]
    fn equal_scores_preserve_original_order() {
        let encoder = HashingEncoder;
        // Same bag of words in both sentences, so identical scores
        let resume = "Python and SQL developer working with AWS daily. \
            AWS and SQL developer working with Python daily.";
        let ranked = rank_sentences(&encoder, resume, &jd_embedding(&encoder));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert!(ranked[0].text.starts_with("Python"));
    }

    #[test]
    fn empty_resume_yields_empty_list() {
        let encoder = HashingEncoder;
        assert!(rank_sentences(&encoder, "", &jd_embedding(&encoder)).is_empty());
    }

    #[test]
    fn boilerplate_only_resume_yields_empty_list() {
        let encoder = HashingEncoder;
        let resume = "Page 1. Skills. Education. Contact.";
        assert!(rank_sentences(&encoder, resume, &jd_embedding(&encoder)).is_empty());
    }
}
