use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::embedding::{cosine_similarity, score_percentage, SentenceEncoder};
use crate::errors::{AnalysisError, AnalysisWarning};
use crate::gap::{self, MissingKeyword};
use crate::normalize::Normalizer;
use crate::rank::{self, HeroSentence};
use crate::TARGET_ANALYSIS;

/// The combined output of one analysis run: overall semantic score, lexical
/// keyword gap, and the resume sentences that best justify the score.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub match_score: f32,
    pub missing_keywords: Vec<MissingKeyword>,
    pub top_sentences: Vec<HeroSentence>,
    pub warnings: Vec<AnalysisWarning>,
}

/// Orchestrates the full resume/JD analysis.
///
/// The sentence encoder is injected once at construction and shared
/// read-only across requests. The keyword gap runs on normalized text;
/// semantic scoring and hero ranking run on the raw text, since the
/// embedding model needs grammatical context the normalizer destroys.
pub struct Analyzer {
    encoder: Arc<dyn SentenceEncoder>,
    normalizer: Normalizer,
}

impl Analyzer {
    pub fn new(encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self {
            encoder,
            normalizer: Normalizer::new(),
        }
    }

    /// Runs the pipeline: normalize both texts, compute the keyword gap,
    /// compute the semantic match, rank hero sentences against the reused
    /// JD embedding, and merge everything into one result.
    ///
    /// Degenerate sub-results never abort the run: an empty keyword gap, an
    /// empty sentence list, or empty input text all produce a complete
    /// `AnalysisResult` (with warnings where a precondition was not met).
    /// The single fatal condition is the encoder failing, surfaced as
    /// [`AnalysisError::EmbeddingUnavailable`].
    pub fn analyze(&self, resume_text: &str, jd_text: &str) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let resume_empty = resume_text.trim().is_empty();
        let jd_empty = jd_text.trim().is_empty();
        if resume_empty {
            warnings.push(AnalysisWarning::EmptyResume);
        }
        if jd_empty {
            warnings.push(AnalysisWarning::EmptyJobDescription);
        }

        // Lexical gap over the normalized pair
        let normalized_resume = self.normalizer.normalize(resume_text);
        let normalized_jd = self.normalizer.normalize(jd_text);
        let missing_keywords = gap::missing_keywords(&normalized_resume, &normalized_jd);

        // Semantic match over the raw pair. Empty text is never encoded:
        // its embedding would be meaningless, so the score stays 0.0 and
        // the warning above tells the caller why.
        let mut match_score = 0.0;
        let jd_embedding = if jd_empty {
            None
        } else {
            Some(
                self.encoder
                    .encode(jd_text)
                    .map_err(AnalysisError::EmbeddingUnavailable)?,
            )
        };

        if !resume_empty {
            if let Some(jd_embedding) = jd_embedding.as_deref() {
                let resume_embedding = self
                    .encoder
                    .encode(resume_text)
                    .map_err(AnalysisError::EmbeddingUnavailable)?;
                match cosine_similarity(&resume_embedding, jd_embedding) {
                    Ok(similarity) => match_score = score_percentage(similarity),
                    Err(e) => {
                        warn!(target: TARGET_ANALYSIS, "Degenerate embedding, reporting zero score: {:?}", e);
                        warnings.push(AnalysisWarning::DegenerateEmbedding);
                    }
                }
            }
        }

        // Hero sentences reuse the JD embedding computed above
        let top_sentences = match jd_embedding.as_deref() {
            Some(jd_embedding) => {
                rank::rank_sentences(self.encoder.as_ref(), resume_text, jd_embedding)
            }
            None => Vec::new(),
        };

        info!(target: TARGET_ANALYSIS,
            "Analysis complete in {:?}: score {:.2}, {} missing keyword(s), {} hero sentence(s)",
            start.elapsed(),
            match_score,
            missing_keywords.len(),
            top_sentences.len()
        );

        Ok(AnalysisResult {
            match_score,
            missing_keywords,
            top_sentences,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashingEncoder;
    use anyhow::anyhow;

    const RESUME: &str = "I am a Python developer with SQL experience.";
    const JD: &str = "Looking for a Python and SQL developer with AWS skills.";

    fn analyzer() -> Analyzer {
        Analyzer::new(Arc::new(HashingEncoder))
    }

    struct FailingEncoder;

    impl SentenceEncoder for FailingEncoder {
        fn encode(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Err(anyhow!("model not loaded"))
        }

        fn encode_batch(&self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Err(anyhow!("model not loaded"))
        }

        fn dimensions(&self) -> usize {
            0
        }
    }

    #[test]
    fn related_documents_score_above_fifty_and_flag_missing_aws() {
        let result = analyzer().analyze(RESUME, JD).unwrap();

        assert!(result.match_score > 50.0, "score was {}", result.match_score);
        let terms: Vec<&str> = result
            .missing_keywords
            .iter()
            .map(|k| k.term.as_str())
            .collect();
        assert!(terms.contains(&"aws"));
        assert!(!terms.contains(&"python"));
        assert!(!result.top_sentences.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_resume_still_produces_keyword_gap() {
        let result = analyzer().analyze("", "Python required.").unwrap();

        assert_eq!(result.match_score, 0.0);
        assert_eq!(result.missing_keywords[0].term, "python");
        assert_eq!(result.missing_keywords[0].count, 1);
        assert!(result.top_sentences.is_empty());
        assert!(result.warnings.contains(&AnalysisWarning::EmptyResume));
    }

    #[test]
    fn empty_jd_scores_zero_with_warning() {
        let result = analyzer().analyze(RESUME, "").unwrap();

        assert_eq!(result.match_score, 0.0);
        assert!(result.missing_keywords.is_empty());
        assert!(result.top_sentences.is_empty());
        assert!(result
            .warnings
            .contains(&AnalysisWarning::EmptyJobDescription));
    }

    #[test]
    fn identical_documents_score_one_hundred_with_no_gap() {
        let result = analyzer().analyze(JD, JD).unwrap();

        assert_eq!(result.match_score, 100.0);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn score_is_symmetric() {
        let forward = analyzer().analyze(RESUME, JD).unwrap();
        let backward = analyzer().analyze(JD, RESUME).unwrap();
        assert_eq!(forward.match_score, backward.match_score);
    }

    #[test]
    fn self_similarity_is_maximal() {
        let matched = analyzer().analyze(RESUME, RESUME).unwrap();
        let unrelated = analyzer()
            .analyze(RESUME, "Wanted: pastry chef for night shifts downtown.")
            .unwrap();
        assert!(matched.match_score >= unrelated.match_score);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let first = analyzer().analyze(RESUME, JD).unwrap();
        let second = analyzer().analyze(RESUME, JD).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn encoder_failure_is_fatal() {
        let analyzer = Analyzer::new(Arc::new(FailingEncoder));
        let result = analyzer.analyze(RESUME, JD);
        assert!(matches!(
            result,
            Err(AnalysisError::EmbeddingUnavailable(_))
        ));
    }

    #[test]
    fn encoder_failure_with_empty_jd_is_not_fatal() {
        // Nothing gets encoded when the JD is empty, so even a dead model
        // cannot abort the lexical path
        let analyzer = Analyzer::new(Arc::new(FailingEncoder));
        let result = analyzer.analyze(RESUME, "").unwrap();
        assert_eq!(result.match_score, 0.0);
    }
}
