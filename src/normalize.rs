use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens shorter than this are kept verbatim: stemming mangles acronyms
/// ("aws" -> "aw") that recruiters type as skills.
const MIN_STEM_LEN: usize = 4;

/// English stopwords, the NLTK list with contraction remnants included so
/// "don't" stripped of its apostrophe still disappears.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "youre", "youve",
        "youll", "youd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
        "she", "shes", "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
        "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "thatll", "these",
        "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
        "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
        "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
        "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then",
        "once", "here", "there", "when", "where", "why", "how", "all", "any", "both", "each",
        "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same",
        "so", "than", "too", "very", "s", "t", "can", "will", "just", "don", "dont", "should",
        "shouldve", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "arent", "couldn",
        "couldnt", "didn", "didnt", "doesn", "doesnt", "hadn", "hadnt", "hasn", "hasnt", "haven",
        "havent", "isn", "isnt", "ma", "mightn", "mightnt", "mustn", "mustnt", "needn", "neednt",
        "shan", "shant", "shouldn", "shouldnt", "wasn", "wasnt", "weren", "werent", "won", "wont",
        "wouldn", "wouldnt",
    ]
    .into_iter()
    .collect()
});

/// Reduces raw text to the lowercase, alphabetic, stopword-free stem form
/// used for keyword comparison. Raw text goes to the embedding model; this
/// output goes to the lexical gap engine.
pub struct Normalizer {
    stemmer: Stemmer,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalization steps, order-sensitive: lowercase, strip every
    /// character outside the basic Latin alphabet and whitespace, tokenize,
    /// drop stopwords, stem, rejoin with single spaces.
    ///
    /// Empty input produces empty output; this is not an error.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();

        stripped
            .unicode_words()
            .filter(|token| !STOP_WORDS.contains(token))
            .map(|token| self.stem(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn stem(&self, token: &str) -> String {
        if token.len() < MIN_STEM_LEN {
            token.to_string()
        } else {
            self.stemmer.stem(token).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize("Python, SQL & AWS!"),
            "python sql aws"
        );
    }

    #[test]
    fn drops_stopwords() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize("I am a Python developer with SQL experience."),
            "python develop sql experi"
        );
    }

    #[test]
    fn stems_but_spares_short_tokens() {
        let normalizer = Normalizer::new();
        // "developing" stems to "develop"; "aws" is too short to stem
        assert_eq!(normalizer.normalize("developing AWS"), "develop aws");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \n\t"), "");
    }

    #[test]
    fn non_alphabetic_input_yields_empty_output() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("123 456 !!! 🚀"), "");
    }

    #[test]
    fn stopword_only_input_yields_empty_output() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("the of and to is"), "");
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let normalizer = Normalizer::new();
        let once = normalizer.normalize("Looking for a Python and SQL developer with AWS skills.");
        let twice = normalizer.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn deterministic() {
        let normalizer = Normalizer::new();
        let text = "Senior Rust engineer, distributed systems background.";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }
}
