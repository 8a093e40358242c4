use snaptext_types::RecognitionOutcome;
use unicode_normalization::UnicodeNormalization;

/// Normalize recognized text for classification.
///
/// NFKC folds full-width forms so the meaningful-character check sees them;
/// interior newlines are kept, only the ends are trimmed.
pub fn clean(text: &str) -> String {
    let normalized: String = text.nfkc().collect();
    normalized.trim().to_string()
}

/// ASCII alphanumerics and CJK unified ideographs count as content; anything
/// else is treated as recognition noise.
fn is_meaningful(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Classify joined block text per the noise rule: fewer than three cleaned
/// characters and not a single meaningful one means the engine picked up
/// speckle, not text. The original, un-normalized string is what gets shown.
pub fn classify(joined: &str) -> RecognitionOutcome {
    let cleaned = clean(joined);

    if cleaned.chars().count() < 3 && !cleaned.chars().any(is_meaningful) {
        return RecognitionOutcome::Noise;
    }

    RecognitionOutcome::Text(joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_punctuation_is_noise() {
        assert_eq!(classify(".,"), RecognitionOutcome::Noise);
        assert_eq!(classify(" ~ "), RecognitionOutcome::Noise);
        assert_eq!(classify(""), RecognitionOutcome::Noise);
    }

    #[test]
    fn short_alphanumeric_is_text() {
        assert_eq!(classify("Hi"), RecognitionOutcome::Text("Hi".to_string()));
        assert_eq!(classify("7"), RecognitionOutcome::Text("7".to_string()));
    }

    #[test]
    fn single_cjk_char_is_text() {
        assert_eq!(classify("好"), RecognitionOutcome::Text("好".to_string()));
    }

    #[test]
    fn long_punctuation_passes_length_gate() {
        // Three or more cleaned characters never classify as noise.
        assert_eq!(
            classify("..."),
            RecognitionOutcome::Text("...".to_string())
        );
    }

    #[test]
    fn classification_keeps_original_string() {
        // Display text is the raw join, not the normalized form.
        let joined = "  Ｈello\nWorld  ";
        assert_eq!(
            classify(joined),
            RecognitionOutcome::Text(joined.to_string())
        );
    }

    #[test]
    fn clean_trims_and_normalizes() {
        assert_eq!(clean("  ｆｏｏ  "), "foo");
        assert_eq!(clean("a\nb"), "a\nb");
    }
}
