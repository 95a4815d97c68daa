//! Character-based line wrapping for box labels.
//!
//! Step descriptions and exclusion labels are wrapped to a configured
//! character width before layout, so box heights can be computed from the
//! line count alone without measuring rendered glyphs.

/// Wraps text into lines of at most `width` characters.
///
/// Words are taken as whitespace-separated tokens and are never split, so
/// a single word longer than `width` occupies its own over-long line.
/// Blank or whitespace-only input produces no lines at all.
///
/// # Examples
///
/// ```
/// use cohortflow_core::text::wrap_lines;
///
/// let lines = wrap_lines("Excluded due to missing consent", 14);
/// assert_eq!(lines, vec!["Excluded due", "to missing", "consent"]);
///
/// assert!(wrap_lines("   ", 10).is_empty());
/// ```
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        vec![text.to_string()]
    } else {
        lines
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn words_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,12}", 0..20)
    }

    fn width_strategy() -> impl Strategy<Value = usize> {
        1usize..40
    }

    /// Every produced line is within the width unless it is a single
    /// over-long word.
    fn check_lines_respect_width(words: Vec<String>, width: usize) -> Result<(), TestCaseError> {
        let text = words.join(" ");
        for line in wrap_lines(&text, width) {
            let fits = line.chars().count() <= width;
            let single_long_word = !line.contains(' ') && line.chars().count() > width;
            prop_assert!(fits || single_long_word, "line breaks width: {line:?}");
        }
        Ok(())
    }

    /// Wrapping rearranges whitespace but never loses or reorders words.
    fn check_words_preserved(words: Vec<String>, width: usize) -> Result<(), TestCaseError> {
        let text = words.join(" ");
        let rejoined = wrap_lines(&text, width).join(" ");
        prop_assert_eq!(rejoined, words.join(" "));
        Ok(())
    }

    proptest! {
        #[test]
        fn lines_respect_width(words in words_strategy(), width in width_strategy()) {
            check_lines_respect_width(words, width)?;
        }

        #[test]
        fn words_preserved(words in words_strategy(), width in width_strategy()) {
            check_words_preserved(words, width)?;
        }
    }
}
