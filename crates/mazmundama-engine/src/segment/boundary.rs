use std::sync::OnceLock;

use regex::Regex;

/// One or more terminal marks followed by whitespace or the end of the text.
fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("Invalid boundary regex"))
}

/// Splits text into sentences at punctuation boundaries.
///
/// A boundary falls after a run of `.`, `!` or `?` that is followed by
/// whitespace or the end of the text; the whitespace stays with the sentence
/// it follows, so concatenating the pieces gives back the input. Text after
/// the last boundary is a final sentence unless it is blank.
///
/// Abbreviations and decimals are not special-cased: `"Dr. Smith"` splits
/// after `"Dr. "`, while `"3.14"` does not split because no whitespace
/// follows the period.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary_regex().find_iter(text) {
        sentences.push(&text[start..m.end()]);
        start = m.end();
    }

    let rest = &text[start..];
    if !rest.trim().is_empty() {
        sentences.push(rest);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn abbreviation_triggers_early_boundary() {
        assert_eq!(
            split_sentences("Hello world. This is Dr. Smith! Ok?"),
            vec!["Hello world. ", "This is Dr. ", "Smith! ", "Ok?"]
        );
    }

    #[rstest]
    #[case("Wait... what?! Yes.", vec!["Wait... ", "what?! ", "Yes."])]
    #[case("No punctuation at all", vec!["No punctuation at all"])]
    #[case("Trailing fragment. and more", vec!["Trailing fragment. ", "and more"])]
    #[case("Pi is 3.14 today.", vec!["Pi is 3.14 today."])]
    #[case("Line one.\nLine two.\n", vec!["Line one.\n", "Line two.\n"])]
    #[case("  Leading space. ", vec!["  Leading space. "])]
    fn punctuation_boundaries(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_sentences(text), expected);
    }

    #[test]
    fn blank_text_has_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n").is_empty());
    }

    #[test]
    fn pieces_concatenate_to_input() {
        let text = "One! Two? Three... four";
        assert_eq!(split_sentences(text).concat(), text);
    }

    #[test]
    fn non_breaking_space_counts_as_whitespace() {
        assert_eq!(split_sentences("Done.\u{a0}Next"), vec!["Done.\u{a0}", "Next"]);
    }
}
