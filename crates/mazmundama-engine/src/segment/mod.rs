//! # Sentence Segmentation
//!
//! Decides how a run of inline content splits into translatable units and
//! numbers those units.
//!
//! ## Granularity
//!
//! - **`Block`**: the whole run is one unit and keeps its inline markup
//!   (bold, links, ...) verbatim.
//! - **`Sentence`**: the run's visible text is split at punctuation
//!   boundaries; each sentence is a unit and inline markup inside the run is
//!   dropped.
//!
//! A deployment picks one granularity and every document it processes uses
//! it throughout; both number units with one global `sent-<n>` sequence.
//!
//! ## Modules
//!
//! - **`boundary`**: `split_sentences()` punctuation rule
//! - **`id`**: `SentenceId` and the per-run `SentenceCounter`

pub mod boundary;
pub mod id;

use serde::{Deserialize, Serialize};

use crate::html::{Node, node::visible_text};

pub use boundary::split_sentences;
pub use id::{ParseSentenceIdError, SentenceCounter, SentenceId};

/// How finely runs of text are split into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One unit per block (per text run), inline markup preserved.
    #[default]
    Block,
    /// One unit per punctuation-delimited sentence, inline markup dropped.
    Sentence,
}

/// The content of one unit before it is wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Original inline nodes, moved into the wrapper untouched.
    Markup(Vec<Node>),
    /// Decoded sentence text; the wrapper re-escapes it.
    Text(String),
}

impl Segment {
    /// Visible text of the segment.
    pub fn visible_text(&self) -> String {
        match self {
            Segment::Markup(nodes) => visible_text(nodes),
            Segment::Text(text) => text.clone(),
        }
    }
}

/// Splits runs of inline content according to a granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    granularity: Granularity,
}

impl Segmenter {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Segments a run of inline siblings.
    ///
    /// Returns no segments for a blank run: whitespace-only content never
    /// consumes an identifier.
    pub fn segment(&self, run: &[Node]) -> Vec<Segment> {
        let text = visible_text(run);
        if text.trim().is_empty() {
            return vec![];
        }

        match self.granularity {
            Granularity::Block => vec![Segment::Markup(run.to_vec())],
            Granularity::Sentence => split_sentences(&text)
                .into_iter()
                .map(|sentence| Segment::Text(sentence.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use pretty_assertions::assert_eq;

    fn inline_run(markup: &str) -> Vec<Node> {
        let parsed = parse_html(&format!("<p>{markup}</p>"));
        parsed.nodes[0].as_element().unwrap().children.clone()
    }

    #[test]
    fn block_granularity_keeps_markup() {
        let run = inline_run("One. <b>Two</b>.");
        let segments = Segmenter::new(Granularity::Block).segment(&run);
        assert_eq!(segments, vec![Segment::Markup(run)]);
    }

    #[test]
    fn sentence_granularity_flattens_markup() {
        let run = inline_run("One &amp; all. <b>Two</b> three.");
        let segments = Segmenter::new(Granularity::Sentence).segment(&run);
        assert_eq!(
            segments,
            vec![
                Segment::Text("One & all. ".into()),
                Segment::Text("Two three.".into()),
            ]
        );
    }

    #[test]
    fn line_breaks_keep_words_apart() {
        let segmenter = Segmenter::new(Granularity::Sentence);
        assert_eq!(
            segmenter.segment(&inline_run("line one<br/>line two")),
            vec![Segment::Text("line one\nline two".into())]
        );
        assert_eq!(
            segmenter.segment(&inline_run("Stop.<br>Go")),
            vec![Segment::Text("Stop.\n".into()), Segment::Text("Go".into())]
        );
    }

    #[test]
    fn blank_run_yields_nothing() {
        let run = inline_run(" &nbsp; <i> </i>");
        for granularity in [Granularity::Block, Granularity::Sentence] {
            assert!(Segmenter::new(granularity).segment(&run).is_empty());
        }
    }

    #[test]
    fn granularity_serde_names() {
        #[derive(Deserialize)]
        struct Options {
            granularity: Granularity,
        }
        let parsed: Options = toml::from_str("granularity = \"sentence\"").unwrap();
        assert_eq!(parsed.granularity, Granularity::Sentence);
        assert_eq!(Granularity::default(), Granularity::Block);
    }
}
