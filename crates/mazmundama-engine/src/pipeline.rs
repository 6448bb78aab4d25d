//! The full run from markup to pages: parse, prepare, wrap, paginate.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    convert::{ConvertError, MarkupConverter},
    html::{Diagnostic, parse_html},
    paginate::{DEFAULT_CHARS_PER_PAGE, Page, paginate},
    prepare::prepare,
    segment::{Granularity, Segmenter, SentenceId},
    wrap::{UnitKind, wrap_document},
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unsupported file format: {file_name}")]
    UnsupportedFormat { file_name: String },
    #[error(transparent)]
    Conversion(#[from] ConvertError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("inconsistent output: {0}")]
    InconsistentOutput(String),
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub granularity: Granularity,
    pub chars_per_page: usize,
    pub strip_images: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            chars_per_page: DEFAULT_CHARS_PER_PAGE,
            strip_images: true,
        }
    }
}

/// A sentence unit and where it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceUnit {
    pub id: SentenceId,
    pub page: u32,
    #[serde(flatten)]
    pub kind: UnitKind,
    pub text: String,
    pub html: String,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedDocument {
    pub pages: Vec<Page>,
    pub units: Vec<SentenceUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessedDocument {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn total_sentences(&self) -> usize {
        self.units.len()
    }
}

/// Runs the pipeline over markup.
///
/// Malformed markup is never an error; problems found while parsing come
/// back as diagnostics. An error means the output failed its own consistency
/// checks and nothing from the run should be kept.
pub fn process_html(
    markup: &str,
    options: &PipelineOptions,
) -> Result<ProcessedDocument, PipelineError> {
    if options.chars_per_page == 0 {
        return Err(PipelineError::InvalidOptions(
            "chars_per_page must be greater than zero".to_string(),
        ));
    }

    let parsed = parse_html(markup);
    log::debug!(
        "parsed {} bytes into {} root nodes",
        markup.len(),
        parsed.nodes.len()
    );
    for diagnostic in &parsed.diagnostics {
        log::warn!("malformed markup: {diagnostic}");
    }

    let prepared = prepare(&parsed.nodes, options.strip_images);
    let wrapped = wrap_document(&prepared, Segmenter::new(options.granularity));
    let pages = paginate(&wrapped.nodes, options.chars_per_page);

    let page_of: HashMap<SentenceId, u32> = pages
        .iter()
        .flat_map(|page| page.sentence_ids.iter().map(|id| (*id, page.number)))
        .collect();

    let units = wrapped
        .units
        .into_iter()
        .map(|unit| {
            let page = page_of.get(&unit.id).copied().ok_or_else(|| {
                PipelineError::InconsistentOutput(format!("{} is on no page", unit.id))
            })?;
            Ok(SentenceUnit {
                id: unit.id,
                page,
                kind: unit.kind,
                text: unit.text,
                html: unit.html,
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let document = ProcessedDocument {
        pages,
        units,
        diagnostics: parsed.diagnostics,
    };
    check_consistency(&document)?;

    log::debug!(
        "processed document: {} pages, {} sentences, {} diagnostics",
        document.total_pages(),
        document.total_sentences(),
        document.diagnostics.len()
    );
    Ok(document)
}

/// Converts an uploaded file and runs the pipeline over it.
pub fn process_upload(
    file_name: &str,
    bytes: &[u8],
    converter: &dyn MarkupConverter,
    options: &PipelineOptions,
) -> Result<ProcessedDocument, PipelineError> {
    if !converter.accepts(file_name) {
        return Err(PipelineError::UnsupportedFormat {
            file_name: file_name.to_string(),
        });
    }
    let markup = converter.convert(bytes)?;
    process_html(&markup, options)
}

fn check_consistency(document: &ProcessedDocument) -> Result<(), PipelineError> {
    for (expected, unit) in (1..).zip(&document.units) {
        if unit.id.number() != expected {
            return Err(PipelineError::InconsistentOutput(format!(
                "expected sent-{expected}, found {}",
                unit.id
            )));
        }
    }

    let on_pages: Vec<SentenceId> = document
        .pages
        .iter()
        .flat_map(|page| page.sentence_ids.iter().copied())
        .collect();
    let in_order: Vec<SentenceId> = document.units.iter().map(|unit| unit.id).collect();
    if on_pages != in_order {
        return Err(PipelineError::InconsistentOutput(
            "pages do not hold every sentence exactly once in order".to_string(),
        ));
    }

    for (expected, page) in (1..).zip(&document.pages) {
        if page.number != expected {
            return Err(PipelineError::InconsistentOutput(format!(
                "expected page {expected}, found page {}",
                page.number
            )));
        }
    }
    if document.pages.is_empty() {
        return Err(PipelineError::InconsistentOutput(
            "document has no pages".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{convert::HtmlPassthrough, html::DiagnosticKind};
    use pretty_assertions::assert_eq;

    fn sentence_options() -> PipelineOptions {
        PipelineOptions {
            granularity: Granularity::Sentence,
            ..PipelineOptions::default()
        }
    }

    #[test]
    fn empty_document_has_one_page_and_no_units() {
        let doc = process_html("", &PipelineOptions::default()).unwrap();
        assert_eq!(doc.total_pages(), 1);
        assert_eq!(doc.total_sentences(), 0);
        assert_eq!(doc.pages[0].html, "");
    }

    #[test]
    fn units_know_their_pages() {
        let markup = format!("<p>{}</p><p>Short one.</p>", "word ".repeat(400));
        let doc = process_html(&markup, &PipelineOptions::default()).unwrap();
        assert_eq!(doc.total_pages(), 2);
        let pages: Vec<u32> = doc.units.iter().map(|u| u.page).collect();
        assert_eq!(pages, vec![1, 2]);
        assert_eq!(doc.units[1].text, "Short one.");
    }

    #[test]
    fn sentence_granularity_numbers_each_sentence() {
        let doc = process_html(
            "<p>Hello world. This is Dr. Smith! Ok?</p>",
            &sentence_options(),
        )
        .unwrap();
        let texts: Vec<&str> = doc.units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello world.", "This is Dr.", "Smith!", "Ok?"]);
        let ids: Vec<String> = doc.units.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(ids, vec!["sent-1", "sent-2", "sent-3", "sent-4"]);
    }

    #[test]
    fn line_break_does_not_glue_words() {
        for options in [PipelineOptions::default(), sentence_options()] {
            let doc = process_html("<p>line one<br/>line two</p>", &options).unwrap();
            assert_eq!(doc.units[0].text, "line one\nline two");
        }
    }

    #[test]
    fn text_outside_unit_blocks_gets_no_id() {
        let doc = process_html(
            "<blockquote>Quoted.</blockquote><table><tr><td>Cell</td></tr></table>\
             <div>Loose div</div><p>Para</p>",
            &PipelineOptions::default(),
        )
        .unwrap();
        let units: Vec<(String, &str)> = doc
            .units
            .iter()
            .map(|u| (u.id.to_string(), u.text.as_str()))
            .collect();
        assert_eq!(units, vec![("sent-1".to_string(), "Para")]);
        assert!(doc.pages[0].html.contains("<td>Cell</td>"));
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let markup = "<h1>T</h1><p>One. Two.</p><ul><li>A<ul><li>B</li></ul></li></ul>";
        for options in [PipelineOptions::default(), sentence_options()] {
            let first = process_html(markup, &options).unwrap();
            let second = process_html(markup, &options).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn reprocessing_own_output_is_stable() {
        let markup = "<h1>Title</h1><p>One. <em>Two</em>.</p><p></p><p>Three &amp; four.</p>";
        for options in [PipelineOptions::default(), sentence_options()] {
            let first = process_html(markup, &options).unwrap();
            let exported: String = first.pages.iter().map(|p| p.html.as_str()).collect();
            let second = process_html(&exported, &options).unwrap();
            assert_eq!(first.pages, second.pages);
            assert_eq!(first.units, second.units);
        }
    }

    #[test]
    fn malformed_markup_is_reported_not_fatal() {
        let doc = process_html("<p>Open <b>bold</p></div>", &PipelineOptions::default()).unwrap();
        assert_eq!(doc.total_sentences(), 1);
        let kinds: Vec<&DiagnosticKind> = doc.diagnostics.iter().map(|d| &d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &DiagnosticKind::UnclosedElement { name: "b".into() },
                &DiagnosticKind::StrayEndTag { name: "div".into() },
            ]
        );
    }

    #[test]
    fn zero_budget_is_rejected() {
        let options = PipelineOptions {
            chars_per_page: 0,
            ..PipelineOptions::default()
        };
        let err = process_html("<p>x</p>", &options).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidOptions(_)));
    }

    #[test]
    fn unsupported_upload_is_rejected_before_parsing() {
        let err = process_upload(
            "chapter.docx",
            b"<p>x</p>",
            &HtmlPassthrough,
            &PipelineOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn upload_strips_images() {
        let doc = process_upload(
            "chapter.html",
            b"<p>Figure <img src=\"f.png\"> shows it.</p>",
            &HtmlPassthrough,
            &PipelineOptions::default(),
        )
        .unwrap();
        assert!(!doc.pages[0].html.contains("<img"));
        assert_eq!(doc.units[0].text, "Figure  shows it.");
    }

    #[test]
    fn pipeline_types_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessedDocument>();
        assert_send_sync::<PipelineOptions>();
        assert_send_sync::<Segmenter>();
    }
}
