//! The transcoder: ties preparation, extraction, cleaning, title derivation
//! and final document assembly together.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::extract::{build_content_container, find_candidates, select_top_candidate};
use crate::options::TranscoderOptions;
use crate::parse::parse_document;
use crate::patterns::{
    TITLE_AFTER_FIRST_COLON, TITLE_AFTER_LAST_COLON, TITLE_AFTER_SEPARATOR,
    TITLE_BEFORE_SEPARATOR, TITLE_SEPARATOR,
};
use crate::postprocess::prepare_article_content;
use crate::preprocess::{prepare_document, strip_unlikely_candidates};
use crate::scoring::{ScoreMap, inner_text};
use crate::serialize::{SerializationConfig, serialize_document};

/// Id of the overlay div wrapping the glued output.
pub const OVERLAY_DIV_ID: &str = "readOverlay";

/// Id of the inner div holding title and content.
pub const INNER_DIV_ID: &str = "readInner";

/// Id of the article content container.
pub const CONTENT_DIV_ID: &str = "readability-content";

/// Class marking elements styled by the pipeline itself, exempt from style
/// stripping.
pub const READABILITY_STYLED_CLASS: &str = "readability-styled";

/// Stylesheet bundled into every glued document.
const READABILITY_STYLESHEET: &str = include_str!("../assets/readability.css");

/// Result of [`Transcoder::transcode_extended`].
#[derive(Debug)]
pub struct TranscodedPage {
    /// The fully glued document, ready for serialization.
    pub document: Document,
    /// The derived article title.
    pub title: String,
    /// Whether any article text was actually found.
    pub extracted: bool,
    /// Candidate URL of the article's next page, if one was discovered.
    pub next_page_url: Option<String>,
}

/// Extracts the main readable content from HTML pages.
///
/// Holds the per-run score store, so a single instance must not be shared
/// across threads; `&mut self` on the entry points enforces that at compile
/// time. Instances are cheap and reusable across documents.
#[derive(Debug, Default)]
pub struct Transcoder {
    options: TranscoderOptions,
    scores: ScoreMap,
}

impl Transcoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TranscoderOptions) -> Self {
        Transcoder {
            options,
            scores: ScoreMap::new(),
        }
    }

    pub fn options(&self) -> &TranscoderOptions {
        &self.options
    }

    /// Transcodes `html` into a self-contained readable document and
    /// serializes it with default settings.
    pub fn transcode(&mut self, html: &str) -> Result<String> {
        let page = self.transcode_extended(html, None)?;
        let mut document = page.document;
        serialize_document(&mut document, &SerializationConfig::default())
    }

    /// Transcodes `html` and returns the glued document together with the
    /// derived title, the extraction flag and (when `base_url` is given) a
    /// discovered next-page URL.
    pub fn transcode_extended(&mut self, html: &str, base_url: Option<&str>) -> Result<TranscodedPage> {
        let mut doc = parse_document(html);
        prepare_document(&mut doc);

        // discovered before extraction rips the navigation out of the tree
        let next_page_url = base_url.and_then(|base| crate::pagination::find_next_page_url(&doc, base));

        let title = self.extract_article_title(&mut doc);
        let title_text = inner_text(&doc, title, self.options.normalize_spaces);
        let content = self.extract_article_content(&mut doc);
        let extracted = !inner_text(&doc, content, true).is_empty();
        self.glue_document(&mut doc, title, content);

        Ok(TranscodedPage {
            document: doc,
            title: title_text,
            extracted,
            next_page_url,
        })
    }

    /// Derives the article title from the page title, splitting on common
    /// site-name separators and falling back to a lone `<h1>` for very short
    /// or very long titles. Returns a detached `<h1>` element.
    fn extract_article_title(&self, doc: &mut Document) -> NodeId {
        let body = doc.get_or_create_body();
        let document_title = doc.title_text();
        let mut current = document_title.clone();

        if TITLE_SEPARATOR.is_match(&current) {
            current = TITLE_BEFORE_SEPARATOR
                .replace(&document_title, "$1")
                .into_owned();
            if word_count(&current) < 3 {
                current = TITLE_AFTER_SEPARATOR
                    .replace(&document_title, "$1")
                    .into_owned();
            }
        } else if current.contains(": ") {
            current = TITLE_AFTER_LAST_COLON
                .replace(&document_title, "$1")
                .into_owned();
            if word_count(&current) < 3 {
                current = TITLE_AFTER_FIRST_COLON
                    .replace(&document_title, "$1")
                    .into_owned();
            }
        } else if current.chars().count() > 150 || current.chars().count() < 15 {
            let level_ones = doc.elements_by_tag_name(body, "h1");
            if level_ones.len() == 1 {
                current = inner_text(doc, level_ones[0], self.options.normalize_spaces);
            }
        }

        current = current.trim().to_string();
        if word_count(&current) <= 4 {
            current = document_title;
        }

        let heading = doc.create_element("h1");
        if !current.is_empty() {
            let text = doc.create_text(&current);
            doc.append_child(heading, text);
        }
        heading
    }

    fn extract_article_content(&mut self, doc: &mut Document) -> NodeId {
        strip_unlikely_candidates(doc, &self.options);
        let normalize = self.options.normalize_spaces;
        let candidates = find_candidates(doc, &mut self.scores, normalize);
        let top = select_top_candidate(doc, &candidates, &mut self.scores, normalize);
        let container = build_content_container(doc, top, &self.scores, normalize);
        prepare_article_content(doc, container, &self.scores, &self.options);
        container
    }

    /// Rebuilds the document body around the extracted content: bundled
    /// stylesheet in the head, overlay and inner divs carrying the reading
    /// option classes, title heading above the content.
    fn glue_document(&self, doc: &mut Document, title: NodeId, content: NodeId) {
        let body = doc.get_or_create_body();

        let head = match doc
            .elements_by_tag_name(doc.root(), "head")
            .into_iter()
            .next()
        {
            Some(head) => head,
            None => {
                let head = doc.create_element("head");
                doc.insert_before(head, body);
                head
            }
        };
        let style = doc.create_element("style");
        doc.set_attr(style, "type", Some("text/css"));
        let css = doc.create_text(READABILITY_STYLESHEET);
        doc.append_child(style, css);
        doc.append_child(head, style);

        let style_class = self.options.reading_style.css_class();
        doc.set_class(body, Some(style_class));
        doc.set_style(body, Some("display: block;"));

        let inner = doc.create_element("div");
        doc.set_element_id(inner, Some(INNER_DIV_ID));
        doc.set_class(
            inner,
            Some(&format!(
                "{} {}",
                self.options.reading_margin.css_class(),
                self.options.reading_size.css_class()
            )),
        );
        doc.append_child(inner, title);
        doc.append_child(inner, content);

        let overlay = doc.create_element("div");
        doc.set_element_id(overlay, Some(OVERLAY_DIV_ID));
        doc.set_class(overlay, Some(style_class));
        doc.append_child(overlay, inner);

        doc.remove_children(body);
        doc.append_child(body, overlay);
    }
}

/// One-shot transcoding with default options and serialization settings.
pub fn transcode(html: &str) -> Result<String> {
    Transcoder::new().transcode(html)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
