//! Multi-page article stitching.
//!
//! Follows discovered next-page links, transcodes each page and appends its
//! content to the first page's inner container, with a visited-URL list and
//! a hard page cap to stop loops and runaway chains.

use url::Url;

use crate::dom::{Document, NodeId};
use crate::error::{PerlegoError, Result};
use crate::fetch::Fetcher;
use crate::parse::parse_fragment_into;
use crate::patterns::{NEXT_LINK, PREV_LINK, TRAILING_SLASH};
use crate::scoring::inner_text;
use crate::serialize::{SerializationConfig, serialize_document};
use crate::transcoder::{INNER_DIV_ID, Transcoder};

/// Pages beyond this limit are linked instead of inlined.
const MAX_PAGES: usize = 30;

/// Inner-markup length a leading paragraph must exceed before it is used for
/// duplicate detection.
const DEDUP_PARAGRAPH_LENGTH: usize = 100;

/// Transcodes multi-page articles by stitching subsequent pages onto the
/// first one.
pub struct WebTranscoder<F: Fetcher> {
    transcoder: Transcoder,
    fetcher: F,
    parsed_pages: Vec<String>,
    current_page: usize,
}

impl<F: Fetcher> WebTranscoder<F> {
    pub fn new(transcoder: Transcoder, fetcher: F) -> Self {
        WebTranscoder {
            transcoder,
            fetcher,
            parsed_pages: Vec::new(),
            current_page: 1,
        }
    }

    /// Fetches `url`, transcodes it, follows next-page links and returns the
    /// serialized result plus the extraction flag.
    ///
    /// A failed fetch of the first page yields an empty string and `false`;
    /// failures on subsequent pages just end the chain.
    pub fn transcode_url(&mut self, url: &str) -> Result<(String, bool)> {
        self.current_page = 1;
        self.parsed_pages.clear();
        // seeded up front so the first page cannot be appended to itself
        self.parsed_pages
            .push(TRAILING_SLASH.replace(url, "").into_owned());

        let Some(html) = self.fetcher.fetch(url).filter(|h| !h.is_empty()) else {
            return Ok((String::new(), false));
        };

        let page = self.transcoder.transcode_extended(&html, Some(url))?;
        let mut document = page.document;
        if let Some(next_url) = page.next_page_url {
            self.append_next_page(&mut document, &next_url)?;
        }

        if self.current_page > 1 {
            let inner = inner_container(&document)?;
            if let Some(first_div) = document.children_by_tag_name(inner, "div").into_iter().next()
            {
                document.set_class(first_div, Some("readability-page-1"));
            }
        }

        let markup = serialize_document(&mut document, &SerializationConfig::default())?;
        Ok((markup, page.extracted))
    }

    fn append_next_page(&mut self, document: &mut Document, url: &str) -> Result<()> {
        self.current_page += 1;
        let container = inner_container(document)?;

        if self.current_page > MAX_PAGES {
            let link = format!("<div style='text-align: center'><a href='{url}'>View Next Page</a></div>");
            parse_fragment_into(document, container, &link);
            return Ok(());
        }

        let Some(content) = self.fetcher.fetch(url).filter(|c| !c.is_empty()) else {
            return Ok(());
        };
        let next_page = self.transcoder.transcode_extended(&content, Some(url))?;
        let mut next_document = next_page.document;
        let next_inner = inner_container(&next_document)?;

        // drop the repeated title heading
        if let Some(heading) = next_document
            .children_by_tag_name(next_inner, "h1")
            .into_iter()
            .next()
        {
            next_document.detach(heading);
        }

        // a page whose leading paragraph already occurs in the accumulated
        // text is a duplicate of something we have; record it and stop
        let first_paragraph = next_document
            .elements_by_tag_name(next_inner, "p")
            .into_iter()
            .next();
        if let Some(paragraph) = first_paragraph {
            if next_document.inner_markup(paragraph).chars().count() > DEDUP_PARAGRAPH_LENGTH {
                let existing = document.text_content(container);
                let incoming = next_document.text_content(paragraph);
                if !existing.is_empty() && !incoming.is_empty() && existing.contains(&incoming) {
                    self.parsed_pages.push(url.to_string());
                    return Ok(());
                }
            }
        }

        let page_div = document.create_element("div");
        document.set_inner_markup(
            page_div,
            &format!(
                "<p class='page-separator' title='Page {}'>&sect;</p>",
                self.current_page
            ),
        );
        document.set_element_id(page_div, Some(&format!("readability-page-{}", self.current_page)));
        document.set_class(page_div, Some("page"));
        // content crosses document arenas as markup
        let transferred = next_document.inner_markup(next_inner);
        parse_fragment_into(document, page_div, &transferred);
        document.append_child(container, page_div);
        self.parsed_pages.push(url.to_string());

        if let Some(next_url) = next_page.next_page_url {
            if !next_url.is_empty() && !self.parsed_pages.contains(&next_url) {
                self.append_next_page(document, &next_url)?;
            }
        }
        Ok(())
    }
}

fn inner_container(document: &Document) -> Result<NodeId> {
    document.element_by_id(INNER_DIV_ID).ok_or_else(|| {
        PerlegoError::Internal("glued document has no inner container".to_string())
    })
}

/// Scans a prepared document for a plausible next-page link: same host as
/// `base_url`, `rel="next"` preferred, otherwise next-ish (and not
/// previous-ish) link text, class or id. Returns an absolute URL.
pub fn find_next_page_url(doc: &Document, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let base_trimmed = TRAILING_SLASH.replace(base.as_str(), "").into_owned();
    let mut keyword_match: Option<String> = None;

    for anchor in doc.elements_by_tag_name(doc.root(), "a") {
        let href = doc.attr(anchor, "href").unwrap_or("").trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if resolved.host_str() != base.host_str() {
            continue;
        }
        let resolved = resolved.to_string();
        if TRAILING_SLASH.replace(&resolved, "") == base_trimmed {
            continue;
        }
        if doc
            .attr(anchor, "rel")
            .is_some_and(|rel| rel.eq_ignore_ascii_case("next"))
        {
            return Some(resolved);
        }
        if keyword_match.is_none() {
            let match_string = format!(
                "{} {} {}",
                inner_text(doc, anchor, true),
                doc.class(anchor),
                doc.element_id(anchor)
            );
            if NEXT_LINK.is_match(&match_string) && !PREV_LINK.is_match(&match_string) {
                keyword_match = Some(resolved);
            }
        }
    }
    keyword_match
}
