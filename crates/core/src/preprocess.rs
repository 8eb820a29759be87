//! Document preparation before candidate scanning.
//!
//! Strips scripts, stylesheet links and style blocks, rewrites
//! `<br><br>` runs into paragraph boundaries and `<font>` into `<span>`,
//! then optionally removes unlikely candidates and demotes plain divs to
//! paragraphs so their text takes part in scoring.

use crate::dom::{Document, NodeId};
use crate::options::TranscoderOptions;
use crate::patterns::{DIV_TO_P_ELEMENTS, DOUBLE_BRS, FONT_TAGS, OK_MAYBE_CANDIDATE, UNLIKELY_CANDIDATES};
use crate::transcoder::READABILITY_STYLED_CLASS;
use crate::traverse::{traverse_child_nodes, traverse_elements};

/// Prepares a freshly parsed document for extraction. Guarantees a `<body>`
/// exists afterwards.
pub fn prepare_document(doc: &mut Document) {
    let body = doc.get_or_create_body();
    let root = doc.root();

    // scripts survive only when explicitly readability-related
    let scripts: Vec<NodeId> = doc
        .elements_by_tag_name(root, "script")
        .into_iter()
        .filter(|&s| !doc.attr(s, "src").unwrap_or("").contains("readability"))
        .collect();
    for script in scripts {
        doc.detach(script);
    }

    let links: Vec<NodeId> = doc
        .elements_by_tag_name(root, "link")
        .into_iter()
        .filter(|&l| {
            doc.attr(l, "rel")
                .unwrap_or("")
                .trim()
                .eq_ignore_ascii_case("stylesheet")
                && !doc.attr(l, "href").unwrap_or("").contains("readability")
        })
        .collect();
    for link in links {
        doc.detach(link);
    }

    for style in doc.elements_by_tag_name(root, "style") {
        doc.detach(style);
    }

    let inner = doc.inner_markup(body);
    let inner = DOUBLE_BRS.replace_all(&inner, "<p></p>");
    let inner = FONT_TAGS.replace_all(&inner, "<${1}span>");
    doc.set_inner_markup(body, &inner);
}

/// Removes elements whose class/id mark them as page chrome, then turns
/// divs that contain no block-level markup into paragraphs. Divs that do
/// contain blocks get their loose text children wrapped in inline-styled
/// paragraphs so that text still scores.
pub fn strip_unlikely_candidates(doc: &mut Document, options: &TranscoderOptions) {
    let strip = options.strip_unlikely_candidates;
    let root = doc.root();
    traverse_elements(doc, root, &mut |doc, element| {
        let tag = doc.tag_name(element).unwrap_or("").to_string();
        if strip {
            let match_string = format!("{}{}", doc.class(element), doc.element_id(element));
            if !match_string.is_empty()
                && !tag.eq_ignore_ascii_case("body")
                && UNLIKELY_CANDIDATES.is_match(&match_string)
                && !OK_MAYBE_CANDIDATE.is_match(&match_string)
            {
                doc.detach(element);
                return;
            }
        }
        if tag.eq_ignore_ascii_case("div") {
            let inner = doc.inner_markup(element);
            if !DIV_TO_P_ELEMENTS.is_match(&inner) {
                doc.rename(element, "p");
            } else {
                wrap_loose_text(doc, element);
            }
        }
    });
}

/// Replaces non-blank text children of a mixed div with inline paragraphs
/// marked `readability-styled`, which exempts them from later style
/// stripping.
fn wrap_loose_text(doc: &mut Document, element: NodeId) {
    traverse_child_nodes(doc, element, &mut |doc, child| {
        let Some(text) = doc.text_value(child) else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        let text = text.to_string();
        let paragraph = doc.create_element("p");
        doc.set_class(paragraph, Some(READABILITY_STYLED_CLASS));
        doc.set_style(paragraph, Some("display: inline;"));
        let text_node = doc.create_text(&text);
        doc.append_child(paragraph, text_node);
        doc.replace_node(child, paragraph);
    });
}
