//! Conditional cleaning of the merged article content.
//!
//! Pass order matters: styles are stripped first so later weight checks see
//! bare elements, breaks are collapsed before the blanket removals, and the
//! conditional table/list/div pruning runs before empty paragraphs are
//! dropped.

use crate::dom::{Document, NodeId};
use crate::options::TranscoderOptions;
use crate::patterns::{BREAK_BEFORE_PARAGRAPH, KILL_BREAKS, VIDEO};
use crate::scoring::{ScoreMap, class_id_weight, inner_text, link_density, segments_count};
use crate::transcoder::READABILITY_STYLED_CLASS;
use crate::traverse::traverse_elements;

/// Maximum link density for headers and for low-weight conditional elements.
const MAX_HEADER_LINK_DENSITY: f32 = 0.33;

/// Runs the full cleaning sequence over the content container.
pub fn prepare_article_content(
    doc: &mut Document,
    container: NodeId,
    scores: &ScoreMap,
    options: &TranscoderOptions,
) {
    clean_styles(doc, container);
    kill_breaks(doc, container);

    clean(doc, container, "form");
    clean(doc, container, "object");
    clean(doc, container, "h1");
    // a lone h2 is almost certainly the site re-stating the title
    if doc.elements_by_tag_name(container, "h2").len() == 1 {
        clean(doc, container, "h2");
    }
    clean(doc, container, "iframe");
    clean_headers(doc, container, options);

    clean_conditionally(doc, container, "table", scores, options);
    clean_conditionally(doc, container, "ul", scores, options);
    clean_conditionally(doc, container, "div", scores, options);

    remove_empty_paragraphs(doc, container);

    let inner = doc.inner_markup(container);
    let rewritten = BREAK_BEFORE_PARAGRAPH.replace_all(&inner, "<p");
    doc.set_inner_markup(container, &rewritten);
}

/// Removes inline `style` attributes everywhere below `root`, sparing
/// elements the pipeline itself styled. Idempotent.
pub fn clean_styles(doc: &mut Document, root: NodeId) {
    traverse_elements(doc, root, &mut |doc, element| {
        if doc.class(element).contains(READABILITY_STYLED_CLASS) {
            return;
        }
        doc.set_style(element, None);
    });
}

/// Collapses runs of `<br>` tags (with interleaved whitespace) into a single
/// `<br />`.
pub fn kill_breaks(doc: &mut Document, root: NodeId) {
    let inner = doc.inner_markup(root);
    let rewritten = KILL_BREAKS.replace_all(&inner, "<br />");
    doc.set_inner_markup(root, &rewritten);
}

/// Removes every descendant element with the given tag name. For `object`
/// and `embed`, elements referencing a YouTube/Vimeo URL in an attribute or
/// in their inner markup are spared.
pub fn clean(doc: &mut Document, root: NodeId, tag: &str) {
    let keep_videos = tag.eq_ignore_ascii_case("object") || tag.eq_ignore_ascii_case("embed");
    let targets: Vec<NodeId> = doc
        .elements_by_tag_name(root, tag)
        .into_iter()
        .filter(|&el| {
            if keep_videos {
                if VIDEO.is_match(&doc.attributes_joined(el, "|")) {
                    return false;
                }
                if VIDEO.is_match(&doc.inner_markup(el)) {
                    return false;
                }
            }
            true
        })
        .collect();
    for target in targets {
        doc.detach(target);
    }
}

/// Removes `h1`–`h6` headers with negative class/id weight or high link
/// density.
pub fn clean_headers(doc: &mut Document, root: NodeId, options: &TranscoderOptions) {
    for level in 1..=6 {
        let tag = format!("h{level}");
        let targets: Vec<NodeId> = doc
            .elements_by_tag_name(root, &tag)
            .into_iter()
            .filter(|&header| {
                class_id_weight(doc, header, options.weight_classes) < 0
                    || link_density(doc, header, options.normalize_spaces) > MAX_HEADER_LINK_DENSITY
            })
            .collect();
        for target in targets {
            doc.detach(target);
        }
    }
}

/// Prunes tables, lists or divs that look like chrome rather than content:
/// negative combined weight, or (for elements with little punctuation) a bad
/// ratio of images, list items, inputs, links or embeds to actual text.
pub fn clean_conditionally(
    doc: &mut Document,
    root: NodeId,
    tag: &str,
    scores: &ScoreMap,
    options: &TranscoderOptions,
) {
    let targets = doc.elements_by_tag_name(root, tag);
    for element in targets {
        let weight = class_id_weight(doc, element, options.weight_classes);
        let score = scores.get(element);

        if (weight as f32 + score) < 0.0 {
            doc.detach(element);
            continue;
        }

        let text = inner_text(doc, element, options.normalize_spaces);
        if segments_count(&text, ',') >= 10 {
            continue;
        }

        let paragraphs = doc.elements_by_tag_name(element, "p").len() as i32;
        let images = doc.elements_by_tag_name(element, "img").len() as i32;
        let list_items = doc.elements_by_tag_name(element, "li").len() as i32;
        let inputs = doc.elements_by_tag_name(element, "input").len() as i32;
        let embeds = doc
            .elements_by_tag_name(element, "embed")
            .into_iter()
            .filter(|&e| !VIDEO.is_match(doc.attr(e, "src").unwrap_or("")))
            .count() as i32;
        let density = link_density(doc, element, options.normalize_spaces);
        let text_length = text.chars().count() as i32;
        let is_list = tag.eq_ignore_ascii_case("ul") || tag.eq_ignore_ascii_case("ol");

        let remove = images > paragraphs
            || (list_items - 100 > paragraphs && !is_list)
            || inputs > paragraphs / 3
            || (text_length < 25 && (images == 0 || images > 2))
            || (weight < 25 && density > 0.2)
            || (weight >= 25 && density > 0.5)
            || embeds > 1
            || (embeds == 1 && text_length < 75);

        if remove {
            doc.detach(element);
        }
    }
}

/// Removes paragraphs with no text and no image, embed or object
/// descendants.
pub fn remove_empty_paragraphs(doc: &mut Document, root: NodeId) {
    let targets: Vec<NodeId> = doc
        .elements_by_tag_name(root, "p")
        .into_iter()
        .filter(|&p| {
            doc.text_content(p).trim().is_empty()
                && doc.elements_by_tag_name(p, "img").is_empty()
                && doc.elements_by_tag_name(p, "embed").is_empty()
                && doc.elements_by_tag_name(p, "object").is_empty()
        })
        .collect();
    for target in targets {
        doc.detach(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    fn container_from(body_inner: &str) -> (Document, NodeId) {
        let html = format!("<html><body><div id=\"c\">{body_inner}</div></body></html>");
        let mut doc = parse_document(&html);
        let container = doc.element_by_id("c").unwrap();
        (doc, container)
    }

    #[test]
    fn test_clean_styles_strips_inline_styles() {
        let (mut doc, container) =
            container_from("<p style=\"color: red\">a</p><div style=\"x\"><em style=\"y\">b</em></div>");
        clean_styles(&mut doc, container);
        for el in doc.descendants(container) {
            if doc.is_element(el) {
                assert_eq!(doc.style(el), "");
            }
        }
    }

    #[test]
    fn test_clean_styles_spares_pipeline_styled() {
        let (mut doc, container) = container_from(
            "<p class=\"readability-styled\" style=\"display: inline;\">kept</p>",
        );
        clean_styles(&mut doc, container);
        let p = doc.elements_by_tag_name(container, "p")[0];
        assert_eq!(doc.style(p), "display: inline;");
    }

    #[test]
    fn test_clean_styles_idempotent() {
        let (mut doc, container) = container_from("<p style=\"a\">x</p>");
        clean_styles(&mut doc, container);
        let once = doc.inner_markup(container);
        clean_styles(&mut doc, container);
        assert_eq!(doc.inner_markup(container), once);
    }

    #[test]
    fn test_kill_breaks() {
        let (mut doc, container) = container_from("one<br><br> <br>two");
        kill_breaks(&mut doc, container);
        assert_eq!(doc.inner_markup(container), "one<br />two");
    }

    #[test]
    fn test_clean_removes_forms_and_iframes() {
        let (mut doc, container) =
            container_from("<form><input></form><iframe src=\"x\"></iframe><p>text</p>");
        clean(&mut doc, container, "form");
        clean(&mut doc, container, "iframe");
        assert!(doc.elements_by_tag_name(container, "form").is_empty());
        assert!(doc.elements_by_tag_name(container, "iframe").is_empty());
        assert_eq!(doc.elements_by_tag_name(container, "p").len(), 1);
    }

    #[test]
    fn test_clean_spares_video_objects() {
        let (mut doc, container) = container_from(
            "<object data=\"https://www.youtube.com/v/abc\"></object>\
             <object data=\"http://ads.example.com/x\"></object>",
        );
        clean(&mut doc, container, "object");
        let objects = doc.elements_by_tag_name(container, "object");
        assert_eq!(objects.len(), 1);
        assert!(doc.attr(objects[0], "data").unwrap().contains("youtube"));
    }

    #[test]
    fn test_clean_spares_video_by_inner_markup() {
        let (mut doc, container) = container_from(
            "<object><param name=\"movie\" value=\"http://vimeo.com/1\"></object>",
        );
        clean(&mut doc, container, "object");
        assert_eq!(doc.elements_by_tag_name(container, "object").len(), 1);
    }

    #[test]
    fn test_lone_h2_removed() {
        let (mut doc, container) = container_from("<h2>Repeated Title</h2><p>body text</p>");
        prepare_article_content(&mut doc, container, &ScoreMap::new(), &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "h2").is_empty());
    }

    #[test]
    fn test_multiple_h2_kept() {
        let (mut doc, container) = container_from(
            "<h2>Part one</h2><p>The first part of the story, told at length.</p>\
             <h2>Part two</h2><p>The second part of the story, also told at length.</p>",
        );
        prepare_article_content(&mut doc, container, &ScoreMap::new(), &TranscoderOptions::default());
        assert_eq!(doc.elements_by_tag_name(container, "h2").len(), 2);
    }

    #[test]
    fn test_clean_headers_negative_weight() {
        let (mut doc, container) =
            container_from("<h3 class=\"footer\">junk</h3><h3>A real heading</h3>");
        clean_headers(&mut doc, container, &TranscoderOptions::default());
        let headers = doc.elements_by_tag_name(container, "h3");
        assert_eq!(headers.len(), 1);
        assert_eq!(doc.text_content(headers[0]), "A real heading");
    }

    #[test]
    fn test_clean_headers_link_density() {
        let (mut doc, container) =
            container_from("<h3><a href=\"#\">all link</a></h3>");
        clean_headers(&mut doc, container, &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "h3").is_empty());
    }

    #[test]
    fn test_conditional_removes_negative_weight() {
        let (mut doc, container) = container_from(
            "<div class=\"comment\"><p>Some comment text that is long enough to matter here.</p></div>",
        );
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_comma_rich_content_kept() {
        let commas = "one, two, three, four, five, six, seven, eight, nine, ten, eleven";
        let (mut doc, container) =
            container_from(&format!("<div><a href=\"#\">x</a>{commas}</div>"));
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert_eq!(doc.elements_by_tag_name(container, "div").len(), 1);
    }

    #[test]
    fn test_conditional_image_heavy_removed() {
        let (mut doc, container) = container_from("<div><img src=\"a\"><img src=\"b\"></div>");
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_short_text_no_images_removed() {
        let (mut doc, container) = container_from("<div><p>tiny</p></div>");
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_single_image_short_text_kept() {
        let (mut doc, container) =
            container_from("<div><p><img src=\"photo.jpg\"></p></div>");
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert_eq!(doc.elements_by_tag_name(container, "div").len(), 1);
    }

    #[test]
    fn test_conditional_linky_low_weight_removed() {
        let (mut doc, container) = container_from(
            "<div><p>Several words of text here to pad things out a little further</p>\
             <a href=\"#\">a navigation link somewhere</a></div>",
        );
        clean_conditionally(&mut doc, container, "div", &ScoreMap::new(), &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_score_does_not_bypass_ratio_checks() {
        let (mut doc, container) = container_from("<div id=\"keep\"><p>tiny</p></div>");
        let div = doc.elements_by_tag_name(container, "div")[0];
        let mut scores = ScoreMap::new();
        scores.set(div, 30.0);
        // score alone does not bypass the ratio checks
        clean_conditionally(&mut doc, container, "div", &scores, &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_negative_score_removes_despite_weight() {
        let (mut doc, container) = container_from(
            "<div class=\"article\"><p>A fine paragraph of article text, reasonably sized, with commas.</p></div>",
        );
        let div = doc.elements_by_tag_name(container, "div")[0];
        let mut scores = ScoreMap::new();
        scores.set(div, -30.0);
        clean_conditionally(&mut doc, container, "div", &scores, &TranscoderOptions::default());
        assert!(doc.elements_by_tag_name(container, "div").is_empty());
    }

    #[test]
    fn test_conditional_list_exempt_from_li_rule() {
        let items: String = (0..120).map(|i| format!("<li>item {i}</li>")).collect();
        let text = "Plenty of words fill this list description so the text length test passes easily here.";
        let (mut doc, container) =
            container_from(&format!("<ul>{items}<li>{text}</li></ul>"));
        clean_conditionally(&mut doc, container, "ul", &ScoreMap::new(), &TranscoderOptions::default());
        assert_eq!(doc.elements_by_tag_name(container, "ul").len(), 1);
    }

    #[test]
    fn test_empty_paragraphs_removed() {
        let (mut doc, container) =
            container_from("<p></p><p>  </p><p>text</p><p><img src=\"x\"></p>");
        remove_empty_paragraphs(&mut doc, container);
        let remaining = doc.elements_by_tag_name(container, "p");
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_break_before_paragraph_collapsed() {
        let (mut doc, container) = container_from("<p>one</p><br><p>two</p>");
        prepare_article_content(&mut doc, container, &ScoreMap::new(), &TranscoderOptions::default());
        assert!(!doc.inner_markup(container).contains("<br"));
        assert_eq!(doc.elements_by_tag_name(container, "p").len(), 2);
    }
}
