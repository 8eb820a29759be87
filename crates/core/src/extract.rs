//! Candidate discovery, top-candidate selection and sibling merging.

use std::collections::HashSet;

use crate::dom::{Document, NodeId};
use crate::patterns::END_OF_SENTENCE;
use crate::scoring::{ScoreMap, inner_text, is_close_to_zero, link_density, segments_count};
use crate::transcoder::CONTENT_DIV_ID;

/// Paragraphs shorter than this never contribute to scoring.
pub const MIN_PARAGRAPH_LENGTH: usize = 25;

/// Floor of the sibling-inclusion threshold.
const SIBLING_SCORE_THRESHOLD: f32 = 10.0;

/// Fraction of the top candidate's score a sibling must reach.
const SIBLING_SCORE_COEFFICIENT: f32 = 0.2;

/// Paragraph siblings at least this long use the density rule instead of the
/// sentence-end rule.
const SIBLING_PARAGRAPH_LENGTH: usize = 80;

/// Scans every paragraph, scoring parents and grandparents, and returns the
/// candidate elements in first-seen document order.
///
/// The score store is cleared first, so stale scores never leak between
/// runs. Each qualifying paragraph adds its full score to its parent and a
/// floored half to its grandparent; the `html` root never becomes a
/// candidate.
pub fn find_candidates(doc: &Document, scores: &mut ScoreMap, normalize: bool) -> Vec<NodeId> {
    scores.clear();
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();

    for paragraph in doc.elements_by_tag_name(doc.root(), "p") {
        let text = inner_text(doc, paragraph, normalize);
        if text.chars().count() < MIN_PARAGRAPH_LENGTH {
            continue;
        }
        let score = 1
            + segments_count(&text, ',')
            + (text.chars().count() / 100).min(3) as i32;

        let parent = doc.parent(paragraph).filter(|&p| is_scorable(doc, p));
        if let Some(parent) = parent {
            if seen.insert(parent) {
                candidates.push(parent);
            }
            scores.add(parent, score as f32);
        }
        let grandparent = parent
            .and_then(|p| doc.parent(p))
            .filter(|&gp| is_scorable(doc, gp));
        if let Some(grandparent) = grandparent {
            if seen.insert(grandparent) {
                candidates.push(grandparent);
            }
            // integer halving, floored
            scores.add(grandparent, (score / 2) as f32);
        }
    }
    candidates
}

fn is_scorable(doc: &Document, id: NodeId) -> bool {
    doc.tag_name(id)
        .is_some_and(|tag| !tag.eq_ignore_ascii_case("html"))
}

/// Adjusts every candidate's score by its link density and picks the
/// highest-scoring one; the adjusted scores are written back to the store.
///
/// Never returns nothing: when no candidate exists, or the winner is the
/// body itself, a detached `<div>` absorbing all of the body's children is
/// synthesized and returned.
pub fn select_top_candidate(
    doc: &mut Document,
    candidates: &[NodeId],
    scores: &mut ScoreMap,
    normalize: bool,
) -> NodeId {
    let mut top: Option<NodeId> = None;
    for &candidate in candidates {
        let adjusted = (1.0 - link_density(doc, candidate, normalize)) * scores.get(candidate);
        scores.set(candidate, adjusted);
        match top {
            None => top = Some(candidate),
            Some(current) if adjusted > scores.get(current) => top = Some(candidate),
            _ => {}
        }
    }

    match top {
        Some(winner)
            if !doc
                .tag_name(winner)
                .is_some_and(|t| t.eq_ignore_ascii_case("body")) =>
        {
            winner
        }
        _ => {
            let replacement = doc.create_element("div");
            let body = doc.get_or_create_body();
            doc.move_children(body, replacement);
            replacement
        }
    }
}

/// Builds the article content container by pulling in the top candidate and
/// any of its siblings that look like article continuation.
///
/// The container is a detached `<div id="readability-content">`. A detached
/// top candidate (the selector's fallback) is wrapped directly with no
/// sibling analysis. Appended siblings that are not divs or paragraphs are
/// rebuilt as divs carrying over id, class and children.
pub fn build_content_container(
    doc: &mut Document,
    top_candidate: NodeId,
    scores: &ScoreMap,
    normalize: bool,
) -> NodeId {
    let container = doc.create_element("div");
    doc.set_element_id(container, Some(CONTENT_DIV_ID));

    let Some(parent) = doc.parent(top_candidate) else {
        doc.append_child(container, top_candidate);
        return container;
    };

    let top_score = scores.get(top_candidate);
    let threshold = SIBLING_SCORE_THRESHOLD.max(SIBLING_SCORE_COEFFICIENT * top_score);

    for sibling in doc.child_elements(parent) {
        let mut append = sibling == top_candidate || scores.get(sibling) >= threshold;

        if !append
            && doc
                .tag_name(sibling)
                .is_some_and(|t| t.eq_ignore_ascii_case("p"))
        {
            let text = inner_text(doc, sibling, normalize);
            if !text.is_empty() {
                let density = link_density(doc, sibling, normalize);
                if text.chars().count() >= SIBLING_PARAGRAPH_LENGTH {
                    append = density < 0.25;
                } else {
                    append = is_close_to_zero(density) && END_OF_SENTENCE.is_match(&text);
                }
            }
        }

        if !append {
            continue;
        }
        let tag = doc.tag_name(sibling).unwrap_or("").to_string();
        if tag.eq_ignore_ascii_case("div") || tag.eq_ignore_ascii_case("p") {
            doc.append_child(container, sibling);
        } else {
            let rebuilt = doc.create_element("div");
            if let Some(id) = doc.attr(sibling, "id").map(str::to_string) {
                doc.set_element_id(rebuilt, Some(&id));
            }
            if let Some(class) = doc.attr(sibling, "class").map(str::to_string) {
                doc.set_class(rebuilt, Some(&class));
            }
            doc.move_children(sibling, rebuilt);
            doc.detach(sibling);
            doc.append_child(container, rebuilt);
        }
    }
    container
}
