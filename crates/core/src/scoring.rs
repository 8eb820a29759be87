//! Content scoring primitives: the per-run score store, link density,
//! class/id weighting, and text helpers shared by the scanner, selector and
//! cleaner.

use std::collections::HashMap;

use crate::dom::{Document, NodeId};
use crate::patterns::{NEGATIVE_WEIGHT, NORMALIZE_SPACES, POSITIVE_WEIGHT};

/// Per-run store of content scores keyed by node.
///
/// Absent entries read as `0.0`. The transcoder clears the store at the start
/// of each candidate scan so scores never leak between documents.
#[derive(Debug, Default)]
pub struct ScoreMap {
    scores: HashMap<NodeId, f32>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    pub fn get(&self, id: NodeId) -> f32 {
        self.scores.get(&id).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, id: NodeId, score: f32) {
        self.scores.insert(id, score);
    }

    pub fn add(&mut self, id: NodeId, delta: f32) {
        *self.scores.entry(id).or_insert(0.0) += delta;
    }
}

/// Trimmed text of an element's subtree; runs of whitespace collapse to a
/// single space when `normalize` is set.
pub fn inner_text(doc: &Document, id: NodeId, normalize: bool) -> String {
    let text = doc.text_content(id);
    let text = text.trim();
    if normalize {
        NORMALIZE_SPACES.replace_all(text, " ").into_owned()
    } else {
        text.to_string()
    }
}

/// Fraction of an element's text length contributed by its anchors.
///
/// Always in `[0, 1]`; an element with no text has density `0`.
pub fn link_density(doc: &Document, id: NodeId, normalize: bool) -> f32 {
    let text_length = inner_text(doc, id, normalize).chars().count();
    if text_length == 0 {
        return 0.0;
    }
    let link_length: usize = doc
        .elements_by_tag_name(id, "a")
        .into_iter()
        .map(|a| inner_text(doc, a, normalize).chars().count())
        .sum();
    link_length as f32 / text_length as f32
}

/// Class/id weight: +-25 for the positive/negative keyword lists, applied
/// independently to the class and the id attribute (up to four
/// contributions). Returns `0` when class weighting is disabled.
pub fn class_id_weight(doc: &Document, id: NodeId, weight_classes: bool) -> i32 {
    if !weight_classes {
        return 0;
    }
    let mut weight = 0;
    let class = doc.class(id);
    if !class.is_empty() {
        if NEGATIVE_WEIGHT.is_match(&class) {
            weight -= 25;
        }
        if POSITIVE_WEIGHT.is_match(&class) {
            weight += 25;
        }
    }
    let element_id = doc.element_id(id);
    if !element_id.is_empty() {
        if NEGATIVE_WEIGHT.is_match(&element_id) {
            weight -= 25;
        }
        if POSITIVE_WEIGHT.is_match(&element_id) {
            weight += 25;
        }
    }
    weight
}

/// Number of segments produced by splitting on `separator`: the separator
/// count plus one. Empty input yields one segment.
pub fn segments_count(text: &str, separator: char) -> i32 {
    text.chars().filter(|&c| c == separator).count() as i32 + 1
}

/// Float comparison guard for the "density is exactly zero" sibling rule.
pub fn is_close_to_zero(value: f32) -> bool {
    value.abs() < f32::EPSILON
}
