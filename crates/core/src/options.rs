//! Reading presentation options and algorithm flags.

use serde::{Deserialize, Serialize};

/// Visual style applied to the glued output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStyle {
    #[default]
    Newspaper,
    Novel,
    Ebook,
    Terminal,
}

impl ReadingStyle {
    /// CSS class emitted on the body and overlay.
    pub fn css_class(self) -> &'static str {
        match self {
            ReadingStyle::Newspaper => "style-newspaper",
            ReadingStyle::Novel => "style-novel",
            ReadingStyle::Ebook => "style-ebook",
            ReadingStyle::Terminal => "style-terminal",
        }
    }
}

/// Horizontal margin preset for the inner reading container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingMargin {
    XNarrow,
    Narrow,
    Medium,
    #[default]
    Wide,
    XWide,
}

impl ReadingMargin {
    pub fn css_class(self) -> &'static str {
        match self {
            ReadingMargin::XNarrow => "margin-x-narrow",
            ReadingMargin::Narrow => "margin-narrow",
            ReadingMargin::Medium => "margin-medium",
            ReadingMargin::Wide => "margin-wide",
            ReadingMargin::XWide => "margin-x-wide",
        }
    }
}

/// Font size preset for the inner reading container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingSize {
    XSmall,
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

impl ReadingSize {
    pub fn css_class(self) -> &'static str {
        match self {
            ReadingSize::XSmall => "size-x-small",
            ReadingSize::Small => "size-small",
            ReadingSize::Medium => "size-medium",
            ReadingSize::Large => "size-large",
            ReadingSize::XLarge => "size-x-large",
        }
    }
}

/// Configuration for a [`crate::transcoder::Transcoder`].
///
/// The three boolean flags tune the extraction algorithm itself; all default
/// to `true`, matching the classic Readability behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranscoderOptions {
    pub reading_style: ReadingStyle,
    pub reading_margin: ReadingMargin,
    pub reading_size: ReadingSize,
    /// Remove elements whose class/id look like chrome (sidebars, comment
    /// blocks) before scanning for candidates.
    pub strip_unlikely_candidates: bool,
    /// Collapse whitespace runs when measuring text.
    pub normalize_spaces: bool,
    /// Let class/id keywords raise or lower element weight.
    pub weight_classes: bool,
}

impl Default for TranscoderOptions {
    fn default() -> Self {
        TranscoderOptions {
            reading_style: ReadingStyle::default(),
            reading_margin: ReadingMargin::default(),
            reading_size: ReadingSize::default(),
            strip_unlikely_candidates: true,
            normalize_spaces: true,
            weight_classes: true,
        }
    }
}

impl TranscoderOptions {
    pub fn builder() -> TranscoderOptionsBuilder {
        TranscoderOptionsBuilder::default()
    }
}

/// Builder for [`TranscoderOptions`].
#[derive(Debug, Default)]
pub struct TranscoderOptionsBuilder {
    options: TranscoderOptions,
}

impl TranscoderOptionsBuilder {
    pub fn reading_style(mut self, style: ReadingStyle) -> Self {
        self.options.reading_style = style;
        self
    }

    pub fn reading_margin(mut self, margin: ReadingMargin) -> Self {
        self.options.reading_margin = margin;
        self
    }

    pub fn reading_size(mut self, size: ReadingSize) -> Self {
        self.options.reading_size = size;
        self
    }

    pub fn strip_unlikely_candidates(mut self, enabled: bool) -> Self {
        self.options.strip_unlikely_candidates = enabled;
        self
    }

    pub fn normalize_spaces(mut self, enabled: bool) -> Self {
        self.options.normalize_spaces = enabled;
        self
    }

    pub fn weight_classes(mut self, enabled: bool) -> Self {
        self.options.weight_classes = enabled;
        self
    }

    pub fn build(self) -> TranscoderOptions {
        self.options
    }
}
