//! Heuristic regex table.
//!
//! Every pattern used by the pipeline is compiled once, process-wide. The
//! alternations below are the classic Readability lists; changing them shifts
//! what gets scored, stripped, or merged.

use std::sync::LazyLock;

use regex::Regex;

/// Class/id substrings marking an element as an unlikely content candidate.
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)combx|comment|disqus|foot|header|menu|meta|rss|shoutbox|sidebar|sponsor")
        .unwrap()
});

/// Class/id substrings that rescue an otherwise unlikely candidate.
pub static OK_MAYBE_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)and|article|body|column|main").unwrap());

/// Class/id substrings adding +25 weight.
pub static POSITIVE_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)article|body|content|entry|hentry|page|pagination|post|text").unwrap()
});

/// Class/id substrings adding -25 weight.
pub static NEGATIVE_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "(?i)combx|comment|contact|foot|footer|footnote|link|media|meta|promo|related|scroll|shoutbox|sponsor|tags|widget",
    )
    .unwrap()
});

/// Block-level tags whose presence keeps a `<div>` from being demoted to a
/// paragraph.
pub static DIV_TO_P_ELEMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)<(a|blockquote|dl|div|img|ol|p|pre|table|ul)").unwrap());

/// A sentence-ending period followed by a space or line end.
pub static END_OF_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\.( |$)").unwrap());

/// One or more `<br>` runs, including interleaved whitespace and
/// non-breaking spaces.
pub static KILL_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(<br\\s*/?>(\\s|&nbsp;?|\u{a0})*)+").unwrap());

/// A `<br>` directly before an opening `<p>`.
pub static BREAK_BEFORE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br[^>]*>\s*<p").unwrap());

/// Two or more consecutive `<br>` tags, the marker for an implied paragraph
/// boundary.
pub static DOUBLE_BRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)(<br[^>]*>[ \\n\\r\\t]*){2,}").unwrap());

/// Opening or closing `<font>` tags, rewritten to spans.
pub static FONT_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)<(/?)font[^>]*>").unwrap());

/// Runs of whitespace collapsed by inner-text normalization.
pub static NORMALIZE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// YouTube/Vimeo URL, the exemption that keeps video embeds alive.
pub static VIDEO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://(www\.)?(youtube|vimeo)\.com").unwrap());

/// A `|` or `-` separator surrounded by spaces inside a page title.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-] ").unwrap());

/// Everything before the last `|`/`-` separator.
pub static TITLE_BEFORE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)[\|\-] .*").unwrap());

/// Everything after the first `|`/`-` separator.
pub static TITLE_AFTER_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\|\-]*[\|\-](.*)").unwrap());

/// Everything after the last colon.
pub static TITLE_AFTER_LAST_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*:(.*)").unwrap());

/// Everything after the first colon.
pub static TITLE_AFTER_FIRST_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^:]*[:](.*)").unwrap());

/// Link text/class/id suggesting a "next page" link.
pub static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)next|more|continue|older|pag(e|ing|inat)|weiter|\u{bb}|\u{203a}").unwrap()
});

/// Link text/class/id suggesting a "previous page" link.
pub static PREV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)prev|previou|earlier|newer|back|\u{ab}|\u{2039}").unwrap()
});

/// Trailing slash on a URL, stripped before visited-list comparisons.
pub static TRAILING_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new("/$").unwrap());
