//! Identity, slug and excerpt derivation

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::slugify;

/// Seed used when neither the explicit slug nor the title yields a slug
pub const FALLBACK_SLUG_SEED: &str = "blog";

/// Plain-text length above which an excerpt is truncated
pub const EXCERPT_LIMIT: usize = 220;

const EXCERPT_ELLIPSIS: &str = "...";

static STYLE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").expect("Invalid regex pattern"));

static SCRIPT_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("Invalid regex pattern"));

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex pattern"));

static NBSP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;").expect("Invalid regex pattern"));

/// Next identifier for a locally numbered collection, starting at 1.
///
/// `high_water` is the largest id ever issued, so ids freed by deletes are
/// never handed out again. Ids present in the collection still win when a
/// file was edited by hand past the recorded mark.
pub fn next_id(high_water: i64, ids: impl IntoIterator<Item = i64>) -> i64 {
    ids.into_iter().fold(high_water.max(0), i64::max) + 1
}

/// Use the explicit slug when it normalizes to something, else derive from `seed`.
pub fn resolve_slug(explicit: Option<&str>, seed: &str) -> String {
    explicit
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .or_else(|| Some(slugify(seed)).filter(|slug| !slug.is_empty()))
        .unwrap_or_else(|| FALLBACK_SLUG_SEED.to_string())
}

/// Remove style/script blocks and markup, replacing each with a space.
pub fn strip_html(html: &str) -> String {
    let text = STYLE_BLOCK_REGEX.replace_all(html, " ");
    let text = SCRIPT_BLOCK_REGEX.replace_all(&text, " ");
    let text = TAG_REGEX.replace_all(&text, " ");
    NBSP_REGEX.replace_all(&text, " ").into_owned()
}

/// Plain-text summary of `content`, whitespace-collapsed and truncated with an
/// ellipsis past [`EXCERPT_LIMIT`] characters.
pub fn derive_excerpt(content: &str) -> String {
    let plain = strip_html(content)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if plain.chars().count() > EXCERPT_LIMIT {
        let keep = EXCERPT_LIMIT - EXCERPT_ELLIPSIS.len();
        let mut excerpt: String = plain.chars().take(keep).collect();
        excerpt.push_str(EXCERPT_ELLIPSIS);
        excerpt
    } else {
        plain
    }
}

/// The explicit excerpt if given, otherwise one derived from `content`.
pub fn build_excerpt(explicit: Option<String>, content: &str) -> String {
    explicit.unwrap_or_else(|| derive_excerpt(content))
}
