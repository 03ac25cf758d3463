//! Common helpers shared by list and lookup operations

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters a search keyword may contain; everything else is dropped
    static ref INVALID_KEYWORD_CHARS: Regex =
        Regex::new(r"[^\p{L}\p{N}\s\-_.,@&/'#()%]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip characters that have no business in a search keyword and collapse
/// whitespace. The result may be empty, in which case no keyword predicate
/// should be applied.
pub fn sanitize_keyword(keyword: &str) -> String {
    let cleaned = INVALID_KEYWORD_CHARS.replace_all(keyword, "");
    WHITESPACE_RUN.replace_all(cleaned.trim(), " ").into_owned()
}

/// Escape LIKE/ILIKE metacharacters so the keyword matches literally.
/// Postgres uses backslash as the default escape character.
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `ceil(total_rows / limit)`; zero when there is nothing to page over
pub fn total_pages(total_rows: i64, limit: i64) -> i64 {
    if limit <= 0 || total_rows <= 0 {
        return 0;
    }
    total_rows / limit + i64::from(total_rows % limit != 0)
}

/// Row offset for a 1-based page number, saturating at `i64::MAX` so any
/// positive page simply lands past the last row
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(0))
}
