// src/utils/html.rs

use std::collections::BTreeMap;

use crate::{error::ValidationError, scoring::QuestionCatalog};

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) are preserved while dangerous
/// tags (like <script>, <iframe>) and attributes (like onclick) are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Plain text of sanitized HTML, for output that cannot render markup.
///
/// Tags are dropped and the entities the sanitizer emits are decoded.
pub fn html_to_text(input: &str) -> String {
    ammonia::Builder::empty()
        .clean(input)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Sanitizes free-text chapter comments before they are stored.
///
/// Blank comments are dropped; comments on chapters the catalog does not
/// know are rejected.
pub fn sanitize_chapter_comments(
    catalog: &QuestionCatalog,
    comments: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ValidationError> {
    let mut cleaned = BTreeMap::new();
    for (chapter, comment) in comments {
        if catalog.chapter(&chapter).is_none() {
            return Err(ValidationError::new(format!(
                "Comment given for unknown chapter '{}'",
                chapter
            )));
        }
        let comment = clean_html(comment.trim());
        if !comment.is_empty() {
            cleaned.insert(chapter, comment);
        }
    }
    Ok(cleaned)
}
