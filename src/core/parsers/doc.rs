//! JSDoc comment cleanup.
//!
//! Only the free-text description is kept; block tags (`@default`, `@see`, ...)
//! and everything after the first one are dropped.

use swc_common::comments::{Comment, CommentKind};

/// Description text of a JSDoc block comment, or `None` for any other comment.
pub fn doc_text(comment: &Comment) -> Option<String> {
    if comment.kind != CommentKind::Block {
        return None;
    }
    // swc strips the `/*` and `*/`; a JSDoc block keeps its second `*`.
    let body = comment.text.strip_prefix('*')?;
    if body.starts_with('*') {
        // `/*** ... */` is a banner, not documentation.
        return None;
    }
    clean_doc_body(body)
}

/// Strip leading `*` gutters and tag lines, returning the trimmed description.
pub fn clean_doc_body(body: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }

    // Drop blank lines at either end but keep paragraph breaks in between.
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(
            clean_doc_body(" Whether the panel is open. "),
            Some("Whether the panel is open.".to_string())
        );
    }

    #[test]
    fn test_multi_line_with_tags() {
        let body = "\n * Maximum number of characters.\n *\n * Counted in UTF-16 units.\n * @default 100\n ";
        assert_eq!(
            clean_doc_body(body),
            Some("Maximum number of characters.\n\nCounted in UTF-16 units.".to_string())
        );
    }

    #[test]
    fn test_only_tags() {
        assert_eq!(clean_doc_body("\n * @deprecated\n "), None);
    }
}
