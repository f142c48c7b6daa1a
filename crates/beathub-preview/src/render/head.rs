//! Splicing rendered tags into the app's entry document.
//!
//! The document is never parsed or re-serialized: the tags are inserted at a
//! single byte offset and everything else is copied through unchanged.
//! Tag matching is ASCII case-insensitive.

use std::borrow::Cow;

/// Insert `tags` into the head of `document`.
///
/// In order of preference:
/// 1. right before `</head>`
/// 2. right after an opening `<head>` with no closing tag
/// 3. as a new `<head>` right after `<html>`
/// 4. as a new `<head>` right after a leading `<!doctype>`
/// 5. as a new `<head>` at the very start
pub fn inject(document: &str, tags: &str) -> String {
    // Same byte offsets as `document`: only ASCII bytes change case.
    let lower = document.to_ascii_lowercase();

    if let Some(at) = find_tag(&lower, "</head") {
        return splice(document, at, tags);
    }

    if let Some(at) = find_tag(&lower, "<head").and_then(|start| tag_end(&lower, start)) {
        return splice(document, at, tags);
    }

    let wrapped = format!("<head>{tags}</head>");

    if let Some(at) = find_tag(&lower, "<html").and_then(|start| tag_end(&lower, start)) {
        return splice(document, at, &wrapped);
    }

    let leading_ws = lower.len() - lower.trim_start().len();
    if lower[leading_ws..].starts_with("<!doctype")
        && let Some(at) = tag_end(&lower, leading_ws)
    {
        return splice(document, at, &wrapped);
    }

    splice(document, 0, &wrapped)
}

/// Remove the first `<title>...</title>` element of the head.
///
/// Titles after `</head>` (inline SVG, for instance) are left alone, as is a
/// document whose first title is never closed.
pub fn remove_title(document: &str) -> Cow<'_, str> {
    let lower = document.to_ascii_lowercase();
    let head_end = find_tag(&lower, "</head").unwrap_or(lower.len());

    let Some(start) = find_tag(&lower, "<title").filter(|&start| start < head_end) else {
        return Cow::Borrowed(document);
    };
    let Some(end) = find_tag(&lower[start..], "</title")
        .and_then(|close| tag_end(&lower, start + close))
    else {
        return Cow::Borrowed(document);
    };

    let mut out = String::with_capacity(document.len() - (end - start));
    out.push_str(&document[..start]);
    out.push_str(&document[end..]);
    Cow::Owned(out)
}

/// Offset of the first `name` tag, skipping longer names it prefixes
/// (`<head` must not match `<header`).
fn find_tag(lower: &str, name: &str) -> Option<usize> {
    let bytes = lower.as_bytes();
    lower.match_indices(name).map(|(i, _)| i).find(|&i| {
        matches!(
            bytes.get(i + name.len()),
            Some(b) if *b == b'>' || *b == b'/' || b.is_ascii_whitespace()
        )
    })
}

/// Offset just past the `>` that closes the tag starting at `start`.
fn tag_end(lower: &str, start: usize) -> Option<usize> {
    lower[start..].find('>').map(|i| start + i + 1)
}

fn splice(document: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(document.len() + insert.len());
    out.push_str(&document[..at]);
    out.push_str(insert);
    out.push_str(&document[at..]);
    out
}
