//! Related-video ID extraction from a YouTube watch page response.
//!
//! Two extraction methods, tried in order, grounded on
//! `original_source/python/videoscraper/crawler.py`'s
//! `_get_related_from_page` / `_extract_video_ids_from_data`:
//!
//! 1. Parse the embedded `ytInitialData` JSON blob and recursively walk it
//!    for `videoId` fields (and `watchEndpoint.videoId`).
//! 2. Fall back to a plain substring scan for `"videoId":"<11 chars>"`
//!    tokens when no JSON blob is found or it yields nothing.
//!
//! In both cases, IDs are de-duplicated in first-appearance order, the
//! self-ID is removed, and the result is capped at `cap` entries.

use serde_json::Value;
use vcrawl_models::is_valid_video_id;

const YT_INITIAL_DATA_MARKERS: [&str; 2] = [
    "var ytInitialData = ",
    "window[\"ytInitialData\"] = ",
];

/// Extract related video IDs from a raw watch-page HTML document.
pub fn extract_related_ids(html: &str, self_id: &str, cap: usize) -> Vec<String> {
    let from_json = find_yt_initial_data(html)
        .and_then(|blob| serde_json::from_str::<Value>(&blob).ok())
        .map(|data| extract_video_ids_from_json(&data))
        .unwrap_or_default();

    let ids = if from_json.is_empty() {
        extract_video_ids_regex(html)
    } else {
        from_json
    };

    dedup_excluding_self(ids, self_id, cap)
}

/// Locate the `ytInitialData = {...};` assignment and return the JSON
/// object text, scanning for the matching closing brace rather than using
/// a greedy regex (the blob can itself contain `};` inside string values).
fn find_yt_initial_data(html: &str) -> Option<String> {
    for marker in YT_INITIAL_DATA_MARKERS {
        if let Some(start) = html.find(marker) {
            let body_start = start + marker.len();
            if let Some(end) = matching_brace_end(&html[body_start..]) {
                return Some(html[body_start..body_start + end].to_string());
            }
        }
    }
    None
}

/// Given a string starting at `{`, find the index just past the matching
/// closing `}`, respecting (double-quoted, backslash-escaped) string
/// literals so braces inside strings don't confuse the scan.
fn matching_brace_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Recursively walk a JSON value collecting `videoId` fields, including
/// the nested `watchEndpoint.videoId` shape, in document order.
fn extract_video_ids_from_json(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    walk(value, &mut out);
    return out;

    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("videoId") {
                    if id.len() == 11 {
                        out.push(id.clone());
                    }
                }
                if let Some(Value::Object(endpoint)) = map.get("watchEndpoint") {
                    if let Some(Value::String(id)) = endpoint.get("videoId") {
                        if id.len() == 11 {
                            out.push(id.clone());
                        }
                    }
                }
                for v in map.values() {
                    walk(v, out);
                }
            }
            Value::Array(items) => {
                for v in items {
                    walk(v, out);
                }
            }
            _ => {}
        }
    }
}

/// Fallback: scan raw HTML for `"videoId":"<id>"` tokens without parsing
/// JSON at all (used when no `ytInitialData` blob could be located).
fn extract_video_ids_regex(html: &str) -> Vec<String> {
    let needle = "\"videoId\":\"";
    let mut out = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find(needle) {
        let after = &rest[pos + needle.len()..];
        if let Some(end) = after.find('"') {
            let candidate = &after[..end];
            if is_valid_video_id(candidate) {
                out.push(candidate.to_string());
            }
            rest = &after[end..];
        } else {
            break;
        }
    }
    out
}

fn dedup_excluding_self(ids: Vec<String>, self_id: &str, cap: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(cap.min(ids.len()));
    for id in ids {
        if id == self_id {
            continue;
        }
        if seen.insert(id.clone()) {
            out.push(id);
            if out.len() >= cap {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_yt_initial_data_json() {
        let html = r#"<html><script>var ytInitialData = {"contents":{"videoId":"AAAAAAAAAAA","nested":{"watchEndpoint":{"videoId":"BBBBBBBBBBB"}}}};</script></html>"#;
        let ids = extract_related_ids(html, "SELFSELFSEL", 25);
        assert_eq!(ids, vec!["AAAAAAAAAAA", "BBBBBBBBBBB"]);
    }

    #[test]
    fn falls_back_to_regex_scan() {
        let html = r#"no json here but "videoId":"CCCCCCCCCCC" and later "videoId":"DDDDDDDDDDD""#;
        let ids = extract_related_ids(html, "SELFSELFSEL", 25);
        assert_eq!(ids, vec!["CCCCCCCCCCC", "DDDDDDDDDDD"]);
    }

    #[test]
    fn dedups_preserving_first_appearance_order_and_excludes_self() {
        let html = r#""videoId":"AAAAAAAAAAA" "videoId":"BBBBBBBBBBB" "videoId":"AAAAAAAAAAA""#;
        let ids = extract_related_ids(html, "BBBBBBBBBBB", 25);
        assert_eq!(ids, vec!["AAAAAAAAAAA"]);
    }

    #[test]
    fn caps_at_requested_length() {
        let html: String = (0..30)
            .map(|i| format!(r#""videoId":"{:0>11}""#, i))
            .collect::<Vec<_>>()
            .join(" ");
        let ids = extract_related_ids(&html, "none", 25);
        assert_eq!(ids.len(), 25);
    }
}
