//! YouTube URL parsing and video ID extraction.
//!
//! Video IDs are always 11 characters from `[A-Za-z0-9_-]`. This module
//! accepts the four URL shapes a crawl seed or a related-video edge can take:
//! `watch?v=<ID>`, `youtu.be/<ID>`, `embed/<ID>`, and `shorts/<ID>`.

const VIDEO_ID_LEN: usize = 11;

/// Extract an 11-character YouTube video ID from any of the supported URL
/// shapes. Returns `None` if the URL is not a recognizable YouTube URL or
/// the extracted segment isn't a valid ID.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    if !is_youtube_domain(url) {
        return None;
    }

    extract_from_watch_url(url)
        .or_else(|| extract_from_short_url(url))
        .or_else(|| extract_from_embed_url(url))
        .or_else(|| extract_from_shorts_url(url))
        .filter(|id| is_valid_video_id(id))
}

/// Canonical watch URL for a video ID, the inverse of [`extract_video_id`]
/// for the `watch?v=` shape (round-trip law: `extract_video_id(canonical_url(id)) == id`).
pub fn canonical_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// True iff `id` is exactly 11 characters from `[A-Za-z0-9_-]`.
pub fn is_valid_video_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_domain(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains("youtube.com") || url.contains("youtu.be")
}

fn extract_from_watch_url(url: &str) -> Option<String> {
    let pos = url.find("?v=").or_else(|| url.find("&v="))?;
    extract_id_from_segment(&url[pos + 3..])
}

fn extract_from_short_url(url: &str) -> Option<String> {
    let pos = url.find("youtu.be/")?;
    extract_id_from_segment(&url[pos + "youtu.be/".len()..])
}

fn extract_from_embed_url(url: &str) -> Option<String> {
    let pos = url.find("/embed/")?;
    extract_id_from_segment(&url[pos + "/embed/".len()..])
}

fn extract_from_shorts_url(url: &str) -> Option<String> {
    let pos = url.find("/shorts/")?;
    extract_id_from_segment(&url[pos + "/shorts/".len()..])
}

fn extract_id_from_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    let delimiters = ['&', '#', '?', '/'];
    let end = segment
        .find(|c| delimiters.contains(&c))
        .unwrap_or(segment.len());
    let id = segment[..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
