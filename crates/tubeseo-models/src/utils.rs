//! YouTube URL parsing and validation utilities.

use url::Url;

/// Hosts accepted by request validation.
const ALLOWED_HOSTS: [&str; 4] = ["youtube.com", "www.youtube.com", "youtu.be", "www.youtu.be"];

/// Characters that terminate a video ID inside a URL.
const ID_DELIMITERS: [char; 4] = ['&', '\n', '?', '#'];

/// Extract a YouTube video ID from a URL string.
///
/// Recognized shapes:
/// - `youtube.com/watch?v=VIDEO_ID` (with `v` anywhere in the query)
/// - `youtu.be/VIDEO_ID`
/// - `youtube.com/embed/VIDEO_ID`
///
/// The ID runs up to the first of `&`, newline, `?`, or `#`. Pure and
/// deterministic; returns `None` for anything unrecognized, never errors.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    extract_from_watch_url(url)
        .or_else(|| extract_from_short_url(url))
        .or_else(|| extract_from_embed_url(url))
}

/// Check whether a submitted URL is syntactically valid and on an allowed
/// YouTube host. This is the request-body gate, run before any pipeline work.
pub fn is_allowed_source_url(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    match parsed.host_str() {
        Some(host) => ALLOWED_HOSTS.iter().any(|allowed| host.eq_ignore_ascii_case(allowed)),
        None => false,
    }
}

/// Extract ID from a watch-page URL (`youtube.com/watch?v=` or `...&v=`).
fn extract_from_watch_url(url: &str) -> Option<String> {
    let watch_pos = url.find("youtube.com/watch")?;
    let query = &url[watch_pos..];

    let id_start = query
        .find("?v=")
        .or_else(|| query.find("&v="))
        .map(|pos| pos + 3)?;
    id_segment(&query[id_start..])
}

/// Extract ID from a short-link URL (`youtu.be/VIDEO_ID`).
fn extract_from_short_url(url: &str) -> Option<String> {
    let be_pos = url.find("youtu.be/")?;
    id_segment(&url[be_pos + 9..])
}

/// Extract ID from an embed URL (`youtube.com/embed/VIDEO_ID`).
fn extract_from_embed_url(url: &str) -> Option<String> {
    let embed_pos = url.find("/embed/")?;
    id_segment(&url[embed_pos + 7..])
}

/// Take the leading ID portion of a segment, stopping at the first delimiter.
fn id_segment(segment: &str) -> Option<String> {
    let end = segment.find(ID_DELIMITERS).unwrap_or(segment.len());
    let id = &segment[..end];
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=5s").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        // `v` does not have to be the first query parameter
        assert_eq!(
            extract_video_id("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/xyz789").as_deref(),
            Some("xyz789")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=30").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_from_embed_url() {
        assert_eq!(
            extract_video_id("https://youtube.com/embed/qqq111?start=1").as_deref(),
            Some("qqq111")
        );
    }

    #[test]
    fn test_id_stops_at_delimiters() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc#fragment").as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=abc&list=PL123").as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/abc\ntrailing").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_unrecognized_urls_return_none() {
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://youtube.com/watch?list=PL123"), None);
        assert_eq!(extract_video_id("https://youtu.be/"), None);
    }

    #[test]
    fn test_allowed_source_urls() {
        assert!(is_allowed_source_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_allowed_source_url("https://youtube.com/watch?v=abc"));
        assert!(is_allowed_source_url("https://youtu.be/abc"));
        assert!(is_allowed_source_url("https://www.youtu.be/abc"));
    }

    #[test]
    fn test_disallowed_source_urls() {
        assert!(!is_allowed_source_url("not a url"));
        assert!(!is_allowed_source_url("https://example.com/watch?v=abc"));
        assert!(!is_allowed_source_url("https://notyoutube.com/watch?v=abc"));
        // Host must match exactly, not merely contain the platform name
        assert!(!is_allowed_source_url("https://youtube.com.evil.com/watch?v=abc"));
    }
}
