use url::Url;

use crate::Error;

/// Extracts the opaque video identifier from a source URL.
///
/// Recognizes `watch?v=<id>`, `youtu.be/<id>`, `/shorts/<id>` and
/// `/embed/<id>` forms. Anything else is an invalid request.
pub fn extract_video_id(source_url: &str) -> Result<String, Error> {
    let url = Url::parse(source_url.trim())
        .map_err(|e| Error::InvalidRequest(format!("malformed url '{source_url}': {e}")))?;

    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidRequest(format!("url '{source_url}' has no host")))?
        .to_ascii_lowercase();

    if host == "youtu.be" {
        if let Some(id) = url.path_segments().and_then(|mut segs| segs.next()) {
            if !id.trim().is_empty() {
                return Ok(id.to_string());
            }
        }
    }

    if url.path().starts_with("/watch") {
        if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
            if !id.trim().is_empty() {
                return Ok(id.into_owned());
            }
        }
    }

    if let Some(mut segs) = url.path_segments() {
        let first = segs.next().unwrap_or("");
        let second = segs.next().unwrap_or("");
        if (first == "shorts" || first == "embed" || first == "live") && !second.trim().is_empty()
        {
            return Ok(second.to_string());
        }
    }

    Err(Error::InvalidRequest(format!(
        "could not find a video id in '{source_url}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        let id = extract_video_id("https://youtube.com/watch?t=42&v=abc123xyz00").unwrap();
        assert_eq!(id, "abc123xyz00");
    }

    #[test]
    fn test_short_link() {
        let id = extract_video_id("https://youtu.be/abc123xyz00?si=tracking").unwrap();
        assert_eq!(id, "abc123xyz00");
    }

    #[test]
    fn test_shorts_and_embed_paths() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/s0r7sId0000").unwrap(),
            "s0r7sId0000"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/eMb3dId0000").unwrap(),
            "eMb3dId0000"
        );
    }

    #[test]
    fn test_rejects_non_video_urls() {
        assert!(matches!(
            extract_video_id("https://example.com/watch?v="),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            extract_video_id("not a url at all"),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            extract_video_id("https://www.youtube.com/"),
            Err(Error::InvalidRequest(_))
        ));
    }
}
