use url::Url;

/// Resolves a stored media path (e.g. `subject_images/math.png`) against the
/// public media base URL. Returns `None` for empty paths or unparsable bases.
pub fn media_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;

    // Already absolute.
    if let Ok(url) = Url::parse(path) {
        return Some(url.to_string());
    }

    let base = Url::parse(base).ok()?;
    base.join(path.trim_start_matches('/'))
        .ok()
        .map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url_joins_relative_path() {
        assert_eq!(
            media_url("http://localhost:8000/media/", Some("subject_images/math.png")).as_deref(),
            Some("http://localhost:8000/media/subject_images/math.png")
        );
    }

    #[test]
    fn test_media_url_keeps_absolute_path() {
        assert_eq!(
            media_url("http://localhost:8000/media/", Some("https://cdn.example.com/a.png")).as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_media_url_none_for_missing_image() {
        assert_eq!(media_url("http://localhost:8000/media/", None), None);
        assert_eq!(media_url("http://localhost:8000/media/", Some("  ")), None);
    }
}
