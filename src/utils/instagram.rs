use url::Url;

/// Path segments that introduce a post shortcode.
const POST_PREFIXES: [&str; 4] = ["p", "reel", "reels", "tv"];

const TRACKING_PARAMS: [&str; 2] = ["igsh", "igshid"];

/// Extracts the post shortcode from an Instagram URL path.
///
/// Handles `/p/ABC123/`, `/reel/ABC123/`, `/tv/ABC123/` and
/// `/username/p/ABC123/`, with or without trailing slashes and extra
/// path segments.
pub fn extract_post_id(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    segments
        .iter()
        .position(|segment| POST_PREFIXES.contains(segment))
        .and_then(|i| segments.get(i + 1).copied())
}

/// Query parameters added by share sheets and link trackers.
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

pub fn is_instagram_host(host: &str) -> bool {
    host == "instagram.com" || host.ends_with(".instagram.com") || host == "instagr.am"
}

/// Drops share-tracking query parameters (`igsh`, `igshid`, `utm_*`) and the
/// fragment from an Instagram post URL. Other parameters, such as
/// `img_index` on carousels, are kept.
///
/// Anything that is not a recognisable post URL is returned trimmed but
/// otherwise unchanged, so the provider still gets to decide.
pub fn canonical_post_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    let is_post = parsed.host_str().is_some_and(is_instagram_host)
        && extract_post_id(parsed.path()).is_some();
    if !is_post {
        return trimmed.to_string();
    }

    let kept_params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept_params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&kept_params);
    }
    parsed.set_fragment(None);
    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- extract_post_id ---

    #[test]
    fn extracts_from_p_path() {
        assert_eq!(extract_post_id("/p/ABC123/"), Some("ABC123"));
    }

    #[test]
    fn extracts_from_reel_path() {
        assert_eq!(extract_post_id("/reel/DEF456/"), Some("DEF456"));
        assert_eq!(extract_post_id("/reels/DEF456"), Some("DEF456"));
    }

    #[test]
    fn extracts_from_tv_path() {
        assert_eq!(extract_post_id("/tv/GHI789/"), Some("GHI789"));
    }

    #[test]
    fn extracts_behind_username() {
        assert_eq!(extract_post_id("/someone/p/XYZ/"), Some("XYZ"));
    }

    #[test]
    fn extracts_with_extra_segments() {
        assert_eq!(extract_post_id("/p/ABC123/embed/captioned"), Some("ABC123"));
    }

    #[test]
    fn returns_none_for_unrecognized_path() {
        assert_eq!(extract_post_id("/explore/tags/cat/"), None);
        assert_eq!(extract_post_id("/"), None);
        assert_eq!(extract_post_id(""), None);
        assert_eq!(extract_post_id("/p/"), None);
    }

    // --- is_instagram_host ---

    #[test]
    fn recognises_instagram_hosts() {
        assert!(is_instagram_host("instagram.com"));
        assert!(is_instagram_host("www.instagram.com"));
        assert!(is_instagram_host("m.instagram.com"));
        assert!(is_instagram_host("instagr.am"));
        assert!(!is_instagram_host("notinstagram.com"));
        assert!(!is_instagram_host("instagram.com.evil.net"));
    }

    // --- canonical_post_url ---

    #[test]
    fn strips_share_tracking() {
        assert_eq!(
            canonical_post_url("https://www.instagram.com/reel/C1a2B3c4D5e/?igsh=MWQ1ZGUxMzBkMA=="),
            "https://www.instagram.com/reel/C1a2B3c4D5e/"
        );
        assert_eq!(
            canonical_post_url("https://instagram.com/p/ABC/?utm_source=ig_web_copy_link#comments"),
            "https://instagram.com/p/ABC/"
        );
    }

    #[test]
    fn keeps_carousel_index() {
        assert_eq!(
            canonical_post_url("https://www.instagram.com/p/ABC/?img_index=3"),
            "https://www.instagram.com/p/ABC/?img_index=3"
        );
        assert_eq!(
            canonical_post_url("https://www.instagram.com/p/ABC/?igshid=xyz&img_index=2&utm_medium=copy_link"),
            "https://www.instagram.com/p/ABC/?img_index=2"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            canonical_post_url("  https://www.instagram.com/p/ABC/\n"),
            "https://www.instagram.com/p/ABC/"
        );
    }

    #[test]
    fn leaves_non_post_urls_alone() {
        let stories = "https://www.instagram.com/stories/someone/3141592653589793238/?igsh=x";
        assert_eq!(canonical_post_url(stories), stories);

        let other = "https://example.com/p/ABC/?keep=1";
        assert_eq!(canonical_post_url(other), other);
    }

    #[test]
    fn leaves_unparsable_input_alone() {
        assert_eq!(canonical_post_url("instagram.com/p/ABC"), "instagram.com/p/ABC");
    }
}
