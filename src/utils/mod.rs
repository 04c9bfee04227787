use regex::Regex;
use url::Url;

use crate::ExtractError;

/// Validate a TED talk URL and return its canonical form.
///
/// Accepts http/https URLs on `ted.com` or `www.ted.com` with a `/talks/<slug>`
/// path. Canonicalization forces https on `www.ted.com` and drops the query
/// string, fragment and any trailing slash, so tracking parameters never leak
/// into stored records.
pub fn validate_talk_url(url: &str) -> Result<Url, ExtractError> {
    let mut parsed =
        Url::parse(url).map_err(|_| ExtractError::InvalidUrl(url.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl(url.to_string()));
    }

    match parsed.host_str() {
        Some("ted.com") | Some("www.ted.com") => {}
        _ => return Err(ExtractError::InvalidUrl(url.to_string())),
    }

    let slug = parsed
        .path()
        .strip_prefix("/talks/")
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ExtractError::InvalidUrl(url.to_string()))?;

    // set_scheme/set_host only fail for non-special schemes; ours is http(s)
    let _ = parsed.set_scheme("https");
    let _ = parsed.set_host(Some("www.ted.com"));
    parsed.set_path(&format!("/talks/{}", slug));
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Extract the talk slug from a validated URL.
pub fn talk_slug(url: &Url) -> Option<&str> {
    url.path().strip_prefix("/talks/").filter(|s| !s.is_empty())
}

/// Harvest valid TED talk URLs out of free text.
///
/// Used by the batch file reader so a line of prose containing a link still
/// contributes its URL. Results are canonicalized and deduplicated in order
/// of first appearance.
pub fn find_talk_urls(text: &str) -> Vec<String> {
    let pattern = Regex::new(r#"https?://(?:www\.)?ted\.com/talks/[^\s<>"']+"#)
        .expect("static regex");

    let mut seen = Vec::new();
    for m in pattern.find_iter(text) {
        // Trailing sentence punctuation is part of the match but not the URL
        let candidate = m.as_str().trim_end_matches([',', '.', ';', ':', ')']);
        if let Ok(url) = validate_talk_url(candidate) {
            let canonical = url.to_string();
            if !seen.contains(&canonical) {
                seen.push(canonical);
            }
        }
    }
    seen
}

/// Format a duration in seconds as `m:ss`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
