//! # Text Normalizer
//! Canonical cleanup applied before any lexical or model scoring.
//!
//! Pure and total: lower-case, strip punctuation and digits, drop any
//! remaining whitespace-free run starting with "http", trim both ends.

use once_cell::sync::Lazy;
use regex::Regex;

// `http\S*` (not `\S+`) so a bare trailing "http" token is removed too.
static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S*").expect("valid url regex"));

/// Normalize raw free text into the canonical scoring form.
///
/// Punctuation/digit stripping runs before url-run removal: mangled urls
/// like `h.t.t.p://x` collapse into an `http`-prefixed run first and are
/// then removed, which keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();

    // Typographic quotes/dashes first, so the ascii filter catches them.
    let ascii = lowered
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{2013}', '\u{2014}'], "-");

    let stripped: String = ascii
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_numeric())
        .collect();

    RE_URL.replace_all(&stripped, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  Markets RALLY  "), "markets rally");
    }

    #[test]
    fn strips_punctuation_and_digits() {
        let out = normalize("Apple Q3 earnings: +12.5%, beats estimates!");
        assert!(!out.chars().any(|c| c.is_ascii_punctuation()));
        assert!(!out.chars().any(|c| c.is_numeric()));
        assert_eq!(out, "apple q earnings  beats estimates");
    }

    #[test]
    fn removes_urls() {
        let out = normalize("read more at https://example.com/article?id=42 today");
        assert!(!out.contains("http"));
        assert!(out.contains("read more at"));
        assert!(out.contains("today"));
    }

    #[test]
    fn removes_bare_http_token() {
        let out = normalize("prefix http");
        assert_eq!(out, "prefix");
    }

    #[test]
    fn removes_mangled_url_runs() {
        // Punctuation removal joins the run; the url pass then drops it.
        let out = normalize("see,http://x and h.t.t.p rest");
        for tok in out.split_whitespace() {
            assert!(!tok.starts_with("http"), "http token survived: {tok}");
        }
    }

    #[test]
    fn idempotent() {
        for s in [
            "Stocks up 3% — read http://a.b/c!",
            "h.t.t.p trick",
            "  plain words only  ",
            "«Quoted» ‘fancy’ “text” – with dashes",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
