//! Ad URL heuristic
//!
//! A request is treated as an ad when its URL contains one of a fixed set of
//! substrings. Comparison is ASCII case-insensitive and allocation-free.

/// Substrings matched when no configuration overrides them.
pub const DEFAULT_AD_PATTERNS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "googleadservices.com",
    "adservice.google.",
    "amazon-adsystem.com",
    "adnxs.com",
    "/ads/",
    "/adserver",
];

/// Substring predicate over request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHeuristic {
    patterns: Vec<String>,
}

impl Default for AdHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_AD_PATTERNS.iter().copied())
    }
}

impl AdHeuristic {
    /// Build from a pattern set. Empty patterns are dropped since they would
    /// match every URL.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let lowered = pattern.to_ascii_lowercase();
            if !out.contains(&lowered) {
                out.push(lowered);
            }
        }
        Self { patterns: out }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Does the URL look like an ad request?
    #[inline]
    pub fn is_ad(&self, url: &str) -> bool {
        self.matching_pattern(url).is_some()
    }

    /// First pattern the URL contains, if any.
    pub fn matching_pattern(&self, url: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| contains_ignore_ascii_case(url, pattern))
            .map(String::as_str)
    }
}

/// Check `needle` (already lowercase) against `haystack` ignoring ASCII case.
#[inline]
fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    if hay.len() < needle.len() {
        return false;
    }
    hay.windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
