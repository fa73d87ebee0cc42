use tt_core::types::RequestType;

/// Resource type options the declarative engine understands.
const SUPPORTED_TYPE_OPTIONS: &[(&str, RequestType)] = &[
    ("script", RequestType::SCRIPT),
    ("image", RequestType::IMAGE),
    ("stylesheet", RequestType::STYLESHEET),
    ("xmlhttprequest", RequestType::XMLHTTPREQUEST),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Block,
    Allow,
}

/// A network filter reduced to what the declarative engine can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub action: FilterAction,
    pub url_filter: String,
    /// Empty means every resource type.
    pub resource_types: RequestType,
}

/// Parse one filter list line. Returns `None` for lines that produce no rule.
pub fn parse_filter_line(raw_line: &str) -> Option<ParsedFilter> {
    let mut line = raw_line.trim();
    if line.is_empty() || is_comment_line(line) {
        return None;
    }

    if line.contains("##") || line.contains("#@#") || line.contains("#?#") {
        return None;
    }

    let mut action = FilterAction::Block;
    if let Some(rest) = line.strip_prefix("@@") {
        action = FilterAction::Allow;
        line = rest;
    }

    let (pattern_part, options_text) = split_rule_options(line);
    if pattern_part.is_empty() || is_regex_pattern(pattern_part) {
        return None;
    }

    let resource_types = options_text.map(parse_type_options).unwrap_or_else(RequestType::empty);

    Some(ParsedFilter {
        action,
        url_filter: pattern_part.to_string(),
        resource_types,
    })
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('[') || line.starts_with('#')
}

fn is_regex_pattern(pattern: &str) -> bool {
    pattern.len() > 1 && pattern.starts_with('/') && pattern.ends_with('/')
}

fn split_rule_options(line: &str) -> (&str, Option<&str>) {
    match line.find('$') {
        Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
        None => (line, None),
    }
}

fn parse_type_options(text: &str) -> RequestType {
    let mut mask = RequestType::empty();
    for option in text.split(',') {
        let option = option.trim();
        if let Some((_, ty)) = SUPPORTED_TYPE_OPTIONS.iter().find(|(name, _)| *name == option) {
            mask |= *ty;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_non_network_lines() {
        for line in [
            "",
            "   ",
            "! Title: EasyList",
            "[Adblock Plus 2.0]",
            "# hosts comment",
            "example.com##.ad-banner",
            "example.com#@#.sponsored",
            "example.com#?#div:has(> .ad)",
            "/banner\\d+\\.gif/",
            "$script,third-party",
            "@@$image",
        ] {
            assert_eq!(parse_filter_line(line), None, "line: {:?}", line);
        }
    }

    #[test]
    fn test_block_rule() {
        let filter = parse_filter_line("||ads.example.com^").unwrap();
        assert_eq!(filter.action, FilterAction::Block);
        assert_eq!(filter.url_filter, "||ads.example.com^");
        assert!(filter.resource_types.is_empty());
    }

    #[test]
    fn test_exception_rule() {
        let filter = parse_filter_line("@@||cdn.example.com/ads.js").unwrap();
        assert_eq!(filter.action, FilterAction::Allow);
        assert_eq!(filter.url_filter, "||cdn.example.com/ads.js");
    }

    #[test]
    fn test_type_options() {
        let filter = parse_filter_line("/adframe.$image,third-party,script,image").unwrap();
        assert_eq!(filter.url_filter, "/adframe.");
        assert_eq!(filter.resource_types, RequestType::IMAGE | RequestType::SCRIPT);

        let filter = parse_filter_line("&ad_type=$domain=example.com").unwrap();
        assert!(filter.resource_types.is_empty());
    }
}
