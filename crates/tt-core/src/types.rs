//! Core type definitions for TabTally
//!
//! These types cross the host boundary: tab ids and resource types arrive
//! from the browser, verdicts and colors go back to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Tab Identifiers
// =============================================================================

/// Host-assigned tab identifier.
///
/// Only equality is meaningful. Requests that do not belong to a displayed
/// tab (service workers, extension pages, prerender) carry `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i32);

impl TabId {
    /// Whether this id names a tab that can carry a badge.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Request Types (bit mask)
// =============================================================================

bitflags::bitflags! {
    /// Resource type bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestType: u16 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;
        const SUB_FRAME = 1 << 5;
        const MAIN_FRAME = 1 << 6;
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;
        const PING = 1 << 11;
        const CSP_REPORT = 1 << 12;

        /// Document types (main_frame + sub_frame)
        const DOCUMENT = Self::MAIN_FRAME.bits() | Self::SUB_FRAME.bits();
    }
}

const REQUEST_TYPE_NAMES: [(RequestType, &str); 13] = [
    (RequestType::MAIN_FRAME, "main_frame"),
    (RequestType::SUB_FRAME, "sub_frame"),
    (RequestType::STYLESHEET, "stylesheet"),
    (RequestType::SCRIPT, "script"),
    (RequestType::IMAGE, "image"),
    (RequestType::FONT, "font"),
    (RequestType::OBJECT, "object"),
    (RequestType::XMLHTTPREQUEST, "xmlhttprequest"),
    (RequestType::PING, "ping"),
    (RequestType::CSP_REPORT, "csp_report"),
    (RequestType::MEDIA, "media"),
    (RequestType::WEBSOCKET, "websocket"),
    (RequestType::OTHER, "other"),
];

impl RequestType {
    /// Parse from browser request type string.
    pub fn from_str(s: &str) -> Self {
        REQUEST_TYPE_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(ty, _)| *ty)
            .unwrap_or(Self::OTHER)
    }

    /// Browser names of every type set in the mask, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        REQUEST_TYPE_NAMES
            .iter()
            .filter(|(ty, _)| self.contains(*ty))
            .map(|(_, name)| *name)
            .collect()
    }
}

// =============================================================================
// Host Capability
// =============================================================================

/// What the host lets the extension do with an observed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// The observer may cancel requests itself (blocking webRequest).
    #[default]
    Cancel,
    /// Blocking happens in the host's declarative rule engine.
    Declarative,
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cancel" | "blocking" => Ok(Self::Cancel),
            "declarative" | "non-blocking" => Ok(Self::Declarative),
            other => Err(format!("unknown capability '{}'", other)),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("cancel"),
            Self::Declarative => f.write_str("declarative"),
        }
    }
}

// =============================================================================
// Verdicts
// =============================================================================

/// What the host should do with an observed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the request proceed.
    Allow,
    /// Cancel the request.
    Cancel,
}

// =============================================================================
// Badge Color
// =============================================================================

/// RGBA badge background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeColor(pub [u8; 4]);

impl BadgeColor {
    pub const RED: BadgeColor = BadgeColor([255, 0, 0, 255]);
}

impl Default for BadgeColor {
    fn default() -> Self {
        Self::RED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_id_validity() {
        assert!(TabId(1).is_valid());
        assert!(TabId(42).is_valid());
        assert!(!TabId(0).is_valid());
        assert!(!TabId(-1).is_valid());
    }

    #[test]
    fn test_tab_id_display_honors_width() {
        assert_eq!(TabId(5).to_string(), "5");
        assert_eq!(format!("[{:<4}]", TabId(5)), "[5   ]");
        assert_eq!(format!("[{:>4}]", TabId(-1)), "[  -1]");
    }

    #[test]
    fn test_request_type_names() {
        assert_eq!(RequestType::from_str("script"), RequestType::SCRIPT);
        assert_eq!(RequestType::from_str("sub_frame"), RequestType::SUB_FRAME);
        assert_eq!(RequestType::from_str("beacon"), RequestType::OTHER);

        let mask = RequestType::IMAGE | RequestType::SCRIPT;
        assert_eq!(mask.names(), vec!["script", "image"]);
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!("cancel".parse::<Capability>(), Ok(Capability::Cancel));
        assert_eq!("Declarative".parse::<Capability>(), Ok(Capability::Declarative));
        assert!("sometimes".parse::<Capability>().is_err());

        let parsed: Capability = serde_json::from_str("\"declarative\"").unwrap();
        assert_eq!(parsed, Capability::Declarative);
    }
}
