//! Outbound calls to the browser
//!
//! The background core never talks to the browser directly; every side
//! effect goes through a [`Host`]. The wasm binding forwards to the
//! extension APIs, tests and the CLI use [`RecordingHost`].

use std::collections::HashSet;

use crate::messages::OutboundMessage;
use crate::types::{BadgeColor, TabId};

/// Error type for failed host calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("No tab with id: {0}")]
    NoSuchTab(TabId),
    #[error("No receiver for message")]
    NoReceiver,
    #[error("Host call failed: {0}")]
    Call(String),
}

/// Commands the core issues to the browser.
pub trait Host {
    /// Set the per-tab badge text. An empty string hides the badge.
    fn set_badge_text(&mut self, tab_id: TabId, text: &str) -> Result<(), HostError>;

    /// Set the per-tab badge background color.
    fn set_badge_background_color(&mut self, tab_id: TabId, color: BadgeColor) -> Result<(), HostError>;

    /// Broadcast a message to other extension views (the popup).
    fn send_message(&mut self, message: &OutboundMessage) -> Result<(), HostError>;
}

// =============================================================================
// Recording Host
// =============================================================================

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    BadgeText { tab_id: TabId, text: String },
    BadgeColor { tab_id: TabId, color: BadgeColor },
    Message(OutboundMessage),
}

/// In-memory host that records every successful call.
///
/// Tabs marked closed reject badge calls and, when no receiver is attached,
/// broadcasts fail the way they do in a browser with no popup open.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    closed_tabs: HashSet<TabId>,
    has_receiver: bool,
}

impl RecordingHost {
    /// Host with a popup listening for broadcasts.
    pub fn new() -> Self {
        Self {
            has_receiver: true,
            ..Self::default()
        }
    }

    /// Host where broadcasts have nobody to receive them.
    pub fn without_receiver() -> Self {
        Self::default()
    }

    pub fn close_tab(&mut self, tab_id: TabId) {
        self.closed_tabs.insert(tab_id);
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Most recent badge text set for a tab.
    pub fn badge_text(&self, tab_id: TabId) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::BadgeText { tab_id: t, text } if *t == tab_id => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of badge text updates issued for a tab.
    pub fn badge_updates(&self, tab_id: TabId) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::BadgeText { tab_id: t, .. } if *t == tab_id))
            .count()
    }

    pub fn messages(&self) -> Vec<&OutboundMessage> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn check_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        if self.closed_tabs.contains(&tab_id) {
            Err(HostError::NoSuchTab(tab_id))
        } else {
            Ok(())
        }
    }
}

impl Host for RecordingHost {
    fn set_badge_text(&mut self, tab_id: TabId, text: &str) -> Result<(), HostError> {
        self.check_tab(tab_id)?;
        self.calls.push(HostCall::BadgeText {
            tab_id,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_badge_background_color(&mut self, tab_id: TabId, color: BadgeColor) -> Result<(), HostError> {
        self.check_tab(tab_id)?;
        self.calls.push(HostCall::BadgeColor { tab_id, color });
        Ok(())
    }

    fn send_message(&mut self, message: &OutboundMessage) -> Result<(), HostError> {
        if !self.has_receiver {
            return Err(HostError::NoReceiver);
        }
        self.calls.push(HostCall::Message(message.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_tab_rejects_badge() {
        let mut host = RecordingHost::new();
        host.close_tab(TabId(4));
        assert_eq!(
            host.set_badge_text(TabId(4), "1"),
            Err(HostError::NoSuchTab(TabId(4)))
        );
        assert!(host.calls().is_empty());

        host.set_badge_text(TabId(5), "2").unwrap();
        host.set_badge_text(TabId(5), "3").unwrap();
        assert_eq!(host.badge_text(TabId(5)), Some("3"));
        assert_eq!(host.badge_updates(TabId(5)), 2);
    }

    #[test]
    fn test_broadcast_without_receiver() {
        let mut host = RecordingHost::without_receiver();
        let message = OutboundMessage::update_status(TabId(1), 1);
        assert_eq!(host.send_message(&message), Err(HostError::NoReceiver));
        assert!(host.messages().is_empty());
    }
}
