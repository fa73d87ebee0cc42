//! Inbound host events
//!
//! The serialized form is what `tt-cli replay` reads from a trace file:
//!
//! ```json
//! [
//!   {"event": "requestObserved", "url": "https://ads.example/x.js", "tabId": 5, "type": "script"},
//!   {"event": "tabUpdated", "tabId": 5, "url": "https://example.com/next"},
//!   {"event": "tabActivated", "tabId": 5},
//!   {"event": "messageReceived", "message": {"action": "GET_COUNT"}},
//!   {"event": "tabRemoved", "tabId": 5}
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::CountReply;
use crate::types::{RequestType, TabId, Verdict};

/// A network request seen by the interception facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub url: String,
    pub tab_id: TabId,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
}

impl RequestDetails {
    pub fn new(url: impl Into<String>, tab_id: TabId) -> Self {
        Self {
            url: url.into(),
            tab_id,
            request_type: None,
        }
    }

    pub fn resource_type(&self) -> RequestType {
        self.request_type
            .as_deref()
            .map(RequestType::from_str)
            .unwrap_or(RequestType::OTHER)
    }
}

/// One callback delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    RequestObserved(RequestDetails),
    /// `url` is present only when the tab navigated.
    TabUpdated {
        tab_id: TabId,
        #[serde(default)]
        url: Option<String>,
    },
    TabRemoved {
        tab_id: TabId,
    },
    TabActivated {
        tab_id: TabId,
    },
    MessageReceived {
        message: Value,
        #[serde(default)]
        sender_tab_id: Option<TabId>,
    },
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Verdict for a request event.
    Request(Verdict),
    /// Reply to send back to a message sender.
    Reply(CountReply),
    /// Nothing to return to the host.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_events() {
        let events: Vec<HostEvent> = serde_json::from_str(
            r#"[
                {"event":"requestObserved","url":"https://a.test/ads/1.gif","tabId":5,"type":"image"},
                {"event":"tabUpdated","tabId":5},
                {"event":"tabUpdated","tabId":5,"url":"https://b.test/"},
                {"event":"tabRemoved","tabId":5},
                {"event":"tabActivated","tabId":6},
                {"event":"messageReceived","message":{"action":"GET_COUNT"},"senderTabId":6}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 6);
        match &events[0] {
            HostEvent::RequestObserved(details) => {
                assert_eq!(details.tab_id, TabId(5));
                assert_eq!(details.resource_type(), RequestType::IMAGE);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(events[1], HostEvent::TabUpdated { tab_id: TabId(5), url: None });
        assert_eq!(events[4], HostEvent::TabActivated { tab_id: TabId(6) });
        assert!(matches!(
            &events[5],
            HostEvent::MessageReceived { sender_tab_id: Some(TabId(6)), .. }
        ));
    }

    #[test]
    fn test_request_without_type() {
        let details = RequestDetails::new("https://x.test/", TabId(1));
        assert_eq!(details.resource_type(), RequestType::OTHER);
    }
}
