//! Background event handling
//!
//! [`Background`] owns the counter store and wires host callbacks to store
//! mutations, badge refreshes and popup notifications. All handlers take
//! `&mut self`: events are processed one at a time, in the order the host
//! delivers them, with no batching.

use crate::badge::BadgePresenter;
use crate::config::Config;
use crate::events::{DispatchOutcome, HostEvent, RequestDetails};
use crate::host::Host;
use crate::messages::{CountReply, InboundMessage, OutboundMessage};
use crate::observer::{strategy_for, RequestObserver};
use crate::store::CounterStore;
use crate::types::{Capability, TabId, Verdict};

#[derive(Debug)]
pub struct Background {
    store: CounterStore,
    presenter: BadgePresenter,
    observer: RequestObserver,
    push_updates: bool,
    active_tab: Option<TabId>,
}

impl Default for Background {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Background {
    pub fn new(config: &Config) -> Self {
        Self {
            store: CounterStore::new(),
            presenter: BadgePresenter::new(config.badge_color),
            observer: RequestObserver::new(config.heuristic(), strategy_for(config.capability)),
            push_updates: config.push_updates,
            active_tab: None,
        }
    }

    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    pub fn observer(&self) -> &RequestObserver {
        &self.observer
    }

    pub fn capability(&self) -> Capability {
        self.observer.capability()
    }

    /// False when counts are heuristic guesses at what the declarative
    /// engine blocked rather than confirmed cancellations.
    pub fn counts_are_confirmed(&self) -> bool {
        self.observer.counts_are_confirmed()
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.active_tab
    }

    /// Current count for a tab.
    pub fn count(&self, tab_id: TabId) -> u32 {
        self.store.get(tab_id)
    }

    // =========================================================================
    // Counter operations with their side effects
    // =========================================================================

    /// Count a blocked request, refresh the tab's badge and broadcast the new
    /// count. Ids that do not belong to a tab are ignored entirely.
    pub fn record_block<H: Host + ?Sized>(&mut self, host: &mut H, tab_id: TabId) -> Option<u32> {
        let count = self.store.record_block(tab_id)?;
        log::trace!("tab {} blocked count -> {}", tab_id, count);

        self.presenter.refresh(&self.store, host, tab_id);
        if self.push_updates {
            let message = OutboundMessage::update_status(tab_id, count);
            if let Err(e) = host.send_message(&message) {
                log::debug!("status broadcast for tab {} not delivered: {}", tab_id, e);
            }
        }
        Some(count)
    }

    pub fn reset_for_navigation<H: Host + ?Sized>(&mut self, host: &mut H, tab_id: TabId) {
        self.store.reset_for_navigation(tab_id);
        log::trace!("tab {} navigated, count reset", tab_id);
        self.presenter.refresh(&self.store, host, tab_id);
    }

    /// Forget a tab. There is no badge left to update.
    pub fn remove(&mut self, tab_id: TabId) {
        if let Some(count) = self.store.remove(tab_id) {
            log::trace!("tab {} closed with count {}", tab_id, count);
        }
    }

    pub fn refresh<H: Host + ?Sized>(&self, host: &mut H, tab_id: TabId) {
        self.presenter.refresh(&self.store, host, tab_id);
    }

    // =========================================================================
    // Host callbacks
    // =========================================================================

    pub fn on_request<H: Host + ?Sized>(&mut self, host: &mut H, request: &RequestDetails) -> Verdict {
        let classification = self.observer.classify(&request.url);
        if classification.is_ad {
            log::debug!(
                "ad request tab={} type={:?} url={}",
                request.tab_id,
                request.resource_type(),
                request.url
            );
            self.record_block(host, request.tab_id);
        }
        classification.verdict
    }

    /// Tab changed. Only a present, non-empty `url` means it navigated.
    pub fn on_tab_updated<H: Host + ?Sized>(&mut self, host: &mut H, tab_id: TabId, url: Option<&str>) {
        match url {
            Some(url) if !url.is_empty() => self.reset_for_navigation(host, tab_id),
            _ => {}
        }
    }

    pub fn on_tab_removed(&mut self, tab_id: TabId) {
        self.remove(tab_id);
        if self.active_tab == Some(tab_id) {
            self.active_tab = None;
        }
    }

    pub fn on_tab_activated<H: Host + ?Sized>(&mut self, host: &mut H, tab_id: TabId) {
        self.active_tab = Some(tab_id);
        self.refresh(host, tab_id);
    }

    /// Answer a popup message. Count queries resolve their tab from the
    /// explicit id, then the sender's tab, then the last activated tab.
    pub fn on_message(&self, message: &InboundMessage, sender_tab: Option<TabId>) -> Option<CountReply> {
        match message {
            InboundMessage::GetCount { tab_id } => {
                let tab_id = tab_id.or(sender_tab).or(self.active_tab);
                Some(CountReply {
                    count: tab_id.map(|t| self.store.get(t)).unwrap_or(0),
                    tab_id,
                })
            }
            InboundMessage::Ack { status } => {
                log::debug!("popup acknowledged status update: {}", status);
                None
            }
        }
    }

    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, event: &HostEvent) -> DispatchOutcome {
        match event {
            HostEvent::RequestObserved(request) => DispatchOutcome::Request(self.on_request(host, request)),
            HostEvent::TabUpdated { tab_id, url } => {
                self.on_tab_updated(host, *tab_id, url.as_deref());
                DispatchOutcome::Done
            }
            HostEvent::TabRemoved { tab_id } => {
                self.on_tab_removed(*tab_id);
                DispatchOutcome::Done
            }
            HostEvent::TabActivated { tab_id } => {
                self.on_tab_activated(host, *tab_id);
                DispatchOutcome::Done
            }
            HostEvent::MessageReceived { message, sender_tab_id } => {
                match InboundMessage::from_value(message.clone()) {
                    Ok(parsed) => match self.on_message(&parsed, *sender_tab_id) {
                        Some(reply) => DispatchOutcome::Reply(reply),
                        None => DispatchOutcome::Done,
                    },
                    Err(e) => {
                        log::debug!("ignoring message: {}", e);
                        DispatchOutcome::Done
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::types::BadgeColor;

    fn ad(tab: i32) -> RequestDetails {
        RequestDetails::new("https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js", TabId(tab))
    }

    #[test]
    fn test_record_block_refreshes_and_pushes() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();

        assert_eq!(bg.record_block(&mut host, TabId(5)), Some(1));
        assert_eq!(
            host.take_calls(),
            vec![
                HostCall::BadgeText { tab_id: TabId(5), text: "1".to_string() },
                HostCall::BadgeColor { tab_id: TabId(5), color: BadgeColor::RED },
                HostCall::Message(OutboundMessage::update_status(TabId(5), 1)),
            ]
        );
    }

    #[test]
    fn test_push_disabled() {
        let config = Config { push_updates: false, ..Config::default() };
        let mut bg = Background::new(&config);
        let mut host = RecordingHost::new();
        bg.record_block(&mut host, TabId(2));
        assert!(host.messages().is_empty());
        assert_eq!(host.badge_text(TabId(2)), Some("1"));
    }

    #[test]
    fn test_push_without_popup_still_counts() {
        let mut bg = Background::default();
        let mut host = RecordingHost::without_receiver();
        bg.record_block(&mut host, TabId(2));
        bg.record_block(&mut host, TabId(2));
        assert_eq!(bg.count(TabId(2)), 2);
        assert_eq!(host.badge_text(TabId(2)), Some("2"));
    }

    #[test]
    fn test_cancelling_request_verdicts() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();

        assert_eq!(bg.on_request(&mut host, &ad(3)), Verdict::Cancel);
        let plain = RequestDetails::new("https://example.com/app.js", TabId(3));
        assert_eq!(bg.on_request(&mut host, &plain), Verdict::Allow);
        assert_eq!(bg.count(TabId(3)), 1);
    }

    #[test]
    fn test_ad_without_tab_is_cancelled_but_not_counted() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();

        assert_eq!(bg.on_request(&mut host, &ad(-1)), Verdict::Cancel);
        assert!(bg.store().is_empty());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_declarative_counts_but_allows() {
        let config = Config { capability: Capability::Declarative, ..Config::default() };
        let mut bg = Background::new(&config);
        let mut host = RecordingHost::new();

        assert!(!bg.counts_are_confirmed());
        assert_eq!(bg.on_request(&mut host, &ad(4)), Verdict::Allow);
        assert_eq!(bg.on_request(&mut host, &ad(4)), Verdict::Allow);
        assert_eq!(bg.count(TabId(4)), 2);
        assert_eq!(host.badge_text(TabId(4)), Some("2"));
    }

    #[test]
    fn test_tab_update_without_url_keeps_count() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();
        bg.record_block(&mut host, TabId(5));
        host.take_calls();

        bg.on_tab_updated(&mut host, TabId(5), None);
        bg.on_tab_updated(&mut host, TabId(5), Some(""));
        assert_eq!(bg.count(TabId(5)), 1);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_activation_refreshes_without_mutation() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();
        bg.record_block(&mut host, TabId(1));
        host.take_calls();

        bg.on_tab_activated(&mut host, TabId(1));
        assert_eq!(bg.count(TabId(1)), 1);
        assert_eq!(bg.active_tab(), Some(TabId(1)));
        assert_eq!(host.badge_text(TabId(1)), Some("1"));

        bg.on_tab_activated(&mut host, TabId(9));
        assert_eq!(host.badge_text(TabId(9)), Some(""));
        assert!(!bg.store().contains(TabId(9)));
    }

    #[test]
    fn test_removal_clears_active_tab() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();
        bg.on_tab_activated(&mut host, TabId(6));
        bg.on_tab_removed(TabId(6));
        assert_eq!(bg.active_tab(), None);
    }

    #[test]
    fn test_get_count_resolution() {
        let mut bg = Background::default();
        let mut host = RecordingHost::new();
        bg.record_block(&mut host, TabId(1));
        bg.record_block(&mut host, TabId(2));
        bg.record_block(&mut host, TabId(2));

        let query = InboundMessage::GetCount { tab_id: None };
        assert_eq!(bg.on_message(&query, None), Some(CountReply { count: 0, tab_id: None }));

        bg.on_tab_activated(&mut host, TabId(1));
        assert_eq!(
            bg.on_message(&query, None),
            Some(CountReply { count: 1, tab_id: Some(TabId(1)) })
        );
        assert_eq!(
            bg.on_message(&query, Some(TabId(2))),
            Some(CountReply { count: 2, tab_id: Some(TabId(2)) })
        );

        let explicit = InboundMessage::GetCount { tab_id: Some(TabId(2)) };
        assert_eq!(
            bg.on_message(&explicit, Some(TabId(1))),
            Some(CountReply { count: 2, tab_id: Some(TabId(2)) })
        );
    }

    #[test]
    fn test_ack_has_no_reply() {
        let bg = Background::default();
        let ack = InboundMessage::Ack { status: "received".to_string() };
        assert_eq!(bg.on_message(&ack, None), None);
    }
}
