//! Badge rendering
//!
//! Badge updates are best-effort: a tab may close between the event and the
//! badge call, so host failures are logged and dropped.

use crate::host::Host;
use crate::store::CounterStore;
use crate::types::{BadgeColor, TabId};

/// Text shown for a count. Zero hides the badge.
pub fn badge_text(count: u32) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

/// Renders store counts onto the host's per-tab badge.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgePresenter {
    color: BadgeColor,
}

impl BadgePresenter {
    pub fn new(color: BadgeColor) -> Self {
        Self { color }
    }

    pub fn color(&self) -> BadgeColor {
        self.color
    }

    /// Push the current count of `tab_id` to its badge.
    pub fn refresh<H: Host + ?Sized>(&self, store: &CounterStore, host: &mut H, tab_id: TabId) {
        let text = badge_text(store.get(tab_id));
        log::trace!("badge tab={} text={:?}", tab_id, text);

        if let Err(e) = host.set_badge_text(tab_id, &text) {
            log::debug!("set_badge_text failed for tab {}: {}", tab_id, e);
        }
        if let Err(e) = host.set_badge_background_color(tab_id, self.color) {
            log::debug!("set_badge_background_color failed for tab {}: {}", tab_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), "");
        assert_eq!(badge_text(1), "1");
        assert_eq!(badge_text(3), "3");
        assert_eq!(badge_text(42), "42");
        assert_eq!(badge_text(1000), "1000");
    }

    #[test]
    fn test_refresh_sets_text_and_color() {
        let mut store = CounterStore::new();
        store.record_block(TabId(2));
        let mut host = RecordingHost::new();

        BadgePresenter::default().refresh(&store, &mut host, TabId(2));
        assert_eq!(
            host.calls(),
            &[
                HostCall::BadgeText { tab_id: TabId(2), text: "1".to_string() },
                HostCall::BadgeColor { tab_id: TabId(2), color: BadgeColor::RED },
            ]
        );
    }

    #[test]
    fn test_refresh_absent_tab_hides_badge() {
        let store = CounterStore::new();
        let mut host = RecordingHost::new();
        BadgePresenter::new(BadgeColor([0, 0, 255, 255])).refresh(&store, &mut host, TabId(8));
        assert_eq!(host.badge_text(TabId(8)), Some(""));
        assert!(host.calls().contains(&HostCall::BadgeColor {
            tab_id: TabId(8),
            color: BadgeColor([0, 0, 255, 255]),
        }));
    }

    #[test]
    fn test_refresh_swallows_host_errors() {
        let store = CounterStore::new();
        let mut host = RecordingHost::new();
        host.close_tab(TabId(3));
        BadgePresenter::default().refresh(&store, &mut host, TabId(3));
        assert!(host.calls().is_empty());
    }
}
