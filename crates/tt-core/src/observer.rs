//! Request observation
//!
//! Every observed request is classified by the [`AdHeuristic`]. What a match
//! means depends on the host's capability, chosen once at startup:
//!
//! - [`CancellingStrategy`]: the request is cancelled here, so the per-tab
//!   count is the number of requests actually cancelled.
//! - [`DeclarativeStrategy`]: the host's declarative rule list does the
//!   blocking and this code cannot see its decisions. The request is let
//!   through and the count records requests the heuristic *guesses* the rule
//!   list blocks. Such counts are approximate and may drift from what the
//!   browser really blocked.

use std::fmt;

use crate::heuristic::AdHeuristic;
use crate::types::{Capability, Verdict};

/// Capability-specific handling of a heuristic match.
pub trait RequestStrategy: fmt::Debug {
    fn capability(&self) -> Capability;

    /// Verdict returned to the host for a request.
    fn verdict(&self, is_ad: bool) -> Verdict;

    /// Whether counts reflect confirmed blocks rather than guesses.
    fn counts_are_confirmed(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CancellingStrategy;

impl RequestStrategy for CancellingStrategy {
    fn capability(&self) -> Capability {
        Capability::Cancel
    }

    fn verdict(&self, is_ad: bool) -> Verdict {
        if is_ad {
            Verdict::Cancel
        } else {
            Verdict::Allow
        }
    }

    fn counts_are_confirmed(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeStrategy;

impl RequestStrategy for DeclarativeStrategy {
    fn capability(&self) -> Capability {
        Capability::Declarative
    }

    fn verdict(&self, _is_ad: bool) -> Verdict {
        Verdict::Allow
    }

    fn counts_are_confirmed(&self) -> bool {
        false
    }
}

pub fn strategy_for(capability: Capability) -> Box<dyn RequestStrategy> {
    match capability {
        Capability::Cancel => Box::new(CancellingStrategy),
        Capability::Declarative => Box::new(DeclarativeStrategy),
    }
}

/// Result of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The heuristic matched; the request counts as blocked.
    pub is_ad: bool,
    pub verdict: Verdict,
}

#[derive(Debug)]
pub struct RequestObserver {
    heuristic: AdHeuristic,
    strategy: Box<dyn RequestStrategy>,
}

impl RequestObserver {
    pub fn new(heuristic: AdHeuristic, strategy: Box<dyn RequestStrategy>) -> Self {
        Self { heuristic, strategy }
    }

    pub fn heuristic(&self) -> &AdHeuristic {
        &self.heuristic
    }

    pub fn capability(&self) -> Capability {
        self.strategy.capability()
    }

    pub fn counts_are_confirmed(&self) -> bool {
        self.strategy.counts_are_confirmed()
    }

    pub fn classify(&self, url: &str) -> Classification {
        let is_ad = self.heuristic.is_ad(url);
        Classification {
            is_ad,
            verdict: self.strategy.verdict(is_ad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AD_URL: &str = "https://ad.doubleclick.net/pixel";
    const PLAIN_URL: &str = "https://example.org/app.js";

    #[test]
    fn test_cancelling_strategy() {
        let observer = RequestObserver::new(AdHeuristic::default(), strategy_for(Capability::Cancel));
        assert_eq!(observer.capability(), Capability::Cancel);
        assert!(observer.counts_are_confirmed());
        assert_eq!(
            observer.classify(AD_URL),
            Classification { is_ad: true, verdict: Verdict::Cancel }
        );
        assert_eq!(
            observer.classify(PLAIN_URL),
            Classification { is_ad: false, verdict: Verdict::Allow }
        );
    }

    #[test]
    fn test_declarative_strategy_never_cancels() {
        let observer = RequestObserver::new(AdHeuristic::default(), strategy_for(Capability::Declarative));
        assert_eq!(observer.capability(), Capability::Declarative);
        assert!(!observer.counts_are_confirmed());

        let classification = observer.classify(AD_URL);
        assert!(classification.is_ad);
        assert_eq!(classification.verdict, Verdict::Allow);
    }
}
