//! TabTally Core Library
//!
//! Per-tab blocked request counting for an ad-blocking browser extension.
//! The host (the wasm binding in the extension, or the CLI replay tool)
//! forwards browser callbacks to a [`Background`], which keeps a count per
//! tab and renders it onto the toolbar badge and the popup.
//!
//! # Modules
//!
//! - `types`: Tab ids, resource types, capabilities and verdicts
//! - `heuristic`: Substring-based ad URL predicate
//! - `store`: Per-tab counter map
//! - `badge`: Badge text/color rendering
//! - `observer`: Request classification and capability strategies
//! - `messages`: Popup push/pull message protocol
//! - `events`: Inbound host events
//! - `host`: Outbound host interface
//! - `config`: Startup configuration
//! - `background`: Event handling tying it all together

pub mod types;
pub mod heuristic;
pub mod store;
pub mod badge;
pub mod observer;
pub mod messages;
pub mod events;
pub mod host;
pub mod config;
pub mod background;

// Re-export commonly used types
pub use background::Background;
pub use config::{Config, ConfigError};
pub use events::{DispatchOutcome, HostEvent, RequestDetails};
pub use heuristic::AdHeuristic;
pub use host::{Host, HostCall, HostError, RecordingHost};
pub use messages::{CountReply, InboundMessage, MessageError, OutboundMessage};
pub use store::CounterStore;
pub use types::{BadgeColor, Capability, RequestType, TabId, Verdict};
