//! WebAssembly bindings for TabTally
//!
//! The extension's background script constructs one `Background` and
//! forwards browser callbacks to it. Outbound calls go to a plain JS host
//! object supplied at construction:
//!
//! ```js
//! const bg = new Background({
//!   setBadgeText: (tabId, text) => chrome.action.setBadgeText({ tabId, text }).catch(() => {}),
//!   setBadgeBackgroundColor: (tabId, color) =>
//!     chrome.action.setBadgeBackgroundColor({ tabId, color }).catch(() => {}),
//!   sendMessage: (message) =>
//!     chrome.runtime.sendMessage(message)
//!       .then((reply) => reply && bg.onMessage(reply))
//!       .catch(() => {}),
//! }, configJson);
//! ```
//!
//! The popup's reply to a broadcast (`{status: "received"}`) is fed back
//! through `onMessage`, which logs the acknowledgement.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use tt_core::{
    BadgeColor, Config, Host, HostError, InboundMessage, OutboundMessage, RequestDetails, TabId, Verdict,
};

mod console;

pub use console::{parse_level, ConsoleLogger};

#[wasm_bindgen(start)]
pub fn start() {
    console::install(log::LevelFilter::Info);
}

/// Change the console log level ("off", "error", "warn", "info", "debug", "trace").
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

// =============================================================================
// Host adapter
// =============================================================================

struct JsHost {
    target: JsValue,
}

impl JsHost {
    fn call(&self, method: &str, args: &js_sys::Array) -> Result<(), HostError> {
        let value = js_sys::Reflect::get(&self.target, &JsValue::from_str(method))
            .map_err(|e| HostError::Call(describe(&e)))?;
        let func: js_sys::Function = value
            .dyn_into()
            .map_err(|_| HostError::Call(format!("host.{} is not a function", method)))?;
        func.apply(&self.target, args)
            .map(|_| ())
            .map_err(|e| HostError::Call(describe(&e)))
    }
}

impl Host for JsHost {
    fn set_badge_text(&mut self, tab_id: TabId, text: &str) -> Result<(), HostError> {
        let args = js_sys::Array::of2(&JsValue::from(tab_id.0), &JsValue::from_str(text));
        self.call("setBadgeText", &args)
    }

    fn set_badge_background_color(&mut self, tab_id: TabId, color: BadgeColor) -> Result<(), HostError> {
        let rgba = js_sys::Array::new();
        for channel in color.0 {
            rgba.push(&JsValue::from(channel));
        }
        let args = js_sys::Array::of2(&JsValue::from(tab_id.0), &rgba);
        self.call("setBadgeBackgroundColor", &args)
    }

    fn send_message(&mut self, message: &OutboundMessage) -> Result<(), HostError> {
        let value = message.to_value().map_err(|e| HostError::Call(e.to_string()))?;
        let js = json_to_js(&value).map_err(|e| HostError::Call(describe(&e)))?;
        self.call("sendMessage", &js_sys::Array::of1(&js))
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn json_to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

fn js_to_json(value: &JsValue) -> Result<serde_json::Value, String> {
    let text: String = js_sys::JSON::stringify(value)
        .map_err(|e| describe(&e))?
        .into();
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

// =============================================================================
// Background
// =============================================================================

#[wasm_bindgen(js_name = Background)]
pub struct WasmBackground {
    inner: tt_core::Background,
    host: JsHost,
}

#[wasm_bindgen(js_class = Background)]
impl WasmBackground {
    /// Create the background state. `config_json` uses the `Config` JSON
    /// form; omitted fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, config_json: Option<String>) -> Result<WasmBackground, JsValue> {
        if !host.is_object() {
            return Err(JsValue::from_str("host must be an object"));
        }
        let config = match config_json.as_deref() {
            Some(text) if !text.trim().is_empty() => Config::from_json(text)
                .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?,
            _ => Config::default(),
        };
        log::info!(
            "background started: capability={} patterns={}",
            config.capability,
            config.ad_patterns.len()
        );

        Ok(Self {
            inner: tt_core::Background::new(&config),
            host: JsHost { target: host },
        })
    }

    /// Handle an observed request. Returns `{cancel: true}` when the request
    /// should be cancelled, `undefined` otherwise.
    #[wasm_bindgen(js_name = onBeforeRequest)]
    pub fn on_before_request(&mut self, url: &str, tab_id: i32, request_type: Option<String>) -> JsValue {
        let request = RequestDetails {
            url: url.to_string(),
            tab_id: TabId(tab_id),
            request_type,
        };
        match self.inner.on_request(&mut self.host, &request) {
            Verdict::Cancel => {
                let result = js_sys::Object::new();
                let _ = js_sys::Reflect::set(&result, &"cancel".into(), &JsValue::TRUE);
                result.into()
            }
            Verdict::Allow => JsValue::UNDEFINED,
        }
    }

    /// `url` is the `changeInfo.url` of the update, if any.
    #[wasm_bindgen(js_name = onTabUpdated)]
    pub fn on_tab_updated(&mut self, tab_id: i32, url: Option<String>) {
        self.inner.on_tab_updated(&mut self.host, TabId(tab_id), url.as_deref());
    }

    #[wasm_bindgen(js_name = onTabRemoved)]
    pub fn on_tab_removed(&mut self, tab_id: i32) {
        self.inner.on_tab_removed(TabId(tab_id));
    }

    #[wasm_bindgen(js_name = onTabActivated)]
    pub fn on_tab_activated(&mut self, tab_id: i32) {
        self.inner.on_tab_activated(&mut self.host, TabId(tab_id));
    }

    /// Handle a runtime message. Returns the reply object for count queries,
    /// `undefined` for anything else.
    #[wasm_bindgen(js_name = onMessage)]
    pub fn on_message(&mut self, message: JsValue, sender_tab_id: Option<i32>) -> JsValue {
        let parsed = match js_to_json(&message) {
            Ok(value) => InboundMessage::from_value(value).map_err(|e| e.to_string()),
            Err(e) => Err(e),
        };
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("ignoring message: {}", e);
                return JsValue::UNDEFINED;
            }
        };

        let reply = match self.inner.on_message(&parsed, sender_tab_id.map(TabId)) {
            Some(reply) => reply,
            None => return JsValue::UNDEFINED,
        };
        match reply.to_value().map_err(|e| JsValue::from_str(&e.to_string())).and_then(|v| json_to_js(&v)) {
            Ok(js) => js,
            Err(e) => {
                log::warn!("failed to build reply: {}", describe(&e));
                JsValue::UNDEFINED
            }
        }
    }

    pub fn count(&self, tab_id: i32) -> u32 {
        self.inner.count(TabId(tab_id))
    }

    #[wasm_bindgen(getter)]
    pub fn capability(&self) -> String {
        self.inner.capability().to_string()
    }

    /// False in declarative mode, where counts are heuristic guesses.
    #[wasm_bindgen(getter, js_name = countsAreConfirmed)]
    pub fn counts_are_confirmed(&self) -> bool {
        self.inner.counts_are_confirmed()
    }

    #[wasm_bindgen(js_name = isAd)]
    pub fn is_ad(&self, url: &str) -> bool {
        self.inner.observer().heuristic().is_ad(url)
    }
}
