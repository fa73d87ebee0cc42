use std::fs;
use std::path::Path;

use tt_core::{Background, Config, DispatchOutcome, HostCall, HostEvent, RecordingHost, Verdict};

pub fn run_replay(trace: &Path, config: &Config) -> Result<(), String> {
    let text = fs::read_to_string(trace)
        .map_err(|e| format!("Failed to read '{}': {}", trace.display(), e))?;
    let events: Vec<HostEvent> = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid trace '{}': {}", trace.display(), e))?;

    let mut background = Background::new(config);
    let mut host = RecordingHost::new();

    println!("Replaying {} events (capability: {})", events.len(), background.capability());
    if !background.counts_are_confirmed() {
        println!("  note: declarative mode, counts are heuristic estimates");
    }
    println!();

    for (i, event) in events.iter().enumerate() {
        let outcome = background.dispatch(&mut host, event);
        println!("#{:<4} {}{}", i + 1, describe_event(event), describe_outcome(&outcome)?);
        for call in host.take_calls() {
            println!("        {}", describe_call(&call)?);
        }
    }

    println!();
    println!("Counts:");
    let entries = background.store().entries();
    if entries.is_empty() {
        println!("  (none)");
    }
    for (tab_id, count) in entries {
        println!("  tab {:<6} {}", tab_id, count);
    }

    Ok(())
}

fn describe_event(event: &HostEvent) -> String {
    match event {
        HostEvent::RequestObserved(request) => format!("request tab={} {}", request.tab_id, request.url),
        HostEvent::TabUpdated { tab_id, url: Some(url) } => format!("updated tab={} url={}", tab_id, url),
        HostEvent::TabUpdated { tab_id, url: None } => format!("updated tab={}", tab_id),
        HostEvent::TabRemoved { tab_id } => format!("removed tab={}", tab_id),
        HostEvent::TabActivated { tab_id } => format!("activated tab={}", tab_id),
        HostEvent::MessageReceived { message, .. } => format!("message {}", message),
    }
}

fn describe_outcome(outcome: &DispatchOutcome) -> Result<String, String> {
    Ok(match outcome {
        DispatchOutcome::Request(Verdict::Cancel) => " -> cancel".to_string(),
        DispatchOutcome::Request(Verdict::Allow) => " -> allow".to_string(),
        DispatchOutcome::Reply(reply) => {
            let value = reply.to_value().map_err(|e| e.to_string())?;
            format!(" -> reply {}", value)
        }
        DispatchOutcome::Done => String::new(),
    })
}

fn describe_call(call: &HostCall) -> Result<String, String> {
    Ok(match call {
        HostCall::BadgeText { tab_id, text } => format!("badge tab={} text={:?}", tab_id, text),
        HostCall::BadgeColor { tab_id, color } => format!("badge tab={} color={:?}", tab_id, color.0),
        HostCall::Message(message) => {
            let value = message.to_value().map_err(|e| e.to_string())?;
            format!("broadcast {}", value)
        }
    })
}
