use std::sync::Mutex;

use notes2md_logging::notes_info;

use crate::ProgressEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Renders progress as log lines: a banner per stage and `[i/n] name` per item.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage, total } => match total {
                Some(total) => notes_info!("{} ({} item(s))...", capitalize(&stage.to_string()), total),
                None => notes_info!("{}...", capitalize(&stage.to_string())),
            },
            ProgressEvent::ItemDone {
                index, total, name, ..
            } => notes_info!("  [{}/{}] {}", index, total, name),
            ProgressEvent::StageFinished { .. } => notes_info!("Success"),
        }
    }
}

/// Discards everything; used when the run is silenced.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
