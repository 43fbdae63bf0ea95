//! UI event observers
//!
//! Scenario code reports what it does (navigation, form input, data-layer
//! pushes) to a [`UiEventBus`]; observers attached to the bus log or record
//! those events.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Something that happened while driving the storefront
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiEvent {
    Navigation { url: String },
    FormFill { field: String, value: String },
    LoginAttempt { username: String },
    Error { message: String },
    DataLayerPush { index: usize, event: Value },
}

pub trait UiObserver: Send + Sync {
    fn update(&self, event: &UiEvent);
}

/// Fan-out of [`UiEvent`]s to registered observers
#[derive(Clone, Default)]
pub struct UiEventBus {
    observers: Vec<Arc<dyn UiObserver>>,
}

impl std::fmt::Debug for UiEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiEventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl UiEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with a [`TracingObserver`] attached
    pub fn complete() -> Self {
        Self::new().add_observer(Arc::new(TracingObserver))
    }

    pub fn add_observer(mut self, observer: Arc<dyn UiObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn remove_observer(mut self, observer: &Arc<dyn UiObserver>) -> Self {
        self.observers.retain(|o| !Arc::ptr_eq(o, observer));
        self
    }

    pub fn notify(&self, event: &UiEvent) {
        for observer in &self.observers {
            observer.update(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// Logs every event through `tracing`
#[derive(Debug, Default)]
pub struct TracingObserver;

impl UiObserver for TracingObserver {
    fn update(&self, event: &UiEvent) {
        match event {
            UiEvent::Navigation { url } => info!(%url, "Navigating"),
            UiEvent::FormFill { field, value } => info!(%field, %value, "Filling field"),
            UiEvent::LoginAttempt { username } => info!(%username, "Login attempt"),
            UiEvent::Error { message } => warn!(%message, "Error detected"),
            UiEvent::DataLayerPush { index, event } => {
                let name = event.get("event").and_then(Value::as_str).unwrap_or("<unnamed>");
                info!(index, event = name, "Data layer push");
            }
        }
    }
}

/// Keeps every event it sees
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }
}

impl UiObserver for RecordingObserver {
    fn update(&self, event: &UiEvent) {
        self.events.lock().push(event.clone());
    }
}
