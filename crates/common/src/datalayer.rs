//! In-memory stand-in for the host page's `dataLayer` array
//!
//! Append-only: a push never touches earlier entries and the new entry is
//! always last. Reads are "last entry" or "most recent entry named X".

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::event::{AnalyticsEvent, EventName};
use crate::observer::{UiEvent, UiEventBus};

#[derive(Debug, Default)]
pub struct DataLayer {
    entries: Vec<Value>,
    bus: Option<UiEventBus>,
}

impl DataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify `bus` on every push
    pub fn with_observers(mut self, bus: UiEventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn push(&mut self, event: &AnalyticsEvent) -> Result<usize> {
        Ok(self.push_value(event.to_value()?))
    }

    /// Append a raw record; returns its index
    pub fn push_value(&mut self, entry: Value) -> usize {
        let index = self.entries.len();
        debug!(index, event = ?entry.get("event"), "Pushing data layer entry");
        if let Some(bus) = &self.bus {
            bus.notify(&UiEvent::DataLayerPush {
                index,
                event: entry.clone(),
            });
        }
        self.entries.push(entry);
        index
    }

    pub fn last(&self) -> Option<&Value> {
        self.entries.last()
    }

    /// Most recent entry whose `event` is `name`
    pub fn latest(&self, name: EventName) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.get("event").and_then(Value::as_str) == Some(name.as_str()))
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, as a fresh page load would
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_event_factory;
    use crate::observer::RecordingObserver;
    use crate::product::create_product;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_push_appends() {
        let mut layer = DataLayer::new();
        layer.push_value(json!({"gtm.start": 1}));
        let factory = create_event_factory();
        let mouse = create_product().as_mouse().build().unwrap();

        let index = layer.push(&factory.create_add_to_cart_event(&mouse)).unwrap();

        assert_eq!(index, 1);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.entries()[0], json!({"gtm.start": 1}));
        assert_eq!(layer.last().unwrap()["event"], json!("add_to_cart"));
    }

    #[test]
    fn test_latest_by_name() {
        let mut layer = DataLayer::new();
        let factory = create_event_factory();
        let mouse = create_product().as_mouse().build().unwrap();
        let webcam = create_product().as_webcam().build().unwrap();

        layer.push(&factory.create_view_item_event(&mouse)).unwrap();
        layer.push(&factory.create_view_item_event(&webcam)).unwrap();
        layer.push(&factory.create_add_to_cart_event(&mouse)).unwrap();

        let latest = layer.latest(EventName::ViewItem).unwrap();
        assert_eq!(latest["ecommerce"]["items"][0]["item_id"], json!("PROD-005"));
        assert!(layer.latest(EventName::Purchase).is_none());
    }

    #[test]
    fn test_observers_see_pushes() {
        let recorder = Arc::new(RecordingObserver::new());
        let mut layer =
            DataLayer::new().with_observers(UiEventBus::new().add_observer(recorder.clone()));

        layer.push_value(json!({"event": "view_item"}));
        layer.clear();
        assert!(layer.is_empty());

        let seen = recorder.events();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], UiEvent::DataLayerPush { index: 0, .. }));
    }
}
