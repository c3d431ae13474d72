//! Events - read-only property bags supplied per arrival

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An incoming event as seen by the evaluator.
///
/// Implementations must not change their properties while an evaluation pass is
/// running; the evaluator never writes to an event.
pub trait EventBean: Send + Sync {
    /// Name of the event type
    fn event_type(&self) -> &str;

    /// Property value, `None` when the event has no such property
    fn get(&self, property: &str) -> Option<Value>;

    fn has_property(&self, property: &str) -> bool {
        self.get(property).is_some()
    }
}

/// Map-backed event, properties kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEvent {
    event_type: String,
    #[serde(default)]
    properties: IndexMap<String, Value>,
}

impl MapEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            properties: IndexMap::new(),
        }
    }

    /// Add a property while building the event
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }
}

impl EventBean for MapEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn get(&self, property: &str) -> Option<Value> {
        self.properties.get(property).cloned()
    }
}
