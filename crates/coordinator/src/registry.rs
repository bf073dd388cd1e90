//! Label to handler mapping.

use alchemy_common::{ContentHandler, IntentLabel};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handlers keyed by the label they serve. Built once, then shared read-only.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<IntentLabel, Arc<dyn ContentHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, label: IntentLabel, handler: Arc<dyn ContentHandler>) -> Self {
        self.register(label, handler);
        self
    }

    /// Register `handler` for `label`, replacing any previous one.
    pub fn register(&mut self, label: IntentLabel, handler: Arc<dyn ContentHandler>) {
        self.handlers.insert(label, handler);
    }

    pub fn get(&self, label: IntentLabel) -> Option<&Arc<dyn ContentHandler>> {
        self.handlers.get(&label)
    }

    pub fn contains(&self, label: IntentLabel) -> bool {
        self.handlers.contains_key(&label)
    }

    pub fn labels(&self) -> Vec<IntentLabel> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl FromIterator<(IntentLabel, Arc<dyn ContentHandler>)> for HandlerRegistry {
    fn from_iter<I: IntoIterator<Item = (IntentLabel, Arc<dyn ContentHandler>)>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(label, h)| (label, h.id())))
            .finish()
    }
}
