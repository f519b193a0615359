//! Hand-written benefit notes per technology.
//!
//! Benefits are optional extra data. A missing or unreadable benefits file
//! simply means no notes.

use std::collections::HashMap;

use serde_json::Value;

/// Benefit notes keyed by node id.
#[derive(Debug, Default)]
pub struct Benefits {
    data: HashMap<String, Value>,
}

impl Benefits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a benefits JSON object. Anything that is not a JSON object is
    /// ignored with a warning.
    pub fn merge_json(&mut self, json: &str) {
        match serde_json::from_str::<HashMap<String, Value>>(json) {
            Ok(entries) => {
                log::debug!("loaded {} benefit notes", entries.len());
                self.data.extend(entries);
            }
            Err(e) => log::warn!("ignoring malformed benefits data: {}", e),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.data.get(id)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
