use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reservations are written by other systems; this service only reads them
/// back as they are stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Reservation(pub Map<String, Value>);

impl Reservation {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Map<String, Value>> for Reservation {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
