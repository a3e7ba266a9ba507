use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_DELIVERED: &str = "delivered";
pub const ORDER_TYPE_PHONE_ONLY: &str = "phone_only";
pub const ID_FIELD: &str = "_id";

/// Sentinel callers send when they could not read a phone number.
const UNKNOWN_PHONE: &str = "unknown";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhoneSource {
    ExtractedFromCall,
    ProvidedByCustomer,
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy, everything else
/// (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numeric_field(item: &Value, field: &str) -> Option<f64> {
    item.get(field).and_then(Value::as_f64)
}

/// `price * quantity` of one stored item.
///
/// A field that is absent, null or not a number takes the default (price 0,
/// quantity 1). An explicit numeric 0 is kept as 0, so `quantity: 0` adds
/// nothing; a `|| 1` rule would have counted it as 1.
pub fn item_subtotal(item: &Value) -> f64 {
    numeric_field(item, "price").unwrap_or(0.0) * numeric_field(item, "quantity").unwrap_or(1.0)
}

pub fn item_has_status(item: &Value, status: &str) -> bool {
    item.get("status").and_then(Value::as_str) == Some(status)
}

/// A line item exactly as the caller sent it. No shape is enforced: objects,
/// strings and numbers are all stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LineItem(pub Value);

impl Default for LineItem {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for LineItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl LineItem {
    pub fn priced(price: f64, quantity: f64) -> Self {
        Self(serde_json::json!({ "price": price, "quantity": quantity }))
    }

    /// Sets `status` when the item is an object; other items are left alone.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert("status".into(), Value::String(status.into()));
        }
        self
    }

    pub fn subtotal(&self) -> f64 {
        item_subtotal(&self.0)
    }

    pub fn has_status(&self, status: &str) -> bool {
        item_has_status(&self.0, status)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// An order as this service writes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub phone: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub status: String,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
    pub order_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_phone: Option<Value>,
    pub phone_source: PhoneSource,
}

/// An order together with the identifier the store assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredOrder {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub order: Order,
}

/// An order document as read back from the store. Documents may predate this
/// service or carry fields it never writes, so nothing beyond "a JSON
/// object" is assumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct OrderRecord(pub Map<String, Value>);

impl OrderRecord {
    pub fn from_stored(stored: &StoredOrder) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(stored)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(
                "order did not serialize to an object",
            )),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn phone(&self) -> Option<&str> {
        self.get("phone").and_then(Value::as_str)
    }

    pub fn without_id(mut self) -> Self {
        self.0.remove(ID_FIELD);
        self
    }

    /// Items of the order; a missing or non-array `items` counts as none.
    pub fn items(&self) -> &[Value] {
        match self.get("items") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn total(&self) -> f64 {
        self.items().iter().map(item_subtotal).sum()
    }

    pub fn has_item_status(&self, status: &str) -> bool {
        self.items().iter().any(|it| item_has_status(it, status))
    }
}

impl From<Map<String, Value>> for OrderRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Body accepted by order creation. Every field is optional and untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_phone: Option<Value>,
}

/// Use the supplied phone unless it is falsy or `"unknown"`, in which case a
/// `call_<unix millis>` placeholder is generated. Non-string phones are kept
/// in their JSON text form so lookups by path still match.
pub fn resolve_phone(supplied: Option<&Value>, now: DateTime<Utc>) -> String {
    match supplied {
        Some(Value::String(phone)) if !phone.is_empty() && phone != UNKNOWN_PHONE => {
            phone.clone()
        }
        Some(other) if !other.is_string() && is_truthy(other) => other.to_string(),
        _ => format!("call_{}", now.timestamp_millis()),
    }
}

/// Falsy `items` become an empty list and an array is taken element by
/// element. Any other value is kept as a single item.
fn items_from(value: Option<Value>) -> Vec<LineItem> {
    match value {
        Some(Value::Array(items)) => items.into_iter().map(LineItem).collect(),
        Some(other) if is_truthy(&other) => vec![LineItem(other)],
        _ => Vec::new(),
    }
}

pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    pub fn new(phone: String, items: Vec<LineItem>, created_at: DateTime<Utc>) -> Self {
        Self {
            order: Order {
                phone,
                items,
                status: STATUS_CONFIRMED.to_string(),
                created_at,
                order_type: ORDER_TYPE_PHONE_ONLY.to_string(),
                name: None,
                address: None,
                caller_phone: None,
                phone_source: PhoneSource::ProvidedByCustomer,
            },
        }
    }

    pub fn name(mut self, name: Option<Value>) -> Self {
        self.order.name = truthy(name);
        self
    }

    pub fn address(mut self, address: Option<Value>) -> Self {
        self.order.address = truthy(address);
        self
    }

    pub fn caller_phone(mut self, caller_phone: Option<Value>) -> Self {
        let caller_phone = truthy(caller_phone);
        self.order.phone_source = if caller_phone.is_some() {
            PhoneSource::ExtractedFromCall
        } else {
            PhoneSource::ProvidedByCustomer
        };
        self.order.caller_phone = caller_phone;
        self
    }

    pub fn build(self) -> Order {
        self.order
    }
}

impl Order {
    /// Build a fresh order from a creation request at `now`.
    pub fn from_request(req: NewOrder, now: DateTime<Utc>) -> Self {
        let phone = resolve_phone(req.phone.as_ref(), now);
        OrderBuilder::new(phone, items_from(req.items), now)
            .name(req.name)
            .address(req.address)
            .caller_phone(req.caller_phone)
            .build()
    }
}

fn truthy(value: Option<Value>) -> Option<Value> {
    value.filter(is_truthy)
}
