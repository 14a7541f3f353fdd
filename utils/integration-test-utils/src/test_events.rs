//! Builders for raw inbound event JSON.

use serde_json::{json, Map, Value};

/// Builds a minimal raw event naming `tenant` and `recipients`.
pub fn event(tenant: &str, recipients: &[&str]) -> String {
    json!({
        "client": tenant,
        "subscribedUsers": recipients,
    })
    .to_string()
}

/// Builds a raw event carrying additional top-level fields next to the
/// routing ones, as real publishers do.
pub fn event_with_extras(tenant: &str, recipients: &[&str], extras: &[(&str, Value)]) -> String {
    let mut object = Map::new();
    object.insert("client".to_string(), json!(tenant));
    object.insert("subscribedUsers".to_string(), json!(recipients));
    for (field, value) in extras {
        object.insert((*field).to_string(), value.clone());
    }
    Value::Object(object).to_string()
}
