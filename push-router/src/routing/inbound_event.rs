//! Decoding of raw inbound events.

use serde_json::Value;
use thiserror::Error;

const TENANT_FIELD: &str = "client";
const RECIPIENTS_FIELD: &str = "subscribedUsers";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("event field '{field}' has the wrong shape: expected {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// A decoded inbound event, ready for fan-out.
///
/// Only `client` and `subscribedUsers` are interpreted; `payload` keeps the
/// entire original object, including those routing fields, because that is
/// exactly what each matched subscriber receives.
#[derive(Clone, Debug)]
pub struct InboundEvent {
    pub tenant: String,
    pub recipients: Vec<String>,
    pub payload: Value,
}

impl InboundEvent {
    /// Decodes a raw JSON event.
    ///
    /// `subscribedUsers` must be an array of strings; its order is preserved
    /// and drives delivery order. An empty array is a valid event that will
    /// simply match nobody.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let payload: Value = serde_json::from_str(raw)?;

        let tenant = payload
            .get(TENANT_FIELD)
            .ok_or(EventError::MissingField(TENANT_FIELD))?
            .as_str()
            .ok_or(EventError::WrongShape {
                field: TENANT_FIELD,
                expected: "string",
            })?
            .to_string();

        let raw_recipients = payload
            .get(RECIPIENTS_FIELD)
            .ok_or(EventError::MissingField(RECIPIENTS_FIELD))?
            .as_array()
            .ok_or(EventError::WrongShape {
                field: RECIPIENTS_FIELD,
                expected: "array of strings",
            })?;

        let mut recipients = Vec::with_capacity(raw_recipients.len());
        for recipient in raw_recipients {
            let Some(recipient) = recipient.as_str() else {
                return Err(EventError::WrongShape {
                    field: RECIPIENTS_FIELD,
                    expected: "array of strings",
                });
            };
            recipients.push(recipient.to_string());
        }

        Ok(Self {
            tenant,
            recipients,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EventError, InboundEvent};

    #[test]
    fn decodes_event_and_keeps_whole_payload() {
        let raw = r#"{
            "client": "acme",
            "subscribedUsers": ["42", "99"],
            "category": "order-update",
            "body": { "orderId": 17, "status": "shipped" }
        }"#;

        let event = InboundEvent::from_json(raw).expect("well-formed event should decode");

        assert_eq!(event.tenant, "acme");
        assert_eq!(event.recipients, vec!["42", "99"]);
        assert_eq!(event.payload["client"], "acme");
        assert_eq!(event.payload["body"]["status"], "shipped");
    }

    #[test]
    fn recipient_order_is_preserved() {
        let raw = r#"{ "client": "acme", "subscribedUsers": ["c", "a", "b"] }"#;

        let event = InboundEvent::from_json(raw).expect("event should decode");

        assert_eq!(event.recipients, vec!["c", "a", "b"]);
    }

    #[test]
    fn empty_recipient_list_is_valid() {
        let raw = r#"{ "client": "acme", "subscribedUsers": [] }"#;

        let event = InboundEvent::from_json(raw).expect("event should decode");

        assert!(event.recipients.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        let err = InboundEvent::from_json("{not json").expect_err("invalid JSON must not decode");

        assert!(matches!(err, EventError::Json(_)));
    }

    #[test]
    fn rejects_missing_tenant_field() {
        let err = InboundEvent::from_json(r#"{ "subscribedUsers": ["42"] }"#)
            .expect_err("event without client must not decode");

        assert!(matches!(err, EventError::MissingField("client")));
    }

    #[test]
    fn rejects_missing_recipient_list() {
        let err = InboundEvent::from_json(r#"{ "client": "acme" }"#)
            .expect_err("event without subscribedUsers must not decode");

        assert!(matches!(err, EventError::MissingField("subscribedUsers")));
    }

    #[test]
    fn rejects_non_string_recipients() {
        let err = InboundEvent::from_json(r#"{ "client": "acme", "subscribedUsers": [42] }"#)
            .expect_err("numeric recipients must not decode");

        assert!(matches!(
            err,
            EventError::WrongShape {
                field: "subscribedUsers",
                ..
            }
        ));
    }
}
