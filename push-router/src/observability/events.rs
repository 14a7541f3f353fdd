//! Canonical structured event names used across `push-router`.

// Subscription lifecycle events.
pub const SUBSCRIBE_ATTEMPT: &str = "subscribe_attempt";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const SUBSCRIBE_REJECTED: &str = "subscribe_rejected";
pub const UNSUBSCRIBE_OK: &str = "unsubscribe_ok";
pub const UNSUBSCRIBE_NOOP: &str = "unsubscribe_noop";
pub const UNSUBSCRIBE_REJECTED: &str = "unsubscribe_rejected";

// Authorization gate events.
pub const AUTHZ_ATTEMPT: &str = "authz_attempt";
pub const AUTHZ_SKIPPED: &str = "authz_skipped";
pub const AUTHZ_OK: &str = "authz_ok";
pub const AUTHZ_DENIED: &str = "authz_denied";

// Inbound event and fan-out events.
pub const EVENT_MALFORMED: &str = "event_malformed";
pub const EVENT_NO_SUBSCRIBERS: &str = "event_no_subscribers";
pub const FANOUT_DELIVER_OK: &str = "fanout_deliver_ok";
pub const FANOUT_DELIVER_FAILED: &str = "fanout_deliver_failed";
pub const FANOUT_SUMMARY: &str = "fanout_summary";

// Connection lifecycle events.
pub const CONNECTION_OPEN: &str = "connection_open";
pub const CONNECTION_CLOSE: &str = "connection_close";
pub const CONNECTION_PRUNE: &str = "connection_prune";

// Router lifecycle events.
pub const ROUTER_STARTED: &str = "router_started";
