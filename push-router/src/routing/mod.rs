//! Routing layer: topic keys, the subscription registry, and inbound events.
//!
//! Everything in here is pure bookkeeping and decoding. Authorization and
//! fan-out policy live above, in the router itself.

pub mod inbound_event;
pub(crate) mod subscription_registry;
pub mod topic_key;
