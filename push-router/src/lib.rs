/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! # push-router
//!
//! A topic-scoped publish/subscribe router for targeted push delivery.
//!
//! Transports hand the router raw `tenant/recipient/authToken` topic keys.
//! Each subscription is admitted through the tenant's HTTP authorization
//! authority (or waved through when the tenant disables enforcement), then
//! recorded as the single live delivery binding for that (tenant, recipient)
//! pair. Inbound events name their tenant and an ordered recipient list; the
//! router pushes the whole event object to every named recipient that is
//! currently bound, skipping the rest silently.
//!
//! The router is deliberately transport-agnostic. It owns no sockets and
//! frames no messages; it only sees [`SessionEvents`] raised by a transport
//! layer and pushes payloads back out through [`DeliveryHandle`]s.
//!
//! ## Layers
//!
//! * `routing`: topic-key parsing, the subscription registry, event decoding
//! * `authorization`: the fail-closed HTTP gate in front of the registry
//! * `control_plane`: open-session bookkeeping
//! * `router`: the [`PushRouter`] facade tying the layers together
//!
//! Tenant configuration comes from the sibling `tenant-auth-config` crate.
//!
//! ## Usage
//!
//! ```
//! use async_trait::async_trait;
//! use push_router::{ConnectionId, DeliveryError, DeliveryHandle, PushRouter};
//! use serde_json::Value;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use tenant_auth_config::{TenantAuthConfig, TenantAuthEntry};
//!
//! struct PrintHandle;
//!
//! #[async_trait]
//! impl DeliveryHandle for PrintHandle {
//!     async fn broadcast(&self, payload: &Value) -> Result<(), DeliveryError> {
//!         println!("{payload}");
//!         Ok(())
//!     }
//! }
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let entries = HashMap::from([(
//!         "acme".to_string(),
//!         TenantAuthEntry {
//!             server_url: "http://127.0.0.1:8787/auth".to_string(),
//!             require_auth: false,
//!         },
//!     )]);
//!     let config = Arc::new(TenantAuthConfig::from_entries(entries));
//!     let router = PushRouter::new("example", config).unwrap();
//!
//!     let conn = ConnectionId::new("conn-1");
//!     router.open(conn.clone()).await;
//!     router
//!         .subscribe(&conn, Arc::new(PrintHandle), "acme/42/token")
//!         .await
//!         .unwrap();
//!     router
//!         .route_event(r#"{ "client": "acme", "subscribedUsers": ["42"], "body": "hi" }"#)
//!         .await;
//!     router.close(&conn).await;
//! });
//! ```

mod authorization;
mod control_plane;
mod observability;
mod router;
mod routing;
mod transport;

pub use authorization::{AuthzDenial, DEFAULT_AUTHORITY_TIMEOUT};
pub use router::{PushRouter, SubscribeError};
pub use routing::inbound_event::{EventError, InboundEvent};
pub use routing::topic_key::{TopicKey, TopicKeyError};
pub use transport::{ConnectionId, DeliveryError, DeliveryHandle, SessionEvents};
