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

//! Transport seam: the traits the router exposes to its transport layer.
//!
//! The router never opens sockets or frames messages itself. The transport
//! layer drives the router through [`SessionEvents`] and hands it opaque
//! [`DeliveryHandle`]s to push payloads back out. Everything below these two
//! traits is an external collaborator.

use crate::router::SubscribeError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure pushing a payload through a delivery handle.
///
/// Carried as an opaque reason string because the router must not depend on
/// any concrete transport's error type.
#[derive(Debug, Error)]
#[error("delivery failed: {reason}")]
pub struct DeliveryError {
    reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Opaque identity of one transport session.
///
/// Subscriptions are keyed by (tenant, recipient), not by connection; the
/// connection id only ties a subscription entry to the session that created
/// it so the entry can be pruned when that session closes.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Push-side of one transport session.
///
/// A handle stays bound to the session that produced it; the router treats it
/// as write-only and never inspects what is behind it.
#[async_trait]
pub trait DeliveryHandle: Send + Sync {
    /// Pushes `payload` to every peer attached to this handle.
    async fn broadcast(&self, payload: &Value) -> Result<(), DeliveryError>;
}

/// The closed set of session events a transport layer raises against the core.
///
/// One method per event kind; transports call these and own whatever wire
/// protocol sits above them. Only `on_subscribe` surfaces a typed rejection.
/// Transports are free to ignore it, as every outcome is also logged.
#[async_trait]
pub trait SessionEvents: Send + Sync {
    /// A new transport session was opened.
    async fn on_open(&self, connection: ConnectionId);

    /// A transport session closed; its subscriptions are pruned.
    async fn on_close(&self, connection: &ConnectionId);

    /// A session asks to subscribe with a raw `tenant/recipient/authToken`
    /// topic key.
    async fn on_subscribe(
        &self,
        connection: &ConnectionId,
        handle: Arc<dyn DeliveryHandle>,
        raw_topic: &str,
    ) -> Result<(), SubscribeError>;

    /// A session asks to drop one of its own subscriptions.
    async fn on_unsubscribe(&self, connection: &ConnectionId, raw_topic: &str);
}
