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

//! The router facade: subscription admission, session lifecycle, and fan-out.

use crate::authorization::{AuthorizationGate, AuthzDenial, DEFAULT_AUTHORITY_TIMEOUT};
use crate::control_plane::connection_registry::ConnectionRegistry;
use crate::observability::events;
use crate::routing::inbound_event::{EventError, InboundEvent};
use crate::routing::subscription_registry::{SubscriptionEntry, SubscriptionRegistry};
use crate::routing::topic_key::{TopicKey, TopicKeyError};
use crate::transport::{ConnectionId, DeliveryHandle, SessionEvents};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tenant_auth_config::TenantAuthConfig;
use thiserror::Error;
use tracing::{debug, error, warn};

const COMPONENT: &str = "push_router";

/// Why a subscription attempt was not registered.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error(transparent)]
    MalformedTopicKey(#[from] TopicKeyError),
    #[error("tenant '{0}' is not present in the client authorization config")]
    UnknownTenant(String),
    #[error(transparent)]
    Denied(#[from] AuthzDenial),
}

/// Topic-scoped publish/subscribe router.
///
/// A `PushRouter` admits subscriptions through the per-tenant authorization
/// gate, tracks at most one live delivery binding per (tenant, recipient),
/// and fans inbound events out to the recipients they name. It owns no
/// sockets; a transport layer drives it through [`SessionEvents`].
///
/// All methods take `&self`; wrap the router in an [`Arc`] and share it
/// across however many transport tasks exist.
pub struct PushRouter {
    name: String,
    auth_config: Arc<TenantAuthConfig>,
    gate: AuthorizationGate,
    subscriptions: SubscriptionRegistry,
    connections: ConnectionRegistry,
}

impl PushRouter {
    /// Creates a router over the given client authorization config, with the
    /// default authority timeout.
    ///
    /// `name` tags this instance's log output; useful when several routers
    /// run in one process.
    pub fn new(name: &str, auth_config: Arc<TenantAuthConfig>) -> Result<Self, reqwest::Error> {
        Self::with_authority_timeout(name, auth_config, DEFAULT_AUTHORITY_TIMEOUT)
    }

    /// Creates a router with an explicit upper bound on each authority
    /// round trip.
    pub fn with_authority_timeout(
        name: &str,
        auth_config: Arc<TenantAuthConfig>,
        authority_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let gate = AuthorizationGate::new(authority_timeout)?;
        debug!(
            event = events::ROUTER_STARTED,
            component = COMPONENT,
            name,
            tenant_count = auth_config.len(),
            "router started"
        );
        Ok(Self {
            name: name.to_string(),
            auth_config,
            gate,
            subscriptions: SubscriptionRegistry::new(),
            connections: ConnectionRegistry::new(),
        })
    }

    /// Admits a subscription for the raw `tenant/recipient/authToken` key.
    ///
    /// The key must parse, the tenant must be configured, and the tenant's
    /// authority must allow the (recipient, token) pair. Only then is the
    /// delivery binding registered; a re-subscription for the same pair
    /// replaces the previous binding.
    pub async fn subscribe(
        &self,
        connection: &ConnectionId,
        handle: Arc<dyn DeliveryHandle>,
        raw_topic: &str,
    ) -> Result<(), SubscribeError> {
        let key = TopicKey::parse(raw_topic).map_err(|err| {
            warn!(
                event = events::SUBSCRIBE_REJECTED,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                err = %err,
                "rejected subscription with malformed topic key"
            );
            err
        })?;

        debug!(
            event = events::SUBSCRIBE_ATTEMPT,
            component = COMPONENT,
            name = %self.name,
            connection = %connection,
            topic = %key,
            "recipient attempting to subscribe"
        );

        let Some(entry) = self.auth_config.entry(&key.tenant) else {
            warn!(
                event = events::SUBSCRIBE_REJECTED,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                tenant = %key.tenant,
                "rejected subscription for unknown tenant"
            );
            return Err(SubscribeError::UnknownTenant(key.tenant));
        };

        if let Err(denial) = self
            .gate
            .authorize(entry, &key.recipient, &key.auth_token)
            .await
        {
            warn!(
                event = events::AUTHZ_DENIED,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                topic = %key,
                err = %denial,
                "authority denied subscription"
            );
            return Err(SubscribeError::Denied(denial));
        }

        self.subscriptions
            .subscribe(
                &key.tenant,
                &key.recipient,
                SubscriptionEntry {
                    handle,
                    connection: connection.clone(),
                },
            )
            .await;
        debug!(
            event = events::SUBSCRIBE_OK,
            component = COMPONENT,
            name = %self.name,
            connection = %connection,
            topic = %key,
            "recipient subscribed"
        );
        Ok(())
    }

    /// Drops the binding named by `raw_topic`, but only when `connection`
    /// still owns it. Unknown or foreign bindings are left untouched.
    pub async fn unsubscribe(&self, connection: &ConnectionId, raw_topic: &str) {
        let key = match TopicKey::parse(raw_topic) {
            Ok(key) => key,
            Err(err) => {
                warn!(
                    event = events::UNSUBSCRIBE_REJECTED,
                    component = COMPONENT,
                    name = %self.name,
                    connection = %connection,
                    err = %err,
                    "ignored unsubscribe with malformed topic key"
                );
                return;
            }
        };

        if self
            .subscriptions
            .remove(&key.tenant, &key.recipient, connection)
            .await
        {
            debug!(
                event = events::UNSUBSCRIBE_OK,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                topic = %key,
                "recipient unsubscribed"
            );
        } else {
            debug!(
                event = events::UNSUBSCRIBE_NOOP,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                topic = %key,
                "no binding owned by this connection; nothing removed"
            );
        }
    }

    /// Records a newly opened transport session.
    pub async fn open(&self, connection: ConnectionId) {
        debug!(
            event = events::CONNECTION_OPEN,
            component = COMPONENT,
            name = %self.name,
            connection = %connection,
            "connection opened"
        );
        self.connections.open(connection).await;
    }

    /// Records a closed transport session and prunes every delivery binding
    /// it owned.
    pub async fn close(&self, connection: &ConnectionId) {
        self.connections.close(connection).await;
        let pruned = self.subscriptions.prune_connection(connection).await;
        debug!(
            event = events::CONNECTION_CLOSE,
            component = COMPONENT,
            name = %self.name,
            connection = %connection,
            "connection closed"
        );
        if pruned > 0 {
            debug!(
                event = events::CONNECTION_PRUNE,
                component = COMPONENT,
                name = %self.name,
                connection = %connection,
                pruned,
                "pruned bindings of closed connection"
            );
        }
    }

    /// Routes one raw inbound event to the recipients it names.
    ///
    /// Fail-soft: a malformed event, an unknown tenant, absent recipients,
    /// and individual delivery failures are all logged and absorbed. Nothing
    /// here ever propagates back to the event source.
    pub async fn route_event(&self, raw: &str) {
        if let Err(err) = self.dispatch(raw).await {
            error!(
                event = events::EVENT_MALFORMED,
                component = COMPONENT,
                name = %self.name,
                err = %err,
                "dropped undecodable inbound event"
            );
        }
    }

    async fn dispatch(&self, raw: &str) -> Result<usize, EventError> {
        let event = InboundEvent::from_json(raw)?;

        if !self.subscriptions.has_tenant(&event.tenant).await {
            debug!(
                event = events::EVENT_NO_SUBSCRIBERS,
                component = COMPONENT,
                name = %self.name,
                tenant = %event.tenant,
                "nobody subscribed under tenant; event not sent"
            );
            return Ok(0);
        }

        let mut delivered = 0;
        for recipient in &event.recipients {
            let Some(entry) = self.subscriptions.lookup(&event.tenant, recipient).await else {
                continue;
            };
            match entry.handle.broadcast(&event.payload).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(
                        event = events::FANOUT_DELIVER_OK,
                        component = COMPONENT,
                        name = %self.name,
                        tenant = %event.tenant,
                        recipient = %recipient,
                        "delivered event to recipient"
                    );
                }
                Err(err) => {
                    warn!(
                        event = events::FANOUT_DELIVER_FAILED,
                        component = COMPONENT,
                        name = %self.name,
                        tenant = %event.tenant,
                        recipient = %recipient,
                        err = %err,
                        "delivery to recipient failed; continuing fan-out"
                    );
                }
            }
        }
        debug!(
            event = events::FANOUT_SUMMARY,
            component = COMPONENT,
            name = %self.name,
            tenant = %event.tenant,
            named = event.recipients.len(),
            delivered,
            "fan-out complete"
        );
        Ok(delivered)
    }
}

#[async_trait]
impl SessionEvents for PushRouter {
    async fn on_open(&self, connection: ConnectionId) {
        self.open(connection).await;
    }

    async fn on_close(&self, connection: &ConnectionId) {
        self.close(connection).await;
    }

    async fn on_subscribe(
        &self,
        connection: &ConnectionId,
        handle: Arc<dyn DeliveryHandle>,
        raw_topic: &str,
    ) -> Result<(), SubscribeError> {
        self.subscribe(connection, handle, raw_topic).await
    }

    async fn on_unsubscribe(&self, connection: &ConnectionId, raw_topic: &str) {
        self.unsubscribe(connection, raw_topic).await;
    }
}
