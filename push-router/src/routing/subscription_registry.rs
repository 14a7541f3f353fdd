//! Tenant-scoped registry of live delivery bindings.

use crate::transport::{ConnectionId, DeliveryHandle};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One live binding: where to push payloads for a recipient and which
/// transport session owns the binding.
#[derive(Clone)]
pub(crate) struct SubscriptionEntry {
    pub(crate) handle: Arc<dyn DeliveryHandle>,
    pub(crate) connection: ConnectionId,
}

/// Two-level map of tenant to recipient to [`SubscriptionEntry`].
///
/// At most one entry exists per (tenant, recipient); a re-subscription for
/// the same pair replaces the previous binding. Empty tenant buckets are
/// dropped eagerly so that an absent bucket always means no subscriber.
pub(crate) struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<String, HashMap<String, SubscriptionEntry>>>,
}

impl SubscriptionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// Binds `recipient` under `tenant`, replacing any previous binding for
    /// the same pair. Last subscriber wins.
    pub(crate) async fn subscribe(&self, tenant: &str, recipient: &str, entry: SubscriptionEntry) {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions
            .entry(tenant.to_string())
            .or_default()
            .insert(recipient.to_string(), entry);
    }

    /// Returns the current binding for (tenant, recipient), if any.
    pub(crate) async fn lookup(&self, tenant: &str, recipient: &str) -> Option<SubscriptionEntry> {
        let subscriptions = self.subscriptions.read().await;
        subscriptions
            .get(tenant)
            .and_then(|recipients| recipients.get(recipient))
            .cloned()
    }

    /// Removes the binding for (tenant, recipient) only when `connection`
    /// still owns it. Returns `true` when an entry was removed.
    pub(crate) async fn remove(
        &self,
        tenant: &str,
        recipient: &str,
        connection: &ConnectionId,
    ) -> bool {
        let mut subscriptions = self.subscriptions.write().await;
        let Some(recipients) = subscriptions.get_mut(tenant) else {
            return false;
        };

        let owned = recipients
            .get(recipient)
            .is_some_and(|entry| entry.connection == *connection);
        if owned {
            recipients.remove(recipient);
            if recipients.is_empty() {
                subscriptions.remove(tenant);
            }
        }
        owned
    }

    /// Drops every binding owned by `connection`, across all tenants.
    /// Returns the number of bindings removed.
    pub(crate) async fn prune_connection(&self, connection: &ConnectionId) -> usize {
        let mut subscriptions = self.subscriptions.write().await;
        let mut removed = 0;
        subscriptions.retain(|_, recipients| {
            recipients.retain(|_, entry| {
                let owned = entry.connection == *connection;
                if owned {
                    removed += 1;
                }
                !owned
            });
            !recipients.is_empty()
        });
        removed
    }

    /// Returns `true` when at least one recipient is bound under `tenant`.
    pub(crate) async fn has_tenant(&self, tenant: &str) -> bool {
        let subscriptions = self.subscriptions.read().await;
        subscriptions.contains_key(tenant)
    }

    #[cfg(test)]
    pub(crate) async fn subscriber_count(&self, tenant: &str) -> usize {
        let subscriptions = self.subscriptions.read().await;
        subscriptions
            .get(tenant)
            .map_or(0, |recipients| recipients.len())
    }
}
