use async_trait::async_trait;
use push_router::{DeliveryError, DeliveryHandle, PushRouter};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tenant_auth_config::{TenantAuthConfig, TenantAuthEntry};
use tokio::sync::Mutex;

pub(crate) type Received = Arc<Mutex<Vec<Value>>>;

/// Delivery handle that records every payload pushed through it.
pub(crate) struct RecordingHandle {
    received: Received,
}

impl RecordingHandle {
    pub(crate) fn new() -> (Arc<Self>, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        (
            Arc::new(Self {
                received: received.clone(),
            }),
            received,
        )
    }
}

#[async_trait]
impl DeliveryHandle for RecordingHandle {
    async fn broadcast(&self, payload: &Value) -> Result<(), DeliveryError> {
        let mut received = self.received.lock().await;
        received.push(payload.clone());
        Ok(())
    }
}

/// Builds a config from (tenant, authority URL, require_auth) triples.
pub(crate) fn tenant_config(tenants: &[(&str, &str, bool)]) -> Arc<TenantAuthConfig> {
    let entries: HashMap<String, TenantAuthEntry> = tenants
        .iter()
        .map(|(tenant, url, require_auth)| {
            (
                tenant.to_string(),
                TenantAuthEntry {
                    server_url: url.to_string(),
                    require_auth: *require_auth,
                },
            )
        })
        .collect();
    Arc::new(TenantAuthConfig::from_entries(entries))
}

pub(crate) fn make_router(config: Arc<TenantAuthConfig>) -> PushRouter {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    PushRouter::new("test-router", config).expect("router creation should succeed")
}

#[allow(dead_code)]
pub(crate) fn make_router_with_timeout(
    config: Arc<TenantAuthConfig>,
    timeout: Duration,
) -> PushRouter {
    PushRouter::with_authority_timeout("test-router", config, timeout)
        .expect("router creation should succeed")
}
