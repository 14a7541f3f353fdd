//! HTTP authorization gate consulted before a subscription is registered.

use crate::observability::events;
use reqwest::StatusCode;
use std::time::Duration;
use tenant_auth_config::TenantAuthEntry;
use thiserror::Error;
use tracing::debug;

const COMPONENT: &str = "authorization_gate";

/// Default upper bound on one authority round trip.
pub const DEFAULT_AUTHORITY_TIMEOUT: Duration = Duration::from_secs(5);

const USER_ID_PARAM: &str = "userId";
const AUTH_KEY_PARAM: &str = "authKey";

/// Why a subscription attempt was denied.
///
/// Every variant is a denial. The gate fails closed: when the authority
/// cannot be reached or answers in an unexpected way, the subscription is
/// rejected rather than provisionally allowed.
#[derive(Debug, Error)]
pub enum AuthzDenial {
    /// The authority answered 403.
    #[error("authority denied the subscription")]
    NotAuthorized,
    /// The authority answered 404; the endpoint is absent or misconfigured.
    #[error("authority endpoint '{url}' not found")]
    AuthorityUnreachable { url: String },
    /// The authority answered with a status outside the understood set.
    #[error("authority returned unexpected status {status}")]
    UnexpectedAuthorityResponse { status: u16 },
    /// The request never produced an HTTP response (connect failure, timeout).
    #[error("authority call failed: {source}")]
    AuthorityCallFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Stateless client for tenant authorization authorities.
///
/// One gate serves every tenant; the per-tenant endpoint and enforcement
/// switch come from the [`TenantAuthEntry`] passed to each call.
pub(crate) struct AuthorizationGate {
    client: reqwest::Client,
}

impl AuthorizationGate {
    pub(crate) fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Checks `recipient`/`auth_token` against the tenant's authority.
    ///
    /// Only the HTTP status code is interpreted; the response body is
    /// ignored. `Ok(())` means the subscription may proceed.
    pub(crate) async fn authorize(
        &self,
        entry: &TenantAuthEntry,
        recipient: &str,
        auth_token: &str,
    ) -> Result<(), AuthzDenial> {
        if !entry.require_auth {
            debug!(
                event = events::AUTHZ_SKIPPED,
                component = COMPONENT,
                recipient,
                "authorization not required for tenant, allowed without authority call"
            );
            return Ok(());
        }

        debug!(
            event = events::AUTHZ_ATTEMPT,
            component = COMPONENT,
            recipient,
            url = %entry.server_url,
            "consulting tenant authority"
        );
        let response = self
            .client
            .get(&entry.server_url)
            .query(&[(USER_ID_PARAM, recipient), (AUTH_KEY_PARAM, auth_token)])
            .send()
            .await
            .map_err(|source| AuthzDenial::AuthorityCallFailed { source })?;

        match response.status() {
            StatusCode::OK => {
                debug!(
                    event = events::AUTHZ_OK,
                    component = COMPONENT,
                    recipient,
                    "authority allowed subscription"
                );
                Ok(())
            }
            StatusCode::FORBIDDEN => Err(AuthzDenial::NotAuthorized),
            StatusCode::NOT_FOUND => Err(AuthzDenial::AuthorityUnreachable {
                url: entry.server_url.clone(),
            }),
            other => Err(AuthzDenial::UnexpectedAuthorityResponse {
                status: other.as_u16(),
            }),
        }
    }
}
