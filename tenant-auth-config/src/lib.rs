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

//! Static client-authorization configuration.
//!
//! A [`TenantAuthConfig`] maps each tenant to the authorization authority it
//! designates: the authority endpoint URL and whether authorization is
//! enforced at all. The document is loaded once at startup and is immutable
//! afterwards; routing only ever reads it. A missing or unparsable document
//! is a fatal load error, as a router without its tenant list must not serve
//! traffic.
//!
//! The on-disk document mirrors the deployed format:
//!
//! ```json5
//! {
//!     "acme": { "server_url": "http://auth.acme.example/check", "require_auth": 1 },
//!     "globex": { "server_url": "http://auth.globex.example/check", "require_auth": 0 },
//! }
//! ```
//!
//! `require_auth` is carried as `0|1` in the document and surfaced as a
//! `bool` here.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TenantAuthConfigError {
    #[error("client authorization config not found at '{path}': {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse client authorization config at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: json5::Error,
    },
}

fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Unsigned(u64::from(other)),
            &"0 or 1",
        )),
    }
}

/// Per-tenant authorization authority designation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TenantAuthEntry {
    /// Endpoint URL of the tenant's authorization authority.
    pub server_url: String,
    /// When `false`, every subscription for this tenant is allowed without
    /// consulting the authority.
    #[serde(deserialize_with = "bool_from_int")]
    pub require_auth: bool,
}

/// Immutable tenant → authority mapping loaded before serving traffic.
#[derive(Debug, Clone, Default)]
pub struct TenantAuthConfig {
    entries: HashMap<String, TenantAuthEntry>,
}

impl TenantAuthConfig {
    /// Loads the configuration document from `path`.
    ///
    /// The document is parsed with json5, so both plain JSON and the more
    /// forgiving JSON5 syntax (comments, trailing commas) are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TenantAuthConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|source| TenantAuthConfigError::NotFound {
                path: path.display().to_string(),
                source,
            })?;

        let entries: HashMap<String, TenantAuthEntry> =
            json5::from_str(&contents).map_err(|source| TenantAuthConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        debug!(
            tenant_count = entries.len(),
            path = %path.display(),
            "loaded client authorization config"
        );
        Ok(Self { entries })
    }

    /// Builds a configuration directly from entries. Intended for tests and
    /// embedders that source the mapping elsewhere.
    pub fn from_entries(entries: HashMap<String, TenantAuthEntry>) -> Self {
        Self { entries }
    }

    /// Returns the authority designation for `tenant`, if the tenant is known.
    pub fn entry(&self, tenant: &str) -> Option<&TenantAuthEntry> {
        self.entries.get(tenant)
    }

    /// Returns the number of configured tenants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no tenant is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
