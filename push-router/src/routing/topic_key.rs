//! Parser for raw subscription topic keys.

use std::fmt;
use thiserror::Error;

const SEGMENT_SEPARATOR: char = '/';
const SEGMENT_COUNT: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicKeyError {
    #[error("malformed topic key '{raw}': expected exactly tenant/recipient/authToken")]
    Malformed { raw: String },
}

/// A validated `tenant/recipient/authToken` topic key.
///
/// All three segments are opaque to the router; the auth token in particular
/// is relayed to the tenant's authority verbatim and never interpreted here.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TopicKey {
    pub tenant: String,
    pub recipient: String,
    pub auth_token: String,
}

impl TopicKey {
    /// Parses a raw topic key.
    ///
    /// Exactly three `/`-separated segments are required and none may be
    /// empty; anything else is rejected without a fallback interpretation.
    pub fn parse(raw: &str) -> Result<Self, TopicKeyError> {
        let segments: Vec<&str> = raw.split(SEGMENT_SEPARATOR).collect();
        if segments.len() != SEGMENT_COUNT || segments.iter().any(|segment| segment.is_empty()) {
            return Err(TopicKeyError::Malformed {
                raw: raw.to_string(),
            });
        }

        Ok(Self {
            tenant: segments[0].to_string(),
            recipient: segments[1].to_string(),
            auth_token: segments[2].to_string(),
        })
    }
}

impl fmt::Display for TopicKey {
    // The auth token is a credential and is kept out of log output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::{TopicKey, TopicKeyError};

    #[test]
    fn parses_three_segment_key() {
        let key = TopicKey::parse("acme/42/s3cr3t").expect("well-formed key should parse");

        assert_eq!(key.tenant, "acme");
        assert_eq!(key.recipient, "42");
        assert_eq!(key.auth_token, "s3cr3t");
    }

    #[test]
    fn rejects_too_few_segments() {
        let err = TopicKey::parse("acme/42").expect_err("two segments must not parse");

        assert_eq!(
            err,
            TopicKeyError::Malformed {
                raw: "acme/42".to_string()
            }
        );
    }

    #[test]
    fn rejects_too_many_segments() {
        assert!(TopicKey::parse("acme/42/s3cr3t/extra").is_err());
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(TopicKey::parse("acme//s3cr3t").is_err());
        assert!(TopicKey::parse("/42/s3cr3t").is_err());
        assert!(TopicKey::parse("acme/42/").is_err());
        assert!(TopicKey::parse("").is_err());
    }

    #[test]
    fn display_omits_the_auth_token() {
        let key = TopicKey::parse("acme/42/s3cr3t").expect("well-formed key should parse");

        assert_eq!(key.to_string(), "acme/42");
    }
}
