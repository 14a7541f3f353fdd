//! Naming conventions for structured log output.

pub(crate) mod events;
