//! Control plane: lifecycle bookkeeping for transport sessions.

pub(crate) mod connection_registry;
