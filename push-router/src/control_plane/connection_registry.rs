//! Registry of currently open transport sessions.

use crate::transport::ConnectionId;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Set of open sessions, kept purely for lifecycle bookkeeping.
///
/// Holding a connection here grants no delivery rights; only the
/// subscription registry decides who receives events.
pub(crate) struct ConnectionRegistry {
    open: Mutex<HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            open: Mutex::new(HashSet::new()),
        }
    }

    /// Records `connection` as open. Returns `true` only when first inserted.
    pub(crate) async fn open(&self, connection: ConnectionId) -> bool {
        let mut open = self.open.lock().await;
        open.insert(connection)
    }

    /// Removes `connection` from the open set. Returns `true` when it was
    /// present; closing an unknown connection is a no-op.
    pub(crate) async fn close(&self, connection: &ConnectionId) -> bool {
        let mut open = self.open.lock().await;
        open.remove(connection)
    }

    #[cfg(test)]
    pub(crate) async fn open_count(&self) -> usize {
        let open = self.open.lock().await;
        open.len()
    }
}
