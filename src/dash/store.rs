use tokio::sync::watch;

use crate::client::{Client, RequestError};
use crate::types::channel::Channel;

/// Holds the current set of sales channels and fans updates out to
/// subscribers. Constructed explicitly and passed around; there is no
/// global instance.
pub struct ChannelStore {
    client: Client,
    tx: watch::Sender<Vec<Channel>>,
}

impl ChannelStore {
    pub fn new(client: Client) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { client, tx }
    }

    /// Current contents, without touching the network. Empty until the
    /// first successful refresh.
    pub fn snapshot(&self) -> Vec<Channel> {
        self.tx.borrow().clone()
    }

    /// Watch for updates. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Channel>> {
        self.tx.subscribe()
    }

    /// Reload the channel list from the server and notify subscribers.
    /// Unlike the dashboard view, a caller here wants to know when the
    /// refresh failed, so errors propagate.
    pub async fn refresh(&self) -> Result<(), RequestError> {
        let channels = self.client.list_channels().await?;
        self.tx.send_replace(channels);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::client::config::Deployment;
    use crate::client::env::MemoryEnvironment;

    #[test]
    fn test_store_starts_empty() {
        let client = Client::new(
            "http://127.0.0.1:1",
            Arc::new(MemoryEnvironment::new()),
            Deployment::Local,
        )
        .unwrap();
        let store = ChannelStore::new(client);
        assert!(store.snapshot().is_empty());

        let rx = store.subscribe();
        assert!(rx.borrow().is_empty());
    }
}
