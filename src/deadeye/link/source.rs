use async_trait::async_trait;
use tokio::sync::mpsc;

/// A stream of raw target data datagrams for one camera.
#[async_trait]
pub trait TargetDataSource: Send {
    /// Waits for the next datagram. `None` means the source has closed.
    async fn recv(&mut self) -> Option<Vec<u8>>;
}

pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl TargetDataSource for ChannelSource {
    async fn recv(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_source_closes_with_sender() {
        let (tx, mut source) = ChannelSource::channel(4);
        tx.send(b"one".to_vec()).await.unwrap();
        drop(tx);
        assert_eq!(source.recv().await, Some(b"one".to_vec()));
        assert_eq!(source.recv().await, None);
    }
}
