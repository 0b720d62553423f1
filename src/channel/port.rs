use tokio::sync::mpsc;

use super::protocol::Envelope;

/// One end of an in-process duplex message link.
///
/// Dropping a port closes it; the peer observes the close as the end of its
/// inbound stream.
#[derive(Debug)]
pub struct Port {
    tx: mpsc::UnboundedSender<Envelope>,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Port {
    /// Create two connected ends
    pub fn pair() -> (Port, Port) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (Port { tx: a_tx, rx: a_rx }, Port { tx: b_tx, rx: b_rx })
    }

    /// Post a message to the peer. Returns false once the peer is gone.
    pub fn post(&self, envelope: impl Into<Envelope>) -> bool {
        self.tx.send(envelope.into()).is_ok()
    }

    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    pub fn split(self) -> (mpsc::UnboundedSender<Envelope>, mpsc::UnboundedReceiver<Envelope>) {
        (self.tx, self.rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::protocol::Response;

    #[tokio::test]
    async fn test_pair_is_duplex() {
        let (mut a, mut b) = Port::pair();
        assert!(a.post(Response::failure(1, "x")));
        assert!(b.post(Response::failure(2, "y")));
        assert_eq!(b.recv().await.map(|e| e.id()), Some(1));
        assert_eq!(a.recv().await.map(|e| e.id()), Some(2));
    }

    #[tokio::test]
    async fn test_drop_closes_peer() {
        let (a, mut b) = Port::pair();
        drop(a);
        assert!(b.recv().await.is_none());
        assert!(!b.post(Response::failure(1, "x")));
    }
}
