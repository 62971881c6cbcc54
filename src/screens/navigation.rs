use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, Mutex};

/// One-shot navigation intents from a screen.
///
/// Intents queue up until someone receives them, and each intent is handed to
/// exactly one receiver. Clones share the same queue, they don't fan out.
#[derive(Debug)]
pub struct NavigationQueue<N> {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<N>>>,
}

impl<N> Clone for NavigationQueue<N> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<N> NavigationQueue<N> {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<N>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }

    /// Wait for the next intent. `None` after the screen closed and the queue drained.
    pub async fn recv(&self) -> Option<N> {
        self.rx.lock().await.recv().await
    }

    /// Take a queued intent without waiting
    pub async fn try_recv(&self) -> Option<N> {
        match self.rx.lock().await.try_recv() {
            Ok(intent) => Some(intent),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Take everything queued right now
    pub async fn drain(&self) -> Vec<N> {
        let mut rx = self.rx.lock().await;
        let mut intents = Vec::new();
        while let Ok(intent) = rx.try_recv() {
            intents.push(intent);
        }
        intents
    }
}
