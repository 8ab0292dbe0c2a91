use std::sync::Arc;
use tokio::sync::watch;

/// Owner side of the "consumer went away" signal.
///
/// Cloning shares the same signal, so a host can tear the form down from
/// outside the controller.
#[derive(Debug, Clone)]
pub struct Teardown {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for Teardown {
    fn default() -> Self {
        Self::new()
    }
}

impl Teardown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn token(&self) -> TeardownToken {
        TeardownToken {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Handed to in-flight work; resolves once the form is torn down
#[derive(Debug, Clone)]
pub struct TeardownToken {
    receiver: watch::Receiver<bool>,
}

impl TeardownToken {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes when teardown is triggered or every owner handle is gone
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}
