use log::debug;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Stored credentials or the cached session changed; anything derived from them should refresh.
    LoginUpdated,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn publish(&self, event: AppEvent) {
        // Nobody listening is fine
        if self.sender.send(event.clone()).is_err() {
            debug!("No subscribers for {:?}", event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
