//! Channel-backed activity observer.
//!
//! Lets a caller consume research progress as a stream instead of a callback:
//! the research adapter pushes into the sender while the caller drains the
//! receiver at its own pace. The stream ends when the observer is dropped.

use pipeline::{ActivityEvent, ActivityObserver};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// [`ActivityObserver`] that forwards every event into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<ActivityEvent>,
}

impl ActivityObserver for ChannelObserver {
    fn on_activity(&self, event: &ActivityEvent) {
        // Events are advisory; a closed receiver is ignored.
        let _ = self.tx.send(event.clone());
    }
}

/// Creates a connected observer and event receiver.
pub fn activity_channel() -> (ChannelObserver, UnboundedReceiver<ActivityEvent>) {
    let (tx, rx) = unbounded_channel();
    (ChannelObserver { tx }, rx)
}
