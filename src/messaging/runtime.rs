use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::types::{Request, Response, TabId, TabStatus};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not establish connection: receiving end does not exist")]
    Disconnected,
    #[error("message port closed before a response was received")]
    NoResponse,
}

/// A request delivered to a page script. `reply` is absent for
/// notifications.
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: Option<oneshot::Sender<Response>>,
}

impl Envelope {
    pub fn respond(self, response: Response) {
        if let Some(reply) = self.reply {
            if reply.send(response).is_err() {
                tracing::debug!(target: "messaging", "sender went away before the response");
            }
        }
    }
}

/// Sending side of one tab's page script.
#[derive(Clone)]
pub struct TabPort {
    tab_id: TabId,
    sender: mpsc::Sender<Envelope>,
}

impl TabPort {
    pub fn channel(tab_id: TabId, capacity: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { tab_id, sender }, receiver)
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    /// Sends a request and waits for its response. Not retried.
    pub async fn send_message(&self, request: Request) -> Result<Response, TransportError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope {
                request,
                reply: Some(reply),
            })
            .await
            .map_err(|_| TransportError::Disconnected)?;
        response.await.map_err(|_| TransportError::NoResponse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundEvent {
    Message { tab_id: TabId, request: Request },
    TabUpdated { tab_id: TabId, status: TabStatus },
}

/// Fire-and-forget channel into the background relay.
#[derive(Clone)]
pub struct BackgroundPort {
    sender: mpsc::UnboundedSender<BackgroundEvent>,
}

impl BackgroundPort {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BackgroundEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn send_message(&self, tab_id: TabId, request: Request) {
        self.post(BackgroundEvent::Message { tab_id, request });
    }

    pub fn tab_updated(&self, tab_id: TabId, status: TabStatus) {
        self.post(BackgroundEvent::TabUpdated { tab_id, status });
    }

    fn post(&self, event: BackgroundEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!(target: "messaging", "background relay is not running");
        }
    }
}
