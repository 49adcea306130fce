use tokio::sync::watch;

/// Why a page session is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Completed,
    Interrupted,
}

#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<Option<CloseReason>>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<Option<CloseReason>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    /// First reason wins; later triggers are ignored.
    pub fn trigger(&self, reason: CloseReason) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }
}

impl ShutdownListener {
    pub async fn notified(&mut self) -> CloseReason {
        loop {
            if let Some(reason) = *self.receiver.borrow_and_update() {
                return reason;
            }
            if self.receiver.changed().await.is_err() {
                return CloseReason::Interrupted;
            }
        }
    }

    pub fn reason(&self) -> Option<CloseReason> {
        *self.receiver.borrow()
    }
}

/// Ctrl-C (and SIGTERM on unix) interrupts the running session.
pub fn install_signal_handlers(shutdown: Shutdown) {
    let ctrlc = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc.trigger(CloseReason::Interrupted);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let term = shutdown;
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                term.trigger(CloseReason::Interrupted);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listeners_see_the_first_reason() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        assert_eq!(listener.reason(), None);

        shutdown.trigger(CloseReason::Completed);
        shutdown.trigger(CloseReason::Interrupted);
        assert_eq!(listener.notified().await, CloseReason::Completed);

        let mut late = shutdown.subscribe();
        assert_eq!(late.notified().await, CloseReason::Completed);
    }
}
