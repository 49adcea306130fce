use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep, sleep_until, Instant},
};

use crate::{
    infrastructure::shutdown::{CloseReason, ShutdownListener},
    messaging::{BackgroundPort, Envelope, Request, Response, TabId},
};

use super::{
    html::HtmlPage,
    orchestrator::FormFiller,
    page::FormDocument,
};

/// Page-side script bound to one loaded page. It owns the page for the
/// lifetime of the session and hands it back when the session ends.
pub struct ContentScript {
    tab_id: TabId,
    page: HtmlPage,
    filler: FormFiller,
    background: BackgroundPort,
    auto_scan_delay: Duration,
    highlight_duration: Duration,
}

impl ContentScript {
    pub fn new(
        tab_id: TabId,
        page: HtmlPage,
        filler: FormFiller,
        background: BackgroundPort,
        auto_scan_delay: Duration,
        highlight_duration: Duration,
    ) -> Self {
        Self {
            tab_id,
            page,
            filler,
            background,
            auto_scan_delay,
            highlight_duration,
        }
    }

    pub fn spawn(
        self,
        receiver: mpsc::Receiver<Envelope>,
        shutdown: ShutdownListener,
    ) -> JoinHandle<HtmlPage> {
        tokio::spawn(self.run(receiver, shutdown))
    }

    async fn run(
        mut self,
        mut receiver: mpsc::Receiver<Envelope>,
        mut shutdown: ShutdownListener,
    ) -> HtmlPage {
        let auto_scan = sleep(self.auto_scan_delay);
        tokio::pin!(auto_scan);
        let mut auto_scanned = false;
        let mut highlight_until: Option<Instant> = None;

        let reason = loop {
            tokio::select! {
                reason = shutdown.notified() => break reason,
                _ = &mut auto_scan, if !auto_scanned => {
                    auto_scanned = true;
                    self.auto_scan();
                }
                _ = sleep_until(highlight_until.unwrap_or_else(Instant::now)), if highlight_until.is_some() => {
                    highlight_until = None;
                    self.page.clear_highlights();
                }
                envelope = receiver.recv() => {
                    let Some(envelope) = envelope else {
                        break CloseReason::Completed;
                    };
                    if self.handle(envelope).await {
                        highlight_until = Some(Instant::now() + self.highlight_duration);
                    }
                }
            }
        };

        self.page.clear_highlights();
        tracing::debug!(target: "content", tab_id = %self.tab_id, ?reason, "content script stopped");
        self.page
    }

    /// Answers one request. Returns whether fields were filled.
    async fn handle(&mut self, envelope: Envelope) -> bool {
        match envelope.request {
            Request::FillForm => match self.filler.fill_form(&mut self.page).await {
                Ok(outcome) => {
                    envelope.respond(Response::filled(outcome.filled));
                    outcome.filled > 0
                }
                Err(err) => {
                    tracing::error!(target: "content", error = %err, "fill pass failed");
                    envelope.respond(Response::failed(err.to_string()));
                    false
                }
            },
            Request::ScanFields => {
                let fields = self.filler.scan_fields(&self.page);
                envelope.respond(Response::scanned(fields));
                false
            }
            Request::FieldsDetected { .. } => {
                tracing::debug!(target: "content", "ignoring relay-only message");
                envelope.respond(Response::failed("unsupported action"));
                false
            }
        }
    }

    fn auto_scan(&self) {
        let count = self.filler.scan_fields(&self.page).len();
        if count == 0 {
            return;
        }
        let url = self.page.url().unwrap_or_default().to_string();
        self.background
            .send_message(self.tab_id, Request::FieldsDetected { count, url });
    }
}
