#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Shows a short user-facing message. Pages and control surfaces have no
/// window of their own here, so notices go to the console and the log.
pub fn show_notification(level: NoticeLevel, text: &str) {
    match level {
        NoticeLevel::Success | NoticeLevel::Info => {
            tracing::info!(target: "notify", ?level, "{text}");
            println!("{text}");
        }
        NoticeLevel::Error => {
            tracing::warn!(target: "notify", ?level, "{text}");
            eprintln!("{text}");
        }
    }
}
