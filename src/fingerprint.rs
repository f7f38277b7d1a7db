use std::panic::PanicHookInfo;

use chrono::{DateTime, Local};

/// Title length limit imposed by the tracker.
const TITLE_MAX_CHARS: usize = 255;

/// Stand-in message for payloads raised via `panic_any` that are neither
/// `&str` nor `String`. Keeps such panics deduplicating per call site.
const OPAQUE_PAYLOAD: &str = "non-string panic payload";

/// Everything worth keeping from a panic, captured inside the hook before
/// the stack unwinds.
#[derive(Debug, Clone)]
pub struct PanicDetails {
    message: String,
    location: Option<String>,
    thread: String,
    backtrace: String,
    seen_at: DateTime<Local>,
}

impl PanicDetails {
    /// Capture details from the hook payload. Must run on the panicking
    /// thread so the thread name and backtrace are the real ones.
    pub fn from_hook(info: &PanicHookInfo<'_>) -> Self {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| OPAQUE_PAYLOAD.to_string());

        Self {
            message,
            location: info.location().map(ToString::to_string),
            thread: std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string(),
            backtrace: format!("{:?}", backtrace::Backtrace::new()),
            seen_at: Local::now(),
        }
    }

    /// Deterministic issue title: stable across occurrences of the same
    /// panic site and message, distinct otherwise.
    pub fn fingerprint(&self) -> String {
        let full = match &self.location {
            Some(location) => format!("panic at {location}: {}", self.message),
            None => format!("panic: {}", self.message),
        };
        full.chars().take(TITLE_MAX_CHARS).collect()
    }

    /// Markdown body for a newly created issue.
    pub fn description(&self) -> String {
        let mut body = format!("# Uncaught panic '{}'\n\n", self.fingerprint());
        body.push_str("```text\n");
        body.push_str(&self.backtrace);
        if !self.backtrace.ends_with('\n') {
            body.push('\n');
        }
        body.push_str("```\n");
        body.push_str(&format!("Thread: `{}`\n", self.thread));
        body.push_str(&format!(
            "Last occurred at: **{}**\n",
            self.seen_at.to_rfc3339()
        ));
        body.push_str("\n\n\n(*This issue was automatically opened by gitlab-reporter*)");
        body
    }

    /// Markdown body for a "seen again" note on an existing issue.
    pub fn note_body(&self) -> String {
        format!(
            "Seen again at **{}** on thread `{}`.",
            self.seen_at.to_rfc3339(),
            self.thread
        )
    }

    #[cfg(test)]
    pub(crate) fn synthetic(message: &str, location: Option<&str>, thread: &str) -> Self {
        Self {
            message: message.to_string(),
            location: location.map(ToString::to_string),
            thread: thread.to_string(),
            backtrace: "   0: gitlab_reporter::tests::frame\n".to_string(),
            seen_at: Local::now(),
        }
    }
}
