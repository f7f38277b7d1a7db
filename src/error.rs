/// Errors surfaced by the reporter: a rejected configuration at init time,
/// or a failed conversation with the tracker while reporting a panic.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    #[error("config error: {0}")]
    Config(String),

    #[error("tracker rejected credentials (HTTP {status})")]
    Auth { status: u16 },

    #[error("tracker returned HTTP {status}")]
    Tracker { status: u16 },

    #[error("tracker request failed: {0}")]
    Network(#[source] Box<ureq::Error>),
}

impl ReporterError {
    /// Split transport failures from HTTP status failures, and pull the
    /// auth statuses out of the latter.
    pub(crate) fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status @ (401 | 403)) => Self::Auth { status },
            ureq::Error::StatusCode(status) => Self::Tracker { status },
            other => Self::Network(Box::new(other)),
        }
    }
}
