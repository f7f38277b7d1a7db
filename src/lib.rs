//! Report uncaught panics to GitLab as deduplicated issues.
//!
//! [`init`] wraps the process panic hook. Every uncaught panic, on any
//! thread, is fingerprinted and looked up on the configured project: the
//! first occurrence opens an issue, later occurrences add a "seen again"
//! note to it instead of opening duplicates. The hook that was installed
//! before [`init`] always runs afterwards, so default panic output and
//! process termination are unchanged.
//!
//! ```rust,no_run
//! use gitlab_reporter::Config;
//!
//! let config = Config::new("https://gitlab.example.com", "glpat-secret", 42);
//! gitlab_reporter::init(config).expect("valid reporter config");
//!
//! // Any uncaught panic from here on is reported.
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod hook;
pub mod report;
pub mod tracker;

pub use config::Config;
pub use error::ReporterError;
pub use hook::init;
pub use report::ReportOutcome;
