use std::cell::Cell;
use std::panic::{AssertUnwindSafe, PanicHookInfo, catch_unwind};
use std::sync::OnceLock;

use crate::config::Config;
use crate::error::ReporterError;
use crate::fingerprint::PanicDetails;
use crate::report::{self, ReportOutcome};
use crate::tracker::TrackerClient;

struct ReporterState {
    config: Config,
    client: TrackerClient,
}

static STATE: OnceLock<ReporterState> = OnceLock::new();

thread_local! {
    /// Marks frames where the reporter itself is running, so a panic
    /// raised by the reporting code is never reported in turn.
    static IN_REPORT: Cell<bool> = const { Cell::new(false) };
}

/// Validate the config and install the reporting panic hook.
///
/// The hook fires for a panic on any thread, so worker threads are covered
/// by the same installation. The previously-installed hook is captured and
/// invoked after every reporting attempt, successful or not, which keeps
/// default panic output and process termination unchanged.
///
/// Idempotent: a second call keeps the first configuration and leaves the
/// hook slot alone.
pub fn init(config: Config) -> Result<(), ReporterError> {
    config.validate()?;
    let client = TrackerClient::new(&config);
    if STATE.set(ReporterState { config, client }).is_err() {
        tracing::debug!("reporter already initialized, keeping existing hook");
        return Ok(());
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        report_panic(info);
        previous(info);
    }));
    tracing::debug!("panic hook installed");
    Ok(())
}

/// One reporting attempt. Never panics out and never blocks the previous
/// hook: tracker failures are logged and dropped, and a panic raised while
/// already reporting is detected and skipped.
fn report_panic(info: &PanicHookInfo<'_>) {
    let Some(state) = STATE.get() else {
        return;
    };

    let outcome = with_reentrancy_guard(|| {
        let details = PanicDetails::from_hook(info);
        report::create_or_note(&state.client, &state.config, &details)
    });

    match outcome {
        Some(Ok(Ok(ReportOutcome::Created { iid }))) => {
            tracing::info!(iid, "opened new issue for panic");
        }
        Some(Ok(Ok(ReportOutcome::Noted { iid }))) => {
            tracing::info!(iid, "noted recurring panic on existing issue");
        }
        Some(Ok(Ok(ReportOutcome::Reopened { iid }))) => {
            tracing::info!(iid, "reopened issue for recurring panic");
        }
        Some(Ok(Err(err))) => tracing::warn!("failed to report panic to tracker: {err}"),
        Some(Err(_)) => tracing::error!("reporter panicked while reporting, report dropped"),
        None => tracing::error!("panic raised inside the reporter, skipping report"),
    }
}

/// Run `attempt` unless this thread is already inside a reporting attempt,
/// and catch any panic it raises. `None` means the call was re-entrant;
/// `Some(Err(_))` means `attempt` panicked.
fn with_reentrancy_guard<T>(attempt: impl FnOnce() -> T) -> Option<std::thread::Result<T>> {
    if IN_REPORT.with(Cell::get) {
        return None;
    }
    IN_REPORT.with(|flag| flag.set(true));
    let result = catch_unwind(AssertUnwindSafe(attempt));
    IN_REPORT.with(|flag| flag.set(false));
    Some(result)
}
