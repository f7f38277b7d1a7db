use crate::config::Config;
use crate::error::ReporterError;
use crate::fingerprint::PanicDetails;
use crate::tracker::TrackerClient;

/// What the dedupe flow did for one panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No issue with this fingerprint existed; a new one was opened.
    Created { iid: u64 },
    /// An open issue existed; a note was appended.
    Noted { iid: u64 },
    /// A closed issue existed; it was reopened and a note appended.
    Reopened { iid: u64 },
}

/// Report one panic: annotate the issue matching its fingerprint, or
/// create a new one.
///
/// Known limitation: two threads hitting a brand-new fingerprint at the
/// same time can both miss the search and both create an issue. The flow
/// makes no atomicity claim for concurrent first occurrences.
pub fn create_or_note(
    client: &TrackerClient,
    config: &Config,
    details: &PanicDetails,
) -> Result<ReportOutcome, ReporterError> {
    let title = details.fingerprint();
    match client.find_issue(&title)? {
        Some(issue) if issue.is_open() => {
            client.add_note(issue.iid, &details.note_body())?;
            Ok(ReportOutcome::Noted { iid: issue.iid })
        }
        Some(issue) => {
            client.reopen_issue(issue.iid)?;
            client.add_note(issue.iid, &details.note_body())?;
            Ok(ReportOutcome::Reopened { iid: issue.iid })
        }
        None => {
            let issue = client.create_issue(&title, &details.description(), config.assignee_id)?;
            Ok(ReportOutcome::Created { iid: issue.iid })
        }
    }
}
