use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::ReporterError;

/// An issue as returned by the tracker. Only the fields the dedupe flow
/// looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub iid: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

impl Issue {
    /// GitLab reports open issues with state `"opened"`.
    pub fn is_open(&self) -> bool {
        self.state == "opened"
    }
}

/// Thin client for the issue operations the reporter needs: search by
/// title, create, note, reopen. Authentication is a static private token.
/// No retries, no backoff.
pub struct TrackerClient {
    agent: ureq::Agent,
    token: String,
    project_api: String,
}

impl TrackerClient {
    /// Build a client for the configured project. The agent carries the
    /// configured global timeout so a hung tracker cannot stall a crashing
    /// process indefinitely.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build()
            .new_agent();
        Self {
            agent,
            token: config.token.clone(),
            project_api: config.project_api(),
        }
    }

    /// Find the issue whose title matches exactly, if any. The server-side
    /// search is a substring match, so results are re-checked for equality.
    pub fn find_issue(&self, title: &str) -> Result<Option<Issue>, ReporterError> {
        let issues: Vec<Issue> = self
            .agent
            .get(format!("{}/issues", self.project_api))
            .query("search", title)
            .query("in", "title")
            .header("PRIVATE-TOKEN", self.token.as_str())
            .call()
            .map_err(ReporterError::from_ureq)?
            .into_body()
            .read_json()
            .map_err(ReporterError::from_ureq)?;
        Ok(issues.into_iter().find(|issue| issue.title == title))
    }

    /// Open a new issue and return it.
    pub fn create_issue(
        &self,
        title: &str,
        description: &str,
        assignee_id: Option<u64>,
    ) -> Result<Issue, ReporterError> {
        let mut payload = json!({ "title": title, "description": description });
        if let Some(id) = assignee_id {
            payload["assignee_ids"] = json!([id]);
        }
        let issue: Issue = self
            .agent
            .post(format!("{}/issues", self.project_api))
            .header("PRIVATE-TOKEN", self.token.as_str())
            .send_json(&payload)
            .map_err(ReporterError::from_ureq)?
            .into_body()
            .read_json()
            .map_err(ReporterError::from_ureq)?;
        Ok(issue)
    }

    /// Append a note to an existing issue.
    pub fn add_note(&self, iid: u64, body: &str) -> Result<(), ReporterError> {
        self.agent
            .post(format!("{}/issues/{iid}/notes", self.project_api))
            .header("PRIVATE-TOKEN", self.token.as_str())
            .send_json(&json!({ "body": body }))
            .map_err(ReporterError::from_ureq)?;
        Ok(())
    }

    /// Flip a closed issue back to open.
    pub fn reopen_issue(&self, iid: u64) -> Result<(), ReporterError> {
        self.agent
            .put(format!("{}/issues/{iid}", self.project_api))
            .header("PRIVATE-TOKEN", self.token.as_str())
            .send_json(&json!({ "state_event": "reopen" }))
            .map_err(ReporterError::from_ureq)?;
        Ok(())
    }
}
