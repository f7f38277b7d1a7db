use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReporterError;

/// Reporter configuration. Handed to [`init`](crate::init) once, read-only
/// for the rest of the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GitLab instance, e.g. `https://gitlab.example.com`.
    pub base_url: String,
    /// Private API token with `api` scope.
    pub token: String,
    /// Numeric id of the project that receives the issues.
    pub project_id: u64,
    /// Optional user id assigned to newly created issues.
    #[serde(default)]
    pub assignee_id: Option<u64>,
    /// Per-request timeout for tracker calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Config with the default timeout and no assignee.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, project_id: u64) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            project_id,
            assignee_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Assign newly created issues to this user.
    #[must_use]
    pub fn assignee(mut self, assignee_id: u64) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Load config from a file (TOML or JSON, auto-detected by extension).
    pub fn load(path: &Path) -> Result<Self, ReporterError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReporterError::Config(format!("reading {}: {e}", path.display())))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "toml" => Self::parse_toml(&contents),
            "json" => Self::parse_json(&contents),
            _ => {
                // Try TOML first, then JSON
                Self::parse_toml(&contents).or_else(|_| Self::parse_json(&contents))
            }
        }
    }

    /// Parse config from a TOML string.
    pub fn parse_toml(toml_str: &str) -> Result<Self, ReporterError> {
        toml::from_str(toml_str)
            .map_err(|e| ReporterError::Config(format!("invalid reporter TOML: {e}")))
    }

    /// Parse config from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ReporterError> {
        serde_json::from_str(json)
            .map_err(|e| ReporterError::Config(format!("invalid reporter JSON: {e}")))
    }

    /// Reject configs that cannot possibly reach a tracker.
    pub fn validate(&self) -> Result<(), ReporterError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ReporterError::Config(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.token.trim().is_empty() {
            return Err(ReporterError::Config("token must not be empty".into()));
        }
        if self.project_id == 0 {
            return Err(ReporterError::Config("project_id must be non-zero".into()));
        }
        Ok(())
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `{base_url}/api/v4/projects/{id}` prefix shared by all issue calls.
    pub(crate) fn project_api(&self) -> String {
        format!(
            "{}/api/v4/projects/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_toml_config() {
        let toml_str = r#"
base_url = "https://gitlab.example.com"
token = "glpat-secret"
project_id = 42
assignee_id = 7
timeout_secs = 3
"#;

        let config = Config::parse_toml(toml_str).unwrap();
        assert_eq!(config.base_url, "https://gitlab.example.com");
        assert_eq!(config.token, "glpat-secret");
        assert_eq!(config.project_id, 42);
        assert_eq!(config.assignee_id, Some(7));
        assert_eq!(config.timeout_secs, 3);
        config.validate().unwrap();
    }

    #[test]
    fn parse_minimal_toml_uses_defaults() {
        let toml_str = r#"
base_url = "https://gitlab.example.com"
token = "glpat-secret"
project_id = 42
"#;

        let config = Config::parse_toml(toml_str).unwrap();
        assert_eq!(config.assignee_id, None);
        assert_eq!(config.timeout_secs, 10); // default
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{
            "base_url": "https://gitlab.example.com",
            "token": "glpat-secret",
            "project_id": 42
        }"#;

        let config = Config::parse_json(json).unwrap();
        assert_eq!(config.project_id, 42);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn parse_malformed_toml() {
        let result = Config::parse_toml("not valid toml [[[");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid reporter TOML"));
    }

    #[test]
    fn parse_malformed_json() {
        let result = Config::parse_json("not json");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid reporter JSON"));
    }

    #[test]
    fn parse_missing_required_fields() {
        let result = Config::parse_toml(r#"base_url = "https://gitlab.example.com""#);
        assert!(result.is_err());
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("reporter.toml");
        std::fs::write(
            &toml_path,
            "base_url = \"https://gitlab.example.com\"\ntoken = \"t\"\nproject_id = 1\n",
        )
        .unwrap();

        let json_path = dir.path().join("reporter.json");
        std::fs::write(
            &json_path,
            r#"{"base_url": "https://gitlab.example.com", "token": "t", "project_id": 2}"#,
        )
        .unwrap();

        assert_eq!(Config::load(&toml_path).unwrap().project_id, 1);
        assert_eq!(Config::load(&json_path).unwrap().project_id, 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("config error"));
    }

    #[test]
    fn validate_rejects_bad_configs() {
        assert!(Config::new("gitlab.example.com", "t", 1).validate().is_err());
        assert!(Config::new("https://gitlab.example.com", "  ", 1)
            .validate()
            .is_err());
        assert!(Config::new("https://gitlab.example.com", "t", 0)
            .validate()
            .is_err());
        assert!(Config::new("https://gitlab.example.com", "t", 1)
            .validate()
            .is_ok());
    }

    #[test]
    fn project_api_trims_trailing_slash() {
        let config = Config::new("https://gitlab.example.com/", "t", 42);
        assert_eq!(
            config.project_api(),
            "https://gitlab.example.com/api/v4/projects/42"
        );
    }
}
