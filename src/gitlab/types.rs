//! GitLab CI lint API request and response types.

use serde::{Deserialize, Serialize};

/// Body of a `POST /projects/:id/ci/lint` request.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct LintRequest {
    pub content: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

impl LintRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Raw lint response, covering both the current shape (`valid`) and the
/// legacy one (`status`/`error`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LintResponse {
    pub valid: Option<bool>,
    pub status: Option<String>,
    pub errors: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
    pub error: Option<String>,
    pub message: Option<serde_json::Value>,
    pub merged_yaml: Option<String>,
}

/// Semantic verdict of the lint API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    Valid,
    Invalid(Vec<String>),
}

impl LintOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, LintOutcome::Valid)
    }
}

/// Normalized lint result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    pub outcome: LintOutcome,
    pub warnings: Vec<String>,
    pub merged_yaml: Option<String>,
}

impl LintResponse {
    /// Detect which response shape was returned and normalize it.
    ///
    /// Returns the reason as `Err` when the body is neither shape, or when a
    /// legacy response reports an API error.
    pub fn into_report(self) -> Result<LintReport, String> {
        let warnings = self.warnings.unwrap_or_default();
        let merged_yaml = self.merged_yaml.filter(|yaml| !yaml.is_empty());

        let outcome = if let Some(valid) = self.valid {
            if valid {
                LintOutcome::Valid
            } else {
                LintOutcome::Invalid(self.errors.unwrap_or_default())
            }
        } else if let Some(status) = self.status.as_deref() {
            match status {
                "valid" => LintOutcome::Valid,
                _ => match self.error.filter(|e| !e.is_empty()) {
                    Some(error) => return Err(format!("API responded: {}", error)),
                    None => LintOutcome::Invalid(self.errors.unwrap_or_default()),
                },
            }
        } else if let Some(error) = self.error {
            return Err(format!("API responded: {}", error));
        } else if let Some(message) = self.message {
            let message = match message {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(format!("API responded: {}", message));
        } else {
            return Err("response has neither a 'valid' nor a 'status' field".to_string());
        };

        Ok(LintReport {
            outcome,
            warnings,
            merged_yaml,
        })
    }
}
