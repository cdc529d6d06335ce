//! Generated code artifacts and their one-way vetting state.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::scanner::SecurityReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactStatus {
    #[default]
    Pending,
    Passed,
    Vetoed,
}

/// A generated code unit awaiting (or past) its security scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub description: String,
    pub language: String,
    pub code: String,
    status: ArtifactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_report: Option<SecurityReport>,
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: language.into(),
            code: code.into(),
            status: ArtifactStatus::Pending,
            security_report: None,
        }
    }

    pub fn status(&self) -> ArtifactStatus {
        self.status
    }

    pub fn security_report(&self) -> Option<&SecurityReport> {
        self.security_report.as_ref()
    }

    /// Attach `report` and leave `Pending` for good.
    pub(crate) fn settle(&mut self, report: SecurityReport) -> Result<ArtifactStatus, ScanError> {
        if self.status != ArtifactStatus::Pending {
            return Err(ScanError::AlreadyScanned {
                name: self.name.clone(),
                status: self.status.to_string(),
            });
        }
        self.status = if report.approved {
            ArtifactStatus::Passed
        } else {
            ArtifactStatus::Vetoed
        };
        self.security_report = Some(report);
        Ok(self.status)
    }
}
