use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An installed package as reported by the host package manager.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub description: String,
    pub depends_on: Vec<String>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageRecord {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_depends_on<I, S>(mut self, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = depends_on.into_iter().map(Into::into).collect();
        self
    }

    /// Line used when the package is shown to the model.
    pub fn summary(&self) -> String {
        let description = if self.description.trim().is_empty() {
            "No description available"
        } else {
            self.description.trim()
        };
        format!("{}: {}, Description: {}", self.name, self.version, description)
    }
}

/// A suggestion that was shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: i64,
    pub user_input: String,
    pub command: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
}
