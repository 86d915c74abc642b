use anyhow::anyhow;
use semver::Version;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageMetadata {
    pub id: String,
    pub version: Version,
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub icon_url: Option<String>,
    pub authors: Vec<String>,
    pub project_url: Option<String>,
}

impl PackageMetadata {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.id.trim().is_empty() {
            return Err(anyhow!("package id must not be empty"));
        }
        if self.authors.iter().all(|author| author.trim().is_empty()) {
            return Err(anyhow!("package '{}' must declare at least one author", self.id));
        }
        Ok(())
    }

    /// Title, then description, then summary; the first one that is not blank.
    pub fn display_name(&self) -> Option<&str> {
        [&self.title, &self.description, &self.summary]
            .into_iter()
            .find_map(|field| non_blank(field.as_deref()))
    }

    pub fn shortcut_title(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or(self.id.trim())
    }

    pub fn publisher(&self) -> Option<&str> {
        self.authors
            .iter()
            .map(|author| author.trim())
            .find(|author| !author.is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
