use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uigen::GeneratedArtifact;

/// Generated artifacts, most recent first. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GeneratedArtifact>", into = "Vec<GeneratedArtifact>")]
pub struct History {
    artifacts: Vec<GeneratedArtifact>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `artifact` at the front. Returns `false`, leaving the history
    /// unchanged, if its id is already present.
    pub fn prepend(&mut self, artifact: GeneratedArtifact) -> bool {
        if self.get(&artifact.id).is_some() {
            return false;
        }
        self.artifacts.insert(0, artifact);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<GeneratedArtifact> {
        let index = self.artifacts.iter().position(|a| a.id == id)?;
        Some(self.artifacts.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    /// Look up by exact id, or by an unambiguous id prefix.
    #[must_use]
    pub fn resolve(&self, id_or_prefix: &str) -> Option<&GeneratedArtifact> {
        if let Some(artifact) = self.get(id_or_prefix) {
            return Some(artifact);
        }
        if id_or_prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .artifacts
            .iter()
            .filter(|a| a.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(artifact), None) => Some(artifact),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GeneratedArtifact] {
        &self.artifacts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    #[must_use]
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.artifacts.iter().map(|a| a.timestamp).max()
    }
}

/// Duplicate ids keep their first (most recent) occurrence.
impl From<Vec<GeneratedArtifact>> for History {
    fn from(artifacts: Vec<GeneratedArtifact>) -> Self {
        let mut seen = HashSet::new();
        let artifacts = artifacts
            .into_iter()
            .filter(|a| seen.insert(a.id.clone()))
            .collect();
        Self { artifacts }
    }
}

impl From<History> for Vec<GeneratedArtifact> {
    fn from(history: History) -> Self {
        history.artifacts
    }
}
