//! Immutable challenge template catalog.
//!
//! Templates are loaded once at process start from a JSON file (or the
//! catalog bundled with the crate) and never mutated afterwards. Challenge
//! instances reference templates by id only; the catalog stays the sole
//! owner of template data.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// The five challenge behaviors the engine knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Cap on total drinks across the week.
    MaxPerWeek,
    /// Cap on drinks within any single day.
    MaxPerDay,
    /// Daily cap plus a tolerated number of slip days.
    MaxOnNDays,
    /// Blood-alcohol cap. Not implemented: evaluation is a no-op and the
    /// generator never draws this template (see the id 4 remap).
    MaxBloodPercentage,
    /// Always scores as fulfilled.
    AlwaysSucceeds,
}

/// A single catalog entry.
///
/// `content` is a human-readable description that may reference challenge
/// parameters positionally as `{0}`, `{1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub id: u32,
    pub behavior: BehaviorKind,
    pub content: String,
    /// Booze points awarded when the challenge is fulfilled.
    pub reward: u32,
}

impl ChallengeTemplate {
    /// Substitute positional placeholders in `content` with `parameters`.
    pub fn render(&self, parameters: &[i64]) -> String {
        let mut out = self.content.clone();
        for (i, p) in parameters.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), &p.to_string());
        }
        out
    }
}

/// The immutable set of challenge templates.
pub struct TemplateCatalog {
    templates: Vec<ChallengeTemplate>,
}

impl TemplateCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// Invoked once at startup. A missing or malformed source is fatal for
    /// challenge serving; callers should not retry.
    ///
    /// # Errors
    /// `CatalogError::LoadFailed` if the file cannot be read,
    /// `CatalogError::ParseFailed` if it is not a valid template list.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&raw)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(include_str!("../assets/challenges.json"))
    }

    /// Build a catalog from an in-memory template list (tests, embedding).
    pub fn from_templates(templates: Vec<ChallengeTemplate>) -> Self {
        Self { templates }
    }

    fn parse(raw: &str) -> Result<Self, CatalogError> {
        let templates: Vec<ChallengeTemplate> =
            serde_json::from_str(raw).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Ok(Self { templates })
    }

    /// Resolve a template by catalog id.
    ///
    /// # Errors
    /// `CatalogError::TemplateNotFound` for absent ids. Unreachable for ids
    /// the generator draws against a well-formed catalog.
    pub fn by_id(&self, id: u32) -> Result<&ChallengeTemplate, CatalogError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or(CatalogError::TemplateNotFound(id))
    }

    pub fn all(&self) -> &[ChallengeTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
