//! Seed-file subject providers.
//!
//! Each theme ships a JSON catalog under `data/seeds/` that is compiled into
//! the binary as a fallback, so the games work offline. Operators can point a
//! theme at their own file with `catalog_path` to customise content without
//! recompiling.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::debug;
use rand::Rng;

use super::errors::CatalogError;
use super::subject::Subject;
use super::{SubjectProvider, Theme};

const COUNTRIES_SEED: &str = include_str!("../../data/seeds/countries.json");
const HOUSE_CHARACTERS_SEED: &str = include_str!("../../data/seeds/house_characters.json");
const UNIVERSE_CHARACTERS_SEED: &str = include_str!("../../data/seeds/universe_characters.json");

/// Serves uniformly random subjects from an in-memory list.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    label: String,
    subjects: Vec<Subject>,
}

impl CatalogProvider {
    /// Build from already validated subjects.
    pub fn new(label: impl Into<String>, subjects: Vec<Subject>) -> Result<Self, CatalogError> {
        let label = label.into();
        if subjects.is_empty() {
            return Err(CatalogError::Empty(label));
        }
        for (index, subject) in subjects.iter().enumerate() {
            subject
                .validate()
                .map_err(|source| CatalogError::Invalid { index, source })?;
        }
        Ok(Self { label, subjects })
    }

    /// Parse a JSON array of subjects.
    pub fn from_json_str(label: impl Into<String>, json: &str) -> Result<Self, CatalogError> {
        let subjects: Vec<Subject> = serde_json::from_str(json)?;
        Self::new(label, subjects)
    }

    /// Load a catalog from a seed file on disk.
    pub fn from_path<P: AsRef<Path>>(theme: Theme, path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let provider = Self::from_json_str(format!("{}:{}", theme.keyword(), path.display()), &contents)?;
        debug!(
            "{}: loaded {} subjects from {}",
            theme.keyword(),
            provider.len(),
            path.display()
        );
        Ok(provider)
    }

    /// The catalog compiled into the binary for `theme`.
    pub fn builtin(theme: Theme) -> Result<Self, CatalogError> {
        let seed = match theme {
            Theme::Countries => COUNTRIES_SEED,
            Theme::HouseCharacters => HOUSE_CHARACTERS_SEED,
            Theme::UniverseCharacters => UNIVERSE_CHARACTERS_SEED,
        };
        Self::from_json_str(format!("{}:builtin", theme.keyword()), seed)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    fn pick(&self) -> Option<Subject> {
        if self.subjects.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.subjects.len());
        self.subjects.get(idx).cloned()
    }
}

#[async_trait]
impl SubjectProvider for CatalogProvider {
    async fn fetch_subject(&self) -> Option<Subject> {
        self.pick()
    }

    fn name(&self) -> &str {
        &self.label
    }
}
