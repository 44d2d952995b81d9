//! Subject records: the answer entity of a guessing round plus its hint list.

use serde::{Deserialize, Serialize};

use super::errors::GameError;

/// Theme-specific detail shown when a round starts and when it is solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectPayload {
    Country {
        capital: String,
        region: String,
        #[serde(default)]
        subregion: String,
        population: u64,
        #[serde(default)]
        languages: Vec<String>,
        #[serde(default)]
        flag_url: Option<String>,
    },
    HouseCharacter {
        house: String,
        ancestry: String,
        patronus: String,
        wand: String,
        #[serde(default)]
        actor: String,
        #[serde(default)]
        image_url: Option<String>,
    },
    UniverseCharacter {
        real_name: String,
        first_appearance: String,
        affiliation: String,
        description: String,
        #[serde(default)]
        image_url: Option<String>,
        #[serde(default)]
        wiki_url: Option<String>,
    },
}

impl SubjectPayload {
    /// Line shown alongside the invitation when a round starts, if the payload has artwork.
    pub fn teaser(&self) -> Option<String> {
        match self {
            SubjectPayload::Country { flag_url, .. } => {
                flag_url.as_ref().map(|u| format!("[flag] {}", u))
            }
            SubjectPayload::HouseCharacter { image_url, .. }
            | SubjectPayload::UniverseCharacter { image_url, .. } => {
                image_url.as_ref().map(|u| format!("[portrait] {}", u))
            }
        }
    }

    /// Detail block printed after a correct guess.
    pub fn reveal(&self, display_name: &str) -> String {
        match self {
            SubjectPayload::Country {
                capital, flag_url, ..
            } => {
                let mut out = String::new();
                if let Some(flag) = flag_url {
                    out.push_str(&format!("[flag] {}\n", flag));
                }
                out.push_str(&format!("Country: {}\nCapital: {}", display_name, capital));
                out
            }
            SubjectPayload::HouseCharacter {
                house,
                ancestry,
                patronus,
                wand,
                ..
            } => format!(
                "{}\nHouse: {}\nPatronus: {}\nWand: {}\nAncestry: {}",
                display_name,
                or_unknown(house),
                or_unknown(patronus),
                or_unknown(wand),
                or_unknown(ancestry)
            ),
            SubjectPayload::UniverseCharacter {
                real_name,
                first_appearance,
                affiliation,
                description,
                wiki_url,
                ..
            } => {
                let mut out = format!(
                    "{}\n{}\nReal name: {}\nFirst appearance: {}\nAffiliation: {}",
                    display_name,
                    or_unknown(description),
                    or_unknown(real_name),
                    or_unknown(first_appearance),
                    or_unknown(affiliation)
                );
                if let Some(wiki) = wiki_url {
                    out.push_str(&format!("\nWiki: {}", wiki));
                }
                out
            }
        }
    }
}

fn or_unknown(s: &str) -> &str {
    if s.trim().is_empty() {
        "Unknown"
    } else {
        s
    }
}

/// One guessing-round answer.
///
/// `identifier` is the case-insensitive match key and the string that letter
/// reveals are computed over; `display_name` is what the UI prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub identifier: String,
    pub display_name: String,
    pub hints: Vec<String>,
    pub payload: SubjectPayload,
}

impl Subject {
    /// Build a validated subject.
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        hints: Vec<String>,
        payload: SubjectPayload,
    ) -> Result<Self, GameError> {
        let subject = Subject {
            identifier: identifier.into(),
            display_name: display_name.into(),
            hints,
            payload,
        };
        subject.validate()?;
        Ok(subject)
    }

    /// Check the record invariants: non-empty identifier and at least one hint.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.identifier.trim().is_empty() {
            return Err(GameError::InvalidSubject("identifier is empty".into()));
        }
        if self.hints.is_empty() {
            return Err(GameError::InvalidSubject(format!(
                "'{}' has no hints",
                self.identifier
            )));
        }
        Ok(())
    }

    /// Number of canned hints (H).
    pub fn hint_count(&self) -> usize {
        self.hints.len()
    }

    /// Identifier length in characters (N).
    pub fn identifier_len(&self) -> usize {
        self.identifier.chars().count()
    }

    /// Case-insensitive exact comparison; whitespace runs on either side count as one space.
    pub fn matches(&self, candidate: &str) -> bool {
        normalize_guess(candidate) == normalize_guess(&self.identifier)
    }
}

/// Lowercase and collapse whitespace so `"  new   zealand "` compares as `"new zealand"`.
pub fn normalize_guess(candidate: &str) -> String {
    candidate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
