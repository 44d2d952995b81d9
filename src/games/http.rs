//! Live subject providers backed by public REST APIs.
//!
//! - Countries: REST Countries (`/v3.1/all?fields=...`)
//! - House characters: HP-API (`/api/characters`)
//! - Universe characters: Superhero API (`/api/all.json`, Marvel Comics only)
//!
//! Every provider downloads the full list, picks one entry at random and maps
//! it into a [`Subject`]. Transport errors, non-2xx statuses and decode errors
//! are logged and surface as `None`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::subject::{Subject, SubjectPayload};
use super::{SubjectProvider, Theme};
use crate::config::ProvidersConfig;

/// Build the live provider for `theme` from the configured endpoints.
pub fn provider_for(theme: Theme, config: &ProvidersConfig) -> Arc<dyn SubjectProvider> {
    let timeout = Duration::from_secs(config.timeout_seconds.max(1));
    match theme {
        Theme::Countries => Arc::new(RestCountriesProvider::new(&config.countries_url, timeout)),
        Theme::HouseCharacters => Arc::new(HpApiProvider::new(&config.house_characters_url, timeout)),
        Theme::UniverseCharacters => {
            Arc::new(SuperheroApiProvider::new(&config.universe_characters_url, timeout))
        }
    }
}

fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("http client builder failed ({}); using defaults", e);
            reqwest::Client::new()
        })
}

async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    debug!("Fetching subjects from: {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!("HTTP request failed: {}", e))?;
    if !response.status().is_success() {
        return Err(anyhow!("API returned status: {}", response.status()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

fn pick_random<T>(mut items: Vec<T>) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let idx = rand::thread_rng().gen_range(0..items.len());
    Some(items.swap_remove(idx))
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

// ---------------------------------------------------------------- countries

#[derive(Debug, Deserialize)]
pub struct CountryRecord {
    pub name: CountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub flags: Option<CountryFlags>,
}

#[derive(Debug, Deserialize)]
pub struct CountryName {
    pub common: String,
}

#[derive(Debug, Deserialize)]
pub struct CountryFlags {
    #[serde(default)]
    pub svg: Option<String>,
}

impl CountryRecord {
    /// Map to a subject using the five-hint sequence: region, population, capital, subregion, languages.
    pub fn into_subject(self) -> Option<Subject> {
        let capital = self
            .capital
            .first()
            .cloned()
            .unwrap_or_else(|| "N/A".to_string());
        let subregion = self.subregion.unwrap_or_default();
        let languages: Vec<String> = self
            .languages
            .map(|m| m.into_values().collect())
            .unwrap_or_default();
        let hints = vec![
            format!("Region: {}", self.region),
            format!(
                "Population: {:.1} million people",
                self.population as f64 / 1_000_000.0
            ),
            format!("Capital: {}", capital),
            format!("Subregion: {}", or_na(&subregion)),
            if languages.is_empty() {
                "No language data available".to_string()
            } else {
                format!("Languages: {}", languages.join(", "))
            },
        ];
        let name = self.name.common;
        Subject::new(
            name.clone(),
            name,
            hints,
            SubjectPayload::Country {
                capital,
                region: self.region,
                subregion,
                population: self.population,
                languages,
                flag_url: self.flags.and_then(|f| f.svg),
            },
        )
        .ok()
    }
}

pub struct RestCountriesProvider {
    url: String,
    client: reqwest::Client,
}

impl RestCountriesProvider {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client: client(timeout),
        }
    }
}

#[async_trait]
impl SubjectProvider for RestCountriesProvider {
    async fn fetch_subject(&self) -> Option<Subject> {
        match fetch_json::<Vec<CountryRecord>>(&self.client, &self.url).await {
            Ok(list) => pick_random(list).and_then(CountryRecord::into_subject),
            Err(e) => {
                warn!("restcountries: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "restcountries"
    }
}

// --------------------------------------------------------- house characters

#[derive(Debug, Deserialize)]
pub struct HpCharacterRecord {
    pub name: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub ancestry: String,
    #[serde(default)]
    pub patronus: String,
    #[serde(default)]
    pub wand: Option<HpWand>,
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct HpWand {
    #[serde(default)]
    pub wood: String,
    #[serde(default)]
    pub core: String,
    #[serde(default)]
    pub length: Option<f64>,
}

impl HpWand {
    fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.wood.is_empty() {
            parts.push(self.wood.clone());
        }
        if !self.core.is_empty() {
            parts.push(self.core.clone());
        }
        if let Some(len) = self.length {
            parts.push(format!("{}\"", len));
        }
        parts.join(", ")
    }
}

impl HpCharacterRecord {
    /// Characters without a house are too obscure to guess; they are skipped.
    pub fn is_playable(&self) -> bool {
        !self.name.trim().is_empty() && !self.house.trim().is_empty()
    }

    pub fn into_subject(self) -> Option<Subject> {
        let wand = self.wand.map(|w| w.describe()).unwrap_or_default();
        let hints = vec![
            format!("House: {}", self.house),
            format!("Ancestry: {}", or_na(&self.ancestry)),
            format!("Patronus: {}", or_na(&self.patronus)),
            format!("Wand: {}", or_na(&wand)),
            format!("Played by: {}", or_na(&self.actor)),
        ];
        let image_url = if self.image.is_empty() {
            None
        } else {
            Some(self.image)
        };
        Subject::new(
            self.name.clone(),
            self.name,
            hints,
            SubjectPayload::HouseCharacter {
                house: self.house,
                ancestry: self.ancestry,
                patronus: self.patronus,
                wand,
                actor: self.actor,
                image_url,
            },
        )
        .ok()
    }
}

pub struct HpApiProvider {
    url: String,
    client: reqwest::Client,
}

impl HpApiProvider {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client: client(timeout),
        }
    }
}

#[async_trait]
impl SubjectProvider for HpApiProvider {
    async fn fetch_subject(&self) -> Option<Subject> {
        match fetch_json::<Vec<HpCharacterRecord>>(&self.client, &self.url).await {
            Ok(list) => {
                let playable: Vec<_> = list.into_iter().filter(|c| c.is_playable()).collect();
                pick_random(playable).and_then(HpCharacterRecord::into_subject)
            }
            Err(e) => {
                warn!("hp-api: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "hp-api"
    }
}

// ------------------------------------------------------ universe characters

#[derive(Debug, Deserialize)]
pub struct HeroRecord {
    pub name: String,
    #[serde(default)]
    pub biography: HeroBiography,
    #[serde(default)]
    pub connections: HeroConnections,
    #[serde(default)]
    pub images: HeroImages,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeroBiography {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub place_of_birth: String,
    #[serde(default)]
    pub first_appearance: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub alignment: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeroConnections {
    #[serde(default)]
    pub group_affiliation: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct HeroImages {
    #[serde(default)]
    pub md: Option<String>,
}

impl HeroRecord {
    pub fn is_marvel(&self) -> bool {
        self.biography
            .publisher
            .as_deref()
            .map(|p| p.eq_ignore_ascii_case("Marvel Comics"))
            .unwrap_or(false)
    }

    pub fn into_subject(self) -> Option<Subject> {
        let bio = self.biography;
        let affiliation = self
            .connections
            .group_affiliation
            .split([',', ';'])
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        let hints = vec![
            format!("First appearance: {}", or_na(&bio.first_appearance)),
            format!("Affiliation: {}", or_na(&affiliation)),
            format!("Place of birth: {}", or_na(&bio.place_of_birth)),
            format!("Alignment: {}", or_na(&bio.alignment)),
        ];
        let description = format!(
            "{} is a {} character published by Marvel Comics.",
            self.name,
            if bio.alignment == "bad" { "villainous" } else { "heroic" }
        );
        Subject::new(
            self.name.clone(),
            self.name,
            hints,
            SubjectPayload::UniverseCharacter {
                real_name: bio.full_name,
                first_appearance: bio.first_appearance,
                affiliation,
                description,
                image_url: self.images.md,
                wiki_url: None,
            },
        )
        .ok()
    }
}

pub struct SuperheroApiProvider {
    url: String,
    client: reqwest::Client,
}

impl SuperheroApiProvider {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client: client(timeout),
        }
    }
}

#[async_trait]
impl SubjectProvider for SuperheroApiProvider {
    async fn fetch_subject(&self) -> Option<Subject> {
        match fetch_json::<Vec<HeroRecord>>(&self.client, &self.url).await {
            Ok(list) => {
                let marvel: Vec<_> = list.into_iter().filter(|h| h.is_marvel()).collect();
                pick_random(marvel).and_then(HeroRecord::into_subject)
            }
            Err(e) => {
                warn!("superhero-api: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "superhero-api"
    }
}
