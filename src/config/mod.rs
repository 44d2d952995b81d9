//! # Configuration
//!
//! Termfolio reads a single TOML file. Every section has defaults, so a file
//! may set only the keys it cares about and a missing section falls back to
//! [`Default`].
//!
//! - [`ShellConfig`] - prompt, banner and scrollback limit
//! - [`ProfileConfig`] - the content behind the profile pages (`about`, `skills`, `hireme`, ...)
//! - [`GamesConfig`] - per-theme toggles, scoring and subject source
//! - [`SnakeConfig`] - board size and timing for the snake game
//! - [`ProvidersConfig`] - HTTP endpoints and request timeout
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ```rust,no_run
//! use termfolio::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     println!("prompt: {}", config.shell.prompt);
//!     Ok(())
//! }
//! ```
//!
//! ```toml
//! [shell]
//! prompt = "> "
//!
//! [games.countries]
//! enabled = true
//! source = "http"
//!
//! [snake]
//! tick_ms = 120
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::games::{ScoringPolicy, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub games: GamesConfig,
    #[serde(default)]
    pub snake: SnakeConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub prompt: String,
    /// Maximum number of entries (inputs plus outputs) kept for `history`.
    pub max_scrollback: usize,
    pub banner: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            max_scrollback: 500,
            banner: "Welcome to the terminal portfolio. Type 'help' to get started.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub about: String,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<SkillGroup>,
    pub contact: Vec<ContactEntry>,
    /// Link printed by `resume` and at the end of `hireme`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Bullet points for `hireme`.
    pub hire_me: Vec<String>,
    /// Channels listed by `feedback`.
    pub feedback: Vec<ContactEntry>,
}

fn skill_group(category: &str, items: &[&str]) -> SkillGroup {
    SkillGroup {
        category: category.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Developer".to_string(),
            about: "I'm a full-stack developer passionate about building great web applications."
                .to_string(),
            projects: vec![ProjectEntry {
                name: "termfolio".to_string(),
                description: "A terminal portfolio with built-in guessing games and snake."
                    .to_string(),
                github: None,
                demo: None,
            }],
            skills: vec![
                skill_group(
                    "frontend",
                    &["React.js", "Next.js", "Tailwind CSS", "Bootstrap & Bulma", "HTML5 & CSS3"],
                ),
                skill_group("backend", &["Node.js", "Express.js", "PHP & Laravel"]),
                skill_group("databases", &["MongoDB", "MySQL", "Firebase"]),
                skill_group("tools", &["Git & GitHub", "Postman", "Docker"]),
                skill_group("other", &["GraphQL & Apollo", "Jira", "Netlify & Vercel"]),
            ],
            contact: vec![ContactEntry {
                label: "Email".to_string(),
                value: "you@example.com".to_string(),
            }],
            resume_url: None,
            hire_me: [
                "Passionate about clean, efficient code",
                "Strong problem-solving skills",
                "Great team player",
                "Always eager to learn",
                "Experience with modern tech stack",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            feedback: vec![ContactEntry {
                label: "Email".to_string(),
                value: "you@example.com".to_string(),
            }],
        }
    }
}

/// Where a theme draws its subjects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectSource {
    /// Built-in seed catalog, or `catalog_path` when set.
    Catalog,
    /// Live public API (needs the `http-providers` feature).
    Http,
}

/// Per-theme settings. Unset scoring fields use the theme's own curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_penalty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<u32>,
    #[serde(default = "default_source")]
    pub source: SubjectSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_source() -> SubjectSource {
    SubjectSource::Catalog
}

impl ThemeConfig {
    pub fn for_theme(theme: Theme) -> Self {
        let scoring = theme.default_scoring();
        Self {
            enabled: true,
            step_penalty: Some(scoring.step_penalty),
            floor: Some(scoring.floor),
            source: SubjectSource::Catalog,
            catalog_path: None,
        }
    }

    /// Effective scoring for `theme`, filling unset fields from its defaults.
    pub fn scoring(&self, theme: Theme) -> ScoringPolicy {
        let base = theme.default_scoring();
        ScoringPolicy::new(
            self.step_penalty.unwrap_or(base.step_penalty),
            self.floor.unwrap_or(base.floor),
        )
    }
}

fn default_countries() -> ThemeConfig {
    ThemeConfig::for_theme(Theme::Countries)
}

fn default_house_characters() -> ThemeConfig {
    ThemeConfig::for_theme(Theme::HouseCharacters)
}

fn default_universe_characters() -> ThemeConfig {
    ThemeConfig::for_theme(Theme::UniverseCharacters)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesConfig {
    #[serde(default = "default_countries")]
    pub countries: ThemeConfig,
    #[serde(default = "default_house_characters")]
    pub house_characters: ThemeConfig,
    #[serde(default = "default_universe_characters")]
    pub universe_characters: ThemeConfig,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
            house_characters: default_house_characters(),
            universe_characters: default_universe_characters(),
        }
    }
}

impl GamesConfig {
    pub fn theme(&self, theme: Theme) -> &ThemeConfig {
        match theme {
            Theme::Countries => &self.countries,
            Theme::HouseCharacters => &self.house_characters,
            Theme::UniverseCharacters => &self.universe_characters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub grid_size: u32,
    /// Milliseconds between moves once the round is running.
    pub tick_ms: u64,
    pub countdown_ticks: u32,
    pub countdown_interval_ms: u64,
    /// Fixed RNG seed for food placement; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            tick_ms: 150,
            countdown_ticks: 5,
            countdown_interval_ms: 1000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub timeout_seconds: u64,
    pub countries_url: String,
    pub house_characters_url: String,
    pub universe_characters_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            countries_url: "https://restcountries.com/v3.1/all?fields=name,capital,population,region,subregion,languages,flags".to_string(),
            house_characters_url: "https://hp-api.onrender.com/api/characters".to_string(),
            universe_characters_url: "https://akabab.github.io/superhero-api/api/all.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("termfolio.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config
            .validate()
            .map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the shell or the games cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.shell.max_scrollback == 0 {
            return Err(anyhow!("shell.max_scrollback must be at least 1"));
        }
        if !(5..=60).contains(&self.snake.grid_size) {
            return Err(anyhow!(
                "snake.grid_size must be between 5 and 60 (got {})",
                self.snake.grid_size
            ));
        }
        if self.snake.tick_ms == 0 || self.snake.countdown_interval_ms == 0 {
            return Err(anyhow!("snake timer intervals must be non-zero"));
        }
        if self.providers.timeout_seconds == 0 {
            return Err(anyhow!("providers.timeout_seconds must be non-zero"));
        }
        for theme in Theme::ALL {
            let cfg = self.games.theme(theme);
            let floor = cfg.scoring(theme).floor;
            if floor > crate::games::scoring::BASE_SCORE {
                return Err(anyhow!(
                    "games.{}: floor {} exceeds the base score {}",
                    theme_section(theme),
                    floor,
                    crate::games::scoring::BASE_SCORE
                ));
            }
            if let Some(path) = &cfg.catalog_path {
                if path.trim().is_empty() {
                    return Err(anyhow!(
                        "games.{}: catalog_path is empty",
                        theme_section(theme)
                    ));
                }
            }
        }
        Ok(())
    }
}

fn theme_section(theme: Theme) -> &'static str {
    match theme {
        Theme::Countries => "countries",
        Theme::HouseCharacters => "house_characters",
        Theme::UniverseCharacters => "universe_characters",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.snake.grid_size, 15);
        assert_eq!(config.snake.tick_ms, 150);
        assert_eq!(config.providers.timeout_seconds, 8);
    }

    #[test]
    fn theme_defaults_carry_their_scoring() {
        let games = GamesConfig::default();
        assert_eq!(games.countries.scoring(Theme::Countries), ScoringPolicy::new(20, 20));
        assert_eq!(
            games.house_characters.scoring(Theme::HouseCharacters),
            ScoringPolicy::new(12, 16)
        );
        assert_eq!(
            games.universe_characters.scoring(Theme::UniverseCharacters),
            ScoringPolicy::new(15, 10)
        );
        assert_eq!(games.theme(Theme::Countries).source, SubjectSource::Catalog);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [games.countries]
            step_penalty = 10
            source = "http"

            [snake]
            tick_ms = 90
            "#,
        )
        .unwrap();
        assert_eq!(
            config.games.countries.scoring(Theme::Countries),
            ScoringPolicy::new(10, 20)
        );
        assert!(config.games.countries.enabled);
        assert_eq!(config.games.countries.source, SubjectSource::Http);
        assert_eq!(config.games.house_characters.step_penalty, Some(12));
        assert_eq!(config.snake.tick_ms, 90);
        assert_eq!(config.snake.grid_size, 15);
        assert_eq!(config.shell.prompt, "> ");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.snake.grid_size = 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.games.universe_characters.floor = Some(150);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("universe_characters"), "{}", err);

        let mut config = Config::default();
        config.shell.max_scrollback = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.profile.skills.len(), 5);
        assert_eq!(back.logging.file.as_deref(), Some("termfolio.log"));
    }
}
