//! Registry for guessing-game sessions.
//!
//! Holds the provider and scoring configuration for every enabled theme and
//! at most one live session per theme. Sessions are created the first time a
//! command for their theme arrives, so an unused theme never touches its
//! provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::catalog::CatalogProvider;
use super::errors::{CatalogError, GameError};
use super::scoring::ScoringPolicy;
use super::session::{GameReply, GuessGameSession};
use super::{SubjectProvider, Theme};
use crate::config::{Config, SubjectSource};

/// Sub-command under a theme keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Menu,
    Start,
    Hint,
    Guess(String),
    Skip,
}

impl GameCommand {
    /// Parse the words following the theme keyword. Unknown sub-commands fall back to the menu.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> GameCommand {
        let Some(first) = args.first() else {
            return GameCommand::Menu;
        };
        match first.as_ref().to_ascii_lowercase().as_str() {
            "start" => GameCommand::Start,
            "hint" => GameCommand::Hint,
            "skip" => GameCommand::Skip,
            "guess" => GameCommand::Guess(
                args[1..]
                    .iter()
                    .map(|s| s.as_ref())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => GameCommand::Menu,
        }
    }
}

struct ThemeSlot {
    scoring: ScoringPolicy,
    provider: Arc<dyn SubjectProvider>,
    session: Option<GuessGameSession>,
}

pub struct GameRegistry {
    slots: HashMap<Theme, ThemeSlot>,
    fetch_timeout: Duration,
}

impl GameRegistry {
    /// Create an empty registry with no themes registered.
    pub fn new(fetch_timeout: Duration) -> Self {
        GameRegistry {
            slots: HashMap::new(),
            fetch_timeout,
        }
    }

    /// Register a theme with its scoring curve and subject source.
    pub fn with_theme(
        mut self,
        theme: Theme,
        scoring: ScoringPolicy,
        provider: Arc<dyn SubjectProvider>,
    ) -> Self {
        self.slots.insert(
            theme,
            ThemeSlot {
                scoring,
                provider,
                session: None,
            },
        );
        self
    }

    /// Build providers for every enabled theme in `config`.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let timeout = Duration::from_secs(config.providers.timeout_seconds.max(1));
        let mut registry = GameRegistry::new(timeout);
        for theme in Theme::ALL {
            let theme_cfg = config.games.theme(theme);
            if !theme_cfg.enabled {
                debug!("{}: disabled in config", theme.keyword());
                continue;
            }
            let provider = build_provider(config, theme)?;
            info!(
                "{}: registered with provider '{}'",
                theme.keyword(),
                provider.name()
            );
            registry = registry.with_theme(theme, theme_cfg.scoring(theme), provider);
        }
        Ok(registry)
    }

    pub fn is_registered(&self, theme: Theme) -> bool {
        self.slots.contains_key(&theme)
    }

    /// Registered themes in declaration order.
    pub fn themes(&self) -> Vec<Theme> {
        Theme::ALL
            .into_iter()
            .filter(|t| self.slots.contains_key(t))
            .collect()
    }

    /// The live session for `theme`, if one has been created.
    pub fn session(&self, theme: Theme) -> Option<&GuessGameSession> {
        self.slots.get(&theme).and_then(|s| s.session.as_ref())
    }

    fn session_mut(&mut self, theme: Theme) -> Result<&mut GuessGameSession, GameError> {
        let fetch_timeout = self.fetch_timeout;
        let slot = self
            .slots
            .get_mut(&theme)
            .ok_or(GameError::ThemeUnavailable(theme.keyword()))?;
        Ok(slot.session.get_or_insert_with(|| {
            debug!("{}: creating session", theme.keyword());
            GuessGameSession::new(
                theme,
                slot.scoring,
                Arc::clone(&slot.provider),
                fetch_timeout,
            )
        }))
    }

    /// Route one sub-command to the theme's session.
    pub async fn dispatch(
        &mut self,
        theme: Theme,
        command: GameCommand,
    ) -> Result<GameReply, GameError> {
        let session = self.session_mut(theme)?;
        match command {
            GameCommand::Menu => Ok(GameReply::Menu { theme }),
            GameCommand::Start => session.start().await,
            GameCommand::Hint => session.hint(),
            GameCommand::Guess(text) => session.guess(&text),
            GameCommand::Skip => session.skip().await,
        }
    }
}

fn build_provider(config: &Config, theme: Theme) -> Result<Arc<dyn SubjectProvider>, CatalogError> {
    let theme_cfg = config.games.theme(theme);
    match theme_cfg.source {
        SubjectSource::Http => {
            #[cfg(feature = "http-providers")]
            {
                return Ok(super::http::provider_for(theme, &config.providers));
            }
            #[cfg(not(feature = "http-providers"))]
            {
                log::warn!(
                    "{}: http source requested but built without 'http-providers'; using catalog",
                    theme.keyword()
                );
            }
        }
        SubjectSource::Catalog => {}
    }
    let catalog = match &theme_cfg.catalog_path {
        Some(path) => CatalogProvider::from_path(theme, path)?,
        None => CatalogProvider::builtin(theme)?,
    };
    Ok(Arc::new(catalog))
}
