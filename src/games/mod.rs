//! # Guessing games
//!
//! Three themed trivia games (countries, house characters, universe characters)
//! share one engine. A theme only contributes configuration: its command
//! keyword, display text, a [`ScoringPolicy`] and a [`SubjectProvider`].
//!
//! - [`disclosure`] - what a hint request reveals for a given progress count
//! - [`scoring`] - the score curve for a correct guess
//! - [`session`] - the per-theme state machine (start/hint/guess/skip)
//! - [`registry`] - one lazily created session per theme, routed by keyword
//! - [`catalog`] - seed-file subject providers
//! - `http` - live REST subject providers (feature `http-providers`)

pub mod catalog;
pub mod disclosure;
pub mod errors;
#[cfg(feature = "http-providers")]
pub mod http;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod subject;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use disclosure::{next_disclosure, Disclosure};
pub use errors::{CatalogError, GameError};
pub use registry::{GameCommand, GameRegistry};
pub use scoring::ScoringPolicy;
pub use session::{GameReply, GuessGameSession, SessionState};
pub use subject::{Subject, SubjectPayload};

/// Source of subjects for one theme.
///
/// Implementations must never fail loudly: any upstream problem is logged and
/// reported as `None`, which the session turns into
/// [`GameError::ProviderUnavailable`].
#[async_trait]
pub trait SubjectProvider: Send + Sync {
    async fn fetch_subject(&self) -> Option<Subject>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

/// The three guessing-game flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Countries,
    HouseCharacters,
    UniverseCharacters,
}

/// Static description of a theme as surfaced in the shell.
#[derive(Debug, Clone, Copy)]
pub struct ThemeInfo {
    pub theme: Theme,
    pub keyword: &'static str,
    pub aliases: &'static [&'static str],
    pub title: &'static str,
    pub icon: &'static str,
    pub noun: &'static str,
    pub welcome: &'static str,
    pub correct_banner: &'static str,
    pub scoring: ScoringPolicy,
}

const THEMES: [ThemeInfo; 3] = [
    ThemeInfo {
        theme: Theme::Countries,
        keyword: "country",
        aliases: &["countries", "flag"],
        title: "Guess the Country",
        icon: "🌍",
        noun: "country",
        welcome: "I'm thinking of a country... Try to guess it!",
        correct_banner: "Congratulations! You guessed correctly!",
        scoring: ScoringPolicy::new(20, 20),
    },
    ThemeInfo {
        theme: Theme::HouseCharacters,
        keyword: "hogwarts",
        aliases: &["hp", "wizard"],
        title: "Hogwarts Character Challenge",
        icon: "⚡",
        noun: "character",
        welcome: "I'm thinking of a witch or wizard... Who is it?",
        correct_banner: "Brilliant! You've identified the character correctly!",
        scoring: ScoringPolicy::new(12, 16),
    },
    ThemeInfo {
        theme: Theme::UniverseCharacters,
        keyword: "marvel",
        aliases: &["hero", "heroes"],
        title: "Marvel Character Challenge",
        icon: "🦸",
        noun: "character",
        welcome: "I'm thinking of a hero (or villain)... Who is it?",
        correct_banner: "Excelsior! You've identified the character correctly!",
        scoring: ScoringPolicy::new(15, 10),
    },
];

impl Theme {
    pub const ALL: [Theme; 3] = [
        Theme::Countries,
        Theme::HouseCharacters,
        Theme::UniverseCharacters,
    ];

    pub fn info(self) -> &'static ThemeInfo {
        match self {
            Theme::Countries => &THEMES[0],
            Theme::HouseCharacters => &THEMES[1],
            Theme::UniverseCharacters => &THEMES[2],
        }
    }

    pub fn keyword(self) -> &'static str {
        self.info().keyword
    }

    pub fn noun(self) -> &'static str {
        self.info().noun
    }

    /// Scoring curve used when the config does not override it.
    pub fn default_scoring(self) -> ScoringPolicy {
        self.info().scoring
    }

    /// Resolve a shell keyword (or alias) to a theme, ignoring case.
    pub fn from_keyword(word: &str) -> Option<Theme> {
        THEMES
            .iter()
            .find(|info| {
                info.keyword.eq_ignore_ascii_case(word)
                    || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(word))
            })
            .map(|info| info.theme)
    }

    /// Menu shown for a bare `<keyword>` or any unrecognised sub-command.
    pub fn menu_text(self) -> String {
        let info = self.info();
        let kw = info.keyword;
        format!(
            "{} {} Game\nCommands:\n  - '{kw} start' to start a new game\n  - '{kw} hint' for a hint\n  - '{kw} guess <{noun} name>' to make a guess\n  - '{kw} skip' to skip the current {noun}\n",
            info.icon,
            info.title,
            kw = kw,
            noun = info.noun
        )
    }

    /// Command reminder printed after a round starts.
    pub fn play_instructions(self) -> String {
        let info = self.info();
        let kw = info.keyword;
        format!(
            "Commands:\n  - '{kw} hint' for a hint\n  - '{kw} guess <{noun} name>' to make a guess\n  - '{kw} skip' to skip this {noun}\nType '{kw} hint' to get your first hint!",
            kw = kw,
            noun = info.noun
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_aliases_resolve() {
        assert_eq!(Theme::from_keyword("country"), Some(Theme::Countries));
        assert_eq!(Theme::from_keyword("COUNTRIES"), Some(Theme::Countries));
        assert_eq!(Theme::from_keyword("hogwarts"), Some(Theme::HouseCharacters));
        assert_eq!(Theme::from_keyword("Marvel"), Some(Theme::UniverseCharacters));
        assert_eq!(Theme::from_keyword("snake"), None);
    }

    #[test]
    fn info_table_lines_up_with_variants() {
        for theme in Theme::ALL {
            assert_eq!(theme.info().theme, theme);
        }
    }

    #[test]
    fn default_scoring_per_theme() {
        assert_eq!(Theme::Countries.default_scoring(), ScoringPolicy::new(20, 20));
        assert_eq!(
            Theme::HouseCharacters.default_scoring(),
            ScoringPolicy::new(12, 16)
        );
        assert_eq!(
            Theme::UniverseCharacters.default_scoring(),
            ScoringPolicy::new(15, 10)
        );
    }

    #[test]
    fn menu_lists_all_subcommands() {
        let menu = Theme::Countries.menu_text();
        assert!(menu.contains("'country start'"));
        assert!(menu.contains("'country hint'"));
        assert!(menu.contains("'country guess <country name>'"));
        assert!(menu.contains("'country skip'"));
    }
}
