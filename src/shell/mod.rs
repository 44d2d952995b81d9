//! # Command shell
//!
//! The text front-end: one line of input in, one [`ShellOutput`] out. The
//! shell owns the scrollback and the [`GameRegistry`]; it does not own the
//! snake loop, which needs the terminal to itself. When the user types
//! `snake` the shell returns [`ShellOutput::StartSnake`] and the caller
//! reports the outcome back through [`CommandShell::record_snake_result`].
//!
//! Parsing follows the same shape as the rest of the crate: split on
//! whitespace, match the first word case-insensitively, keep the rest as
//! arguments. Theme keywords are resolved through [`Theme::from_keyword`].

pub mod pages;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::{debug, trace};

use crate::config::{ProfileConfig, ShellConfig};
use crate::games::{GameCommand, GameError, GameRegistry, Theme};
use crate::logutil::escape_log;
use crate::snake::EndCause;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    About,
    Projects,
    Skills,
    Contact,
    Resume,
    HireMe,
    Feedback,
    Echo(String),
    Clear,
    Uptime,
    History,
    Snake,
    Game(Theme, GameCommand),
    Exit,
    Empty,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> ShellCommand {
        let trimmed = raw.trim();
        let mut words = trimmed.split_whitespace();
        let Some(first) = words.next() else {
            return ShellCommand::Empty;
        };
        let cmd = first.to_ascii_lowercase();
        let cmd_str = cmd.as_str();
        let parsed = match cmd_str {
            "help" | "?" => ShellCommand::Help,
            "about" => ShellCommand::About,
            "projects" => ShellCommand::Projects,
            "skills" => ShellCommand::Skills,
            "contact" => ShellCommand::Contact,
            "resume" | "cv" => ShellCommand::Resume,
            "hireme" => ShellCommand::HireMe,
            "feedback" => ShellCommand::Feedback,
            "echo" => {
                // Keep the user's spacing and case after the command word.
                let rest = trimmed[first.len()..].trim_start();
                ShellCommand::Echo(rest.to_string())
            }
            "clear" | "cls" => ShellCommand::Clear,
            "uptime" => ShellCommand::Uptime,
            "history" => ShellCommand::History,
            "snake" => ShellCommand::Snake,
            "exit" | "quit" => ShellCommand::Exit,
            other => match Theme::from_keyword(other) {
                Some(theme) => {
                    let args: Vec<&str> = words.collect();
                    ShellCommand::Game(theme, GameCommand::parse(&args))
                }
                None => ShellCommand::Unknown(cmd.clone()),
            },
        };
        trace!("Parsed {:?} from '{}'", parsed, escape_log(raw));
        parsed
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// What the caller should do after a line was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutput {
    Text(String),
    /// Wipe the screen; the scrollback has already been emptied.
    Clear,
    /// Hand the terminal to a snake round.
    StartSnake,
    Exit,
    /// Nothing to print (blank input).
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollbackEntry {
    Input(String),
    Output(String),
}

pub struct CommandShell {
    config: ShellConfig,
    profile: ProfileConfig,
    parser: CommandParser,
    games: GameRegistry,
    scrollback: VecDeque<ScrollbackEntry>,
    started_at: DateTime<Utc>,
}

impl CommandShell {
    pub fn new(config: ShellConfig, profile: ProfileConfig, games: GameRegistry) -> Self {
        Self {
            config,
            profile,
            parser: CommandParser::new(),
            games,
            scrollback: VecDeque::new(),
            started_at: Utc::now(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn banner(&self) -> &str {
        &self.config.banner
    }

    pub fn games(&self) -> &GameRegistry {
        &self.games
    }

    pub fn scrollback(&self) -> impl Iterator<Item = &ScrollbackEntry> {
        self.scrollback.iter()
    }

    fn push(&mut self, entry: ScrollbackEntry) {
        let cap = self.config.max_scrollback.max(1);
        while self.scrollback.len() >= cap {
            self.scrollback.pop_front();
        }
        self.scrollback.push_back(entry);
    }

    /// Run one line of input.
    pub async fn execute(&mut self, line: &str) -> ShellOutput {
        let command = self.parser.parse(line);
        if command == ShellCommand::Empty {
            return ShellOutput::Nothing;
        }
        debug!("shell: '{}'", escape_log(line));
        self.push(ScrollbackEntry::Input(line.trim().to_string()));

        let output = match command {
            ShellCommand::Clear => {
                self.scrollback.clear();
                return ShellOutput::Clear;
            }
            ShellCommand::Exit => return ShellOutput::Exit,
            ShellCommand::Snake => return ShellOutput::StartSnake,
            ShellCommand::Empty => return ShellOutput::Nothing,
            ShellCommand::Help => pages::help(&self.games.themes()),
            ShellCommand::About => pages::about(&self.profile),
            ShellCommand::Projects => pages::projects(&self.profile),
            ShellCommand::Skills => pages::skills(&self.profile),
            ShellCommand::Contact => pages::contact(&self.profile),
            ShellCommand::Resume => pages::resume(&self.profile),
            ShellCommand::HireMe => pages::hireme(&self.profile),
            ShellCommand::Feedback => pages::feedback(&self.profile),
            ShellCommand::Echo(text) => {
                if text.is_empty() {
                    "Usage: echo <text>".to_string()
                } else {
                    text
                }
            }
            ShellCommand::Uptime => {
                let secs = (Utc::now() - self.started_at).num_seconds().max(0);
                format!("Terminal has been running for {} seconds", secs)
            }
            ShellCommand::History => self.history_text(),
            ShellCommand::Game(theme, cmd) => self.run_game(theme, cmd).await,
            ShellCommand::Unknown(word) => format!(
                "Command not found: {}. Type 'help' for available commands.",
                word
            ),
        };
        self.push(ScrollbackEntry::Output(output.clone()));
        ShellOutput::Text(output)
    }

    async fn run_game(&mut self, theme: Theme, cmd: GameCommand) -> String {
        let is_skip = cmd == GameCommand::Skip;
        match self.games.dispatch(theme, cmd).await {
            Ok(reply) => reply.render(),
            Err(err) => {
                debug!("{}: {}", theme.keyword(), err);
                game_error_text(theme, &err, is_skip)
            }
        }
    }

    fn history_text(&self) -> String {
        let inputs: Vec<&str> = self
            .scrollback
            .iter()
            .filter_map(|e| match e {
                ScrollbackEntry::Input(s) => Some(s.as_str()),
                ScrollbackEntry::Output(_) => None,
            })
            .collect();
        inputs
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{:>4}  {}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Log the end of a snake round into the scrollback and return the message.
    pub fn record_snake_result(&mut self, score: u32, cause: EndCause) -> String {
        debug!("snake: {} with score {}", cause.describe(), score);
        let text = format!("Game Over! Final Score: {}. Type 'snake' to play again!", score);
        self.push(ScrollbackEntry::Output(text.clone()));
        text
    }
}

/// User-facing line for a failed game command.
pub fn game_error_text(theme: Theme, err: &GameError, during_skip: bool) -> String {
    let kw = theme.keyword();
    let noun = theme.noun();
    match err {
        GameError::NoActiveGame => format!("No active game! Type '{} start' to begin.", kw),
        GameError::EmptyGuess => format!(
            "Please provide a guess! Usage: {} guess <{} name>",
            kw, noun
        ),
        GameError::ProviderUnavailable | GameError::InvalidSubject(_) => {
            if during_skip {
                format!("Failed to fetch new {}. Please try again.", noun)
            } else {
                "Failed to start the game. Please try again.".to_string()
            }
        }
        GameError::RequestPending => {
            format!("Still fetching a {}. Please wait a moment.", noun)
        }
        GameError::ThemeUnavailable(name) => {
            format!("The '{}' game is not enabled on this terminal.", name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_commands() {
        let p = CommandParser::new();
        assert_eq!(p.parse("HELP"), ShellCommand::Help);
        assert_eq!(p.parse("  about "), ShellCommand::About);
        assert_eq!(p.parse(""), ShellCommand::Empty);
        assert_eq!(p.parse("   "), ShellCommand::Empty);
        assert_eq!(p.parse("quit"), ShellCommand::Exit);
        assert_eq!(p.parse("HireMe"), ShellCommand::HireMe);
        assert_eq!(p.parse("cv"), ShellCommand::Resume);
        assert_eq!(p.parse("feedback"), ShellCommand::Feedback);
        assert_eq!(p.parse("Echo  Hello   World"), ShellCommand::Echo("Hello   World".into()));
        assert_eq!(p.parse("frobnicate now"), ShellCommand::Unknown("frobnicate".into()));
    }

    #[test]
    fn parses_theme_commands_and_aliases() {
        let p = CommandParser::new();
        assert_eq!(
            p.parse("country guess New Zealand"),
            ShellCommand::Game(Theme::Countries, GameCommand::Guess("New Zealand".into()))
        );
        assert_eq!(
            p.parse("hogwarts"),
            ShellCommand::Game(Theme::HouseCharacters, GameCommand::Menu)
        );
        assert_eq!(
            p.parse("MARVEL hint"),
            ShellCommand::Game(Theme::UniverseCharacters, GameCommand::Hint)
        );
    }

    #[test]
    fn error_text_uses_theme_wording() {
        assert_eq!(
            game_error_text(Theme::Countries, &GameError::NoActiveGame, false),
            "No active game! Type 'country start' to begin."
        );
        assert_eq!(
            game_error_text(Theme::Countries, &GameError::EmptyGuess, false),
            "Please provide a guess! Usage: country guess <country name>"
        );
        assert_eq!(
            game_error_text(Theme::HouseCharacters, &GameError::ProviderUnavailable, true),
            "Failed to fetch new character. Please try again."
        );
        assert_eq!(
            game_error_text(Theme::UniverseCharacters, &GameError::ProviderUnavailable, false),
            "Failed to start the game. Please try again."
        );
    }

    fn shell(max_scrollback: usize) -> CommandShell {
        let config = ShellConfig {
            max_scrollback,
            ..ShellConfig::default()
        };
        let games = GameRegistry::new(std::time::Duration::from_secs(1));
        CommandShell::new(config, ProfileConfig::default(), games)
    }

    #[tokio::test]
    async fn scrollback_is_bounded_and_clear_empties_it() {
        let mut sh = shell(4);
        for i in 0..5 {
            sh.execute(&format!("echo {}", i)).await;
        }
        assert_eq!(sh.scrollback().count(), 4);
        assert_eq!(
            sh.scrollback().last(),
            Some(&ScrollbackEntry::Output("4".into()))
        );
        assert_eq!(sh.execute("clear").await, ShellOutput::Clear);
        assert_eq!(sh.scrollback().count(), 0);
    }

    #[tokio::test]
    async fn disabled_theme_is_reported() {
        let mut sh = shell(10);
        assert_eq!(
            sh.execute("country start").await,
            ShellOutput::Text("The 'country' game is not enabled on this terminal.".into())
        );
    }

    #[tokio::test]
    async fn snake_result_lands_in_scrollback() {
        let mut sh = shell(10);
        assert_eq!(sh.execute("snake").await, ShellOutput::StartSnake);
        let text = sh.record_snake_result(7, EndCause::OutOfBounds);
        assert_eq!(text, "Game Over! Final Score: 7. Type 'snake' to play again!");
        assert_eq!(
            sh.scrollback().last(),
            Some(&ScrollbackEntry::Output(text))
        );
    }
}
