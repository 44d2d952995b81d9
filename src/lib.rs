//! # Termfolio - a terminal portfolio with built-in games
//!
//! Termfolio is a line-oriented shell that presents a developer profile
//! (`about`, `projects`, `skills`, `contact`) and hosts a few small games:
//!
//! - **Guessing games**: three themed trivia rounds (countries, Hogwarts
//!   characters, Marvel characters) that share one engine with progressive
//!   hints, a letter-reveal fallback and a per-theme score curve.
//! - **Snake**: a grid snake with a countdown, driven by a Tokio timer task.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use termfolio::config::Config;
//! use termfolio::games::GameRegistry;
//! use termfolio::shell::{CommandShell, ShellOutput};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let games = GameRegistry::from_config(&config)?;
//!     let mut shell = CommandShell::new(config.shell.clone(), config.profile.clone(), games);
//!     if let ShellOutput::Text(t) = shell.execute("country start").await {
//!         println!("{}", t);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`shell`] - command parsing, scrollback and page rendering
//! - [`games`] - themed guessing games and their subject providers
//! - [`snake`] - snake round engine and its async driver
//! - [`config`] - TOML configuration with defaults and validation
//! - [`logutil`] - helpers for logging raw user input

pub mod config;
pub mod games;
pub mod logutil;
pub mod shell;
pub mod snake;
