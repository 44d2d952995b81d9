//! Binary entrypoint for the termfolio CLI.
//!
//! Commands:
//! - `run` (default) - start the interactive shell on stdin/stdout
//! - `init [--force]` - write a starter `config.toml`
//! - `snake` - play a single snake round without the shell
//!
//! See the library crate docs for module-level details: `termfolio::`.
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use termfolio::config::Config;
use termfolio::games::GameRegistry;
use termfolio::shell::{CommandShell, ShellOutput};
use termfolio::snake::runner::{spawn_round, SnakeEvent, SnakeTiming};
use termfolio::snake::{Direction, EndCause, RoundSettings, SnakeRound};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Parser)]
#[command(name = "termfolio")]
#[command(about = "A terminal portfolio with guessing games and snake")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; also echoes log lines to a TTY stderr)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Run,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Play one round of snake
    Snake,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Init { force } => {
            init_logging(&None, cli.verbose);
            if Path::new(&cli.config).exists() && !force {
                return Err(anyhow!(
                    "{} already exists (use --force to overwrite)",
                    cli.config
                ));
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            println!("Wrote default configuration to {}", cli.config);
        }
        Commands::Run => {
            let config = load_config(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            info!("Starting termfolio v{}", env!("CARGO_PKG_VERSION"));
            run_shell(config).await?;
        }
        Commands::Snake => {
            let config = load_config(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            if let Some((score, _)) = play_snake(&config, &mut lines).await? {
                println!("Game Over! Final Score: {}. Type 'snake' to play again!", score);
            }
        }
    }

    Ok(())
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
async fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

async fn run_shell(config: Config) -> Result<()> {
    let games = GameRegistry::from_config(&config)?;
    let mut shell = CommandShell::new(config.shell.clone(), config.profile.clone(), games);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", shell.banner());
    loop {
        print!("{}", shell.prompt());
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match shell.execute(&line).await {
            ShellOutput::Text(text) => println!("{}", text),
            ShellOutput::Clear => print!("{}", CLEAR_SCREEN),
            ShellOutput::Nothing => {}
            ShellOutput::Exit => {
                println!("Goodbye!");
                break;
            }
            ShellOutput::StartSnake => {
                let stdin_open = match play_snake(&config, &mut lines).await? {
                    Some((score, cause)) => {
                        println!("{}", shell.record_snake_result(score, cause));
                        true
                    }
                    None => false,
                };
                if !stdin_open {
                    break;
                }
            }
        }
    }
    info!("Shell closed");
    Ok(())
}

/// Run one snake round, reading steering lines from `lines`.
///
/// Returns `None` when stdin closed mid-round.
async fn play_snake(
    config: &Config,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<(u32, EndCause)>> {
    let round = SnakeRound::new(RoundSettings::from(&config.snake));
    let mut handle = spawn_round(round, SnakeTiming::from(&config.snake));
    println!("Steer with w/a/s/d or h/j/k/l then Enter. Type 'q' to give up.");

    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(SnakeEvent::Countdown(n)) => println!("Starting in {}...", n),
                Some(SnakeEvent::Frame { board, score }) => {
                    print!("{}{}\nScore: {}\n", CLEAR_SCREEN, board, score);
                    let _ = std::io::stdout().flush();
                }
                Some(SnakeEvent::Ended { score, cause }) => {
                    println!("{}", cause.describe());
                    return Ok(Some((score, cause)));
                }
                None => {
                    warn!("snake task stopped without an end event");
                    return Ok(Some((0, EndCause::Abandoned)));
                }
            },
            line = lines.next_line() => match line? {
                Some(input) => {
                    let input = input.trim();
                    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
                        handle.quit();
                    } else if let Some(dir) = steering(input) {
                        handle.steer(dir);
                    }
                }
                None => return Ok(None),
            },
        }
    }
}

/// A whole word (`up`, arrow escape) or, failing that, the last key typed.
fn steering(input: &str) -> Option<Direction> {
    Direction::from_input(input).or_else(|| {
        input
            .chars()
            .last()
            .and_then(|c| Direction::from_input(&c.to_string()))
    })
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    // The shell owns stdout; log lines go to the file and only reach the
    // terminal (stderr) when asked for with -v.
    let echo_console = verbosity > 0 && atty::is(atty::Stream::Stderr);
    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.clone())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| eprintln!("Cannot open log file {}: {}", path, e))
                .ok()
        });

    let file = log_file.map(|f| std::sync::Arc::new(std::sync::Mutex::new(f)));
    builder.format(move |fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!("{} [{}] {}", ts, record.level(), record.args());
        if let Some(file) = &file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
        }
        if echo_console {
            writeln!(fmt, "{}", line)
        } else {
            Ok(())
        }
    });
    let _ = builder.try_init();
}
