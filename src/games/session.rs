//! Per-theme guessing-game state machine.
//!
//! A session is `Idle` until a subject arrives, `Active` while a subject is
//! being guessed, and back to `Idle` after a correct guess. Subject fetches are
//! split into an explicit begin/resolve pair so a session can report that a
//! request is outstanding; [`GuessGameSession::start`] and
//! [`GuessGameSession::skip`] wrap both halves around the provider call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::disclosure::{next_disclosure, Disclosure};
use super::errors::GameError;
use super::scoring::ScoringPolicy;
use super::subject::Subject;
use super::{SubjectProvider, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

#[derive(Debug, Clone)]
enum FetchKind {
    Start,
    Skip { previous: String },
}

#[derive(Debug, Clone)]
struct PendingFetch {
    kind: FetchKind,
    started_at: Instant,
}

/// Successful result of a session operation, ready for the shell to render.
#[derive(Debug, Clone, PartialEq)]
pub enum GameReply {
    /// Idle status: the theme menu.
    Menu { theme: Theme },
    /// Active status query.
    InProgress { theme: Theme, hints_consumed: usize },
    /// A new subject is in play. `skipped` names the subject it replaced.
    Started {
        theme: Theme,
        teaser: Option<String>,
        skipped: Option<String>,
    },
    Disclosed(Disclosure),
    Correct {
        theme: Theme,
        display_name: String,
        reveal: String,
        score: u32,
    },
    Wrong { theme: Theme },
}

impl GameReply {
    pub fn render(&self) -> String {
        match self {
            GameReply::Menu { theme } => theme.menu_text(),
            GameReply::InProgress {
                theme,
                hints_consumed,
            } => format!(
                "{} in progress ({} hint{} used). Type '{} hint' or '{} guess <{} name>'.",
                theme.info().title,
                hints_consumed,
                if *hints_consumed == 1 { "" } else { "s" },
                theme.keyword(),
                theme.keyword(),
                theme.noun()
            ),
            GameReply::Started {
                theme,
                teaser,
                skipped,
            } => {
                let info = theme.info();
                let mut out = match skipped {
                    Some(prev) => format!(
                        "The {} was {}! Here's your new {}:\n",
                        info.noun, prev, info.noun
                    ),
                    None => format!("{} Welcome to {}!\n", info.icon, info.title),
                };
                if let Some(t) = teaser {
                    out.push_str(t);
                    out.push('\n');
                }
                if skipped.is_none() {
                    out.push_str(info.welcome);
                    out.push('\n');
                }
                out.push_str(&theme.play_instructions());
                out
            }
            GameReply::Disclosed(d) => d.to_string(),
            GameReply::Correct {
                theme,
                reveal,
                score,
                ..
            } => format!(
                "{}\n{}\nScore: {} points\nType '{} start' to play again!",
                theme.info().correct_banner,
                reveal,
                score,
                theme.keyword()
            ),
            GameReply::Wrong { theme } => format!(
                "Wrong guess! Try again or type '{} hint' for a hint.",
                theme.keyword()
            ),
        }
    }
}

/// One theme's game: the current subject (if any) and how many hints were consumed.
pub struct GuessGameSession {
    theme: Theme,
    scoring: ScoringPolicy,
    provider: Arc<dyn SubjectProvider>,
    fetch_timeout: Duration,
    subject: Option<Subject>,
    hints_consumed: usize,
    pending: Option<PendingFetch>,
}

impl GuessGameSession {
    pub fn new(
        theme: Theme,
        scoring: ScoringPolicy,
        provider: Arc<dyn SubjectProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            theme,
            scoring,
            provider,
            fetch_timeout,
            subject: None,
            hints_consumed: 0,
            pending: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }

    pub fn state(&self) -> SessionState {
        if self.subject.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn hints_consumed(&self) -> usize {
        self.hints_consumed
    }

    /// True while a subject request is outstanding and not yet abandoned.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|p| p.started_at.elapsed() < self.fetch_timeout)
            .unwrap_or(false)
    }

    fn ensure_not_pending(&self) -> Result<(), GameError> {
        if self.is_pending() {
            return Err(GameError::RequestPending);
        }
        Ok(())
    }

    fn active_subject(&self) -> Result<&Subject, GameError> {
        self.subject.as_ref().ok_or(GameError::NoActiveGame)
    }

    /// Put `subject` in play from any state and reset progress.
    pub fn start_with(&mut self, subject: Subject) -> GameReply {
        self.start_inner(subject, None)
    }

    fn start_inner(&mut self, subject: Subject, skipped: Option<String>) -> GameReply {
        info!(
            "{}: new round ({} hints, {} letters)",
            self.theme.keyword(),
            subject.hint_count(),
            subject.identifier_len()
        );
        let teaser = subject.payload.teaser();
        self.subject = Some(subject);
        self.hints_consumed = 0;
        GameReply::Started {
            theme: self.theme,
            teaser,
            skipped,
        }
    }

    /// Mark a start request as outstanding.
    pub fn begin_start(&mut self) -> Result<(), GameError> {
        self.ensure_not_pending()?;
        self.pending = Some(PendingFetch {
            kind: FetchKind::Start,
            started_at: Instant::now(),
        });
        Ok(())
    }

    /// Mark a skip request as outstanding; the current subject stays in play until it resolves.
    pub fn begin_skip(&mut self) -> Result<(), GameError> {
        self.ensure_not_pending()?;
        let previous = self.active_subject()?.display_name.clone();
        self.pending = Some(PendingFetch {
            kind: FetchKind::Skip { previous },
            started_at: Instant::now(),
        });
        Ok(())
    }

    /// Complete the outstanding request with whatever the provider produced.
    ///
    /// `None` or an invalid subject leaves the session exactly as it was before
    /// the request began.
    pub fn resolve(&mut self, fetched: Option<Subject>) -> Result<GameReply, GameError> {
        let pending = match self.pending.take() {
            Some(p) => p,
            None => {
                warn!("{}: resolve without a pending request", self.theme.keyword());
                return Err(GameError::ProviderUnavailable);
            }
        };
        let subject = match fetched {
            Some(s) => match s.validate() {
                Ok(()) => s,
                Err(e) => {
                    warn!("{}: provider returned {}", self.theme.keyword(), e);
                    return Err(GameError::ProviderUnavailable);
                }
            },
            None => return Err(GameError::ProviderUnavailable),
        };
        let skipped = match pending.kind {
            FetchKind::Start => None,
            FetchKind::Skip { previous } => Some(previous),
        };
        Ok(self.start_inner(subject, skipped))
    }

    async fn fetch(&self) -> Option<Subject> {
        let provider = Arc::clone(&self.provider);
        match tokio::time::timeout(self.fetch_timeout, provider.fetch_subject()).await {
            Ok(found) => found,
            Err(_) => {
                warn!(
                    "{}: provider '{}' timed out after {:?}",
                    self.theme.keyword(),
                    provider.name(),
                    self.fetch_timeout
                );
                None
            }
        }
    }

    /// Fetch a subject and start a round with it.
    pub async fn start(&mut self) -> Result<GameReply, GameError> {
        self.begin_start()?;
        let fetched = self.fetch().await;
        self.resolve(fetched)
    }

    /// Replace the current subject with a freshly fetched one.
    pub async fn skip(&mut self) -> Result<GameReply, GameError> {
        self.begin_skip()?;
        let fetched = self.fetch().await;
        self.resolve(fetched)
    }

    /// Serve the next disclosure, consuming a hint unless the answer is exhausted.
    pub fn hint(&mut self) -> Result<GameReply, GameError> {
        self.ensure_not_pending()?;
        let disclosure = next_disclosure(self.active_subject()?, self.hints_consumed);
        if disclosure.advances() {
            self.hints_consumed += 1;
        }
        debug!(
            "{}: hint served, hints_consumed={}",
            self.theme.keyword(),
            self.hints_consumed
        );
        Ok(GameReply::Disclosed(disclosure))
    }

    /// Check a guess; a correct one scores and ends the round.
    pub fn guess(&mut self, candidate: &str) -> Result<GameReply, GameError> {
        self.ensure_not_pending()?;
        let subject = self.active_subject()?;
        if candidate.trim().is_empty() {
            return Err(GameError::EmptyGuess);
        }
        if !subject.matches(candidate) {
            return Ok(GameReply::Wrong { theme: self.theme });
        }

        let score = self.scoring.score(self.hints_consumed);
        let reveal = subject.payload.reveal(&subject.display_name);
        let display_name = subject.display_name.clone();
        info!(
            "{}: solved after {} hints, score {}",
            self.theme.keyword(),
            self.hints_consumed,
            score
        );
        self.subject = None;
        self.hints_consumed = 0;
        Ok(GameReply::Correct {
            theme: self.theme,
            display_name,
            reveal,
            score,
        })
    }

    /// Menu when idle, progress summary when active.
    pub fn status(&self) -> GameReply {
        match self.state() {
            SessionState::Idle => GameReply::Menu { theme: self.theme },
            SessionState::Active => GameReply::InProgress {
                theme: self.theme,
                hints_consumed: self.hints_consumed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::subject::SubjectPayload;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        queue: Mutex<Vec<Option<Subject>>>,
    }

    #[async_trait]
    impl SubjectProvider for Scripted {
        async fn fetch_subject(&self) -> Option<Subject> {
            let mut q = self.queue.lock().unwrap();
            if q.is_empty() {
                None
            } else {
                q.remove(0)
            }
        }
        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn country(name: &str) -> Subject {
        Subject::new(
            name,
            name,
            vec!["Region: Europe".into(), "Capital: Paris".into()],
            SubjectPayload::Country {
                capital: "Paris".into(),
                region: "Europe".into(),
                subregion: String::new(),
                population: 1,
                languages: vec![],
                flag_url: None,
            },
        )
        .unwrap()
    }

    fn session(queue: Vec<Option<Subject>>) -> GuessGameSession {
        GuessGameSession::new(
            Theme::Countries,
            ScoringPolicy::new(20, 20),
            Arc::new(Scripted {
                queue: Mutex::new(queue),
            }),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn fresh_session_rejects_hint_and_guess() {
        let mut s = session(vec![]);
        assert_eq!(s.hint(), Err(GameError::NoActiveGame));
        assert_eq!(s.guess("France"), Err(GameError::NoActiveGame));
        assert_eq!(s.status(), GameReply::Menu { theme: Theme::Countries });
    }

    #[test]
    fn empty_guess_is_rejected_without_state_change() {
        let mut s = session(vec![]);
        s.start_with(country("France"));
        assert_eq!(s.guess("   "), Err(GameError::EmptyGuess));
        assert!(s.is_active());
    }

    #[test]
    fn exhaustion_does_not_advance_counter() {
        let mut s = session(vec![]);
        s.start_with(country("Chad"));
        for _ in 0..(2 + 4) {
            assert!(matches!(s.hint(), Ok(GameReply::Disclosed(_))));
        }
        assert_eq!(s.hints_consumed(), 6);
        assert_eq!(s.hint(), Ok(GameReply::Disclosed(Disclosure::Exhausted)));
        assert_eq!(s.hints_consumed(), 6);
    }

    #[test]
    fn pending_request_blocks_other_operations() {
        let mut s = session(vec![]);
        s.start_with(country("France"));
        s.begin_skip().unwrap();
        assert!(s.is_pending());
        assert_eq!(s.hint(), Err(GameError::RequestPending));
        assert_eq!(s.begin_start(), Err(GameError::RequestPending));
        assert_eq!(s.resolve(None), Err(GameError::ProviderUnavailable));
        assert!(!s.is_pending());
        assert_eq!(s.subject().unwrap().identifier, "France");
    }

    #[tokio::test]
    async fn skip_failure_keeps_old_subject() {
        let mut s = session(vec![None]);
        s.start_with(country("France"));
        s.hint().unwrap();
        assert_eq!(s.skip().await, Err(GameError::ProviderUnavailable));
        assert_eq!(s.subject().unwrap().identifier, "France");
        assert_eq!(s.hints_consumed(), 1);
    }

    #[tokio::test]
    async fn skip_reports_previous_subject() {
        let mut s = session(vec![Some(country("Spain"))]);
        s.start_with(country("France"));
        s.hint().unwrap();
        let reply = s.skip().await.unwrap();
        assert_eq!(
            reply,
            GameReply::Started {
                theme: Theme::Countries,
                teaser: None,
                skipped: Some("France".into())
            }
        );
        assert_eq!(s.hints_consumed(), 0);
        assert!(reply.render().contains("The country was France!"));
    }

    #[tokio::test]
    async fn invalid_provider_subject_counts_as_unavailable() {
        let mut broken = country("Peru");
        broken.hints.clear();
        let mut s = session(vec![Some(broken)]);
        assert_eq!(s.start().await, Err(GameError::ProviderUnavailable));
        assert_eq!(s.state(), SessionState::Idle);
    }
}
