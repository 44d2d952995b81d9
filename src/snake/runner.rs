//! Tokio driver for a [`SnakeRound`].
//!
//! The round lives inside a spawned task that races two inputs in
//! `tokio::select!`: the tick interval (countdown period first, then the move
//! period) and an unbounded steering channel. Steering only queues a heading
//! on the round, so the race is settled at the next tick boundary.
//!
//! Dropping the [`SnakeHandle`] aborts the task, which drops its timers.

use std::time::Duration;

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{Direction, EndCause, Phase, SnakeRound, TickOutcome};
use crate::config::SnakeConfig;

/// Timer periods for a round.
#[derive(Debug, Clone, Copy)]
pub struct SnakeTiming {
    pub countdown_interval: Duration,
    pub tick_interval: Duration,
}

impl Default for SnakeTiming {
    fn default() -> Self {
        Self {
            countdown_interval: Duration::from_millis(1000),
            tick_interval: Duration::from_millis(150),
        }
    }
}

impl From<&SnakeConfig> for SnakeTiming {
    fn from(cfg: &SnakeConfig) -> Self {
        Self {
            countdown_interval: Duration::from_millis(cfg.countdown_interval_ms.max(1)),
            tick_interval: Duration::from_millis(cfg.tick_ms.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnakeEvent {
    /// Seconds (countdown ticks) left before the snake starts moving.
    Countdown(u32),
    /// Board snapshot after a start or a move.
    Frame { board: String, score: u32 },
    /// Terminal event, sent once.
    Ended { score: u32, cause: EndCause },
}

pub struct SnakeHandle {
    steer_tx: mpsc::UnboundedSender<Direction>,
    quit_tx: Option<tokio::sync::oneshot::Sender<()>>,
    events: mpsc::UnboundedReceiver<SnakeEvent>,
    task: JoinHandle<()>,
}

impl SnakeHandle {
    /// Feed a heading change; it takes effect at the next tick if accepted.
    pub fn steer(&self, dir: Direction) {
        let _ = self.steer_tx.send(dir);
    }

    /// Ask the round to end now. An `Ended` event with `Abandoned` follows.
    pub fn quit(&mut self) {
        if let Some(tx) = self.quit_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Next event from the round, or `None` once the task has finished.
    pub async fn next_event(&mut self) -> Option<SnakeEvent> {
        self.events.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SnakeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn `round` on the current tokio runtime.
pub fn spawn_round(round: SnakeRound, timing: SnakeTiming) -> SnakeHandle {
    let (steer_tx, steer_rx) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    let (quit_tx, quit_rx) = tokio::sync::oneshot::channel();
    let task = tokio::spawn(drive(round, timing, steer_rx, quit_rx, events_tx));
    SnakeHandle {
        steer_tx,
        quit_tx: Some(quit_tx),
        events,
        task,
    }
}

fn frame(round: &SnakeRound) -> SnakeEvent {
    SnakeEvent::Frame {
        board: round.render(),
        score: round.score(),
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut iv = interval_at(Instant::now() + period, period);
    iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
    iv
}

async fn drive(
    mut round: SnakeRound,
    timing: SnakeTiming,
    mut steer_rx: mpsc::UnboundedReceiver<Direction>,
    mut quit_rx: tokio::sync::oneshot::Receiver<()>,
    events_tx: mpsc::UnboundedSender<SnakeEvent>,
) {
    let mut clock = match round.phase() {
        Phase::Countdown(left) => {
            let _ = events_tx.send(SnakeEvent::Countdown(left));
            ticker(timing.countdown_interval)
        }
        _ => {
            let _ = events_tx.send(frame(&round));
            ticker(timing.tick_interval)
        }
    };
    let mut quit_open = true;

    loop {
        tokio::select! {
            Some(dir) = steer_rx.recv() => {
                let accepted = round.steer(dir);
                trace!("snake: steer {:?} accepted={}", dir, accepted);
            }
            res = &mut quit_rx, if quit_open => {
                quit_open = false;
                if res.is_ok() {
                    if let Some(score) = round.abandon() {
                        let _ = events_tx.send(SnakeEvent::Ended { score, cause: EndCause::Abandoned });
                    }
                    break;
                }
            }
            _ = clock.tick() => {
                let sent = match round.tick() {
                    TickOutcome::Countdown { remaining } => events_tx.send(SnakeEvent::Countdown(remaining)),
                    TickOutcome::Started => {
                        clock = ticker(timing.tick_interval);
                        events_tx.send(frame(&round))
                    }
                    TickOutcome::Moved | TickOutcome::Ate { .. } => events_tx.send(frame(&round)),
                    TickOutcome::Ended { score, cause } => {
                        debug!("snake: round over ({}), score {}", cause.describe(), score);
                        let _ = events_tx.send(SnakeEvent::Ended { score, cause });
                        break;
                    }
                    TickOutcome::Finished => break,
                };
                if sent.is_err() {
                    debug!("snake: event receiver dropped; stopping round");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Cell;

    fn fast() -> SnakeTiming {
        SnakeTiming {
            countdown_interval: Duration::from_millis(2),
            tick_interval: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn runs_into_wall_and_reports_once() {
        let round = SnakeRound::with_layout(
            5,
            vec![Cell::new(2, 2)],
            Direction::Right,
            Cell::new(4, 2),
            3,
        );
        let mut handle = spawn_round(round, fast());
        let mut ended = Vec::new();
        let deadline = tokio::time::Duration::from_secs(5);
        tokio::time::timeout(deadline, async {
            while let Some(ev) = handle.next_event().await {
                if let SnakeEvent::Ended { score, cause } = ev {
                    ended.push((score, cause));
                }
            }
        })
        .await
        .expect("round should finish");
        // Moves to (3,2), eats at (4,2), then leaves the 5x5 grid.
        assert_eq!(ended, vec![(1, EndCause::OutOfBounds)]);
    }

    #[tokio::test]
    async fn quit_abandons_round() {
        let round = SnakeRound::new(crate::snake::RoundSettings {
            seed: Some(9),
            ..Default::default()
        });
        let mut handle = spawn_round(round, SnakeTiming::default());
        assert_eq!(handle.next_event().await, Some(SnakeEvent::Countdown(5)));
        handle.quit();
        let ev = tokio::time::timeout(Duration::from_secs(2), handle.next_event())
            .await
            .expect("event after quit");
        assert_eq!(
            ev,
            Some(SnakeEvent::Ended {
                score: 0,
                cause: EndCause::Abandoned
            })
        );
    }

    #[tokio::test]
    async fn dropping_handle_stops_the_task() {
        let round = SnakeRound::new(crate::snake::RoundSettings {
            seed: Some(3),
            ..Default::default()
        });
        let mut handle = spawn_round(round, SnakeTiming::default());
        assert_eq!(handle.next_event().await, Some(SnakeEvent::Countdown(5)));

        // The task owns the steering receiver, so the channel closes once it is gone.
        let steer = handle.steer_tx.clone();
        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), steer.closed())
            .await
            .expect("task should stop once the handle is dropped");
        assert!(steer.is_closed());
    }
}
