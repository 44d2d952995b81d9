//! Snake rounds driven tick by tick, plus one full round through the runner.
use std::time::Duration;

use termfolio::config::SnakeConfig;
use termfolio::snake::runner::{spawn_round, SnakeEvent, SnakeTiming};
use termfolio::snake::{Cell, Direction, EndCause, Phase, RoundSettings, SnakeRound, TickOutcome};

fn layout(body: &[(i32, i32)], dir: Direction, food: (i32, i32)) -> SnakeRound {
    SnakeRound::with_layout(
        15,
        body.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
        dir,
        Cell::new(food.0, food.1),
        42,
    )
}

#[test]
fn eating_grows_by_one_and_scores() {
    let mut round = layout(&[(5, 5), (4, 5)], Direction::Right, (6, 5));
    assert_eq!(round.tick(), TickOutcome::Ate { score: 1 });
    assert_eq!(round.len(), 3);
    assert_eq!(round.head(), Some(Cell::new(6, 5)));

    // Food respawns somewhere on the board.
    let food = round.food();
    assert!((0..15).contains(&food.x) && (0..15).contains(&food.y));
}

#[test]
fn reversal_is_ignored_and_latest_steer_wins() {
    let mut round = layout(&[(5, 5), (4, 5)], Direction::Right, (0, 0));
    assert!(!round.steer(Direction::Left));
    assert!(round.steer(Direction::Up));
    assert!(round.steer(Direction::Down));
    assert_eq!(round.queued_direction(), Some(Direction::Down));

    assert_eq!(round.tick(), TickOutcome::Moved);
    assert_eq!(round.head(), Some(Cell::new(5, 6)));
    assert_eq!(round.direction(), Direction::Down);
    // Now moving down, up would reverse onto the neck.
    assert!(!round.steer(Direction::Up));
}

#[test]
fn leaving_the_grid_is_reported_once() {
    let mut round = layout(&[(14, 7)], Direction::Right, (0, 0));
    assert_eq!(
        round.tick(),
        TickOutcome::Ended {
            score: 0,
            cause: EndCause::OutOfBounds
        }
    );
    assert_eq!(round.phase(), Phase::Ended(EndCause::OutOfBounds));
    assert_eq!(round.tick(), TickOutcome::Finished);
    assert_eq!(round.abandon(), None);
    assert!(!round.steer(Direction::Up));
}

#[test]
fn running_into_own_body_ends_the_round() {
    // Head at (2,2) heading down into a segment at (2,3).
    let mut round = layout(
        &[(2, 2), (3, 2), (3, 3), (2, 3), (1, 3)],
        Direction::Down,
        (9, 9),
    );
    assert_eq!(
        round.tick(),
        TickOutcome::Ended {
            score: 0,
            cause: EndCause::SelfCollision
        }
    );
}

#[test]
fn config_maps_onto_round_settings() {
    let cfg = SnakeConfig {
        grid_size: 9,
        countdown_ticks: 2,
        seed: Some(5),
        ..SnakeConfig::default()
    };
    let mut round = SnakeRound::new(RoundSettings::from(&cfg));
    assert_eq!(round.grid_size(), 9);
    assert_eq!(round.head(), Some(Cell::new(4, 4)));
    assert_eq!(round.tick(), TickOutcome::Countdown { remaining: 1 });
    assert_eq!(round.tick(), TickOutcome::Started);
}

#[tokio::test]
async fn runner_emits_countdown_frames_and_one_end() {
    let cfg = SnakeConfig {
        grid_size: 5,
        countdown_ticks: 2,
        countdown_interval_ms: 5,
        tick_ms: 5,
        seed: Some(11),
        ..SnakeConfig::default()
    };
    let round = SnakeRound::new(RoundSettings::from(&cfg));
    let mut handle = spawn_round(round, SnakeTiming::from(&cfg));

    let mut events = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(ev) = handle.next_event().await {
            events.push(ev);
        }
    })
    .await
    .expect("round should end on its own");

    assert_eq!(events[0], SnakeEvent::Countdown(2));
    assert_eq!(events[1], SnakeEvent::Countdown(1));
    assert!(matches!(events[2], SnakeEvent::Frame { .. }));
    let ends: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SnakeEvent::Ended { .. }))
        .collect();
    assert_eq!(ends.len(), 1);
    assert!(matches!(
        events.last(),
        Some(SnakeEvent::Ended {
            cause: EndCause::OutOfBounds,
            ..
        })
    ));
}
