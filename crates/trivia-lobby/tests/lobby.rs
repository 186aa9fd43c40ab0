use std::time::Duration;

use trivia_bus::{EventBus, EventConsumer};
use trivia_lobby::{Lobby, LobbyConfig};
use trivia_protocol::{LobbyUpdate, PlayerId, ServerEvent};

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn lobby() -> (Lobby, EventConsumer) {
    let (events, consumer) = EventBus::new();
    (Lobby::new(LobbyConfig::default(), events), consumer)
}

async fn next_update(consumer: &mut EventConsumer) -> LobbyUpdate {
    match consumer.consume().await {
        Some(ServerEvent::LobbyUpdate(update)) => update,
        other => panic!("expected lobby update, got {other:?}"),
    }
}

// =========================================================================
// Membership
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_add_player_is_idempotent() {
    let (lobby, _consumer) = lobby();
    lobby.add_player(pid("a")).await;
    lobby.add_player(pid("a")).await;
    lobby.add_player(pid("b")).await;

    assert_eq!(lobby.players().await, vec![pid("a"), pid("b")]);
}

#[tokio::test(start_paused = true)]
async fn test_players_is_a_snapshot() {
    let (lobby, _consumer) = lobby();
    lobby.add_player(pid("a")).await;

    let snapshot = lobby.players().await;
    lobby.add_player(pid("b")).await;

    assert_eq!(snapshot, vec![pid("a")]);
    assert!(lobby.contains(&pid("b")).await);
}

#[tokio::test(start_paused = true)]
async fn test_removing_last_player_cancels_countdown() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("a")).await;
    next_update(&mut consumer).await;
    assert!(lobby.is_counting_down().await);

    lobby.remove_player(&pid("a")).await;
    assert!(!lobby.is_counting_down().await);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(consumer.try_consume().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_removing_one_of_many_keeps_counting() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("a")).await;
    lobby.add_player(pid("b")).await;
    next_update(&mut consumer).await;

    lobby.remove_player(&pid("a")).await;
    assert!(lobby.is_counting_down().await);

    let update = next_update(&mut consumer).await;
    assert_eq!(update.players, vec![pid("b")]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_empties_and_cancels() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("a")).await;
    next_update(&mut consumer).await;

    lobby.clear().await;
    assert!(lobby.players().await.is_empty());
    assert!(!lobby.is_counting_down().await);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(consumer.try_consume().is_none());
}

// =========================================================================
// Countdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_countdown_publishes_every_tick() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("a")).await;
    lobby.add_player(pid("b")).await;

    let first = next_update(&mut consumer).await;
    assert_eq!(first.seconds_remaining, 5);
    assert!(!first.should_start_game);

    let second = next_update(&mut consumer).await;
    assert_eq!(second.seconds_remaining, 4);
    assert_eq!(second.players, vec![pid("a"), pid("b")]);
}

#[tokio::test(start_paused = true)]
async fn test_single_player_starts_when_timer_reaches_zero() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("solo")).await;

    let mut seen = Vec::new();
    loop {
        let update = next_update(&mut consumer).await;
        seen.push(update.seconds_remaining);
        if update.should_start_game {
            assert_eq!(update.seconds_remaining, 0);
            assert_eq!(update.players, vec![pid("solo")]);
            break;
        }
    }
    assert_eq!(seen, vec![5, 4, 3, 2, 1, 0]);

    // The countdown stops on its own after signalling a start.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(consumer.try_consume().is_none());
    assert!(!lobby.is_counting_down().await);
}

#[tokio::test(start_paused = true)]
async fn test_fourth_player_short_circuits_on_next_tick() {
    let (lobby, mut consumer) = lobby();
    for id in ["a", "b", "c"] {
        lobby.add_player(pid(id)).await;
    }
    let update = next_update(&mut consumer).await;
    assert!(!update.should_start_game);
    assert_eq!(update.seconds_remaining, 5);

    lobby.add_player(pid("d")).await;

    let update = next_update(&mut consumer).await;
    assert!(update.should_start_game);
    assert_eq!(update.seconds_remaining, 4);
    assert_eq!(update.players.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_full_lobby_starts_at_second_zero() {
    let (lobby, mut consumer) = lobby();
    // Filled before the countdown task is first polled.
    for id in ["a", "b", "c", "d"] {
        lobby.add_player(pid(id)).await;
    }

    let update = next_update(&mut consumer).await;
    assert!(update.should_start_game);
    assert_eq!(update.seconds_remaining, 5);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_restarts_after_clear() {
    let (lobby, mut consumer) = lobby();
    lobby.add_player(pid("a")).await;
    next_update(&mut consumer).await;
    lobby.clear().await;

    lobby.add_player(pid("b")).await;
    let update = next_update(&mut consumer).await;
    assert_eq!(update.seconds_remaining, 5);
    assert_eq!(update.players, vec![pid("b")]);
}

#[tokio::test(start_paused = true)]
async fn test_custom_config_is_honoured() {
    let (events, mut consumer) = EventBus::new();
    let lobby = Lobby::new(
        LobbyConfig {
            max_players: 2,
            timeout_seconds: 1,
            tick_millis: 100,
        },
        events,
    );
    lobby.add_player(pid("a")).await;

    let start = tokio::time::Instant::now();
    let first = next_update(&mut consumer).await;
    assert_eq!(first.seconds_remaining, 1);
    let last = next_update(&mut consumer).await;
    assert!(last.should_start_game);
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}
