//! Integration tests for the bus's ordering guarantee.

use std::time::Duration;

use trivia_bus::EventBus;
use trivia_protocol::{GameId, NewGame, ServerEvent};

fn new_game(id: u64) -> ServerEvent {
    ServerEvent::NewGame(NewGame {
        game_id: GameId(id),
        players: vec![],
    })
}

fn id_of(event: &ServerEvent) -> u64 {
    event.game_id().map(|g| g.0).unwrap_or(0)
}

#[tokio::test]
async fn test_single_producer_fifo() {
    let (publisher, mut consumer) = EventBus::new();
    for i in 0..100 {
        publisher.publish(new_game(i)).unwrap();
    }
    for i in 0..100 {
        let event = consumer.consume().await.unwrap();
        assert_eq!(id_of(&event), i);
    }
}

#[tokio::test(start_paused = true)]
async fn test_interleaved_producers_keep_global_publish_order() {
    let (publisher, mut consumer) = EventBus::new();

    // Two producers alternate on a shared clock; the consumer must see
    // exactly the order in which publish() was called.
    let a = publisher.clone();
    let b = publisher.clone();
    let task_a = tokio::spawn(async move {
        for i in 0..5u64 {
            a.publish(new_game(i * 2)).unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
    let task_b = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        for i in 0..5u64 {
            b.publish(new_game(i * 2 + 1)).unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
    task_a.await.unwrap();
    task_b.await.unwrap();
    drop(publisher);

    let mut seen = Vec::new();
    while let Some(event) = consumer.consume().await {
        seen.push(id_of(&event));
    }
    assert_eq!(seen, (0..10).collect::<Vec<_>>());
}
