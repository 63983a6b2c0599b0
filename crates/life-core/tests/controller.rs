//! End-to-end autoplay behavior against tokio's paused clock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use life_core::controller::SimulationController;
use life_core::simulation::{RunState, SPEED_PRESETS_MS, Simulation};
use life_grid::Dimensions;
use tokio::time::sleep;

fn controller(speed_ms: u64) -> SimulationController {
    let simulation = Simulation::new(Dimensions::default())
        .with_seed(2024)
        .with_speed_ms(speed_ms);
    SimulationController::new(simulation)
}

#[tokio::test(start_paused = true)]
async fn random_start_advances_once_per_tick_until_paused() {
    let ctl = controller(100);
    assert_eq!(ctl.status().await.state, RunState::Idle);
    assert!(ctl.seed_random().await);
    let seeded = ctl.grid().await;
    let mut rx = ctl.subscribe();

    assert!(ctl.play().await);
    // Offset by half a tick so each check lands between fires.
    sleep(Duration::from_millis(50)).await;
    for expected in 1..=5u64 {
        sleep(Duration::from_millis(100)).await;
        assert_eq!(ctl.generation().await, expected);
        assert_eq!(rx.recv().await.unwrap().generation, expected);
    }

    assert!(ctl.pause().await);
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(ctl.generation().await, 5);
    assert!(rx.try_recv().is_err());

    // Five undos lead back to the seeded grid.
    for _ in 0..5 {
        assert!(ctl.step_back().await);
    }
    assert_eq!(ctl.grid().await, seeded);
    assert_eq!(ctl.generation().await, 0);
    assert!(!ctl.step_back().await);
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_from_next_tick() {
    let ctl = controller(100);
    ctl.seed_random().await;
    ctl.play().await;

    sleep(Duration::from_millis(150)).await;
    assert_eq!(ctl.generation().await, 1);

    // The tick already scheduled for t=200 still fires at the old speed.
    assert_eq!(ctl.set_speed(1000).await, Some(100));
    sleep(Duration::from_millis(100)).await;
    assert_eq!(ctl.generation().await, 2);

    // The next one waits the new interval: t=1200.
    sleep(Duration::from_millis(900)).await;
    assert_eq!(ctl.generation().await, 2);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(ctl.generation().await, 3);

    ctl.pause().await;
}

#[tokio::test(start_paused = true)]
async fn zero_speed_is_rejected() {
    let ctl = controller(200);
    assert_eq!(ctl.set_speed(0).await, None);
    assert_eq!(ctl.status().await.speed_ms, 200);
}

#[tokio::test(start_paused = true)]
async fn editing_is_locked_after_start() {
    let ctl = controller(100);
    assert!(ctl.toggle_cell(0, 0).await);
    assert!(ctl.toggle_cell(0, 1).await);
    assert_eq!(ctl.population().await, 2);

    ctl.step().await;
    assert!(!ctl.toggle_cell(10, 10).await);
    assert!(!ctl.seed_random().await);

    // Clear returns to generation 0 and unlocks editing again.
    ctl.clear().await;
    assert_eq!(ctl.generation().await, 0);
    assert!(ctl.toggle_cell(10, 10).await);
    assert_eq!(ctl.status().await.history_depth, 1);
}

#[tokio::test(start_paused = true)]
async fn clear_while_running_keeps_autoplay() {
    let ctl = controller(100);
    ctl.seed_random().await;
    ctl.play().await;
    sleep(Duration::from_millis(250)).await;

    ctl.clear().await;
    assert!(ctl.is_running().await);
    assert_eq!(ctl.generation().await, 0);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(ctl.generation().await, 1);
    assert_eq!(ctl.population().await, 0);
    ctl.reset().await;
}

#[test]
fn presets_include_default() {
    assert_eq!(SPEED_PRESETS_MS, [100, 200, 500, 1000, 2000]);
    assert!(SPEED_PRESETS_MS.contains(&life_core::simulation::DEFAULT_SPEED_MS));
}
