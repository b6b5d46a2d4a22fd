use std::time::Duration;

use antcode_core::TransportState;
use antcode_system_playback::{Playback, PlaybackPolicy};

fn policy(pause_on_step: bool, stop_on_last_step: bool, steps_per_second: u32) -> PlaybackPolicy {
    PlaybackPolicy {
        pause_on_step,
        stop_on_last_step,
        steps_per_second,
    }
}

#[test]
fn load_places_the_cursor_at_step_zero_stopped() {
    let mut playback = Playback::new();
    playback.load(10);

    assert!(playback.is_loaded());
    assert_eq!(playback.index(), 0);
    assert_eq!(playback.total(), 10);
    assert_eq!(playback.state(), TransportState::Stopped);
}

#[test]
fn transport_operations_without_a_log_are_no_ops() {
    let mut playback = Playback::new();
    let policy = policy(true, true, 5);

    playback.play();
    playback.toggle();
    playback.step_forward(&policy);
    playback.skip_to_end(&policy);
    playback.tick(Duration::from_secs(5), &policy);

    assert_eq!(playback.state(), TransportState::Stopped);
    assert_eq!(playback.index(), 0);
    assert!(!playback.is_loaded());
}

#[test]
fn index_never_leaves_bounds_under_any_command_sequence() {
    let mut playback = Playback::new();
    playback.load(3);
    let policy = policy(false, false, 5);

    playback.step_backward(&policy);
    assert_eq!(playback.index(), 0);

    for _ in 0..10 {
        playback.step_forward(&policy);
        assert!(playback.index() < 3);
    }
    assert_eq!(playback.index(), 2);

    playback.skip_to_end(&policy);
    assert_eq!(playback.index(), 2);
    playback.skip_to_start(&policy);
    assert_eq!(playback.index(), 0);

    for _ in 0..10 {
        playback.step_backward(&policy);
        assert_eq!(playback.index(), 0);
    }
}

#[test]
fn toggling_an_even_number_of_times_restores_the_state() {
    let mut playback = Playback::new();
    playback.load(5);
    playback.pause();
    assert_eq!(playback.state(), TransportState::Paused);

    for _ in 0..4 {
        playback.toggle();
    }
    assert_eq!(playback.state(), TransportState::Paused);

    playback.play();
    for _ in 0..6 {
        playback.toggle();
    }
    assert_eq!(playback.state(), TransportState::Playing);
}

#[test]
fn manual_steps_pause_when_pause_on_step_is_set() {
    let mut playback = Playback::new();
    playback.load(5);
    playback.play();

    playback.step_forward(&policy(true, true, 5));
    assert_eq!(playback.state(), TransportState::Paused);
    assert_eq!(playback.index(), 1);

    playback.play();
    playback.skip_to_end(&policy(true, true, 5));
    assert_eq!(playback.state(), TransportState::Paused);
    assert_eq!(playback.index(), 4);
}

#[test]
fn manual_steps_keep_playing_when_pause_on_step_is_clear() {
    let mut playback = Playback::new();
    playback.load(5);
    playback.play();

    playback.step_forward(&policy(false, true, 5));
    assert_eq!(playback.state(), TransportState::Playing);
}

#[test]
fn timed_playback_pauses_on_the_last_step_when_configured() {
    let mut playback = Playback::new();
    playback.load(10);
    playback.play();
    let policy = policy(true, true, 5);

    // Two seconds of 100ms frames at five steps per second.
    for _ in 0..20 {
        playback.tick(Duration::from_millis(100), &policy);
    }

    assert_eq!(playback.index(), 9);
    assert_eq!(playback.state(), TransportState::Paused);

    // Further ticks must not move a paused cursor.
    playback.tick(Duration::from_secs(3), &policy);
    assert_eq!(playback.index(), 9);
}

#[test]
fn timed_playback_wraps_around_without_stop_on_last_step() {
    let mut playback = Playback::new();
    playback.load(10);
    playback.play();
    let policy = policy(true, false, 5);

    for _ in 0..20 {
        playback.tick(Duration::from_millis(100), &policy);
    }

    // Ten advances: nine forward plus a wrap back to the first step.
    assert_eq!(playback.index(), 0);
    assert_eq!(playback.state(), TransportState::Playing);
}

#[test]
fn tick_rate_follows_the_policy() {
    let mut playback = Playback::new();
    playback.load(100);
    playback.play();

    playback.tick(Duration::from_secs(1), &policy(true, false, 2));
    assert_eq!(playback.index(), 2);

    playback.tick(Duration::from_secs(1), &policy(true, false, 10));
    assert_eq!(playback.index(), 12);
}

#[test]
fn sub_interval_frames_accumulate_until_a_step_is_due() {
    let mut playback = Playback::new();
    playback.load(10);
    playback.play();
    let policy = policy(true, true, 5);

    playback.tick(Duration::from_millis(150), &policy);
    playback.tick(Duration::from_millis(40), &policy);
    assert_eq!(playback.index(), 0);

    playback.tick(Duration::from_millis(10), &policy);
    assert_eq!(playback.index(), 1);
}

#[test]
fn replaying_from_the_last_step_wraps_to_the_start() {
    let mut playback = Playback::new();
    playback.load(4);
    let policy = policy(true, true, 5);

    playback.skip_to_end(&policy);
    assert_eq!(playback.state(), TransportState::Paused);

    playback.play();
    playback.tick(Duration::from_millis(200), &policy);
    assert_eq!(playback.index(), 0);
    assert_eq!(playback.state(), TransportState::Playing);
}

#[test]
fn unload_returns_to_the_empty_state() {
    let mut playback = Playback::new();
    playback.load(7);
    playback.play();
    playback.unload();

    assert!(!playback.is_loaded());
    assert_eq!(playback.state(), TransportState::Stopped);
    assert_eq!(playback.index(), 0);
    assert_eq!(playback.total(), 0);
}
