use std::sync::Arc;

use approx::assert_abs_diff_eq;
use sprig_skeleton_core::{
    actor::{Actor, PlaybackState},
    config::PlayOptions,
    outputs::ActorEvent,
    parse_skeleton_set_json, Error, SkeletonSet,
};

fn arm() -> Arc<SkeletonSet> {
    let json = sprig_test_fixtures::skeletons::json("arm").expect("arm fixture");
    Arc::new(parse_skeleton_set_json(&json).expect("arm parses"))
}

fn opts(start_frame: f32, looping: bool, speed: f32) -> PlayOptions {
    PlayOptions {
        start_frame,
        looping,
        speed,
    }
}

#[test]
fn frame_count_ticks_return_to_zero() {
    let mut actor = Actor::new(arm());
    actor.play("swing", PlayOptions::default()).unwrap();
    for _ in 0..30 {
        actor.update(30.0, 1.0);
    }
    assert_eq!(actor.current_frame(), 0.0);
    assert_eq!(actor.state(), PlaybackState::Playing);
}

#[test]
fn host_rate_and_speed_scale_the_step() {
    let mut actor = Actor::new(arm());
    // 30 fps animation on a 60 fps host at double speed: one frame per tick.
    actor.play("swing", opts(0.0, true, 2.0)).unwrap();
    actor.update(60.0, 1.0);
    assert_abs_diff_eq!(actor.current_frame(), 1.0, epsilon = 1e-6);
    // Several elapsed ticks at once.
    actor.update(60.0, 3.0);
    assert_abs_diff_eq!(actor.current_frame(), 4.0, epsilon = 1e-6);
    actor.set_speed(-0.5);
    actor.update(60.0, 2.0);
    assert_abs_diff_eq!(actor.current_frame(), 3.5, epsilon = 1e-6);
}

#[test]
fn start_frame_wraps_or_clamps() {
    let mut actor = Actor::new(arm());
    actor.play("swing", opts(65.0, true, 1.0)).unwrap();
    assert_eq!(actor.current_frame(), 5.0);
    actor.play("swing", opts(-2.0, true, 1.0)).unwrap();
    assert_eq!(actor.current_frame(), 28.0);
    actor.play("swing", opts(65.0, false, 1.0)).unwrap();
    assert_eq!(actor.current_frame(), 29.0);
    actor.play("swing", opts(-2.0, false, 1.0)).unwrap();
    assert_eq!(actor.current_frame(), 0.0);
}

#[test]
fn non_looping_forward_ends_on_last_frame() {
    let mut actor = Actor::new(arm());
    actor.play("swing", opts(25.0, false, 1.0)).unwrap();
    for _ in 0..3 {
        let out = actor.update(30.0, 1.0);
        assert!(!out.ended());
    }
    let out = actor.update(30.0, 1.0);
    assert!(out.ended());
    assert!(out.events.iter().any(|e| matches!(
        e,
        ActorEvent::PlaybackEnded { frame, .. } if *frame == 29.0
    )));
    assert_eq!(actor.state(), PlaybackState::Ended);

    // Latched: further ticks change nothing.
    let out = actor.update(30.0, 5.0);
    assert!(out.is_empty());
    assert_eq!(actor.current_frame(), 29.0);
}

#[test]
fn non_looping_reverse_ends_on_frame_zero() {
    let mut actor = Actor::new(arm());
    actor.play("swing", opts(2.0, false, -1.5)).unwrap();
    actor.update(30.0, 1.0);
    assert_eq!(actor.state(), PlaybackState::Playing);
    let out = actor.update(30.0, 1.0);
    assert!(out.ended());
    assert_eq!(actor.current_frame(), 0.0);
    assert_eq!(actor.state(), PlaybackState::Ended);

    actor.play("swing", PlayOptions::default()).unwrap();
    assert_eq!(actor.state(), PlaybackState::Playing);
}

#[test]
fn pose_is_evaluated_at_the_pre_advance_frame() {
    let mut actor = Actor::new(arm());
    actor.play("swing", opts(5.0, true, 1.0)).unwrap();
    actor.update(30.0, 1.0);
    assert_eq!(actor.current_frame(), 6.0);
    // upper rotates 0 -> 90 over frames 0..15: 30 degrees at frame 5.
    let upper = actor.posture("upper").unwrap();
    assert_abs_diff_eq!(upper.rotation(), 30.0, epsilon = 1e-4);
}

#[test]
fn pause_resume_stop_and_seek() {
    let mut actor = Actor::new(arm());
    actor.play("swing", PlayOptions::default()).unwrap();
    actor.update(30.0, 4.0);
    actor.pause();
    let out = actor.update(30.0, 4.0);
    assert_eq!(out.events, vec![ActorEvent::PlaybackPaused]);
    assert_eq!(actor.current_frame(), 4.0);
    assert_eq!(actor.state(), PlaybackState::Paused);

    actor.resume();
    let out = actor.update(30.0, 1.0);
    assert_eq!(out.events[0], ActorEvent::PlaybackResumed);
    assert_eq!(actor.current_frame(), 5.0);

    actor.seek(20.0);
    assert_eq!(actor.current_frame(), 20.0);
    let upper = actor.posture("upper").unwrap().rotation();
    assert_abs_diff_eq!(upper, 90.0 - 5.0 * 90.0 / 14.0, epsilon = 1e-3);

    actor.stop();
    assert_eq!(actor.state(), PlaybackState::Stopped);
    assert_eq!(actor.current_frame(), 0.0);
    assert_eq!(actor.current_animation(), Some("swing"));
    let out = actor.update(30.0, 1.0);
    assert_eq!(out.events, vec![ActorEvent::PlaybackStopped]);
    assert_eq!(actor.current_frame(), 0.0);
}

#[test]
fn unknown_animation_is_a_lookup_error() {
    let mut actor = Actor::new(arm());
    let err = actor.play("jump", PlayOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownAnimation { ref name } if name == "jump"));
    assert_eq!(err.category(), "lookup");
    assert_eq!(actor.state(), PlaybackState::Stopped);
}
