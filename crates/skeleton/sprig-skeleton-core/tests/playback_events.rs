use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use sprig_skeleton_core::{
    actor::Actor, config::PlayOptions, outputs::ActorEvent, parse_skeleton_set_json,
    skeleton::MAX_FULL_LOOPS_PER_TICK, SkeletonSet,
};

fn blink() -> Arc<SkeletonSet> {
    let json = sprig_test_fixtures::skeletons::json("blink").expect("blink fixture");
    Arc::new(parse_skeleton_set_json(&json).expect("blink parses"))
}

fn play(actor: &mut Actor, anim: &str, speed: f32) {
    actor
        .play(
            anim,
            PlayOptions {
                start_frame: 0.0,
                looping: true,
                speed,
            },
        )
        .unwrap();
}

/// User-data key frames fired over `ticks` updates, in dispatch order.
fn drive(actor: &mut Actor, ticks: usize) -> Vec<f32> {
    let mut fired = Vec::new();
    for _ in 0..ticks {
        let out = actor.update(30.0, 1.0);
        fired.extend(out.user_data().map(|(_, frame, _)| frame));
    }
    fired
}

fn boundary_counts(anim: &str, table: &[(f32, usize)]) {
    // frameCount 30, one key at frame 0, 29 ticks from frame 0 on a 30 fps host.
    let set = blink();
    for &(speed, expected) in table {
        for signed in [speed, -speed] {
            let mut actor = Actor::new(Arc::clone(&set));
            play(&mut actor, anim, signed);
            let fired = drive(&mut actor, 29);
            assert_eq!(fired.len(), expected, "{anim} at speed {signed}");
            assert!(fired.iter().all(|&f| f == 0.0));
        }
    }
}

#[test]
fn boundary_key_fires_once_per_pass_at_host_rate() {
    boundary_counts("boundary", &[(0.4, 1), (1.0, 1), (1.25, 2), (5.0, 5)]);
}

#[test]
fn boundary_key_counts_at_double_rate() {
    // Two frames per tick: 58 frames at speed 1, 290 at speed 5.
    boundary_counts("boundary-60fps", &[(0.4, 1), (1.0, 2), (1.25, 3), (5.0, 10)]);
}

#[test]
fn enormous_speed_returns_with_bounded_events() {
    let mut actor = Actor::new(blink());
    for speed in [1.0e9f32, -1.0e9] {
        play(&mut actor, "boundary", speed);
        let fired = drive(&mut actor, 1);
        assert!(!fired.is_empty(), "speed {speed}");
        assert!(fired.len() <= MAX_FULL_LOOPS_PER_TICK + 2, "speed {speed}");
        let frame = actor.current_frame();
        assert!((0.0..30.0).contains(&frame), "speed {speed}: frame {frame}");
    }
}

#[test]
fn reverse_playback_fires_the_same_keys_in_reverse_order() {
    let set = blink();
    let mut fwd = Actor::new(Arc::clone(&set));
    play(&mut fwd, "marks", 1.0);
    let forward = drive(&mut fwd, 29);

    let mut bwd = Actor::new(Arc::clone(&set));
    play(&mut bwd, "marks", -1.0);
    let backward = drive(&mut bwd, 29);

    assert_eq!(forward, vec![3.0, 10.0, 20.0]);
    let mut reversed = backward.clone();
    reversed.reverse();
    assert_eq!(forward, reversed);
}

#[test]
fn one_tick_spanning_several_loops_replays_every_key_in_time_order() {
    let set = blink();
    let mut actor = Actor::new(set);
    play(&mut actor, "marks", 65.0);
    let fired = drive(&mut actor, 1);
    assert_eq!(fired, vec![3.0, 10.0, 20.0, 3.0, 10.0, 20.0, 3.0]);
    assert_eq!(actor.current_frame(), 5.0);

    play(&mut actor, "marks", -30.0);
    let fired = drive(&mut actor, 1);
    assert_eq!(fired, vec![20.0, 10.0, 3.0]);
}

#[test]
fn user_data_handler_receives_payloads() {
    let mut actor = Actor::new(blink());
    let got: Rc<RefCell<Vec<(usize, Option<i32>)>>> = Rc::default();
    let sink = Rc::clone(&got);
    actor
        .calculated("eye", true)
        .unwrap()
        .on_user_data(move |ev| sink.borrow_mut().push((ev.bone, ev.data.integer)));

    play(&mut actor, "marks", 1.0);
    drive(&mut actor, 12);
    assert_eq!(*got.borrow(), vec![(1, Some(3)), (1, Some(10))]);
}

#[test]
fn events_carry_bone_and_payload() {
    let mut actor = Actor::new(blink());
    play(&mut actor, "marks", 1.0);
    let out = actor.update(30.0, 4.0);
    let events = out.events.clone();
    assert!(matches!(
        &events[0],
        ActorEvent::PlaybackStarted { animation, frame } if animation == "marks" && *frame == 0.0
    ));
    match &events[1] {
        ActorEvent::UserData { bone, frame, data } => {
            assert_eq!(*bone, 1);
            assert_eq!(*frame, 3.0);
            assert_eq!(data.integer, Some(3));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events.len(), 2);
}

#[test]
fn zero_speed_dispatches_nothing() {
    let mut actor = Actor::new(blink());
    play(&mut actor, "boundary", 0.0);
    assert!(drive(&mut actor, 5).is_empty());
    assert_eq!(actor.current_frame(), 0.0);
}
