use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use sprig_skeleton_core::{config::PlayOptions, parse_skeleton_set_json, Actor};

fn actor_step(c: &mut Criterion) {
    let json = sprig_test_fixtures::skeletons::json("arm").unwrap();
    let set = Arc::new(parse_skeleton_set_json(&json).unwrap());

    c.bench_function("actor_update_1x", |b| {
        let mut actor = Actor::new(Arc::clone(&set));
        actor.play("swing", PlayOptions::default()).unwrap();
        b.iter(|| {
            black_box(actor.update(black_box(60.0), 1.0));
        })
    });

    c.bench_function("actor_update_multi_wrap", |b| {
        let mut actor = Actor::new(Arc::clone(&set));
        actor
            .play(
                "swing",
                PlayOptions {
                    speed: -95.5,
                    ..PlayOptions::default()
                },
            )
            .unwrap();
        b.iter(|| {
            black_box(actor.update(black_box(30.0), 1.0));
        })
    });

    c.bench_function("actor_update_and_query_volumes", |b| {
        let mut actor = Actor::new(Arc::clone(&set));
        actor.play("swing", PlayOptions::default()).unwrap();
        let ids: Vec<_> = actor.colliders().map(|(id, _)| id).collect();
        b.iter(|| {
            actor.update(60.0, 1.0);
            for id in &ids {
                if let Some(v) = actor.collider_volume(*id) {
                    black_box(v.aabb());
                }
            }
        })
    });
}

criterion_group!(benches, actor_step);
criterion_main!(benches);
