//! Hot-path benchmarks: single motion resolution and a worst-case replay.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use slipstream_core::{Vec2, Vec3};
use slipstream_netcode::{
    resolve_motion, FlatGround, HistoryBuffer, InputCommand, MotionConfig, Pose, PredictedState,
    ReconciliationEngine,
};

const DELTA: f32 = 1.0 / 60.0;

fn random_command(rng: &mut StdRng, time: f64) -> InputCommand {
    let direction = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
    InputCommand {
        time,
        direction: direction.normalize_or_zero(),
        jump: rng.gen_bool(0.1),
    }
}

fn bench_resolve_motion(c: &mut Criterion) {
    let config = MotionConfig::default();
    let input = InputCommand {
        time: 1.0,
        direction: Vec2::new(1.0, -1.0).normalize_or_zero(),
        jump: false,
    };

    c.bench_function("resolve_motion", |b| {
        b.iter(|| {
            resolve_motion(
                black_box(Pose::IDENTITY),
                black_box(Vec3::ZERO),
                black_box(&input),
                DELTA,
                &config,
                &FlatGround,
            )
        });
    });
}

fn bench_replay_64_inputs(c: &mut Criterion) {
    let config = MotionConfig::default();
    let mut rng = StdRng::seed_from_u64(0x5EED);

    // 64 predicted-but-unacknowledged ticks, plus the acknowledged one they
    // rewind from.
    let mut pose = Pose::IDENTITY;
    let mut velocity = Vec3::ZERO;
    let mut history = HistoryBuffer::unbounded();
    let mut ack = PredictedState::IDENTITY;
    for tick in 0..=64u32 {
        let command = random_command(&mut rng, f64::from(tick) * f64::from(DELTA) + 0.001);
        let outcome = resolve_motion(pose, velocity, &command, DELTA, &config, &FlatGround);
        pose = outcome.pose;
        velocity = outcome.velocity;
        if tick == 0 {
            ack = outcome.state;
        } else {
            history.push(outcome.state);
        }
    }

    c.bench_function("replay_64_inputs", |b| {
        b.iter_batched(
            || (history.clone(), pose, velocity),
            |(mut history, mut pose, mut velocity)| {
                let mut engine = ReconciliationEngine::new();
                engine.acknowledge(black_box(ack));
                engine.apply(
                    &mut history,
                    &mut pose,
                    &mut velocity,
                    DELTA,
                    &config,
                    &FlatGround,
                )
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_resolve_motion, bench_replay_64_inputs);
criterion_main!(benches);
