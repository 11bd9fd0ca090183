use criterion::{criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use huebridge::{
    color::{hsv_to_rgb, hue_sat_to_xy, xy_to_hue_sat},
    monitor::render,
    registry::{ColorMode, LightState},
};

fn random_states(count: usize) -> Vec<LightState> {
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| LightState {
            on: rng.gen_bool(0.9),
            brightness: rng.gen_range(1..=254),
            hue: rng.gen(),
            saturation: rng.gen_range(0..=254),
            color_mode: if rng.gen_bool(0.5) {
                ColorMode::HueSaturation
            } else {
                ColorMode::ColorTemperature
            },
            ..Default::default()
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let states = random_states(1024);

    c.bench_function(&format!("hsv to rgb {} states", states.len()), |b| {
        b.iter(|| {
            for state in &states {
                std::hint::black_box(hsv_to_rgb(state.hue, state.saturation, state.brightness));
            }
        })
    });

    c.bench_function(&format!("xy round trip {} states", states.len()), |b| {
        b.iter(|| {
            for state in &states {
                let (x, y) = hue_sat_to_xy(state.hue, state.saturation);
                std::hint::black_box(xy_to_hue_sat(x, y));
            }
        })
    });

    c.bench_function(&format!("render {} states", states.len()), |b| {
        b.iter(|| {
            for state in &states {
                std::hint::black_box(render(state));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
