use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stellargeom::{Angle, AngleUnit, Clock, FormatOptions, GeoCoordinate, SkyPosition};

/// Random equatorial targets with declination inside ±89°
fn random_targets(rng: &mut StdRng, count: usize) -> Vec<SkyPosition> {
    (0..count)
        .map(|_| {
            SkyPosition::equatorial(
                Angle::from_hours(rng.gen_range(0.0..24.0)).unwrap(),
                Angle::from_degrees(rng.gen_range(-89.0..89.0)).unwrap(),
            )
            .unwrap()
        })
        .collect()
}

fn bench_frame_conversion(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC10C);
    let observer = GeoCoordinate::from_degrees(52.0, -1.5).unwrap();
    let at = Clock::universal(7.7e8).unwrap();

    c.bench_function("equatorial_to_horizontal/1000", |b| {
        b.iter_batched(
            || random_targets(&mut rng, 1000),
            |targets| {
                for target in &targets {
                    black_box(target.to_horizontal(&observer, &at));
                }
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("horizontal_round_trip/1000", |b| {
        b.iter_batched(
            || random_targets(&mut rng, 1000),
            |targets| {
                for target in &targets {
                    let horizontal = target.to_horizontal(&observer, &at);
                    black_box(horizontal.to_equatorial(&observer, &at));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_text(c: &mut Criterion) {
    let samples = ["12:34:56.7", "-12d34m56.7s", "188.73625°", "3.2943rad", "12h34m56.7s"];
    c.bench_function("angle_parse", |b| {
        b.iter(|| {
            for text in samples {
                black_box(Angle::parse(black_box(text), AngleUnit::Hours).unwrap());
            }
        })
    });

    let angle = Angle::from_hours(12.582_416_666).unwrap();
    let options = [
        FormatOptions::natural(AngleUnit::Hours),
        FormatOptions::sexagesimal(AngleUnit::Degrees, 3),
        FormatOptions::decimal(AngleUnit::Radians, 9),
    ];
    c.bench_function("angle_format", |b| {
        b.iter(|| {
            for option in &options {
                black_box(angle.format(black_box(option)));
            }
        })
    });
}

fn bench_sidereal(c: &mut Criterion) {
    let longitude = Angle::from_degrees(-75.0).unwrap();
    c.bench_function("local_sidereal_time", |b| {
        let mut seconds = 0.0;
        b.iter(|| {
            seconds += 61.0;
            let clock = Clock::universal(black_box(seconds)).unwrap();
            black_box(clock.local_sidereal_time(longitude))
        })
    });
}

criterion_group!(benches, bench_frame_conversion, bench_text, bench_sidereal);
criterion_main!(benches);
