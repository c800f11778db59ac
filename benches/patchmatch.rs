use criterion::{criterion_group, criterion_main, Criterion};
use patchmatch::{resample, CancelToken, ImageBuffer, MatchParams, PatchMatcher};
use std::hint::black_box;

fn make_image(width: usize, height: usize, channels: usize) -> ImageBuffer {
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as f32 / 255.0;
                data.push(value + c as f32 * 0.01);
            }
        }
    }
    ImageBuffer::from_vec(data, width, height, channels).unwrap()
}

fn bench_resample(c: &mut Criterion) {
    let img = make_image(512, 512, 3);
    let cancel = CancelToken::new();
    c.bench_function("resample_512_to_third", |b| {
        b.iter(|| resample(black_box(&img), 1.0 / 3.0, &cancel).unwrap())
    });
}

fn bench_matcher(c: &mut Criterion) {
    let src = make_image(128, 128, 3);
    let trg = make_image(128, 128, 3);
    let params = MatchParams {
        patch_size: 5,
        iterations: 2.0,
        random_seed: 1,
        ..MatchParams::default()
    };
    c.bench_function("patchmatch_128_full_pyramid", |b| {
        b.iter(|| {
            let matcher = PatchMatcher::new(params);
            matcher.run(black_box(&src), black_box(&trg)).unwrap()
        })
    });
}

criterion_group!(benches, bench_resample, bench_matcher);
criterion_main!(benches);
