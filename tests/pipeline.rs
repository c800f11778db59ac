use patchmatch::{
    refine, CancelToken, ImageBuffer, MatchParams, PatchMatcher, PatchMatchError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn distinct_image(width: usize, height: usize) -> ImageBuffer {
    let data: Vec<f32> = (0..width * height).map(|v| v as f32).collect();
    ImageBuffer::from_vec(data, width, height, 1).unwrap()
}

fn noise_image(width: usize, height: usize, channels: usize, seed: u64) -> ImageBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..width * height * channels)
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    ImageBuffer::from_vec(data, width, height, channels).unwrap()
}

fn assert_zero_field(field: &patchmatch::VectorField) {
    for y in 0..field.height() {
        for x in 0..field.width() {
            let cand = field.get(x, y);
            assert_eq!(
                (cand.dx, cand.dy, cand.cost),
                (0.0, 0.0, 0.0),
                "pixel ({x}, {y}) did not converge"
            );
        }
    }
}

#[test]
fn identical_images_converge_to_the_zero_field() {
    let img = distinct_image(4, 4);
    for seed in [0, 1, 42, 12345] {
        let params = MatchParams {
            patch_size: 1,
            iterations: 1.0,
            random_seed: seed,
            ..MatchParams::default()
        };
        let field = PatchMatcher::new(params).run(&img, &img).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 4);
        assert_zero_field(&field);
    }
}

#[test]
fn fractional_iterations_run_and_preserve_convergence() {
    let img = distinct_image(4, 4);
    for iterations in [0.5, 1.5, 2.25] {
        let params = MatchParams {
            patch_size: 1,
            iterations,
            random_seed: 3,
            ..MatchParams::default()
        };
        let field = PatchMatcher::new(params).run(&img, &img).unwrap();
        assert_zero_field(&field);
    }
}

#[test]
fn full_run_respects_field_invariants() {
    // Differing dimensions and channel counts: every pixel must still end
    // with a non-negative cost and an in-bounds source position.
    let src = noise_image(12, 10, 4, 8);
    let trg = noise_image(9, 11, 3, 9);
    let params = MatchParams {
        patch_size: 3,
        iterations: 2.25,
        random_seed: 17,
        ..MatchParams::default()
    };
    let field = PatchMatcher::new(params).run(&src, &trg).unwrap();
    assert_eq!(field.width(), trg.width());
    assert_eq!(field.height(), trg.height());
    for y in 0..field.height() {
        for x in 0..field.width() {
            let cand = field.get(x, y);
            assert!(cand.cost >= 0.0);
            let sx = x as i32 + cand.dx as i32;
            let sy = y as i32 + cand.dy as i32;
            assert!(sx >= 0 && (sx as usize) < src.width());
            assert!(sy >= 0 && (sy as usize) < src.height());
        }
    }
}

#[test]
fn same_seed_reproduces_the_same_run() {
    let src = noise_image(10, 10, 3, 1);
    let trg = noise_image(10, 10, 3, 2);
    let params = MatchParams {
        patch_size: 3,
        iterations: 2.0,
        random_seed: 99,
        ..MatchParams::default()
    };
    let a = PatchMatcher::new(params).run(&src, &trg).unwrap();
    let b = PatchMatcher::new(params).run(&src, &trg).unwrap();
    assert_eq!(a.as_image().as_slice(), b.as_image().as_slice());
}

#[test]
fn coarser_end_level_halves_the_output() {
    let img = distinct_image(16, 16);
    // patch 1 over 16 pixels: five levels; stopping one early halves dims.
    let params = MatchParams {
        patch_size: 1,
        end_level: 4,
        iterations: 1.0,
        ..MatchParams::default()
    };
    let field = PatchMatcher::new(params).run(&img, &img).unwrap();
    assert_eq!(field.width(), 8);
    assert_eq!(field.height(), 8);
}

#[test]
fn out_of_range_levels_are_clamped() {
    let img = distinct_image(8, 8);
    let params = MatchParams {
        patch_size: 1,
        start_level: -5,
        end_level: 99,
        iterations: 1.0,
        ..MatchParams::default()
    };
    let field = PatchMatcher::new(params).run(&img, &img).unwrap();
    assert_eq!(field.width(), 8);
    assert_eq!(field.height(), 8);
}

#[test]
fn inverted_level_range_is_an_error() {
    let img = distinct_image(16, 16);
    let params = MatchParams {
        patch_size: 1,
        start_level: 4,
        end_level: 2,
        ..MatchParams::default()
    };
    let result = PatchMatcher::new(params).run(&img, &img);
    assert!(matches!(
        result,
        Err(PatchMatchError::EmptyLevelRange { start: 4, end: 2 })
    ));
}

#[test]
fn zero_iterations_keep_the_initialized_field() {
    let img = distinct_image(8, 8);
    let params = MatchParams {
        patch_size: 1,
        iterations: 0.0,
        random_seed: 2,
        ..MatchParams::default()
    };
    let field = PatchMatcher::new(params).run(&img, &img).unwrap();
    assert_eq!(field.width(), 8);
    for y in 0..field.height() {
        for x in 0..field.width() {
            assert!(field.get(x, y).is_set());
        }
    }
}

#[test]
fn cancelled_run_produces_no_field() {
    let img = distinct_image(16, 16);
    let matcher = PatchMatcher::new(MatchParams {
        patch_size: 1,
        ..MatchParams::default()
    });
    matcher.cancel_token().cancel();
    let result = matcher.run(&img, &img);
    assert!(matches!(result, Err(PatchMatchError::Cancelled)));
}

#[test]
fn cancelled_refine_leaves_the_field_untouched() {
    let src = noise_image(8, 8, 1, 4);
    let trg = noise_image(8, 8, 1, 5);
    let mut rng = StdRng::seed_from_u64(6);
    let mut field = patchmatch::initialize_level(
        &src,
        &trg,
        None,
        3,
        &mut rng,
        &CancelToken::new(),
    )
    .unwrap();
    let before = field.as_image().as_slice().to_vec();

    let cancel = CancelToken::new();
    cancel.cancel();
    let result = refine(&mut field, &src, &trg, 3, 0, 0, &mut rng, &cancel);
    assert!(matches!(result, Err(PatchMatchError::Cancelled)));
    assert_eq!(field.as_image().as_slice(), before.as_slice());
}
