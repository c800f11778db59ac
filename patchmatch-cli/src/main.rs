use clap::Parser;
use patchmatch::io::load_rgb_image;
use patchmatch::{num_levels, MatchParams, PatchMatcher, VectorField};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dense PatchMatch correspondence fields")]
struct Cli {
    /// Source image; matches are looked up here.
    #[arg(long, value_name = "FILE")]
    source: PathBuf,
    /// Target image; the field holds one vector per pixel of this image.
    #[arg(long, value_name = "FILE")]
    target: PathBuf,
    /// Output PNG visualizing the field (dx red, dy green, cost blue).
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
    /// Side of the square comparison patch; odd values keep it centered.
    #[arg(long, default_value_t = 5)]
    patch_size: u32,
    /// Coarsest pyramid level to process (1-based, clamped).
    #[arg(long, default_value_t = 1)]
    start_level: i32,
    /// Finest pyramid level to process (clamped to the pyramid depth).
    #[arg(long, default_value_t = i32::MAX)]
    end_level: i32,
    /// Propagate-and-search sweeps per level; fractions run a partial
    /// final sweep.
    #[arg(long, default_value_t = 4.0)]
    iterations: f64,
    /// Random seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Resample in parallel when the library has the rayon feature.
    #[arg(long)]
    parallel: bool,
    /// Write a JSON summary of the run to this file.
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,
    /// Enable tracing output (respects RUST_LOG).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct RunStats {
    width: usize,
    height: usize,
    levels: i32,
    mean_cost: f64,
    max_cost: f32,
    max_displacement: f32,
}

fn field_stats(field: &VectorField, levels: i32) -> RunStats {
    let mut sum = 0.0f64;
    let mut max_cost = 0.0f32;
    let mut max_disp = 0.0f32;
    for y in 0..field.height() {
        for x in 0..field.width() {
            let cand = field.get(x, y);
            sum += f64::from(cand.cost);
            max_cost = max_cost.max(cand.cost);
            max_disp = max_disp.max(cand.dx.abs()).max(cand.dy.abs());
        }
    }
    let pixels = (field.width() * field.height()) as f64;
    RunStats {
        width: field.width(),
        height: field.height(),
        levels,
        mean_cost: sum / pixels,
        max_cost,
        max_displacement: max_disp,
    }
}

fn save_visualization(
    field: &VectorField,
    stats: &RunStats,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut out = image::RgbImage::new(field.width() as u32, field.height() as u32);
    let disp_scale = if stats.max_displacement > 0.0 {
        127.5 / stats.max_displacement
    } else {
        0.0
    };
    let cost_scale = if stats.max_cost > 0.0 {
        255.0 / stats.max_cost
    } else {
        0.0
    };
    for (x, y, pix) in out.enumerate_pixels_mut() {
        let cand = field.get(x as usize, y as usize);
        let r = 127.5 + cand.dx * disp_scale;
        let g = 127.5 + cand.dy * disp_scale;
        let b = cand.cost * cost_scale;
        *pix = image::Rgb([r as u8, g as u8, b as u8]);
    }
    out.save(path)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
            .init();
    }

    let source = load_rgb_image(&cli.source)?;
    let target = load_rgb_image(&cli.target)?;
    let levels = num_levels(&source, &target, cli.patch_size.max(1));

    let params = MatchParams {
        patch_size: cli.patch_size,
        start_level: cli.start_level,
        end_level: cli.end_level,
        iterations: cli.iterations,
        random_seed: cli.seed,
        parallel: cli.parallel,
    };
    let field = PatchMatcher::new(params).run(&source, &target)?;

    let stats = field_stats(&field, levels);
    save_visualization(&field, &stats, &cli.output)?;
    if let Some(stats_path) = &cli.stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)?;
    }
    println!(
        "{}x{} field, {} pyramid levels, mean cost {:.4}",
        stats.width, stats.height, stats.levels, stats.mean_cost
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
