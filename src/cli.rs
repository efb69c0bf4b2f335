use std::{
    f64::consts::{FRAC_PI_2, FRAC_PI_4},
    num::NonZeroUsize,
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use nalgebra::{Matrix4, Rotation3};
use octrace::{
    Camera, DEFAULT_MAX_DEPTH, Light, Material, Mesh, RenderSettings, Rgb, Scene, WorkerCount,
    geometry::{WorldPoint, WorldVector},
    render_with_progress,
};

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Renders a small demonstration scene into an image file
#[derive(Parser, Debug)]
#[command(name = "octrace")]
struct Args {
    /// Output file, format is given by the extension
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image height in pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Image width divided by height
    #[arg(long, default_value_t = 4.0 / 3.0, value_parser = parse_aspect_ratio)]
    aspect_ratio: f64,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0, value_parser = parse_fovy)]
    fovy: f64,

    /// Maximal number of reflections and refractions per ray
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Number of render threads, one per core if not given
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// OFF or OBJ mesh placed in the middle of the scene
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn parse_aspect_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if ratio > 0.0 && ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(format!("aspect ratio must be positive, got {ratio}"))
    }
}

fn parse_fovy(value: &str) -> Result<f64, String> {
    let fovy: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if fovy > 0.0 && fovy < 180.0 {
        Ok(fovy)
    } else {
        Err(format!("field of view must be between 0 and 180 degrees, got {fovy}"))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.clone().into())
        .init();

    let mesh = args
        .mesh
        .as_ref()
        .map(|path| Mesh::load(path).with_context(|| format!("Loading {}", path.display())))
        .transpose()?;
    let scene = demo_scene(mesh.as_ref());

    let camera = Camera::builder()
        .position(WorldPoint::new(0.0, 2.5, 7.0))
        .center(WorldPoint::new(0.0, 0.8, 0.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .height(args.height)
        .aspect_ratio(args.aspect_ratio)
        .fovy(args.fovy)
        .build();

    let settings = RenderSettings {
        max_depth: args.max_depth,
        worker_count: args.workers.map_or(WorkerCount::Auto, WorkerCount::Manual),
        ..RenderSettings::default()
    };

    let bar = ProgressBar::new(camera.height() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} rows ETA: {eta}")?);
    let frame = render_with_progress(&scene, camera, settings, |progress| {
        bar.set_position(progress.finished_rows as u64)
    })?;
    bar.finish();

    frame
        .save(&args.output)
        .with_context(|| format!("Saving {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}

fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&WorldVector::new(x, y, z))
}

/// Floor with a mirror behind it, a glass cube and a shiny sphere.
fn demo_scene(mesh: Option<&Mesh>) -> Scene {
    let mut scene = Scene::new();

    scene.add_mesh(
        &Mesh::square(),
        Material::builder().color(Rgb::new(0.8, 0.8, 0.75)).build(),
        &Matrix4::new_scaling(12.0),
    );

    let facing_camera = Rotation3::from_axis_angle(&WorldVector::x_axis(), FRAC_PI_2);
    scene.add_mesh(
        &Mesh::square(),
        Material::builder()
            .color(Rgb::new(0.9, 0.9, 1.0))
            .mirror(0.85)
            .build(),
        &(translation(0.0, 2.0, -3.0) * facing_camera.to_homogeneous() * Matrix4::new_scaling(5.0)),
    );

    let tilted = Rotation3::from_axis_angle(&WorldVector::y_axis(), FRAC_PI_4);
    scene.add_mesh(
        &Mesh::cube(),
        Material::builder()
            .color(Rgb::new(0.85, 0.95, 1.0))
            .opacity(0.15)
            .refraction_index(1.5)
            .mirror(0.1)
            .build(),
        &(translation(-1.6, 0.6, 0.8) * tilted.to_homogeneous() * Matrix4::new_scaling(1.2)),
    );

    scene.add_mesh(
        &Mesh::sphere(48, 24),
        Material::builder()
            .color(Rgb::new(0.8, 0.15, 0.1))
            .mirror(0.25)
            .build(),
        &(translation(1.5, 0.75, 0.0) * Matrix4::new_scaling(1.5)),
    );

    if let Some(mesh) = mesh {
        scene.add_mesh(
            &mesh.normalized(1.2),
            Material::builder()
                .color(Rgb::new(0.9, 0.7, 0.2))
                .mirror(0.3)
                .build(),
            &translation(0.0, 0.6, 1.8),
        );
    }

    scene.add_light(Light::white(WorldPoint::new(4.0, 6.0, 4.0)));
    scene.add_light(Light::new(
        WorldPoint::new(-4.0, 5.0, 3.0),
        Rgb::new(1.0, 0.85, 0.6),
        0.6,
    ));

    scene
}
