use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use nalgebra::Matrix4;
use octrace::{
    Camera, Light, Material, Mesh, RenderSettings, Rgb, Scene,
    geometry::{WorldPoint, WorldVector},
    render,
    scene::octree::Octree,
};

/// Grid of spheres on a floor, every other one a mirror.
fn sphere_grid() -> Scene {
    let mut scene = Scene::new();
    scene.add_mesh(
        &Mesh::square(),
        Material::builder().color(Rgb::new(0.7, 0.7, 0.7)).build(),
        &Matrix4::new_scaling(20.0),
    );

    let sphere = Mesh::sphere(32, 16);
    for i in 0..5 {
        for j in 0..5 {
            let material = Material::builder()
                .color(Rgb::new(0.2 * i as f64, 0.5, 0.2 * j as f64))
                .mirror(if (i + j) % 2 == 0 { 0.6 } else { 0.0 })
                .build();
            let position = WorldVector::new(2.0 * i as f64 - 4.0, 0.5, 2.0 * j as f64 - 4.0);
            scene.add_mesh(&sphere, material, &Matrix4::new_translation(&position));
        }
    }

    scene.add_light(Light::white(WorldPoint::new(3.0, 8.0, 5.0)));
    scene.add_light(Light::new(
        WorldPoint::new(-5.0, 4.0, 2.0),
        Rgb::new(0.6, 0.6, 1.0),
        0.5,
    ));
    scene
}

fn criterion_benchmark(c: &mut Criterion) {
    let camera = Camera::builder()
        .position(WorldPoint::new(0.0, 4.0, 9.0))
        .center(WorldPoint::origin())
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .height(240)
        .aspect_ratio(4.0 / 3.0)
        .fovy(50.0)
        .build();
    let scene = sphere_grid();

    c.bench_function("build_octree", |b| {
        b.iter(|| Octree::build(&scene).node_count())
    });

    c.bench_function("render_sphere_grid", |b| {
        b.iter(|| render(&scene, camera, RenderSettings::default()).unwrap())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(30));
    targets = criterion_benchmark
}
criterion_main!(benches);
