mod camera;
mod frame_buffer;
pub mod geometry;
mod renderer;
pub mod scene;
mod util;

pub use crate::renderer::{
    Contribution, DEFAULT_MAX_DEPTH, RayTracer, RenderProgress, RenderSettings, TracedRay,
    WorkerCount, attenuation, combine, render, render_with_progress,
};
pub use camera::Camera;
pub use frame_buffer::{FrameBuffer, color_to_image};
pub use scene::{Light, Material, Mesh, MeshOpenError, Scene};
pub use util::{Rgb, Rgba, Stats};
