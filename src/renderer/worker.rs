use crate::{geometry::ScreenPoint, scene::octree::StackCache, util::Rgb};

use super::RayTracer;

pub struct Worker {
    worker_id: usize,
    rows_rendered: usize,
    octree_stack_cache: StackCache,
}

impl Worker {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            rows_rendered: 0,
            octree_stack_cache: Default::default(),
        }
    }

    pub fn render_row(&mut self, tracer: &RayTracer, row: usize, pixels: &mut [Rgb]) {
        for (column, pixel) in pixels.iter_mut().enumerate() {
            let point = ScreenPoint::new(column as u32, row as u32);
            *pixel = tracer.trace_pixel(&point, &mut self.octree_stack_cache);
        }
        self.rows_rendered += 1;
    }

    pub fn finish(self) {
        log::debug!(
            "Worker {} finished after {} rows",
            self.worker_id,
            self.rows_rendered
        );
    }
}
