use std::{
    iter::Enumerate,
    slice::ChunksMut,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Instant,
};

use anyhow::anyhow;
use core_affinity::CoreId;

use crate::{
    camera::Camera,
    frame_buffer::FrameBuffer,
    renderer::{RayTracer, RenderSettings, WorkerCount, worker::Worker},
    scene::Scene,
    util::Rgb,
};

/// Rows finished so far, reported after every row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderProgress {
    pub finished_rows: usize,
    pub total_rows: usize,
}

impl RenderProgress {
    pub fn percent(&self) -> f32 {
        100.0 * (self.finished_rows as f32) / (self.total_rows as f32)
    }

    pub fn is_finished(&self) -> bool {
        self.finished_rows >= self.total_rows
    }
}

/// Renders the scene as seen by the camera, blocks until the image is done.
pub fn render(scene: &Scene, camera: Camera, settings: RenderSettings) -> anyhow::Result<FrameBuffer> {
    render_with_progress(scene, camera, settings, |_| {})
}

pub fn render_with_progress(
    scene: &Scene,
    camera: Camera,
    settings: RenderSettings,
    progress_callback: impl Fn(RenderProgress) + Sync,
) -> anyhow::Result<FrameBuffer> {
    RayTracer::new(scene, camera, settings).render_with_progress(progress_callback)
}

type RowQueue<'a> = Mutex<Enumerate<ChunksMut<'a, Rgb>>>;

impl RayTracer<'_> {
    pub fn render(&self) -> anyhow::Result<FrameBuffer> {
        self.render_with_progress(|_| {})
    }

    /// Renders the image on a pool of worker threads, one row at a time.
    /// Every row is written by exactly one worker.
    pub fn render_with_progress(
        &self,
        progress_callback: impl Fn(RenderProgress) + Sync,
    ) -> anyhow::Result<FrameBuffer> {
        let mut frame = FrameBuffer::new(self.camera().resolution());
        let total_rows = frame.height() as usize;
        let cores = self.settings().worker_count.cores();

        log::info!(
            "Rendering {}x{} pixels on {} workers",
            frame.width(),
            frame.height(),
            cores.len()
        );
        let started = Instant::now();

        {
            let rows: RowQueue = Mutex::new(frame.rows_mut().enumerate());
            let finished_rows = AtomicUsize::new(0);

            thread::scope(|scope| -> anyhow::Result<()> {
                let threads = cores
                    .into_iter()
                    .enumerate()
                    .map(|(worker_id, core)| {
                        let rows = &rows;
                        let finished_rows = &finished_rows;
                        let progress_callback = &progress_callback;

                        thread::Builder::new()
                            .name(format!("worker{worker_id}"))
                            .spawn_scoped(scope, move || {
                                if let Some(core) = core {
                                    core_affinity::set_for_current(core);
                                }

                                let mut worker = Worker::new(worker_id);
                                while let Some((row, pixels)) = next_row(rows) {
                                    worker.render_row(self, row, pixels);

                                    let finished = finished_rows.fetch_add(1, Ordering::AcqRel) + 1;
                                    progress_callback(RenderProgress {
                                        finished_rows: finished,
                                        total_rows,
                                    });
                                }
                                worker.finish();
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                for handle in threads {
                    handle
                        .join()
                        .map_err(|_| anyhow!("A render worker panicked"))?;
                }
                Ok(())
            })?;
        }

        log::info!("Rendering took {:.2?}", started.elapsed());
        Ok(frame)
    }
}

fn next_row<'a>(rows: &RowQueue<'a>) -> Option<(usize, &'a mut [Rgb])> {
    rows.lock().unwrap_or_else(PoisonError::into_inner).next()
}

impl WorkerCount {
    /// One entry per worker, with the core it should be pinned to.
    fn cores(&self) -> Vec<Option<CoreId>> {
        match self {
            WorkerCount::Auto => match core_affinity::get_core_ids() {
                Some(cores) if !cores.is_empty() => cores.into_iter().map(Some).collect(),
                _ => vec![None; num_cpus::get()],
            },
            WorkerCount::Manual(count) => vec![None; count.get()],
        }
    }
}
