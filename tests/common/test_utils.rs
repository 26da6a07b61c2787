//! Shared helpers for the integration tests.

use gloam::{
    data_structures::scene_graph::SceneGraph,
    render::{Frame, Rasterizer},
};

/// Summary of one rendered frame, as captured by [`RecordingRasterizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub draws: usize,
    pub lights: usize,
    pub elapsed_secs: f32,
}

/// A rasterizer that records what it was asked to do instead of touching a
/// GPU, so the loop and composition logic can be tested headless.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    pub resizes: Vec<(u32, u32, f32)>,
    pub frames: Vec<FrameRecord>,
}

impl RecordingRasterizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for RecordingRasterizer {
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.resizes.push((width, height, pixel_ratio));
    }

    fn render(&mut self, _scene: &SceneGraph, frame: &Frame) -> anyhow::Result<()> {
        self.frames.push(FrameRecord {
            draws: frame.draws.len(),
            lights: frame.lights.len(),
            elapsed_secs: frame.elapsed.as_secs_f32(),
        });
        Ok(())
    }
}

/// A deterministic `[0, 1)` sampler for reproducible scene construction.
pub fn seeded_rng(seed: u64) -> impl FnMut() -> f32 {
    let mut state = seed | 1;
    move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u32 << 24) as f32
    }
}
