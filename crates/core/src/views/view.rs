use frametrace_protocol::Scene;

use crate::model::TimingTable;
use crate::views::{LayoutParams, render_timeline, render_timescale};

/// Owns the rendered scene and the pan origin.
///
/// Rendering happens once; panning rewrites each group's horizontal
/// translation from its cached `begin_ms` and leaves stage geometry
/// untouched, so a pan costs one pass over the frame groups.
#[derive(Debug, Clone)]
pub struct TimelineView {
    params: LayoutParams,
    origin: f64,
    scene: Scene,
}

impl TimelineView {
    pub fn new(table: &TimingTable, params: LayoutParams) -> Self {
        let scene = render_timeline(table, &params);
        Self {
            origin: params.t_offset,
            params,
            scene,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Current pan origin in milliseconds.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Attach a time ruler underlay spanning `[t0, t1)` at `dt` ms
    /// intervals.
    pub fn attach_timescale(&mut self, t0: f64, t1: f64, dt: f64) {
        let height = self.scene.height;
        self.scene.underlay = render_timescale(t0, t1, dt, &self.params, height);
    }

    /// Apply a scroll delta. The origin moves by a tenth of the delta
    /// and is floor-clamped at zero; every group's translation is
    /// recomputed from its cached begin.
    pub fn pan(&mut self, delta: f64) {
        self.origin = (self.origin + delta * 0.1).max(0.0);
        for group in &mut self.scene.groups {
            group.translate_x = (group.begin_ms - self.origin) * self.params.t_scale;
        }
    }
}
