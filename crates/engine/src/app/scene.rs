use super::{InputSnapshot, LoopMetricsSnapshot, RenderSurface};

/// A game driven by the loop runner.
///
/// The runner owns exactly one scene for the lifetime of the window and calls
/// `update` once per fixed simulation step and `render` once per display frame.
pub trait Scene {
    fn update(&mut self, input: &InputSnapshot);
    fn render(&self, surface: &mut dyn RenderSurface, interpolation: f32);
    fn metrics_updated(&mut self, _snapshot: LoopMetricsSnapshot) {}
    fn debug_title(&self) -> Option<String> {
        None
    }
}
