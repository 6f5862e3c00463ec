mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod scheduler;

pub use input::{Direction, InputSnapshot, InputSource};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    atlas_source_coords, text_width_px, FrameSurface, RenderSurface, SourceRect, SpriteSheet,
    SpriteSheetError, GLYPH_HEIGHT_PX,
};
pub use scene::Scene;
pub use scheduler::{FixedStepScheduler, FrameHandler, FrameReport, SchedulerConfig};
