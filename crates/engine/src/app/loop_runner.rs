use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::rendering::Renderer;
use super::scheduler::{FixedStepScheduler, FrameHandler, SchedulerConfig};
use super::{Direction, InputSnapshot, LoopMetricsSnapshot, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub logical_width: u32,
    pub logical_height: u32,
    pub display_scale: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Lonk".to_string(),
            logical_width: 160,
            logical_height: 144,
            display_scale: 6,
            target_tps: 30,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_interval: Duration::from_secs(1),
        }
    }
}

impl LoopConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            max_frame_delta: self.max_frame_delta,
            max_ticks_per_frame: self.max_ticks_per_frame,
            metrics_interval: self.metrics_interval,
            ..SchedulerConfig::from_tick_rate(self.target_tps)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let display_scale = config.display_scale.max(1);
    let logical_width = config.logical_width.max(1);
    let logical_height = config.logical_height.max(1);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(PhysicalSize::new(
                logical_width * display_scale,
                logical_height * display_scale,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        logical_width,
        logical_height,
        display_scale,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut scheduler = FixedStepScheduler::new(config.scheduler_config());
    let scheduler_config = scheduler.config();
    info!(
        timestep_ms = scheduler_config.timestep.as_secs_f64() * 1000.0,
        max_frame_delta_ms = scheduler_config.max_frame_delta.as_millis() as u64,
        max_ticks_per_frame = scheduler_config.max_ticks_per_frame,
        logical_width,
        logical_height,
        display_scale,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_applied_title: Option<String> = None;
    scheduler.start(Instant::now());

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    scheduler.stop();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        scheduler.stop();
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        scheduler.stop();
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let mut driver = FrameDriver {
                        scene: scene.as_mut(),
                        input: &mut input_collector,
                        renderer: &mut renderer,
                        present_error: None,
                    };
                    scheduler.tick(Instant::now(), &mut driver);
                    if let Some(error) = driver.present_error.take() {
                        warn!(error = %error, "renderer_draw_failed");
                        scheduler.stop();
                        window_target.exit();
                        return;
                    }

                    let next_title = scene.debug_title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if scheduler.is_running() {
                    window.request_redraw();
                }
            }
            Event::LoopExiting => {
                scheduler.stop();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

struct FrameDriver<'a> {
    scene: &'a mut dyn Scene,
    input: &'a mut InputCollector,
    renderer: &'a mut Renderer,
    present_error: Option<PixelsError>,
}

impl FrameHandler for FrameDriver<'_> {
    fn update(&mut self) {
        let snapshot = self.input.snapshot_for_tick();
        self.scene.update(&snapshot);
    }

    fn render(&mut self, interpolation: f32) {
        let scene = &*self.scene;
        if let Err(error) = self
            .renderer
            .present(|surface| scene.render(surface, interpolation))
        {
            self.present_error = Some(error);
        }
    }

    fn metrics_updated(&mut self, snapshot: LoopMetricsSnapshot) {
        self.scene.metrics_updated(snapshot);
    }
}

/// Held-key state fed by the window's key events between frames.
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(Direction::Up, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(Direction::Down, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(Direction::Left, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(Direction::Right, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn snapshot_for_tick(&self) -> InputSnapshot {
        InputSnapshot::new(self.action_states, self.quit_requested)
    }
}
