use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};

const DEFAULT_TICKS_PER_SECOND: u32 = 30;
const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;
const DEFAULT_METRICS_INTERVAL: Duration = Duration::from_secs(1);
const MAX_INTERPOLATION: f32 = 1.0 - f32::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub timestep: Duration,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from_tick_rate(DEFAULT_TICKS_PER_SECOND)
    }
}

impl SchedulerConfig {
    pub fn from_tick_rate(ticks_per_second: u32) -> Self {
        Self {
            timestep: Duration::from_secs_f64(1.0 / ticks_per_second.max(1) as f64),
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            metrics_interval: DEFAULT_METRICS_INTERVAL,
        }
    }

    fn normalized(self) -> Self {
        Self {
            timestep: normalize_non_zero_duration(
                self.timestep,
                Duration::from_secs_f64(1.0 / DEFAULT_TICKS_PER_SECOND as f64),
            ),
            max_frame_delta: normalize_non_zero_duration(
                self.max_frame_delta,
                DEFAULT_MAX_FRAME_DELTA,
            ),
            max_ticks_per_frame: self.max_ticks_per_frame.max(1),
            metrics_interval: normalize_non_zero_duration(
                self.metrics_interval,
                DEFAULT_METRICS_INTERVAL,
            ),
        }
    }
}

/// Receives the work the scheduler decides to run for one display frame.
///
/// `update` is called zero or more times, always before the single `render`
/// call of the same frame.
pub trait FrameHandler {
    fn update(&mut self);
    fn render(&mut self, interpolation: f32);
    fn metrics_updated(&mut self, _snapshot: LoopMetricsSnapshot) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub ticks_run: u32,
    pub interpolation: f32,
    pub dropped_backlog: Duration,
    pub metrics: Option<LoopMetricsSnapshot>,
}

#[derive(Debug)]
struct RunState {
    last_frame: Instant,
    accumulator: Duration,
    metrics: MetricsAccumulator,
}

/// Fixed-timestep update/render scheduler.
#[derive(Debug)]
pub struct FixedStepScheduler {
    config: SchedulerConfig,
    run: Option<RunState>,
}

impl FixedStepScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: config.normalized(),
            run: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn start(&mut self, now: Instant) {
        self.run = Some(RunState {
            last_frame: now,
            accumulator: Duration::ZERO,
            metrics: MetricsAccumulator::new(self.config.metrics_interval, now),
        });
    }

    pub fn stop(&mut self) {
        self.run = None;
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn accumulated(&self) -> Duration {
        self.run
            .as_ref()
            .map_or(Duration::ZERO, |run| run.accumulator)
    }

    /// Runs one display frame. Returns `None` when the scheduler is stopped.
    pub fn tick<H>(&mut self, now: Instant, handler: &mut H) -> Option<FrameReport>
    where
        H: FrameHandler + ?Sized,
    {
        let config = self.config;
        let run = self.run.as_mut()?;

        let raw_frame_dt = now.saturating_duration_since(run.last_frame);
        run.last_frame = now;
        run.accumulator = run
            .accumulator
            .saturating_add(clamp_frame_delta(raw_frame_dt, config.max_frame_delta));

        let step_plan = plan_sim_steps(
            run.accumulator,
            config.timestep,
            config.max_ticks_per_frame,
        );
        for _ in 0..step_plan.ticks_to_run {
            handler.update();
            run.metrics.record_tick();
        }
        run.accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = config.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }

        let interpolation = interpolation_factor(run.accumulator, config.timestep);
        handler.render(interpolation);
        run.metrics.record_frame(raw_frame_dt);

        let metrics = run.metrics.maybe_snapshot(now);
        if let Some(snapshot) = metrics {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                "loop_metrics"
            );
            handler.metrics_updated(snapshot);
        }

        Some(FrameReport {
            ticks_run: step_plan.ticks_to_run,
            interpolation,
            dropped_backlog: step_plan.dropped_backlog,
            metrics,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn interpolation_factor(accumulator: Duration, fixed_dt: Duration) -> f32 {
    let ratio = accumulator.as_secs_f64() / fixed_dt.as_secs_f64();
    (ratio as f32).clamp(0.0, MAX_INTERPOLATION)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingHandler {
        updates: u32,
        renders: Vec<f32>,
        updates_at_render: Vec<u32>,
        last_metrics: Option<LoopMetricsSnapshot>,
    }

    impl FrameHandler for CountingHandler {
        fn update(&mut self) {
            self.updates += 1;
        }

        fn render(&mut self, interpolation: f32) {
            self.renders.push(interpolation);
            self.updates_at_render.push(self.updates);
        }

        fn metrics_updated(&mut self, snapshot: LoopMetricsSnapshot) {
            self.last_metrics = Some(snapshot);
        }
    }

    fn test_config() -> SchedulerConfig {
        SchedulerConfig {
            timestep: Duration::from_millis(10),
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_interval: Duration::from_secs(1),
        }
    }

    fn started(config: SchedulerConfig) -> (FixedStepScheduler, Instant) {
        let base = Instant::now();
        let mut scheduler = FixedStepScheduler::new(config);
        scheduler.start(base);
        (scheduler, base)
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn plan_sim_steps_keeps_sub_step_remainder_at_cap() {
        let fixed_dt = Duration::from_millis(10);
        let result = plan_sim_steps(Duration::from_millis(55), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 5);
        assert_eq!(result.remaining_accumulator, Duration::from_millis(5));
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn frames_no_longer_than_timestep_run_at_most_one_step() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();
        let mut now = base;

        for elapsed_ms in [0u64, 3, 10, 7, 9, 1, 10, 10, 4, 6, 8, 2] {
            now += Duration::from_millis(elapsed_ms);
            let report = scheduler.tick(now, &mut handler).expect("running");
            assert!(report.ticks_run <= 1, "elapsed={elapsed_ms}ms");
            assert!(
                (0.0..1.0).contains(&report.interpolation),
                "interpolation={}",
                report.interpolation
            );
        }
    }

    #[test]
    fn steps_never_exceed_cap_and_backlog_is_discarded() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();

        // 120ms would be 12 steps; the cap allows 5 and the rest is dropped.
        let report = scheduler
            .tick(base + Duration::from_millis(120), &mut handler)
            .expect("running");

        assert_eq!(report.ticks_run, 5);
        assert_eq!(report.dropped_backlog, Duration::from_millis(70));
        assert_eq!(scheduler.accumulated(), Duration::ZERO);
        assert_eq!(report.interpolation, 0.0);
    }

    #[test]
    fn stall_is_clamped_to_max_frame_delta() {
        let config = SchedulerConfig {
            max_ticks_per_frame: 100,
            ..test_config()
        };
        let (mut scheduler, base) = started(config);
        let mut handler = CountingHandler::default();

        let report = scheduler
            .tick(base + Duration::from_secs(10), &mut handler)
            .expect("running");

        assert_eq!(report.ticks_run, 25);
        assert_eq!(report.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn leftover_time_carries_into_interpolation() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();

        let report = scheduler
            .tick(base + Duration::from_millis(25), &mut handler)
            .expect("running");

        assert_eq!(report.ticks_run, 2);
        assert!((report.interpolation - 0.5).abs() < 0.0001);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(5));
    }

    #[test]
    fn render_runs_once_after_all_updates_of_the_frame() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();

        scheduler.tick(base + Duration::from_millis(30), &mut handler);
        scheduler.tick(base + Duration::from_millis(35), &mut handler);

        assert_eq!(handler.renders.len(), 2);
        assert_eq!(handler.updates_at_render, vec![3, 3]);
    }

    #[test]
    fn stop_is_idempotent_and_halts_ticks() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();

        scheduler.stop();
        scheduler.stop();

        assert!(!scheduler.is_running());
        assert!(scheduler
            .tick(base + Duration::from_millis(100), &mut handler)
            .is_none());
        assert_eq!(handler.updates, 0);
        assert!(handler.renders.is_empty());
    }

    #[test]
    fn unstarted_scheduler_does_nothing() {
        let mut scheduler = FixedStepScheduler::new(test_config());
        let mut handler = CountingHandler::default();
        assert!(scheduler.tick(Instant::now(), &mut handler).is_none());
    }

    #[test]
    fn fps_reported_once_per_window() {
        let (mut scheduler, base) = started(test_config());
        let mut handler = CountingHandler::default();

        let mut reports = 0;
        for frame in 1..=100u64 {
            let report = scheduler
                .tick(base + Duration::from_millis(frame * 20), &mut handler)
                .expect("running");
            if report.metrics.is_some() {
                reports += 1;
            }
        }

        assert_eq!(reports, 2);
        let metrics = handler.last_metrics.expect("metrics");
        assert_eq!(metrics.fps, 50);
        assert_eq!(metrics.tps, 100);
    }

    #[test]
    fn zero_config_values_are_normalized() {
        let scheduler = FixedStepScheduler::new(SchedulerConfig {
            timestep: Duration::ZERO,
            max_frame_delta: Duration::ZERO,
            max_ticks_per_frame: 0,
            metrics_interval: Duration::ZERO,
        });
        let config = scheduler.config();

        assert!(config.timestep > Duration::ZERO);
        assert_eq!(config.max_frame_delta, DEFAULT_MAX_FRAME_DELTA);
        assert_eq!(config.max_ticks_per_frame, 1);
        assert_eq!(config.metrics_interval, DEFAULT_METRICS_INTERVAL);
    }

    #[test]
    fn default_config_runs_thirty_ticks_per_second() {
        let config = SchedulerConfig::default();
        assert!((config.timestep.as_secs_f64() - 1.0 / 30.0).abs() < 0.000_001);
        assert_eq!(config.max_ticks_per_frame, 5);
        assert_eq!(config.max_frame_delta, Duration::from_millis(250));
    }
}
