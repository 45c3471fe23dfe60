use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::sim::{LoadError, SimEvent, Simulation, TickStatus};

use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::InputSnapshot;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Sleep between frames to hold `target_tps`. Unpaced runs tick as fast
    /// as possible.
    pub paced: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 80,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_ticks: None,
            paced: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load map: {0}")]
    Load(#[from] LoadError),
}

/// Supplies the held keys for each tick.
pub trait InputSource {
    fn next_input(&mut self, sim: &Simulation) -> InputSnapshot;
}

impl<F> InputSource for F
where
    F: FnMut(&Simulation) -> InputSnapshot,
{
    fn next_input(&mut self, sim: &Simulation) -> InputSnapshot {
        self(sim)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Continue,
    Stop,
}

/// Host callbacks: audio and screen flow react to events, rendering reads
/// the sprite view once per frame.
pub trait FrameHooks {
    fn on_tick(
        &mut self,
        sim: &mut Simulation,
        status: TickStatus,
        events: &[SimEvent],
    ) -> Result<SessionCommand, LoadError>;

    fn on_frame(&mut self, _sim: &Simulation) {}

    fn on_metrics(&mut self, _snapshot: LoopMetricsSnapshot) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    HookStopped,
    TickBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub simulated_ticks: u64,
    pub scripted_ticks: u64,
    pub idle_ticks: u64,
    pub stop_reason: StopReason,
}

#[derive(Debug, Default)]
struct TickCounters {
    ticks: u64,
    simulated: u64,
    scripted: u64,
    idle: u64,
}

impl TickCounters {
    fn record(&mut self, status: TickStatus) {
        self.ticks = self.ticks.saturating_add(1);
        match status {
            TickStatus::Simulated => self.simulated = self.simulated.saturating_add(1),
            TickStatus::Scripted => self.scripted = self.scripted.saturating_add(1),
            TickStatus::Idle => self.idle = self.idle.saturating_add(1),
            TickStatus::Quit => {}
        }
    }

    fn finish(self, stop_reason: StopReason) -> SessionSummary {
        SessionSummary {
            ticks: self.ticks,
            simulated_ticks: self.simulated,
            scripted_ticks: self.scripted,
            idle_ticks: self.idle,
            stop_reason,
        }
    }
}

/// Runs fixed ticks until quit, a hook stop or the tick budget.
pub fn run_session(
    config: &LoopConfig,
    sim: &mut Simulation,
    input: &mut dyn InputSource,
    hooks: &mut dyn FrameHooks,
) -> Result<SessionSummary, AppError> {
    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        max_ticks = ?config.max_ticks,
        paced = config.paced,
        "loop_config"
    );

    let mut counters = TickCounters::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, last_frame_instant);

    let stop_reason = 'frames: loop {
        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let ticks_to_run = if config.paced {
            accumulator = accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));
            let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
            accumulator = step_plan.remaining_accumulator;
            if step_plan.dropped_backlog > Duration::ZERO {
                warn!(
                    dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                    max_ticks_per_frame, "sim_clamp_triggered"
                );
            }
            step_plan.ticks_to_run
        } else {
            max_ticks_per_frame
        };

        for _ in 0..ticks_to_run {
            if config
                .max_ticks
                .is_some_and(|budget| counters.ticks >= budget)
            {
                break 'frames StopReason::TickBudget;
            }

            let snapshot = input.next_input(sim);
            let status = sim.advance_tick(&snapshot)?;
            counters.record(status);
            metrics_accumulator.record_tick(status == TickStatus::Scripted);
            if status == TickStatus::Quit {
                info!(reason = "quit_input", "shutdown_requested");
                break 'frames StopReason::Quit;
            }

            let events = sim.drain_events();
            if hooks.on_tick(sim, status, &events)? == SessionCommand::Stop {
                break 'frames StopReason::HookStopped;
            }
        }

        hooks.on_frame(sim);
        metrics_accumulator.record_frame(raw_frame_dt);
        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                scripted_tps = snapshot.scripted_tps,
                frame_time_ms = snapshot.frame_time_ms,
                entity_count = sim.world().active_handles().len(),
                map = ?sim.current_map(),
                "loop_metrics"
            );
            hooks.on_metrics(snapshot);
        }

        if config.paced {
            let elapsed = Instant::now().saturating_duration_since(now);
            let sleep = fixed_dt.saturating_sub(accumulator).saturating_sub(elapsed);
            if sleep > Duration::ZERO {
                thread::sleep(sleep);
            }
        }
    };

    let summary = counters.finish(stop_reason);
    info!(
        ticks = summary.ticks,
        simulated_ticks = summary.simulated_ticks,
        scripted_ticks = summary.scripted_ticks,
        idle_ticks = summary.idle_ticks,
        stop_reason = ?summary.stop_reason,
        lives = sim.lives(),
        "session_summary"
    );
    Ok(summary)
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

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
