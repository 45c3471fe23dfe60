//! Scripted sequences that take over from normal dispatch for a bounded
//! number of ticks. Each call to `advance` performs exactly one step.

use crate::catalog::{EntityKind, Orientation};
use crate::world::{EntityHandle, PlayerState, World};

use super::{Tuning, DEATH_FALL_STEP, DEATH_RISE_STEP, DEATH_RISE_STEPS, SLIDE_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    LevelSplash,
    Death,
    PipeEntry,
    PipeExit,
    LevelFinish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeathPhase {
    Hold(u32),
    Rise(u32),
    Fall,
    Linger(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlidePhase {
    Slide,
    Hold(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    LevelSplash { remaining: u32 },
    Death { phase: DeathPhase },
    PipeEntry { target_x: i32, phase: SlidePhase },
    PipeExit { axis: Axis, target: i32 },
    LevelFinish { speed: i32, phase: SlidePhase },
}

impl Transition {
    pub(crate) fn splash(tuning: &Tuning) -> Self {
        Self::LevelSplash {
            remaining: tuning.splash_hold,
        }
    }

    pub(crate) fn death(world: &mut World, player: EntityHandle, tuning: &Tuning) -> Self {
        if let Some(body) = world.entity_mut(player).and_then(|e| e.player_mut()) {
            body.state = PlayerState::Dead;
            body.jump_counter = 0;
            body.walk_ticks = 0;
        }
        Self::Death {
            phase: DeathPhase::Hold(tuning.death_pre_hold),
        }
    }

    /// Lines the player up with the pipe mouth; the slide then moves it in.
    pub(crate) fn pipe_entry(world: &mut World, player: EntityHandle, pipe: EntityHandle) -> Self {
        let pipe_origin = world.entity(pipe).map(|e| e.position).unwrap_or_default();
        if let Some(entity) = world.entity_mut(player) {
            entity.position.y = pipe_origin.y;
        }
        Self::PipeEntry {
            target_x: pipe_origin.x + SLIDE_STEP,
            phase: SlidePhase::Slide,
        }
    }

    /// Returns `None` when `pipe` is not an exit pipe.
    pub(crate) fn pipe_exit(world: &World, pipe: EntityHandle) -> Option<Self> {
        let entity = world.entity(pipe).filter(|e| e.kind() == EntityKind::Pipe)?;
        let rect = entity.rect();
        match entity.orientation {
            Orientation::Down => Some(Self::PipeExit {
                axis: Axis::Y,
                target: rect.bottom() + SLIDE_STEP,
            }),
            Orientation::Right => Some(Self::PipeExit {
                axis: Axis::X,
                target: rect.right() + SLIDE_STEP,
            }),
            Orientation::Left | Orientation::Up => None,
        }
    }

    /// Walks the player off screen at `speed`, the speed it landed with.
    pub(crate) fn level_finish(world: &mut World, player: EntityHandle, speed: i32) -> Self {
        if let Some(body) = world.entity_mut(player).and_then(|e| e.player_mut()) {
            body.state = PlayerState::GroundedRight;
            body.jump_counter = 0;
        }
        Self::LevelFinish {
            speed,
            phase: SlidePhase::Slide,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::LevelSplash { .. } => TransitionKind::LevelSplash,
            Self::Death { .. } => TransitionKind::Death,
            Self::PipeEntry { .. } => TransitionKind::PipeEntry,
            Self::PipeExit { .. } => TransitionKind::PipeExit,
            Self::LevelFinish { .. } => TransitionKind::LevelFinish,
        }
    }

    /// Performs one step. Returns the kind once the sequence has finished.
    pub(crate) fn advance(
        &mut self,
        world: &mut World,
        player: EntityHandle,
        tuning: &Tuning,
    ) -> Option<TransitionKind> {
        let kind = self.kind();
        let done = match self {
            Self::LevelSplash { remaining } => countdown(remaining),
            Self::Death { phase } => advance_death(phase, world, player, tuning),
            Self::PipeEntry { target_x, phase } => match phase {
                SlidePhase::Slide => {
                    if slide_toward(world, player, Axis::X, *target_x) {
                        *phase = SlidePhase::Hold(tuning.pipe_hold);
                    }
                    false
                }
                SlidePhase::Hold(remaining) => countdown(remaining),
            },
            Self::PipeExit { axis, target } => slide_toward(world, player, *axis, *target),
            Self::LevelFinish { speed, phase } => match phase {
                SlidePhase::Slide => {
                    if let Some(entity) = world.entity_mut(player) {
                        entity.position.x += *speed;
                        if let Some(body) = entity.player_mut() {
                            body.walk_ticks = body.walk_ticks.wrapping_add(1);
                        }
                    }
                    let off_screen = world
                        .screen_rect(player)
                        .map_or(true, |rect| rect.left() >= tuning.viewport_width);
                    if off_screen {
                        *phase = SlidePhase::Hold(tuning.finish_hold);
                    }
                    false
                }
                SlidePhase::Hold(remaining) => countdown(remaining),
            },
        };
        done.then_some(kind)
    }
}

/// Counts one tick off a hold; a hold of zero still lasts one tick.
fn countdown(remaining: &mut u32) -> bool {
    *remaining = remaining.saturating_sub(1);
    *remaining == 0
}

fn advance_death(
    phase: &mut DeathPhase,
    world: &mut World,
    player: EntityHandle,
    tuning: &Tuning,
) -> bool {
    match phase {
        DeathPhase::Hold(remaining) => {
            if countdown(remaining) {
                *phase = DeathPhase::Rise(DEATH_RISE_STEPS);
            }
            false
        }
        DeathPhase::Rise(remaining) => {
            if let Some(entity) = world.entity_mut(player) {
                entity.position.y -= DEATH_RISE_STEP;
            }
            if countdown(remaining) {
                *phase = DeathPhase::Fall;
            }
            false
        }
        DeathPhase::Fall => {
            let below = match world.entity_mut(player) {
                Some(entity) => {
                    entity.position.y += DEATH_FALL_STEP;
                    entity.rect().top() >= tuning.playfield_bottom
                }
                None => true,
            };
            if below {
                *phase = DeathPhase::Linger(tuning.death_post_hold);
            }
            false
        }
        DeathPhase::Linger(remaining) => countdown(remaining),
    }
}

/// Moves at most one slide step along `axis`. Returns true once at `target`.
fn slide_toward(world: &mut World, player: EntityHandle, axis: Axis, target: i32) -> bool {
    let Some(entity) = world.entity_mut(player) else {
        return true;
    };
    let coord = match axis {
        Axis::X => &mut entity.position.x,
        Axis::Y => &mut entity.position.y,
    };
    let delta = (target - *coord).clamp(-SLIDE_STEP, SLIDE_STEP);
    *coord += delta;
    let reached = *coord == target;
    if let Some(body) = entity.player_mut() {
        body.walk_ticks = body.walk_ticks.wrapping_add(1);
    }
    reached
}
