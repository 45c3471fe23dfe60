mod enemy;
mod events;
mod gate;
mod level;
mod player;
mod resolver;
mod scripted;
#[cfg(test)]
mod tests;

pub use events::{SimEvent, SoundCue};
pub use level::{
    symbol_kind, Campaign, CampaignDef, CampaignError, LevelDef, LoadError, MapBlueprint, MapId,
};
pub use resolver::{move_horizontal, move_vertical, StepOutcome};
pub use scripted::TransitionKind;

use tracing::{debug, info};

use crate::app::InputSnapshot;
use crate::catalog::{Category, EntityKind, KindCatalog};
use crate::world::{px, EntityHandle, Size, SpriteView, World};

use player::PlayerOutcome;
use scripted::Transition;

pub const WALK_SPEED: i32 = px(4);
pub const RUN_SPEED: i32 = px(6);
/// 1.5 px per tick.
pub const ENEMY_SPEED: i32 = 9;
pub const GRAVITY: i32 = px(5);
pub const FULL_JUMP: i32 = 35;
pub const BOUNCE_JUMP: i32 = 20;
/// How far above the enemy's bottom edge the player's bottom must be to stomp.
pub const STOMP_MARGIN: i32 = px(5);
pub const DEATH_RISE_STEP: i32 = 18;
pub const DEATH_RISE_STEPS: u32 = 20;
pub const DEATH_FALL_STEP: i32 = 24;
pub const SLIDE_STEP: i32 = px(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub viewport_width_px: u32,
    pub viewport_height_px: u32,
    pub starting_lives: u32,
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport_width_px: 700,
            viewport_height_px: 700,
            starting_lives: 7,
            tick_rate: 80,
        }
    }
}

/// Values derived once from `SimConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tuning {
    pub playfield_bottom: i32,
    pub viewport_width: i32,
    pub death_pre_hold: u32,
    pub death_post_hold: u32,
    pub pipe_hold: u32,
    pub finish_hold: u32,
    pub splash_hold: u32,
}

impl Tuning {
    fn from_config(config: &SimConfig) -> Self {
        let ticks = |millis: u32| config.tick_rate.max(1).saturating_mul(millis) / 1000;
        Self {
            playfield_bottom: px(config.viewport_height_px as i32),
            viewport_width: px(config.viewport_width_px as i32),
            death_pre_hold: ticks(250),
            death_post_hold: ticks(1000),
            pipe_hold: ticks(750),
            finish_hold: ticks(5000),
            splash_hold: ticks(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressFlags {
    pub key_found: bool,
    pub coins_collected: bool,
    pub enemies_cleared: bool,
    pub level_finished: bool,
}

impl ProgressFlags {
    /// Precondition for finishing a map on a goal landing block.
    pub fn goal_open(&self) -> bool {
        self.key_found && self.coins_collected && self.enemies_cleared
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Normal dispatch ran.
    Simulated,
    /// A scripted transition advanced one step.
    Scripted,
    /// Nothing is playing (no map loaded, game over or victory).
    Idle,
    Quit,
}

pub(crate) struct TickContext<'a> {
    pub world: &'a mut World,
    pub progress: &'a mut ProgressFlags,
    pub events: &'a mut Vec<SimEvent>,
    pub tuning: &'a Tuning,
}

/// Owns the world and drives it one fixed tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    campaign: Campaign,
    config: SimConfig,
    tuning: Tuning,
    progress: ProgressFlags,
    lives: u32,
    current_map: Option<MapId>,
    player: Option<EntityHandle>,
    transition: Option<Transition>,
    events: Vec<SimEvent>,
    game_over: bool,
    victory: bool,
    playing: bool,
    tick: u64,
}

impl Simulation {
    pub fn new(catalog: KindCatalog, campaign: Campaign, config: SimConfig) -> Self {
        let viewport = Size {
            w: px(config.viewport_width_px as i32),
            h: px(config.viewport_height_px as i32),
        };
        Self {
            world: World::new(catalog, viewport),
            campaign,
            tuning: Tuning::from_config(&config),
            config,
            progress: ProgressFlags::default(),
            lives: config.starting_lives,
            current_map: None,
            player: None,
            transition: None,
            events: Vec::new(),
            game_over: false,
            victory: false,
            playing: false,
            tick: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn progress(&self) -> ProgressFlags {
        self.progress
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn current_map(&self) -> Option<MapId> {
        self.current_map
    }

    pub fn player(&self) -> Option<EntityHandle> {
        self.player
    }

    pub fn active_transition(&self) -> Option<TransitionKind> {
        self.transition.as_ref().map(Transition::kind)
    }

    pub fn level_finished(&self) -> bool {
        self.progress.level_finished
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn reset_lives(&mut self) {
        self.lives = self.config.starting_lives;
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn sprites(&self) -> Vec<SpriteView> {
        self.world.sprites(self.tick)
    }

    /// Replaces the current map with `id`. Any running transition is dropped.
    pub fn load_map(&mut self, id: MapId) -> Result<(), LoadError> {
        let blueprint = self.campaign.map(id).ok_or(LoadError::UnknownMap(id))?;
        self.playing = false;
        self.transition = None;
        self.world.clear_map();

        let player = match level::populate(&mut self.world, id, blueprint) {
            Ok(player) => player,
            Err(error) => {
                self.world.clear_map();
                self.player = None;
                self.current_map = None;
                return Err(error);
            }
        };

        if let Some(rect) = self.world.entity(player).map(|entity| entity.rect()) {
            self.world.camera_mut().center_on(rect);
        }
        self.progress = ProgressFlags {
            key_found: !self.world.has_active(|kind| kind == EntityKind::Key),
            coins_collected: !self.world.has_active(|kind| kind == EntityKind::Coin),
            enemies_cleared: !self.world.has_active(EntityKind::is_enemy),
            level_finished: false,
        };
        self.player = Some(player);
        self.current_map = Some(id);
        self.game_over = false;
        self.victory = false;
        self.playing = true;
        self.events.push(SimEvent::MapLoaded(id));
        info!(
            map = %id,
            entity_count = self.world.active_handles().len(),
            key_found = self.progress.key_found,
            coins_collected = self.progress.coins_collected,
            enemies_cleared = self.progress.enemies_cleared,
            "map_loaded"
        );

        if self.campaign.is_first_map_of_level(id) {
            let level_name = self
                .campaign
                .level(id)
                .map(|level| level.name.clone())
                .unwrap_or_default();
            self.events.push(SimEvent::MusicPaused);
            self.events.push(SimEvent::LevelSplash { level_name });
            self.start_transition(Transition::splash(&self.tuning));
        } else {
            self.check_pipe_exit();
        }
        Ok(())
    }

    /// Advances one fixed tick. Errors only come from loading the next map.
    pub fn advance_tick(&mut self, input: &InputSnapshot) -> Result<TickStatus, LoadError> {
        if input.quit_requested() {
            if let Some(transition) = self.transition.take() {
                info!(transition = ?transition.kind(), "transition_aborted");
            }
            return Ok(TickStatus::Quit);
        }

        if let Some(mut transition) = self.transition.take() {
            self.tick = self.tick.wrapping_add(1);
            let Some(player) = self.player else {
                return Ok(TickStatus::Scripted);
            };
            match transition.advance(&mut self.world, player, &self.tuning) {
                Some(kind) => {
                    info!(transition = ?kind, "transition_completed");
                    self.complete_transition(kind)?;
                }
                None => self.transition = Some(transition),
            }
            return Ok(TickStatus::Scripted);
        }

        let Some(player) = self.player.filter(|_| self.playing) else {
            return Ok(TickStatus::Idle);
        };
        self.tick = self.tick.wrapping_add(1);

        let mut ctx = TickContext {
            world: &mut self.world,
            progress: &mut self.progress,
            events: &mut self.events,
            tuning: &self.tuning,
        };
        gate::update_gated_blocks(ctx.world, ctx.progress);
        let outcome = player::tick_player(&mut ctx, player, input);
        match outcome {
            PlayerOutcome::Continue => {
                let enemies = ctx
                    .world
                    .active_handles_where(|entity| entity.kind().is_enemy());
                for enemy in enemies {
                    enemy::tick_enemy(&mut ctx, enemy);
                }
            }
            PlayerOutcome::Died => self.start_death(player),
            PlayerOutcome::EnterPipe(pipe) => {
                self.events.push(SimEvent::Sound(SoundCue::PipeEnterExit));
                let transition = Transition::pipe_entry(&mut self.world, player, pipe);
                self.start_transition(transition);
            }
            PlayerOutcome::FinishLevel { speed } => self.start_level_finish(player, speed),
        }
        Ok(TickStatus::Simulated)
    }

    fn start_transition(&mut self, transition: Transition) {
        info!(
            transition = ?transition.kind(),
            map = %self.current_map.unwrap_or(MapId::FIRST),
            "transition_started"
        );
        self.transition = Some(transition);
    }

    fn start_death(&mut self, player: EntityHandle) {
        self.events.push(SimEvent::MusicPaused);
        self.events.push(SimEvent::Sound(SoundCue::PlayerDeath));
        let transition = Transition::death(&mut self.world, player, &self.tuning);
        self.start_transition(transition);
    }

    fn start_level_finish(&mut self, player: EntityHandle, speed: i32) {
        self.progress.level_finished = true;
        self.events.push(SimEvent::MusicPaused);
        self.events.push(SimEvent::Sound(SoundCue::LevelComplete));
        let transition = Transition::level_finish(&mut self.world, player, speed);
        self.start_transition(transition);
    }

    fn check_pipe_exit(&mut self) {
        let Some(player) = self.player else {
            return;
        };
        let Some(rect) = self.world.entity(player).map(|entity| entity.rect()) else {
            return;
        };
        let exit = self
            .world
            .overlapping(rect, Category::Blocking, player)
            .into_iter()
            .find_map(|pipe| Transition::pipe_exit(&self.world, pipe));
        if let Some(transition) = exit {
            self.events.push(SimEvent::Sound(SoundCue::PipeEnterExit));
            self.start_transition(transition);
        }
    }

    fn complete_transition(&mut self, kind: TransitionKind) -> Result<(), LoadError> {
        let Some(current) = self.current_map else {
            return Ok(());
        };
        match kind {
            TransitionKind::LevelSplash => {
                let track = self.campaign.level(current).and_then(|l| l.music.clone());
                self.events.push(SimEvent::MusicStarted { track });
                self.check_pipe_exit();
                Ok(())
            }
            TransitionKind::PipeExit => Ok(()),
            TransitionKind::Death => {
                self.lives = self.lives.saturating_sub(1);
                self.events.push(SimEvent::PlayerDied {
                    lives_remaining: self.lives,
                });
                if self.lives > 0 {
                    self.load_map(self.campaign.first_map_of_level(current))
                } else {
                    self.finish_game(false);
                    Ok(())
                }
            }
            TransitionKind::PipeEntry | TransitionKind::LevelFinish => {
                match self.campaign.next_map(current) {
                    Some(next) => self.load_map(next),
                    None => {
                        self.finish_game(true);
                        Ok(())
                    }
                }
            }
        }
    }

    fn finish_game(&mut self, won: bool) {
        self.playing = false;
        if won {
            self.victory = true;
            self.events.push(SimEvent::Sound(SoundCue::GameComplete));
            self.events.push(SimEvent::Victory);
            info!(lives = self.lives, ticks = self.tick, "victory");
        } else {
            self.game_over = true;
            self.lives = self.config.starting_lives;
            self.events.push(SimEvent::Sound(SoundCue::GameOver));
            self.events.push(SimEvent::GameOver);
            info!(ticks = self.tick, "game_over");
        }
        debug!(map = ?self.current_map, "session_stopped");
    }
}

