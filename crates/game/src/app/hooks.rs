use std::collections::HashMap;

use engine::{
    FrameHooks, LoadError, LoopMetricsSnapshot, MapId, SessionCommand, SimEvent, Simulation,
    SoundCue, TickStatus,
};
use tracing::{debug, info};

/// Host side of the event stream. Audio and screen flow are reduced to log
/// lines; game over restarts the campaign a bounded number of times.
#[derive(Debug)]
pub(crate) struct LoggingHooks {
    restarts_left: u32,
    cues: HashMap<SoundCue, u32>,
    deaths: u32,
    last_sprite_count: Option<usize>,
    last_metrics: Option<LoopMetricsSnapshot>,
}

impl LoggingHooks {
    pub(crate) fn new(restarts: u32) -> Self {
        Self {
            restarts_left: restarts,
            cues: HashMap::new(),
            deaths: 0,
            last_sprite_count: None,
            last_metrics: None,
        }
    }

    pub(crate) fn cue_count(&self, cue: SoundCue) -> u32 {
        self.cues.get(&cue).copied().unwrap_or(0)
    }

    pub(crate) fn deaths(&self) -> u32 {
        self.deaths
    }

    pub(crate) fn last_metrics(&self) -> Option<LoopMetricsSnapshot> {
        self.last_metrics
    }
}

impl FrameHooks for LoggingHooks {
    fn on_tick(
        &mut self,
        sim: &mut Simulation,
        _status: TickStatus,
        events: &[SimEvent],
    ) -> Result<SessionCommand, LoadError> {
        let mut command = SessionCommand::Continue;
        for event in events {
            match event {
                SimEvent::Sound(cue) => {
                    *self.cues.entry(*cue).or_insert(0) += 1;
                    debug!(cue = ?cue, "sound_cue");
                }
                SimEvent::MusicPaused => debug!("music_paused"),
                SimEvent::MusicStarted { track } => {
                    info!(track = track.as_deref().unwrap_or("none"), "music_started");
                }
                SimEvent::LevelSplash { level_name } => {
                    info!(level = %level_name, "level_splash");
                }
                SimEvent::MapLoaded(map) => debug!(map = %map, "map_shown"),
                SimEvent::PlayerDied { lives_remaining } => {
                    self.deaths = self.deaths.saturating_add(1);
                    info!(lives_remaining, "player_died");
                }
                SimEvent::GameOver => {
                    if self.restarts_left == 0 {
                        info!("game_over_screen");
                        command = SessionCommand::Stop;
                        continue;
                    }
                    self.restarts_left -= 1;
                    info!(restarts_left = self.restarts_left, "campaign_restart");
                    sim.reset_lives();
                    sim.load_map(MapId::FIRST)?;
                }
                SimEvent::Victory => {
                    info!(lives = sim.lives(), "victory_screen");
                    command = SessionCommand::Stop;
                }
            }
        }
        Ok(command)
    }

    fn on_frame(&mut self, sim: &Simulation) {
        let count = sim.sprites().len();
        if self.last_sprite_count != Some(count) {
            debug!(sprites = count, "frame_sprites_changed");
            self.last_sprite_count = Some(count);
        }
    }

    fn on_metrics(&mut self, snapshot: LoopMetricsSnapshot) {
        self.last_metrics = Some(snapshot);
    }
}
