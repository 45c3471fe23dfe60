use super::level::MapId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    CoinCollected,
    KeyCollected,
    Stomp,
    PlayerDeath,
    PipeEnterExit,
    LevelComplete,
    GameOver,
    GameComplete,
}

/// Fire-and-forget notifications for audio, HUD and screen flow. The host
/// drains them after each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Sound(SoundCue),
    MusicPaused,
    MusicStarted { track: Option<String> },
    LevelSplash { level_name: String },
    MapLoaded(MapId),
    PlayerDied { lives_remaining: u32 },
    GameOver,
    Victory,
}
