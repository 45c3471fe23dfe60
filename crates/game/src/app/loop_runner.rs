use std::process::ExitCode;

use engine::{run_session, SoundCue};
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut sim,
        mut pilot,
        mut hooks,
    } = app;

    match run_session(&config, &mut sim, &mut pilot, &mut hooks) {
        Ok(summary) => {
            info!(
                stop_reason = ?summary.stop_reason,
                ticks = summary.ticks,
                map = ?sim.current_map(),
                victory = sim.victory(),
                deaths = hooks.deaths(),
                coins = hooks.cue_count(SoundCue::CoinCollected),
                stomps = hooks.cue_count(SoundCue::Stomp),
                last_tps = hooks.last_metrics().map(|metrics| metrics.tps),
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "session_failed");
            ExitCode::FAILURE
        }
    }
}
