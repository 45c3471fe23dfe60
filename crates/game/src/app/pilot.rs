use engine::{InputAction, InputSnapshot, InputSource, Simulation};

const JUMP_PERIOD_TICKS: u64 = 96;
const JUMP_HOLD_TICKS: u64 = 24;
const RUN_AFTER_TICKS: u64 = 160;
const STALL_TICKS: u32 = 12;

/// Scripted stand-in for a keyboard: heads right, runs once warmed up, and
/// jumps on a fixed rhythm or whenever it stops making progress.
#[derive(Debug, Default)]
pub(crate) struct DemoPilot {
    last_x: Option<i32>,
    stalled_ticks: u32,
}

impl DemoPilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn observe(&mut self, x: Option<i32>) {
        if x.is_some() && x == self.last_x {
            self.stalled_ticks = self.stalled_ticks.saturating_add(1);
        } else {
            self.stalled_ticks = 0;
        }
        self.last_x = x;
    }

    fn stalled(&self) -> bool {
        self.stalled_ticks >= STALL_TICKS
    }
}

fn jump_pulse(tick: u64) -> bool {
    tick % JUMP_PERIOD_TICKS < JUMP_HOLD_TICKS
}

impl InputSource for DemoPilot {
    fn next_input(&mut self, sim: &Simulation) -> InputSnapshot {
        let x = sim
            .player()
            .and_then(|player| sim.world().entity(player))
            .map(|entity| entity.position.x);
        self.observe(x);

        let tick = sim.tick_count();
        InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::Run, tick >= RUN_AFTER_TICKS)
            .with_action_down(InputAction::Jump, jump_pulse(tick) || self.stalled())
    }
}
