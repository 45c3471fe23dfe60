use tracing::debug;

use crate::catalog::GateRule;
use crate::world::World;

use super::ProgressFlags;

/// Removes every gated block whose condition currently holds.
pub(crate) fn update_gated_blocks(world: &mut World, progress: &ProgressFlags) {
    let gated = world.active_handles_where(|entity| entity.kind().gate_rule().is_some());
    for handle in gated {
        let Some(rule) = world.entity(handle).and_then(|e| e.kind().gate_rule()) else {
            continue;
        };
        let open = match rule {
            GateRule::EnemiesCleared => progress.enemies_cleared,
            GateRule::AllObjectives => progress.goal_open(),
        };
        if open && world.despawn(handle) {
            debug!(entity = handle.0, rule = ?rule, "gated_block_opened");
        }
    }
}
