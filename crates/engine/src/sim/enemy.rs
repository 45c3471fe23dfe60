use tracing::debug;

use crate::world::{EnemyState, EntityHandle, Point, ENEMY_DEATH_HOLD_TICKS};

use super::resolver::{move_horizontal, move_vertical};
use super::{TickContext, ENEMY_SPEED, GRAVITY};

pub(crate) fn tick_enemy(ctx: &mut TickContext<'_>, handle: EntityHandle) {
    let Some(entity) = ctx.world.entity(handle) else {
        return;
    };
    let Some(mut body) = entity.enemy().copied() else {
        return;
    };
    let top = entity.rect().top();

    if body.is_dead() {
        body.death_hold = body.death_hold.saturating_sub(1);
        if body.death_hold == 0 {
            ctx.world.despawn(handle);
            ctx.progress.enemies_cleared = !ctx.world.has_active(|kind| kind.is_enemy());
            debug!(
                entity = handle.0,
                enemies_cleared = ctx.progress.enemies_cleared,
                "enemy_removed"
            );
        } else if let Some(stored) = ctx.world.entity_mut(handle).and_then(|e| e.enemy_mut()) {
            *stored = body;
        }
        return;
    }

    if top >= ctx.tuning.playfield_bottom {
        kill(ctx, handle);
        return;
    }

    body.grounded = false;
    let facing = body.state.facing();
    let dx = facing.sign() * ENEMY_SPEED;
    if let Some(entity) = ctx.world.entity_mut(handle) {
        entity.velocity = Point { x: dx, y: GRAVITY };
    }
    let horizontal = move_horizontal(ctx.world, handle, dx);
    if horizontal.blocked {
        body.state = EnemyState::patrol(facing.reversed());
    }
    let vertical = move_vertical(ctx.world, handle, GRAVITY);
    if vertical.blocked {
        body.grounded = true;
    }
    body.walk_ticks = body.walk_ticks.wrapping_add(1);

    if let Some(stored) = ctx.world.entity_mut(handle).and_then(|e| e.enemy_mut()) {
        *stored = body;
    }
}

/// Puts an enemy into its death hold. Dead enemies no longer move or harm.
pub(crate) fn kill(ctx: &mut TickContext<'_>, handle: EntityHandle) {
    let Some(entity) = ctx.world.entity_mut(handle) else {
        return;
    };
    entity.velocity = Point::default();
    if let Some(body) = entity.enemy_mut() {
        body.state = EnemyState::Dead;
        body.death_hold = ENEMY_DEATH_HOLD_TICKS;
        debug!(entity = handle.0, "enemy_killed");
    }
}
