use tracing::debug;

use crate::app::{InputAction, InputSnapshot};
use crate::catalog::{Category, EntityKind, Facing};
use crate::world::{EntityHandle, PlayerBody, PlayerState, Point, Rect};

use super::enemy;
use super::events::{SimEvent, SoundCue};
use super::resolver::{move_horizontal, move_vertical};
use super::{
    TickContext, BOUNCE_JUMP, FULL_JUMP, GRAVITY, RUN_SPEED, STOMP_MARGIN, WALK_SPEED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerOutcome {
    Continue,
    Died,
    EnterPipe(EntityHandle),
    /// Carries the speed the finishing slide moves at.
    FinishLevel { speed: i32 },
}

pub(crate) fn tick_player(
    ctx: &mut TickContext<'_>,
    handle: EntityHandle,
    input: &InputSnapshot,
) -> PlayerOutcome {
    let Some(entity) = ctx.world.entity(handle) else {
        return PlayerOutcome::Continue;
    };
    let Some(mut body) = entity.player().copied() else {
        return PlayerOutcome::Continue;
    };
    if body.state == PlayerState::Dead {
        return PlayerOutcome::Continue;
    }
    let rect = entity.rect();
    set_velocity(ctx, handle, |velocity| *velocity = Point::default());

    let speed = if input.is_down(InputAction::Run) {
        RUN_SPEED
    } else {
        WALK_SPEED
    };
    let heading = if input.is_down(InputAction::MoveRight) {
        Some(Facing::Right)
    } else if input.is_down(InputAction::MoveLeft) {
        Some(Facing::Left)
    } else {
        None
    };
    let mut dx = 0;
    if let Some(facing) = heading {
        dx = facing.sign() * speed;
        body.state = if body.state.is_jumping() {
            PlayerState::jumping(facing)
        } else {
            PlayerState::grounded(facing)
        };
    }

    if input.is_down(InputAction::Jump) && body.grounded {
        jump(&mut body, FULL_JUMP);
    }

    let mut dy = 0;
    if !body.grounded && body.jump_counter == 0 {
        dy = GRAVITY;
    }
    body.grounded = false;

    if rect.top() >= ctx.tuning.playfield_bottom {
        store(ctx, handle, body);
        return PlayerOutcome::Died;
    }

    if resolve_hazards(ctx, handle, rect, &mut body) {
        store(ctx, handle, body);
        return PlayerOutcome::Died;
    }
    collect_pickups(ctx, handle, rect);

    if dx != 0 {
        set_velocity(ctx, handle, |velocity| velocity.x = dx);
        ctx.world.camera_mut().shift(-dx);
        let outcome = move_horizontal(ctx.world, handle, dx);
        if outcome.blocked {
            ctx.world.camera_mut().shift(dx);
            if ctx.progress.key_found && dx > 0 {
                let entry = outcome.contacts.iter().copied().find(|contact| {
                    ctx.world.entity(*contact).is_some_and(|pipe| {
                        pipe.kind() == EntityKind::Pipe && pipe.orientation.is_entry()
                    })
                });
                if let Some(pipe) = entry {
                    store(ctx, handle, body);
                    return PlayerOutcome::EnterPipe(pipe);
                }
            }
        }
        body.walk_ticks = body.walk_ticks.wrapping_add(1);
    } else {
        body.walk_ticks = 0;
    }

    if body.jump_counter > 0 {
        body.jump_counter -= 1;
        dy = -body.jump_counter;
    }

    set_velocity(ctx, handle, |velocity| velocity.y = dy);
    let outcome = move_vertical(ctx.world, handle, dy);
    let mut finished = false;
    if outcome.blocked {
        if dy > 0 {
            body.state = PlayerState::grounded(body.state.facing());
            body.grounded = true;
            body.jump_counter = 0;
            finished = ctx.progress.goal_open()
                && outcome.contacts.iter().any(|contact| {
                    ctx.world
                        .entity(*contact)
                        .is_some_and(|e| e.capabilities().has(Category::Goal))
                });
        } else {
            body.jump_counter = 0;
        }
    }

    store(ctx, handle, body);
    if finished {
        PlayerOutcome::FinishLevel { speed }
    } else {
        PlayerOutcome::Continue
    }
}

fn jump(body: &mut PlayerBody, counter: i32) {
    body.jump_counter = counter;
    body.grounded = false;
    body.state = PlayerState::jumping(body.state.facing());
}

/// Returns true when an enemy contact kills the player. The first enemy
/// touched in spawn order decides. A dead enemy never harms the player and
/// bounces it unless it is already rising.
fn resolve_hazards(
    ctx: &mut TickContext<'_>,
    handle: EntityHandle,
    rect: Rect,
    body: &mut PlayerBody,
) -> bool {
    let hazards = ctx.world.overlapping(rect, Category::Hazard, handle);
    let contact = hazards.into_iter().find_map(|hazard| {
        let entity = ctx.world.entity(hazard)?;
        let enemy = entity.enemy()?;
        Some((hazard, enemy.is_dead(), entity.rect().bottom()))
    });
    let Some((enemy_handle, dead, enemy_bottom)) = contact else {
        return false;
    };

    if dead {
        if body.jump_counter == 0 {
            ctx.events.push(SimEvent::Sound(SoundCue::Stomp));
            debug!(enemy = enemy_handle.0, "dead_enemy_bounce");
            jump(body, BOUNCE_JUMP);
        }
        false
    } else if enemy_bottom - rect.bottom() >= STOMP_MARGIN {
        enemy::kill(ctx, enemy_handle);
        ctx.events.push(SimEvent::Sound(SoundCue::Stomp));
        debug!(enemy = enemy_handle.0, "enemy_stomped");
        jump(body, BOUNCE_JUMP);
        false
    } else {
        debug!(enemy = enemy_handle.0, "player_hit");
        true
    }
}

fn collect_pickups(ctx: &mut TickContext<'_>, handle: EntityHandle, rect: Rect) {
    let pickups = ctx.world.overlapping(rect, Category::Collectible, handle);
    let first_of = |kind: EntityKind| {
        pickups
            .iter()
            .copied()
            .find(|pickup| ctx.world.entity(*pickup).is_some_and(|e| e.kind() == kind))
    };
    let key = first_of(EntityKind::Key);
    let coin = first_of(EntityKind::Coin);

    if let Some(key) = key {
        ctx.world.despawn(key);
        ctx.progress.key_found = true;
        ctx.events.push(SimEvent::Sound(SoundCue::KeyCollected));
        debug!(entity = key.0, "key_collected");
    }
    if let Some(coin) = coin {
        ctx.world.despawn(coin);
        ctx.progress.coins_collected = !ctx.world.has_active(|kind| kind == EntityKind::Coin);
        ctx.events.push(SimEvent::Sound(SoundCue::CoinCollected));
        debug!(
            entity = coin.0,
            coins_collected = ctx.progress.coins_collected,
            "coin_collected"
        );
    }
}

fn set_velocity(ctx: &mut TickContext<'_>, handle: EntityHandle, set: impl FnOnce(&mut Point)) {
    if let Some(entity) = ctx.world.entity_mut(handle) {
        set(&mut entity.velocity);
    }
}

fn store(ctx: &mut TickContext<'_>, handle: EntityHandle, body: PlayerBody) {
    if let Some(stored) = ctx.world.entity_mut(handle).and_then(|e| e.player_mut()) {
        *stored = body;
    }
}
