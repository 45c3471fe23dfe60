//! Axis-separated movement against blocking entities.
//!
//! Callers move horizontally first, then vertically. Each step reports whether
//! it was blocked and every blocker overlapping the proposed position, before
//! the snap.

use crate::catalog::Category;
use crate::world::{EntityHandle, Rect, World};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub blocked: bool,
    pub contacts: Vec<EntityHandle>,
}

pub fn move_horizontal(world: &mut World, handle: EntityHandle, dx: i32) -> StepOutcome {
    let Some(rect) = world.entity(handle).map(|entity| entity.rect()) else {
        return StepOutcome::default();
    };
    if dx == 0 {
        return StepOutcome::default();
    }

    let proposed = rect.translated(dx, 0);
    let contacts = world.overlapping(proposed, Category::Blocking, handle);
    let new_x = if contacts.is_empty() {
        proposed.x
    } else if dx > 0 {
        edge(world, &contacts, |r| r.left(), i32::min) - rect.w
    } else {
        edge(world, &contacts, |r| r.right(), i32::max)
    };

    if let Some(entity) = world.entity_mut(handle) {
        entity.position.x = new_x;
    }
    StepOutcome {
        blocked: !contacts.is_empty(),
        contacts,
    }
}

pub fn move_vertical(world: &mut World, handle: EntityHandle, dy: i32) -> StepOutcome {
    let Some(rect) = world.entity(handle).map(|entity| entity.rect()) else {
        return StepOutcome::default();
    };
    if dy == 0 {
        return StepOutcome::default();
    }

    let proposed = rect.translated(0, dy);
    let contacts = world.overlapping(proposed, Category::Blocking, handle);
    let new_y = if contacts.is_empty() {
        proposed.y
    } else if dy > 0 {
        edge(world, &contacts, |r| r.top(), i32::min) - rect.h
    } else {
        edge(world, &contacts, |r| r.bottom(), i32::max)
    };

    if let Some(entity) = world.entity_mut(handle) {
        entity.position.y = new_y;
    }
    StepOutcome {
        blocked: !contacts.is_empty(),
        contacts,
    }
}

/// Most restrictive edge among the contacts.
fn edge(
    world: &World,
    contacts: &[EntityHandle],
    side: impl Fn(&Rect) -> i32,
    pick: fn(i32, i32) -> i32,
) -> i32 {
    contacts
        .iter()
        .filter_map(|handle| world.entity(*handle))
        .map(|entity| side(&entity.rect()))
        .reduce(pick)
        .unwrap_or_default()
}
