mod camera;
mod collision;
mod entity;
mod geometry;
mod pool;

pub use camera::Camera;
pub use collision::CollisionWorld;
pub use entity::{
    Behavior, EnemyBody, EnemyState, Entity, EntityHandle, PlayerBody, PlayerState, Pose,
    VisualState, ENEMY_DEATH_HOLD_TICKS, WALK_FRAME_TICKS,
};
pub use geometry::{px, Point, Rect, Size, SCALE_UP, SUBPIXELS_PER_PIXEL, TILE_UNITS};
pub use pool::{EntityPool, SpawnError};

use crate::catalog::{Category, EntityKind, KindCatalog, Orientation, RenderLayer};

/// Render view of one active entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteView {
    pub handle: EntityHandle,
    pub kind: EntityKind,
    pub orientation: Orientation,
    pub layer: RenderLayer,
    /// Screen rectangle in units, camera already applied.
    pub screen: Rect,
    pub visual: VisualState,
}

/// Entity storage, category indices and the camera for one running game.
#[derive(Debug)]
pub struct World {
    catalog: KindCatalog,
    pool: EntityPool,
    collision: CollisionWorld,
    camera: Camera,
}

impl World {
    pub fn new(catalog: KindCatalog, viewport: Size) -> Self {
        Self {
            catalog,
            pool: EntityPool::default(),
            collision: CollisionWorld::default(),
            camera: Camera::new(viewport),
        }
    }

    pub fn catalog(&self) -> &KindCatalog {
        &self.catalog
    }

    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Point,
        orientation: Orientation,
    ) -> Result<EntityHandle, SpawnError> {
        let handle = self.pool.spawn(&self.catalog, kind, position, orientation)?;
        if let Some(entity) = self.pool.get(handle) {
            self.collision.insert(handle, entity.capabilities());
        }
        Ok(handle)
    }

    pub fn despawn(&mut self, handle: EntityHandle) -> bool {
        if self.pool.despawn(handle) {
            self.collision.remove(handle);
            true
        } else {
            false
        }
    }

    /// Despawns every active entity that is not pinned to the overlay.
    pub fn clear_map(&mut self) {
        let handles: Vec<EntityHandle> = self
            .pool
            .active()
            .filter(|(_, entity)| entity.layer() != RenderLayer::Overlay)
            .map(|(handle, _)| handle)
            .collect();
        for handle in handles {
            self.despawn(handle);
        }
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.pool.get(handle).filter(|entity| entity.is_active())
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.pool.get_mut(handle).filter(|entity| entity.is_active())
    }

    pub fn active_handles(&self) -> Vec<EntityHandle> {
        self.pool.active().map(|(handle, _)| handle).collect()
    }

    pub fn active_handles_where(&self, mut pred: impl FnMut(&Entity) -> bool) -> Vec<EntityHandle> {
        self.pool
            .active()
            .filter(|(_, entity)| pred(entity))
            .map(|(handle, _)| handle)
            .collect()
    }

    pub fn has_active(&self, mut pred: impl FnMut(EntityKind) -> bool) -> bool {
        self.pool.active().any(|(_, entity)| pred(entity.kind()))
    }

    pub fn active_count(&self, kind: EntityKind) -> usize {
        self.pool.active_count(kind)
    }

    pub fn pooled_count(&self, kind: EntityKind) -> usize {
        self.pool.pooled_count(kind)
    }

    pub fn constructed_count(&self, kind: EntityKind) -> usize {
        self.pool.constructed_count(kind)
    }

    pub fn category_members(&self, category: Category) -> &[EntityHandle] {
        self.collision.members(category)
    }

    /// Members of `category` overlapping `rect`, in spawn order.
    pub fn overlapping(
        &self,
        rect: Rect,
        category: Category,
        exclude: EntityHandle,
    ) -> Vec<EntityHandle> {
        self.collision
            .members(category)
            .iter()
            .copied()
            .filter(|handle| *handle != exclude)
            .filter(|handle| {
                self.entity(*handle)
                    .is_some_and(|entity| entity.rect().overlaps(&rect))
            })
            .collect()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn screen_rect(&self, handle: EntityHandle) -> Option<Rect> {
        self.entity(handle)
            .map(|entity| self.camera.to_screen(entity.rect(), entity.layer()))
    }

    /// Active entities sorted by draw layer, then spawn order.
    pub fn sprites(&self, tick: u64) -> Vec<SpriteView> {
        let mut sprites: Vec<SpriteView> = self
            .pool
            .active()
            .map(|(handle, entity)| SpriteView {
                handle,
                kind: entity.kind(),
                orientation: entity.orientation,
                layer: entity.layer(),
                screen: self.camera.to_screen(entity.rect(), entity.layer()),
                visual: entity.visual_state(tick),
            })
            .collect();
        sprites.sort_by_key(|sprite| (sprite.layer, sprite.handle));
        sprites
    }
}
