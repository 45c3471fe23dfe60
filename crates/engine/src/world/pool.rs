use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{EntityKind, KindCatalog, Orientation};

use super::entity::{Entity, EntityHandle};
use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no catalog entry for entity kind '{0}'")]
    MissingKindDef(EntityKind),
}

/// Owns every entity record ever constructed. Records are never dropped;
/// despawning parks them on a per-kind free list for the next spawn.
#[derive(Debug, Default)]
pub struct EntityPool {
    records: Vec<Entity>,
    pooled: HashMap<EntityKind, Vec<EntityHandle>>,
    constructed: HashMap<EntityKind, usize>,
}

impl EntityPool {
    pub fn spawn(
        &mut self,
        catalog: &KindCatalog,
        kind: EntityKind,
        position: Point,
        orientation: Orientation,
    ) -> Result<EntityHandle, SpawnError> {
        let reused = self.pooled.get_mut(&kind).and_then(Vec::pop);
        let handle = match reused {
            Some(handle) => handle,
            None => {
                let def = catalog.def(kind).ok_or(SpawnError::MissingKindDef(kind))?;
                let handle = EntityHandle(self.records.len() as u32);
                self.records.push(Entity::from_def(def));
                let constructed = self.constructed.entry(kind).or_insert(0);
                *constructed += 1;
                debug!(kind = %kind, constructed = *constructed, "entity_constructed");
                handle
            }
        };

        if let Some(entity) = self.records.get_mut(handle.0 as usize) {
            entity.activate(position, orientation);
        }
        Ok(handle)
    }

    /// Returns `false` when the handle is unknown or already pooled.
    pub fn despawn(&mut self, handle: EntityHandle) -> bool {
        let Some(entity) = self.records.get_mut(handle.0 as usize) else {
            return false;
        };
        if !entity.is_active() {
            return false;
        }
        entity.deactivate();
        self.pooled.entry(entity.kind()).or_default().push(handle);
        true
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.records.get(handle.0 as usize)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.records.get_mut(handle.0 as usize)
    }

    /// Active records in construction order.
    pub fn active(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.is_active())
            .map(|(idx, entity)| (EntityHandle(idx as u32), entity))
    }

    pub fn active_count(&self, kind: EntityKind) -> usize {
        self.active().filter(|(_, entity)| entity.kind() == kind).count()
    }

    pub fn pooled_count(&self, kind: EntityKind) -> usize {
        self.pooled.get(&kind).map_or(0, Vec::len)
    }

    pub fn constructed_count(&self, kind: EntityKind) -> usize {
        self.constructed.get(&kind).copied().unwrap_or(0)
    }
}
