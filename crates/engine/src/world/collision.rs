use crate::catalog::{Capabilities, Category};

use super::entity::EntityHandle;

/// Per-category membership lists for active entities, in spawn order.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    members: [Vec<EntityHandle>; Category::ALL.len()],
}

impl CollisionWorld {
    pub fn insert(&mut self, handle: EntityHandle, capabilities: Capabilities) {
        for category in Category::ALL {
            if capabilities.has(category) {
                let list = &mut self.members[category.index()];
                if !list.contains(&handle) {
                    list.push(handle);
                }
            }
        }
    }

    pub fn remove(&mut self, handle: EntityHandle) {
        for list in &mut self.members {
            list.retain(|member| *member != handle);
        }
    }

    /// An empty category yields an empty slice.
    pub fn members(&self, category: Category) -> &[EntityHandle] {
        &self.members[category.index()]
    }
}
