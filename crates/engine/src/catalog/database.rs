use std::collections::HashMap;

use crate::world::{Size, SCALE_UP, SUBPIXELS_PER_PIXEL};

use super::kind::{EntityKind, Facing, RenderLayer};

/// Collision categories an entity is indexed under while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Blocking,
    Collectible,
    Hazard,
    Goal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Blocking,
        Category::Collectible,
        Category::Hazard,
        Category::Goal,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            Category::Blocking => 0,
            Category::Collectible => 1,
            Category::Hazard => 2,
            Category::Goal => 3,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "blocking" => Some(Self::Blocking),
            "collectible" => Some(Self::Collectible),
            "hazard" => Some(Self::Hazard),
            "goal" => Some(Self::Goal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub is_blocking: bool,
    pub is_collectible: bool,
    pub is_hazard: bool,
    pub is_goal: bool,
}

impl Capabilities {
    pub fn with(mut self, category: Category) -> Self {
        match category {
            Category::Blocking => self.is_blocking = true,
            Category::Collectible => self.is_collectible = true,
            Category::Hazard => self.is_hazard = true,
            Category::Goal => self.is_goal = true,
        }
        self
    }

    pub fn has(&self, category: Category) -> bool {
        match category {
            Category::Blocking => self.is_blocking,
            Category::Collectible => self.is_collectible,
            Category::Hazard => self.is_hazard,
            Category::Goal => self.is_goal,
        }
    }
}

/// Static metadata for one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindDef {
    pub kind: EntityKind,
    /// Unscaled source-art size in pixels.
    pub source_width_px: u32,
    pub source_height_px: u32,
    pub layer: RenderLayer,
    pub capabilities: Capabilities,
    pub initial_facing: Facing,
}

impl KindDef {
    /// Bounding box in sub-pixel units after the render scale-up.
    pub fn size(&self) -> Size {
        let factor = SCALE_UP * SUBPIXELS_PER_PIXEL;
        Size {
            w: self.source_width_px as i32 * factor,
            h: self.source_height_px as i32 * factor,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct KindCatalog {
    defs: Vec<KindDef>,
    index_by_kind: HashMap<EntityKind, usize>,
}

impl KindCatalog {
    pub(crate) fn from_kind_defs(defs: Vec<KindDef>) -> Self {
        let index_by_kind = defs
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.kind, idx))
            .collect();
        Self {
            defs,
            index_by_kind,
        }
    }

    pub fn def(&self, kind: EntityKind) -> Option<&KindDef> {
        self.index_by_kind
            .get(&kind)
            .and_then(|idx| self.defs.get(*idx))
    }

    pub fn defs(&self) -> &[KindDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Returns a copy without `kind`. Used to exercise missing-metadata paths.
    pub fn without(&self, kind: EntityKind) -> Self {
        Self::from_kind_defs(
            self.defs
                .iter()
                .filter(|def| def.kind != kind)
                .cloned()
                .collect(),
        )
    }
}
