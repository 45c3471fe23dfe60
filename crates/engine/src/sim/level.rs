use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BlockStyle, EnemySpecies, EntityKind, Orientation};
use crate::world::{EntityHandle, Point, SpawnError, World, TILE_UNITS};

/// Zero-based position of a map within the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId {
    pub level: u16,
    pub map: u16,
}

impl MapId {
    pub const FIRST: MapId = MapId { level: 0, map: 0 };

    pub fn new(level: u16, map: u16) -> Self {
        Self { level, map }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}-{}", self.level + 1, self.map + 1)
    }
}

/// Symbol grid; one character per tile, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBlueprint {
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default)]
    pub music: Option<String>,
    pub maps: Vec<MapBlueprint>,
}

/// On-disk campaign shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDef {
    pub levels: Vec<LevelDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("campaign has no levels")]
    NoLevels,
    #[error("level '{name}' has no maps")]
    EmptyLevel { name: String },
    #[error("campaign has more than {max} levels or maps per level")]
    TooLarge { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("unknown map {0}")]
    UnknownMap(MapId),
    #[error("{map} has no player symbol")]
    MissingPlayer { map: MapId },
    #[error("{map} has {count} player symbols; exactly one is required")]
    MultiplePlayers { map: MapId, count: usize },
    #[error("failed to populate {map}: {source}")]
    Spawn {
        map: MapId,
        #[source]
        source: SpawnError,
    },
}

/// Validated, ordered sequence of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    levels: Vec<LevelDef>,
}

impl Campaign {
    pub fn new(def: CampaignDef) -> Result<Self, CampaignError> {
        if def.levels.is_empty() {
            return Err(CampaignError::NoLevels);
        }
        let max = u16::MAX as usize;
        if def.levels.len() > max {
            return Err(CampaignError::TooLarge { max });
        }
        for level in &def.levels {
            if level.maps.is_empty() {
                return Err(CampaignError::EmptyLevel {
                    name: level.name.clone(),
                });
            }
            if level.maps.len() > max {
                return Err(CampaignError::TooLarge { max });
            }
        }
        Ok(Self { levels: def.levels })
    }

    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    pub fn level(&self, id: MapId) -> Option<&LevelDef> {
        self.levels.get(id.level as usize)
    }

    pub fn map(&self, id: MapId) -> Option<&MapBlueprint> {
        self.level(id).and_then(|level| level.maps.get(id.map as usize))
    }

    pub fn map_count(&self) -> usize {
        self.levels.iter().map(|level| level.maps.len()).sum()
    }

    /// Next map in the level, then the first map of the next level.
    pub fn next_map(&self, id: MapId) -> Option<MapId> {
        let level = self.level(id)?;
        if (id.map as usize) + 1 < level.maps.len() {
            return Some(MapId::new(id.level, id.map + 1));
        }
        let next_level = MapId::new(id.level + 1, 0);
        self.map(next_level).map(|_| next_level)
    }

    pub fn first_map_of_level(&self, id: MapId) -> MapId {
        MapId::new(id.level, 0)
    }

    pub fn is_first_map_of_level(&self, id: MapId) -> bool {
        id.map == 0
    }

    pub fn is_final_map(&self, id: MapId) -> bool {
        self.map(id).is_some() && self.next_map(id).is_none()
    }
}

/// Maps a blueprint character to what it spawns.
pub fn symbol_kind(symbol: char) -> Option<(EntityKind, Orientation)> {
    let plain = |kind| Some((kind, Orientation::default()));
    match symbol {
        'b' | 'q' => plain(EntityKind::Block(BlockStyle::Block)),
        'B' => plain(EntityKind::Block(BlockStyle::Brick)),
        'G' => plain(EntityKind::Block(BlockStyle::Ground)),
        'U' => plain(EntityKind::Block(BlockStyle::Underground)),
        'I' => plain(EntityKind::Block(BlockStyle::InvisibleWall)),
        'd' => plain(EntityKind::EnemyGatedBlock),
        'D' => plain(EntityKind::GoalBlock),
        'g' => plain(EntityKind::GoalLandingBlock),
        'P' => plain(EntityKind::Player),
        'K' => plain(EntityKind::Key),
        'C' => plain(EntityKind::Coin),
        's' => plain(EntityKind::Enemy(EnemySpecies::Snake)),
        'S' => plain(EntityKind::Enemy(EnemySpecies::Shroom)),
        'z' => plain(EntityKind::Enemy(EnemySpecies::Bee)),
        'R' => plain(EntityKind::Enemy(EnemySpecies::Rabbit)),
        'v' => Some((EntityKind::Pipe, Orientation::Up)),
        'V' => Some((EntityKind::Pipe, Orientation::Down)),
        'h' => Some((EntityKind::Pipe, Orientation::Left)),
        'H' => Some((EntityKind::Pipe, Orientation::Right)),
        _ => None,
    }
}

/// Spawns every recognised symbol at its tile origin and returns the player.
/// The world must already be cleared.
pub(crate) fn populate(
    world: &mut World,
    map: MapId,
    blueprint: &MapBlueprint,
) -> Result<EntityHandle, LoadError> {
    let player_count = blueprint
        .rows
        .iter()
        .flat_map(|row| row.chars())
        .filter(|symbol| *symbol == 'P')
        .count();
    match player_count {
        0 => return Err(LoadError::MissingPlayer { map }),
        1 => {}
        count => return Err(LoadError::MultiplePlayers { map, count }),
    }

    let mut player = None;
    for (row_idx, row) in blueprint.rows.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            let Some((kind, orientation)) = symbol_kind(symbol) else {
                continue;
            };
            let position = Point {
                x: col_idx as i32 * TILE_UNITS,
                y: row_idx as i32 * TILE_UNITS,
            };
            let handle = world
                .spawn(kind, position, orientation)
                .map_err(|source| LoadError::Spawn { map, source })?;
            if kind == EntityKind::Player {
                player = Some(handle);
            }
        }
    }
    player.ok_or(LoadError::MissingPlayer { map })
}
