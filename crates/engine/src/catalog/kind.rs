use std::fmt;

/// Visual variants of a plain solid block. All styles collide identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockStyle {
    Block,
    Brick,
    Ground,
    Underground,
    InvisibleWall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemySpecies {
    Snake,
    Shroom,
    Rabbit,
    Bee,
}

impl EnemySpecies {
    pub fn walk_frames(self) -> u8 {
        match self {
            Self::Snake => 3,
            Self::Shroom | Self::Rabbit | Self::Bee => 2,
        }
    }
}

/// Closed set of entity kinds the simulation knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Block(BlockStyle),
    Pipe,
    Player,
    Enemy(EnemySpecies),
    Key,
    Coin,
    GoalBlock,
    EnemyGatedBlock,
    GoalLandingBlock,
}

pub const ALL_KINDS: [EntityKind; 16] = [
    EntityKind::Block(BlockStyle::Block),
    EntityKind::Block(BlockStyle::Brick),
    EntityKind::Block(BlockStyle::Ground),
    EntityKind::Block(BlockStyle::Underground),
    EntityKind::Block(BlockStyle::InvisibleWall),
    EntityKind::Pipe,
    EntityKind::Player,
    EntityKind::Enemy(EnemySpecies::Snake),
    EntityKind::Enemy(EnemySpecies::Shroom),
    EntityKind::Enemy(EnemySpecies::Rabbit),
    EntityKind::Enemy(EnemySpecies::Bee),
    EntityKind::Key,
    EntityKind::Coin,
    EntityKind::GoalBlock,
    EntityKind::EnemyGatedBlock,
    EntityKind::GoalLandingBlock,
];

/// Which progress condition opens a gated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRule {
    EnemiesCleared,
    AllObjectives,
}

impl EntityKind {
    pub fn token(self) -> &'static str {
        match self {
            Self::Block(BlockStyle::Block) => "Block",
            Self::Block(BlockStyle::Brick) => "Brick",
            Self::Block(BlockStyle::Ground) => "Ground",
            Self::Block(BlockStyle::Underground) => "Underground",
            Self::Block(BlockStyle::InvisibleWall) => "InvisibleWall",
            Self::Pipe => "Pipe",
            Self::Player => "Player",
            Self::Enemy(EnemySpecies::Snake) => "Snake",
            Self::Enemy(EnemySpecies::Shroom) => "Shroom",
            Self::Enemy(EnemySpecies::Rabbit) => "Rabbit",
            Self::Enemy(EnemySpecies::Bee) => "Bee",
            Self::Key => "Key",
            Self::Coin => "Coin",
            Self::GoalBlock => "GoalBlock",
            Self::EnemyGatedBlock => "EnemyGatedBlock",
            Self::GoalLandingBlock => "GoalLandingBlock",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        ALL_KINDS.into_iter().find(|kind| kind.token() == token)
    }

    pub fn is_enemy(self) -> bool {
        matches!(self, Self::Enemy(_))
    }

    pub fn gate_rule(self) -> Option<GateRule> {
        match self {
            Self::EnemyGatedBlock => Some(GateRule::EnemiesCleared),
            Self::GoalBlock => Some(GateRule::AllObjectives),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Draw order ordinal. Only the renderer cares, except that `Overlay`
/// entities are pinned to the screen and ignore the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    Background,
    Block,
    Person,
    Pipe,
    Overlay,
}

impl RenderLayer {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Background" => Some(Self::Background),
            "Block" => Some(Self::Block),
            "Person" => Some(Self::Person),
            "Pipe" => Some(Self::Pipe),
            "Overlay" => Some(Self::Overlay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Left" => Some(Self::Left),
            "Right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Direction a pipe's mouth faces. Only left-facing pipes can be entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Left,
    Down,
    Right,
    Up,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn is_entry(self) -> bool {
        self == Self::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_token_round_trips() {
        for kind in ALL_KINDS {
            assert_eq!(EntityKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(EntityKind::from_token("Dragon"), None);
    }

    #[test]
    fn only_gated_blocks_carry_gate_rules() {
        assert_eq!(
            EntityKind::GoalBlock.gate_rule(),
            Some(GateRule::AllObjectives)
        );
        assert_eq!(
            EntityKind::EnemyGatedBlock.gate_rule(),
            Some(GateRule::EnemiesCleared)
        );
        assert_eq!(EntityKind::GoalLandingBlock.gate_rule(), None);
        assert_eq!(EntityKind::Block(BlockStyle::Brick).gate_rule(), None);
    }

    #[test]
    fn only_left_pipes_are_entries() {
        assert!(Orientation::Left.is_entry());
        assert!(!Orientation::Right.is_entry());
        assert!(Orientation::Up.is_vertical());
        assert!(!Orientation::Right.is_vertical());
    }
}
