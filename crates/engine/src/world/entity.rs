use crate::catalog::{Capabilities, EntityKind, Facing, KindDef, Orientation, RenderLayer};

use super::geometry::{Point, Rect, Size};

/// Stable index of a pooled record. Handles stay valid across despawn and
/// respawn; whether the record is live is checked with `Entity::is_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    GroundedLeft,
    GroundedRight,
    JumpingLeft,
    JumpingRight,
    Dead,
}

impl PlayerState {
    pub fn grounded(facing: Facing) -> Self {
        match facing {
            Facing::Left => Self::GroundedLeft,
            Facing::Right => Self::GroundedRight,
        }
    }

    pub fn jumping(facing: Facing) -> Self {
        match facing {
            Facing::Left => Self::JumpingLeft,
            Facing::Right => Self::JumpingRight,
        }
    }

    /// Dead players keep facing right for drawing purposes.
    pub fn facing(self) -> Facing {
        match self {
            Self::GroundedLeft | Self::JumpingLeft => Facing::Left,
            Self::GroundedRight | Self::JumpingRight | Self::Dead => Facing::Right,
        }
    }

    pub fn is_jumping(self) -> bool {
        matches!(self, Self::JumpingLeft | Self::JumpingRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerBody {
    pub state: PlayerState,
    /// Set only by a landing during the current tick.
    pub grounded: bool,
    pub jump_counter: i32,
    pub walk_ticks: u32,
}

impl PlayerBody {
    pub fn new() -> Self {
        Self {
            state: PlayerState::GroundedRight,
            grounded: false,
            jump_counter: 0,
            walk_ticks: 0,
        }
    }
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    PatrolLeft,
    PatrolRight,
    Dead,
}

impl EnemyState {
    pub fn patrol(facing: Facing) -> Self {
        match facing {
            Facing::Left => Self::PatrolLeft,
            Facing::Right => Self::PatrolRight,
        }
    }

    pub fn facing(self) -> Facing {
        match self {
            Self::PatrolRight => Facing::Right,
            Self::PatrolLeft | Self::Dead => Facing::Left,
        }
    }
}

pub const ENEMY_DEATH_HOLD_TICKS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyBody {
    pub state: EnemyState,
    pub grounded: bool,
    pub death_hold: u32,
    pub walk_ticks: u32,
}

impl EnemyBody {
    pub fn new(facing: Facing) -> Self {
        Self {
            state: EnemyState::patrol(facing),
            grounded: false,
            death_hold: ENEMY_DEATH_HOLD_TICKS,
            walk_ticks: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }
}

/// Per-kind behavioral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Static,
    Player(PlayerBody),
    Enemy(EnemyBody),
}

impl Behavior {
    pub fn initial(kind: EntityKind, facing: Facing) -> Self {
        match kind {
            EntityKind::Player => Self::Player(PlayerBody::new()),
            EntityKind::Enemy(_) => Self::Enemy(EnemyBody::new(facing)),
            _ => Self::Static,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing,
    Walking,
    Jumping,
    Dead,
}

/// What the renderer needs to pick a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualState {
    pub pose: Pose,
    pub facing: Facing,
    pub frame: u8,
}

/// Ticks spent on each walk-cycle frame.
pub const WALK_FRAME_TICKS: u32 = 10;
pub const PLAYER_WALK_FRAMES: u32 = 3;
pub const COIN_SPIN_FRAMES: u64 = 8;

#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    size: Size,
    layer: RenderLayer,
    capabilities: Capabilities,
    initial_facing: Facing,
    pub position: Point,
    /// Deltas proposed on the last tick, before collision resolution.
    pub velocity: Point,
    pub orientation: Orientation,
    pub behavior: Behavior,
    active: bool,
}

impl Entity {
    pub(crate) fn from_def(def: &KindDef) -> Self {
        Self {
            kind: def.kind,
            size: def.size(),
            layer: def.layer,
            capabilities: def.capabilities,
            initial_facing: def.initial_facing,
            position: Point::default(),
            velocity: Point::default(),
            orientation: Orientation::default(),
            behavior: Behavior::initial(def.kind, def.initial_facing),
            active: false,
        }
    }

    pub(crate) fn activate(&mut self, position: Point, orientation: Orientation) {
        self.position = position;
        self.velocity = Point::default();
        self.orientation = orientation;
        self.behavior = Behavior::initial(self.kind, self.initial_facing);
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.position = Point::default();
        self.velocity = Point::default();
        self.behavior = Behavior::initial(self.kind, self.initial_facing);
        self.active = false;
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Catalog bounding box; never changes after construction.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Collision rectangle. Vertical pipes use the transposed box.
    pub fn rect(&self) -> Rect {
        let size = if self.kind == EntityKind::Pipe && self.orientation.is_vertical() {
            self.size.transposed()
        } else {
            self.size
        };
        Rect::at(self.position, size)
    }

    pub fn player(&self) -> Option<&PlayerBody> {
        match &self.behavior {
            Behavior::Player(body) => Some(body),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerBody> {
        match &mut self.behavior {
            Behavior::Player(body) => Some(body),
            _ => None,
        }
    }

    pub fn enemy(&self) -> Option<&EnemyBody> {
        match &self.behavior {
            Behavior::Enemy(body) => Some(body),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self) -> Option<&mut EnemyBody> {
        match &mut self.behavior {
            Behavior::Enemy(body) => Some(body),
            _ => None,
        }
    }

    pub fn visual_state(&self, tick: u64) -> VisualState {
        match &self.behavior {
            Behavior::Player(body) => {
                let pose = match body.state {
                    PlayerState::Dead => Pose::Dead,
                    state if state.is_jumping() => Pose::Jumping,
                    _ if body.walk_ticks > 0 => Pose::Walking,
                    _ => Pose::Standing,
                };
                VisualState {
                    pose,
                    facing: body.state.facing(),
                    frame: walk_frame(body.walk_ticks, PLAYER_WALK_FRAMES),
                }
            }
            Behavior::Enemy(body) => {
                let frames = match self.kind {
                    EntityKind::Enemy(species) => u32::from(species.walk_frames()),
                    _ => 1,
                };
                VisualState {
                    pose: if body.is_dead() {
                        Pose::Dead
                    } else {
                        Pose::Walking
                    },
                    facing: body.state.facing(),
                    frame: if body.is_dead() {
                        0
                    } else {
                        walk_frame(body.walk_ticks, frames)
                    },
                }
            }
            Behavior::Static => VisualState {
                pose: Pose::Standing,
                facing: self.initial_facing,
                frame: if self.kind == EntityKind::Coin {
                    ((tick / u64::from(WALK_FRAME_TICKS)) % COIN_SPIN_FRAMES) as u8
                } else {
                    0
                },
            },
        }
    }
}

fn walk_frame(walk_ticks: u32, frames: u32) -> u8 {
    ((walk_ticks / WALK_FRAME_TICKS) % frames.max(1)) as u8
}
