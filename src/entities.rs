/// Entity kinds and the contract they share.
///
/// The four kinds form a closed set: `Entity` is an enum and every
/// behaviour (advance, render, expired, retire) is one exhaustive `match`.
/// A new kind means one new variant and the compiler lists the sites.

use std::io;

use crate::surface::{Surface, Tint};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Row 0 belongs to the HUD; nothing is clamped above this row.
pub const PLAY_TOP: i32 = 1;

pub const CRAFT_EXTENT: Extent = Extent { height: 5, width: 7 };
pub const EFFECT_EXTENT: Extent = Extent { height: 4, width: 8 };
pub const PROJECTILE_EXTENT: Extent = Extent { height: 1, width: 1 };

/// Update ticks an explosion stays on screen.
pub const EFFECT_DECAY: i32 = 5;

/// Update ticks between two hostile volleys (2 s at 16 Hz).
pub const HOSTILE_FIRE_PERIOD: u32 = 32;

pub const SHIP_ART: [&str; 5] = [
    " ,     ",
    " |\\-   ",
    ">|^===0",
    " |/-   ",
    " '     ",
];

pub const HOSTILE_ART: [&str; 5] = [
    "  ^^^  ",
    "{(-+-)}",
    "{(-+-)}",
    "{(-+-)}",
    "  ***  ",
];

pub const EXPLOSION_ART: [&str; 4] = [
    ".** *. *",
    "*. *.*. ",
    ".** **.*",
    "*.*.***.",
];

pub const PROJECTILE_GLYPH: &str = "-";

// ── Grid geometry ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Position {
            row: self.row + rows,
            col: self.col + cols,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub height: i32,
    pub width: i32,
}

/// Axis-aligned rectangle anchored at its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub origin: Position,
    pub extent: Extent,
}

impl Rect {
    pub const fn new(origin: Position, extent: Extent) -> Self {
        Rect { origin, extent }
    }

    /// Last row covered (inclusive).
    pub fn bottom(&self) -> i32 {
        self.origin.row + self.extent.height - 1
    }

    /// Last column covered (inclusive).
    pub fn right(&self) -> i32 {
        self.origin.col + self.extent.width - 1
    }

    /// Inclusive overlap: rectangles sharing a single cell overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.origin.row <= other.bottom()
            && other.origin.row <= self.bottom()
            && self.origin.col <= other.right()
            && other.origin.col <= self.right()
    }
}

/// Size of the visible field; entity coordinates live inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub rows: i32,
    pub cols: i32,
}

impl Bounds {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Bounds { rows, cols }
    }

    pub fn contains_cell(&self, row: i32, col: i32) -> bool {
        (0..self.rows).contains(&row) && (0..self.cols).contains(&col)
    }

    /// Pull `pos` back so a body of `extent` stays below the HUD and inside
    /// the field.  On a field too small for the body the top-left wins.
    pub fn clamp(&self, pos: Position, extent: Extent) -> Position {
        let max_row = (self.rows - extent.height).max(PLAY_TOP);
        let max_col = (self.cols - extent.width).max(0);
        Position {
            row: pos.row.clamp(PLAY_TOP, max_row),
            col: pos.col.clamp(0, max_col),
        }
    }
}

// ── Factions ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Hostile,
}

/// Travel direction of a projectile, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// +1: fired by the player.
    Right,
    /// -1: fired by a hostile.
    Left,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
        }
    }

    /// The side that fired a projectile travelling this way.
    pub fn faction(self) -> Faction {
        match self {
            Direction::Right => Faction::Player,
            Direction::Left => Faction::Hostile,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    PlayerCraft,
    HostileCraft,
    Projectile,
    Effect,
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// The glyphs an entity draws.  Released exactly once, when the entity is
/// retired; a released sprite draws nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    lines: Vec<String>,
    tint: Tint,
    released: bool,
}

impl Sprite {
    pub fn new<S: AsRef<str>>(lines: &[S], tint: Tint) -> Self {
        Sprite {
            lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
            tint,
            released: false,
        }
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn release(&mut self) {
        debug_assert!(!self.released, "sprite released twice");
        self.lines.clear();
        self.released = true;
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S, at: Position) -> io::Result<()> {
        for (i, line) in self.lines.iter().enumerate() {
            surface.move_print(at.row + i as i32, at.col, line, self.tint)?;
        }
        Ok(())
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

/// The craft under the player's control.  Moves only through input.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerCraft {
    pub pos: Position,
    pub life: u32,
    /// Starting life, used to size the HUD gauge.
    pub max_life: u32,
    pub score: u32,
    /// Cells moved per input event.
    pub speed: i32,
    sprite: Sprite,
}

impl PlayerCraft {
    pub fn new(pos: Position, life: u32, speed: i32, sprite: Sprite) -> Self {
        PlayerCraft {
            pos,
            life,
            max_life: life,
            score: 0,
            speed,
            sprite,
        }
    }

    /// Where a player volley leaves the hull.
    pub fn muzzles(&self) -> [Position; 2] {
        [self.pos.offset(1, 4), self.pos.offset(3, 4)]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostileCraft {
    pub pos: Position,
    pub alive: bool,
    /// Update ticks until the next volley.
    pub cooldown: u32,
    sprite: Sprite,
}

impl HostileCraft {
    pub fn new(pos: Position) -> Self {
        HostileCraft {
            pos,
            alive: true,
            cooldown: HOSTILE_FIRE_PERIOD,
            sprite: Sprite::new(&HOSTILE_ART, Tint::Default),
        }
    }

    /// Taken after the move, so shots leave from the hull's new left edge.
    pub fn muzzles(&self) -> [Position; 2] {
        [self.pos.offset(1, 0), self.pos.offset(3, 0)]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Position,
    pub alive: bool,
    direction: Direction,
    sprite: Sprite,
}

impl Projectile {
    pub fn new(pos: Position, direction: Direction) -> Self {
        Projectile {
            pos,
            alive: true,
            direction,
            sprite: Sprite::new(&[PROJECTILE_GLYPH], Tint::Red),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Only the opposing side can be hurt by this projectile.
    pub fn can_damage(&self, target: Faction) -> bool {
        self.direction.faction() != target
    }
}

/// Cosmetic explosion.  Never moves, never collides.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub pos: Position,
    pub countdown: i32,
    sprite: Sprite,
}

impl Effect {
    pub fn new(pos: Position) -> Self {
        Effect {
            pos,
            countdown: EFFECT_DECAY,
            sprite: Sprite::new(&EXPLOSION_ART, Tint::Red),
        }
    }
}

// ── The closed set ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Player(PlayerCraft),
    Hostile(HostileCraft),
    Projectile(Projectile),
    Effect(Effect),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::PlayerCraft,
            Entity::Hostile(_) => EntityKind::HostileCraft,
            Entity::Projectile(_) => EntityKind::Projectile,
            Entity::Effect(_) => EntityKind::Effect,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Entity::Player(p) => p.pos,
            Entity::Hostile(h) => h.pos,
            Entity::Projectile(b) => b.pos,
            Entity::Effect(e) => e.pos,
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Entity::Player(_) | Entity::Hostile(_) => CRAFT_EXTENT,
            Entity::Projectile(_) => PROJECTILE_EXTENT,
            Entity::Effect(_) => EFFECT_EXTENT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position(), self.extent())
    }

    fn sprite(&self) -> &Sprite {
        match self {
            Entity::Player(p) => &p.sprite,
            Entity::Hostile(h) => &h.sprite,
            Entity::Projectile(b) => &b.sprite,
            Entity::Effect(e) => &e.sprite,
        }
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        match self {
            Entity::Player(p) => &mut p.sprite,
            Entity::Hostile(h) => &mut h.sprite,
            Entity::Projectile(b) => &mut b.sprite,
            Entity::Effect(e) => &mut e.sprite,
        }
    }

    /// One update tick.  Anything the entity spawns goes to `spawned`, not
    /// into the collection being iterated.
    pub fn advance(&mut self, bounds: Bounds, spawned: &mut Vec<Entity>) {
        match self {
            Entity::Player(_) => {}
            Entity::Hostile(h) => {
                h.pos.col -= 1;
                h.cooldown = h.cooldown.saturating_sub(1);
                if h.cooldown == 0 {
                    h.cooldown = HOSTILE_FIRE_PERIOD;
                    if h.alive {
                        for muzzle in h.muzzles() {
                            // A shot born outside the field would retire unseen.
                            if bounds.contains_cell(muzzle.row, muzzle.col) {
                                spawned.push(Entity::Projectile(Projectile::new(
                                    muzzle,
                                    Direction::Left,
                                )));
                            }
                        }
                    }
                }
            }
            Entity::Projectile(b) => {
                if b.alive {
                    b.pos.col += b.direction.sign();
                }
            }
            Entity::Effect(e) => e.countdown -= 1,
        }
    }

    pub fn expired(&self, bounds: Bounds) -> bool {
        match self {
            Entity::Player(p) => p.life == 0,
            Entity::Hostile(h) => !h.alive || h.pos.col <= 0,
            Entity::Projectile(b) => !b.alive || b.pos.col < 0 || b.pos.col >= bounds.cols,
            Entity::Effect(e) => e.countdown <= 0,
        }
    }

    /// Spent projectiles wait for the next compact out of sight.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        if let Entity::Projectile(b) = self {
            if !b.alive {
                return Ok(());
            }
        }
        self.sprite().draw(surface, self.position())
    }

    /// Release the entity's sprite.  Called once, by `Registry::compact`.
    pub fn retire(&mut self) {
        self.sprite_mut().release();
    }

    pub fn is_retired(&self) -> bool {
        self.sprite().is_released()
    }

    pub fn as_player(&self) -> Option<&PlayerCraft> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hostile(&self) -> Option<&HostileCraft> {
        match self {
            Entity::Hostile(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match self {
            Entity::Projectile(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_effect(&self) -> Option<&Effect> {
        match self {
            Entity::Effect(e) => Some(e),
            _ => None,
        }
    }
}
