/// Input-driven transitions and spawn policy.
///
/// Every function mutates the registry it is given and nothing else.  All
/// randomness comes through an injected `Rng` so tests can seed it.

use log::debug;
use rand::Rng;

use crate::entities::{
    Bounds, Direction, Entity, HostileCraft, Position, Projectile, CRAFT_EXTENT, PLAY_TOP,
};
use crate::profile::Action;
use crate::registry::Registry;

/// Hostiles appear this many columns in from the right edge.
pub const HOSTILE_SPAWN_INSET: i32 = 10;

/// Column the player craft starts at.
pub const PLAYER_START_COL: i32 = 5;

// ── Placement ────────────────────────────────────────────────────────────────

pub fn player_start(bounds: Bounds) -> Position {
    bounds.clamp(Position::new(bounds.rows / 2, PLAYER_START_COL), CRAFT_EXTENT)
}

pub fn hostile_spawn_column(bounds: Bounds) -> i32 {
    bounds.cols - HOSTILE_SPAWN_INSET
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Move the player craft `speed` cells for a directional action, clamped to
/// the field.  Returns `false` for non-movement actions or when there is no
/// player.
pub fn move_player(registry: &mut Registry, action: Action, bounds: Bounds) -> bool {
    let Some(player) = registry.player_mut() else {
        return false;
    };
    let step = player.speed;
    let (rows, cols) = match action {
        Action::Up => (-step, 0),
        Action::Down => (step, 0),
        Action::Left => (0, -step),
        Action::Right => (0, step),
        Action::Shoot | Action::Quit => return false,
    };
    player.pos = bounds.clamp(player.pos.offset(rows, cols), CRAFT_EXTENT);
    true
}

/// Fire a volley of two rightward projectiles.  Returns how many made it
/// into the registry; a full registry silently eats the rest.
pub fn player_shoot(registry: &mut Registry) -> usize {
    let Some(player) = registry.player() else {
        return 0;
    };
    let muzzles = player.muzzles();
    muzzles
        .into_iter()
        .filter(|&at| registry.add(Entity::Projectile(Projectile::new(at, Direction::Right))))
        .count()
}

// ── Spawn policy ─────────────────────────────────────────────────────────────

/// Spawn one hostile at a uniformly random row on the spawn column.
///
/// A field too small to hold a craft, or a full registry, drops the spawn.
pub fn spawn_hostile<R: Rng + ?Sized>(
    registry: &mut Registry,
    bounds: Bounds,
    rng: &mut R,
) -> Option<Position> {
    let col = hostile_spawn_column(bounds);
    let last_row = bounds.rows - CRAFT_EXTENT.height;
    if col <= 0 || last_row < PLAY_TOP {
        debug!("field {:?} too small for a hostile, spawn dropped", bounds);
        return None;
    }
    let at = Position::new(rng.gen_range(PLAY_TOP..=last_row), col);
    registry
        .add(Entity::Hostile(HostileCraft::new(at)))
        .then_some(at)
}
