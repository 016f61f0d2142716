/// Projectile vs craft resolution.
///
/// Both checks test a projectile's single cell against a craft's bounding
/// rectangle with inclusive overlap, and both only let a projectile hurt
/// the opposing faction.  Scans are linear: entity counts stay in the tens.

use log::debug;

use crate::entities::{
    Effect, Entity, Faction, Position, Rect, CRAFT_EXTENT, PROJECTILE_EXTENT,
};
use crate::registry::Registry;

/// Outcome of a resolved hit: where the explosion was anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub at: Position,
}

fn cell_of(entity: &Entity, target: Faction) -> Option<Rect> {
    match entity {
        Entity::Projectile(b) if b.alive && b.can_damage(target) => {
            Some(Rect::new(b.pos, PROJECTILE_EXTENT))
        }
        _ => None,
    }
}

/// Hostile fire against the player craft.
///
/// Resolves at most one projectile per call: the first, in registry order,
/// whose cell lies inside the player's rectangle.  That projectile dies, an
/// effect spawns at the player's position and the player loses one life.
pub fn resolve_player_hits(registry: &mut Registry) -> Option<Hit> {
    let player = registry.player()?;
    if player.life == 0 {
        return None;
    }
    let hull = Rect::new(player.pos, CRAFT_EXTENT);

    let index = registry
        .iter()
        .position(|e| cell_of(e, Faction::Player).is_some_and(|cell| cell.overlaps(&hull)))?;
    if let Some(Entity::Projectile(b)) = registry.get_mut(index) {
        b.alive = false;
    }

    let player = registry.player_mut()?;
    player.life = player.life.saturating_sub(1);
    let at = player.pos;
    debug!("player hit at {:?}, life now {}", at, player.life);

    registry.add(Entity::Effect(Effect::new(at)));
    Some(Hit { at })
}

/// Player fire against every hostile craft.
///
/// Each live player projectile is matched against the hostiles in registry
/// order and stops at the first live overlap: the projectile and that
/// hostile die, an effect spawns at the hostile's position and the score
/// goes up by one.  Returns the hits in resolution order.
pub fn resolve_hostile_hits(registry: &mut Registry) -> Vec<Hit> {
    let mut hits = Vec::new();

    for bi in 0..registry.len() {
        let Some(cell) = registry.get(bi).and_then(|e| cell_of(e, Faction::Hostile)) else {
            continue;
        };
        let target = registry.iter().position(|e| match e {
            Entity::Hostile(h) => h.alive && e.rect().overlaps(&cell),
            _ => false,
        });
        let Some(hi) = target else {
            continue;
        };

        if let Some(Entity::Projectile(b)) = registry.get_mut(bi) {
            b.alive = false;
        }
        if let Some(Entity::Hostile(h)) = registry.get_mut(hi) {
            h.alive = false;
            hits.push(Hit { at: h.pos });
        }
    }

    if hits.is_empty() {
        return hits;
    }
    if let Some(player) = registry.player_mut() {
        player.score += hits.len() as u32;
        debug!("{} hostile(s) down, score {}", hits.len(), player.score);
    }
    for hit in &hits {
        registry.add(Entity::Effect(Effect::new(hit.at)));
    }
    hits
}
