/// The live entity collection.
///
/// Insertion order is draw order (later entities are drawn on top) and scan
/// order for collision checks.  Nothing else depends on it.

use std::io;

use log::{debug, trace};

use crate::entities::{Bounds, Entity, EntityKind, PlayerCraft};
use crate::surface::Surface;

/// Spawns beyond this many live entities are dropped.
pub const MAX_ENTITIES: usize = 256;

#[derive(Clone, Debug)]
pub struct Registry {
    entities: Vec<Entity>,
    capacity: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry::with_capacity(MAX_ENTITIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Registry {
            entities: Vec::with_capacity(capacity.min(MAX_ENTITIES)),
            capacity,
        }
    }

    /// Append `entity`.  A full registry drops it and returns `false`; the
    /// caller carries on as if the spawn never happened.
    pub fn add(&mut self, entity: Entity) -> bool {
        if self.entities.len() >= self.capacity {
            debug!("registry full ({}), dropping {:?} spawn", self.capacity, entity.kind());
            return false;
        }
        trace!("spawn {:?} at {:?}", entity.kind(), entity.position());
        self.entities.push(entity);
        true
    }

    /// Advance every entity present when the call starts, once each, in
    /// order.  Entities spawned during the pass are appended afterwards and
    /// first move on the next call.
    pub fn advance_all(&mut self, bounds: Bounds) {
        let snapshot = self.entities.len();
        let mut spawned = Vec::new();
        for entity in &mut self.entities[..snapshot] {
            entity.advance(bounds, &mut spawned);
        }
        for entity in spawned {
            self.add(entity);
        }
    }

    /// Retire and drop every expired entity.  Survivors keep their relative
    /// order.  The retired entities are returned, already retired.
    pub fn compact(&mut self, bounds: Bounds) -> Vec<Entity> {
        let mut retired = Vec::new();
        let mut survivors = Vec::with_capacity(self.entities.len());
        for mut entity in self.entities.drain(..) {
            if entity.expired(bounds) {
                entity.retire();
                debug!("retired {:?} at {:?}", entity.kind(), entity.position());
                retired.push(entity);
            } else {
                survivors.push(entity);
            }
        }
        self.entities = survivors;
        retired
    }

    /// Draw every live entity in collection order.
    pub fn render_all<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        for entity in &self.entities {
            entity.render(surface)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn player(&self) -> Option<&PlayerCraft> {
        self.entities.iter().find_map(Entity::as_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerCraft> {
        self.entities.iter_mut().find_map(|e| match e {
            Entity::Player(p) => Some(p),
            _ => None,
        })
    }
}
